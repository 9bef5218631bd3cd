pub mod filesystem;

pub use filesystem::{copy_file, ensure_directory, write_json, FileStorage};
