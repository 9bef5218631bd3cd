pub mod images;
pub mod record;

pub use images::{ImageKind, ImageLocator, ImagePaths};
pub use record::{build_record, content_hash, MovieRecord, RawMovieRow, UNKNOWN_MOVIE};
