pub mod loader;
pub mod schema;

use std::path::PathBuf;

pub use loader::{load_config, load_config_from_str};
pub use schema::Config;

/// `<user config dir>/cinedex/config.json`, when the platform has a config
/// directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("cinedex").join("config.json"))
}
