use std::path::PathBuf;

use crate::config::Config;

pub struct PipelineConfig {
    pub config_directory: PathBuf,
    pub output_directory: PathBuf,
    pub copy_images: bool,
    pub generate_report: bool,
    pub excluded_prefixes: Vec<String>,
}

impl PipelineConfig {
    /// Directories and exclusions come from `config`; image copying and
    /// report writing are off until requested.
    pub fn from_config(config: &Config) -> Self {
        Self {
            config_directory: PathBuf::from(&config.config_directory),
            output_directory: PathBuf::from(&config.output_directory),
            copy_images: false,
            generate_report: false,
            excluded_prefixes: config.excluded_prefixes.clone(),
        }
    }
}
