use serde::{Deserialize, Serialize};

use crate::source::{SourceSystem, DEFAULT_EXCLUDED_PREFIXES};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub version: String,
    /// Directory holding `emby-config/` and `config/`.
    #[serde(default = "default_config_directory")]
    pub config_directory: String,
    #[serde(default = "default_output_directory")]
    pub output_directory: String,
    #[serde(default = "SourceSystem::defaults")]
    pub sources: Vec<SourceSystem>,
    /// Name prefixes excluded from the movie query.
    #[serde(default = "default_excluded_prefixes")]
    pub excluded_prefixes: Vec<String>,
}

fn default_config_directory() -> String {
    ".".to_string()
}

fn default_output_directory() -> String {
    "./extracted".to_string()
}

fn default_excluded_prefixes() -> Vec<String> {
    DEFAULT_EXCLUDED_PREFIXES
        .iter()
        .map(|p| p.to_string())
        .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            config_directory: default_config_directory(),
            output_directory: default_output_directory(),
            sources: SourceSystem::defaults(),
            excluded_prefixes: default_excluded_prefixes(),
        }
    }
}

impl Config {
    pub fn source(&self, kind: crate::source::SourceKind) -> Option<&SourceSystem> {
        self.sources.iter().find(|s| s.kind == kind)
    }
}
