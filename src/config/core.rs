use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use super::YardConfig;

/// Repository configuration file, looked up in the working directory
pub const REPO_CONFIG_FILE: &str = "yard.toml";

impl YardConfig {
    /// Load configuration from the standard locations
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_with_custom_config(None)
    }

    /// Load configuration, replacing the repository file with `custom_config` if given
    pub fn load_with_custom_config(custom_config: Option<&Path>) -> Result<Self, figment::Error> {
        let repo_config = custom_config.unwrap_or(Path::new(REPO_CONFIG_FILE));

        Self::figment(repo_config).extract()
    }

    fn figment(repo_config: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(YardConfig::default()));

        if let Some(user_config) = user_config_path() {
            figment = figment.merge(Toml::file(user_config));
        }

        // Environment variables always have highest priority
        figment
            .merge(Toml::file(repo_config))
            .merge(Env::prefixed("YARD_"))
    }
}

/// `~/.yard/config.toml`, if a home directory is known
pub fn user_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".yard").join("config.toml"))
}
