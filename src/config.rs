use serde::Deserialize;
use std::{env, fs, path::Path};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_USER_AGENT: &str = "github_search";
pub const DEFAULT_PER_PAGE: u32 = 30;
// github refuses larger pages on the search endpoints
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_url: String,
    pub user_agent: String,
    pub per_page: u32,
}

/// Optional keys of the toml config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_url: Option<String>,
    user_agent: Option<String>,
    per_page: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Config {
    /// Reads the toml file named by `GH_SEARCH_CONFIG` if set, then applies
    /// the `GH_*` variables on top. The merged result is validated once.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match env::var("GH_SEARCH_CONFIG") {
            Ok(path) => Config::default().merge(read_file_config(Path::new(&path))?),
            Err(_) => Config::default(),
        };

        if let Ok(api_url) = env::var("GH_API_URL") {
            config.api_url = api_url;
        }
        if let Ok(user_agent) = env::var("GH_API_USER_AGENT") {
            config.user_agent = user_agent;
        }
        if let Ok(per_page) = env::var("GH_SEARCH_PER_PAGE") {
            config.per_page = parse_per_page("GH_SEARCH_PER_PAGE", &per_page)?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Config::default().merge(read_file_config(path.as_ref())?);
        config.validate()?;
        Ok(config)
    }

    fn merge(mut self, file: FileConfig) -> Self {
        if let Some(api_url) = file.api_url {
            self.api_url = api_url;
        }
        if let Some(user_agent) = file.user_agent {
            self.user_agent = user_agent;
        }
        if let Some(per_page) = file.per_page {
            self.per_page = per_page;
        }
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(ConfigError::InvalidValue {
                key: "per_page".to_string(),
                value: self.per_page.to_string(),
            });
        }
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "api_url".to_string(),
                value: self.api_url.clone(),
            });
        }
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "user_agent".to_string(),
                value: self.user_agent.clone(),
            });
        }
        Ok(())
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let file = toml::from_str(&content).map_err(|source| ConfigError::Toml {
        path: path.display().to_string(),
        source,
    })?;
    info!("Loaded config file {}", path.display());
    Ok(file)
}

fn parse_per_page(key: &str, value: &str) -> Result<u32, ConfigError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}
