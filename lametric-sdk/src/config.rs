//! Credential configuration file
//!
//! Credentials live in an INI file, `~/.lmconfig` by default:
//!
//! ```ini
//! [lametric]
//! client_id = ...
//! client_secret = ...
//! ```
//!
//! Values may be quoted. Empty values count as absent.

use std::fs;
use std::path::{Path, PathBuf};

use ini::Ini;
use rest_client::Credentials;
use thiserror::Error;
use tracing::debug;

/// Default location of the configuration file
pub const DEFAULT_CONFIG_FILE: &str = "~/.lmconfig";

const SECTION: &str = "lametric";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "An empty config file '{}' has been created. Please set the LaMetric API credentials (client_id, client_secret) in it.",
        .0.display()
    )]
    Created(PathBuf),

    #[error("failed to parse config file '{}': {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ini::ParseError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The `[lametric]` section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaMetricSection {
    pub client_id: String,
    pub client_secret: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub lametric: LaMetricSection,
}

impl Config {
    /// Load the configuration at `path` (`~` is expanded).
    ///
    /// With `auto_create` and no file at `path`, an empty template is written
    /// and `ConfigError::Created` asks the user to fill it in. Without
    /// `auto_load`, or when the file does not exist, the configuration is
    /// empty.
    pub fn load(path: impl AsRef<Path>, auto_create: bool, auto_load: bool) -> Result<Self, ConfigError> {
        let path = expand_home(path);

        if auto_create && !path.exists() {
            Config::default().save(&path)?;
            return Err(ConfigError::Created(path));
        }

        if !auto_load || !path.exists() {
            return Ok(Config::default());
        }

        debug!(path = %path.display(), "loading config");
        let content = fs::read_to_string(&path)?;
        Self::parse(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    /// Parse INI text; a missing section or key counts as empty
    pub fn parse(content: &str) -> Result<Self, ini::ParseError> {
        let ini = Ini::load_from_str(content)?;
        let value = |key: &str| {
            ini.section(Some(SECTION))
                .and_then(|section| section.get(key))
                .unwrap_or_default()
                .trim()
                .to_string()
        };

        Ok(Config {
            lametric: LaMetricSection {
                client_id: value("client_id"),
                client_secret: value("client_secret"),
            },
        })
    }

    /// Write the configuration to `path` (`~` is expanded)
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = expand_home(path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut ini = Ini::new();
        ini.with_section(Some(SECTION))
            .set("client_id", self.lametric.client_id.as_str())
            .set("client_secret", self.lametric.client_secret.as_str());
        ini.write_to_file(&path)?;
        Ok(())
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            client_id: non_empty(&self.lametric.client_id),
            client_secret: non_empty(&self.lametric.client_secret),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Expand a leading `~` to the user's home directory
pub fn expand_home(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

/// Resolve credentials per field: explicit arguments, then the
/// environment, then the configuration file
pub fn resolve_credentials(explicit: Credentials, config: &Config) -> Credentials {
    explicit
        .or(Credentials::from_env())
        .or(config.credentials())
}
