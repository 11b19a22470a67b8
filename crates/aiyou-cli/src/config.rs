//! CLI configuration
//!
//! Sources, lowest precedence first: the TOML file (`~/.aiyou/config.toml`
//! unless `--config` is given), environment variables, command line flags.
//! Environment and flags are merged by clap before they reach [`resolve`].

use std::path::{Path, PathBuf};

use aiyou_core::{ClientBuilder, ClientConfig};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::debug;

/// Contents of the config file
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub email: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
    pub client: ClientConfig,
}

/// Values taken from flags or environment
#[derive(Debug, Default)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub token: Option<String>,
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".aiyou").join("config.toml"))
}

/// Load the config file; a missing default file is not an error
pub fn load_file(explicit: Option<&Path>) -> Result<FileConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(FileConfig::default()),
        },
    };

    debug!("Loading config from {}", path.display());
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))
}

/// Merge file and overrides into a client builder
///
/// Email and password win over a token when both are complete.
pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<ClientBuilder> {
    let mut config = file.client;
    if let Some(base_url) = overrides.base_url {
        config.base_url = base_url;
    }

    let email = overrides.email.or(file.email);
    let password = overrides.password.or(file.password);
    let token = overrides.token.or(file.token);

    let builder = ClientBuilder::new().config(config);
    match (email, password, token) {
        (Some(email), Some(password), _) => Ok(builder.with_credentials(email, password)),
        (_, _, Some(token)) => Ok(builder.with_token(token)),
        (Some(_), None, None) => bail!("a password is required with --email (or AIYOU_PASSWORD)"),
        _ => bail!(
            "no credentials: pass --email/--password or --token, set AIYOU_EMAIL/AIYOU_PASSWORD \
             or AIYOU_TOKEN, or add them to ~/.aiyou/config.toml"
        ),
    }
}
