//! # Configuration Layering
//!
//! Resolves the `ClientConfig` an invocation connects with.
//!
//! Precedence, highest first:
//! 1. Command-line flags
//! 2. Environment (`SCTP_HOST`, `SCTP_PORT`, `SCTP_CONNECT_TIMEOUT_MS`,
//!    `SCTP_READ_TIMEOUT_MS`)
//! 3. TOML file given with `--config`
//! 4. Built-in defaults
//!
//! ```toml
//! host = "10.0.0.5"
//! port = 55770
//! connect_timeout_ms = 2000
//! read_timeout_ms = 10000
//! ```

use sctp_client::{ClientConfig, ClientError};
use std::path::Path;

/// Maximum accepted config file size (1 MiB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

pub const ENV_HOST: &str = "SCTP_HOST";
pub const ENV_PORT: &str = "SCTP_PORT";
pub const ENV_CONNECT_TIMEOUT_MS: &str = "SCTP_CONNECT_TIMEOUT_MS";
pub const ENV_READ_TIMEOUT_MS: &str = "SCTP_READ_TIMEOUT_MS";

/// Settings one layer may override. `None` leaves the lower layer's value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub connect_timeout_ms: Option<u64>,
    pub read_timeout_ms: Option<u64>,
}

impl Overrides {
    /// Read the `SCTP_*` variables through `lookup`.
    ///
    /// Unset or empty variables are skipped; unparsable numbers are a
    /// `Config` error naming the variable.
    pub fn from_env(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Ok(Self {
            host: get(ENV_HOST),
            port: get(ENV_PORT).map(|v| parse_var(ENV_PORT, &v)).transpose()?,
            connect_timeout_ms: get(ENV_CONNECT_TIMEOUT_MS)
                .map(|v| parse_var(ENV_CONNECT_TIMEOUT_MS, &v))
                .transpose()?,
            read_timeout_ms: get(ENV_READ_TIMEOUT_MS)
                .map(|v| parse_var(ENV_READ_TIMEOUT_MS, &v))
                .transpose()?,
        })
    }

    /// Overwrite every field of `config` this layer sets.
    pub fn apply(self, config: &mut ClientConfig) {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(ms) = self.connect_timeout_ms {
            config.connect_timeout_ms = Some(ms);
        }
        if let Some(ms) = self.read_timeout_ms {
            config.read_timeout_ms = Some(ms);
        }
    }
}

fn parse_var<N: std::str::FromStr>(key: &str, value: &str) -> Result<N, ClientError> {
    value
        .trim()
        .parse()
        .map_err(|_| ClientError::Config(format!("{} is not a valid number: '{}'", key, value)))
}

/// Load a TOML config file. Keys it omits keep their defaults.
pub fn load_file(path: &Path) -> Result<ClientConfig, ClientError> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        ClientError::Config(format!("Cannot read config '{}': {}", path.display(), e))
    })?;
    if metadata.len() > MAX_CONFIG_FILE_SIZE {
        return Err(ClientError::Config(format!(
            "Config '{}' is {} bytes, above the {} byte limit",
            path.display(),
            metadata.len(),
            MAX_CONFIG_FILE_SIZE
        )));
    }

    let text = std::fs::read_to_string(path).map_err(|e| {
        ClientError::Config(format!("Cannot read config '{}': {}", path.display(), e))
    })?;
    parse_toml(&text)
        .map_err(|e| ClientError::Config(format!("Invalid config '{}': {}", path.display(), e)))
}

/// Parse TOML text into a config.
pub fn parse_toml(text: &str) -> Result<ClientConfig, toml::de::Error> {
    toml::from_str(text)
}

/// Combine all layers and validate the result.
pub fn resolve(
    file: Option<&Path>,
    env: Overrides,
    flags: Overrides,
) -> Result<ClientConfig, ClientError> {
    let mut config = match file {
        Some(path) => load_file(path)?,
        None => ClientConfig::default(),
    };
    env.apply(&mut config);
    flags.apply(&mut config);
    config.validate()?;

    tracing::debug!(
        endpoint = %config.endpoint(),
        connect_timeout_ms = ?config.connect_timeout_ms,
        read_timeout_ms = ?config.read_timeout_ms,
        "configuration resolved"
    );
    Ok(config)
}
