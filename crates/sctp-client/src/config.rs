//! # Client Configuration
//!
//! Where the store lives and how long to wait for it.
//!
//! Timeouts are optional. With no read timeout an operation blocks until the
//! store answers or the socket closes.

use crate::primitives::{DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_HOST, DEFAULT_PORT};
use crate::types::ClientError;
use serde::{Deserialize, Serialize};
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

/// Connection settings for `SctpClient::connect`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    /// Connect timeout in milliseconds. `None` uses the OS default.
    pub connect_timeout_ms: Option<u64>,
    /// Read timeout in milliseconds. `None` blocks indefinitely.
    pub read_timeout_ms: Option<u64>,
    /// Write timeout in milliseconds. `None` blocks indefinitely.
    pub write_timeout_ms: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            connect_timeout_ms: Some(DEFAULT_CONNECT_TIMEOUT_MS),
            read_timeout_ms: None,
            write_timeout_ms: None,
        }
    }
}

impl ClientConfig {
    /// Config for `host:port` with default timeouts.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout_ms = Some(duration_ms(timeout));
        self
    }

    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout_ms = Some(duration_ms(timeout));
        self
    }

    /// `host:port` as written.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_ms.map(Duration::from_millis)
    }

    pub fn write_timeout(&self) -> Option<Duration> {
        self.write_timeout_ms.map(Duration::from_millis)
    }

    /// Check values the socket layer would reject.
    ///
    /// A zero timeout is an error for std sockets, so it is refused here.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.host.trim().is_empty() {
            return Err(ClientError::Config("host is empty".to_string()));
        }
        if self.port == 0 {
            return Err(ClientError::Config("port must be non-zero".to_string()));
        }
        for (name, value) in [
            ("connect_timeout_ms", self.connect_timeout_ms),
            ("read_timeout_ms", self.read_timeout_ms),
            ("write_timeout_ms", self.write_timeout_ms),
        ] {
            if value == Some(0) {
                return Err(ClientError::Config(format!("{} must be non-zero", name)));
            }
        }
        Ok(())
    }

    /// Resolve the endpoint to socket addresses.
    pub fn socket_addrs(&self) -> Result<Vec<SocketAddr>, ClientError> {
        let endpoint = self.endpoint();
        let addrs: Vec<SocketAddr> = endpoint
            .to_socket_addrs()
            .map_err(|source| ClientError::Connect {
                addr: endpoint.clone(),
                source,
            })?
            .collect();
        if addrs.is_empty() {
            return Err(ClientError::Config(format!(
                "{} resolved to no addresses",
                endpoint
            )));
        }
        Ok(addrs)
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
