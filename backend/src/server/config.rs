//! Server settings loaded via OrthoConfig.
//!
//! Values come from `DONATION_*` environment variables, configuration files
//! and command-line flags.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;

/// Runtime configuration for the HTTP server and its adapters.
#[derive(Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DONATION")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; in-memory adapters are used when absent.
    pub database_url: Option<String>,
    /// HS256 secret shared with the identity provider.
    pub jwt_secret: Option<String>,
    /// Permit a generated JWT secret outside debug builds.
    #[ortho_config(default = false)]
    pub allow_ephemeral_jwt_secret: bool,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// JSON file seeding the in-memory user directory.
    pub seed_directory_path: Option<PathBuf>,
}

impl std::fmt::Debug for ServerSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerSettings")
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("allow_ephemeral_jwt_secret", &self.allow_ephemeral_jwt_secret)
            .field("db_max_connections", &self.db_max_connections)
            .field("seed_directory_path", &self.seed_directory_path)
            .finish()
    }
}

impl ServerSettings {
    /// Parse the configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR).parse()
    }

    /// Configured pool size, falling back to ten connections.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
    }
}
