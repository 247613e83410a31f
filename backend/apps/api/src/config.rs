//! Server configuration from environment variables

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, anyhow};
use auth::AuthConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:31113";
const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:31113,http://127.0.0.1:31113";

/// Everything `main` needs to start the server
pub struct ApiConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_acquire_timeout: Duration,
    pub bind_addr: SocketAddr,
    pub frontend_origins: Vec<String>,
    pub static_dir: PathBuf,
    pub auth: AuthConfig,
}

impl ApiConfig {
    /// Read from the process environment.
    ///
    /// Debug builds fall back to a random token secret; release builds
    /// refuse to start without `AUTH_TOKEN_SECRET`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok(), !cfg!(debug_assertions))
    }

    fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        require_secret: bool,
    ) -> anyhow::Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let database_max_connections = parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5u32)?;
        let acquire_timeout_secs = parse_or(&lookup, "DATABASE_ACQUIRE_TIMEOUT_SECS", 5u64)?;
        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .context("BIND_ADDR must be a socket address such as 0.0.0.0:31113")?;

        let frontend_origins = lookup("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        let static_dir = PathBuf::from(lookup("STATIC_DIR").unwrap_or_else(|| "static".into()));

        let mut auth = match lookup("AUTH_TOKEN_SECRET").filter(|s| !s.trim().is_empty()) {
            Some(secret_b64) => AuthConfig::new(decode_secret(&secret_b64)?),
            None if require_secret => {
                return Err(anyhow!("AUTH_TOKEN_SECRET must be set in production"));
            }
            None => {
                tracing::warn!("AUTH_TOKEN_SECRET not set, using a random secret");
                AuthConfig::with_random_secret()
            }
        };

        let token_ttl_secs = parse_or(
            &lookup,
            "AUTH_TOKEN_TTL_SECS",
            auth::application::config::DEFAULT_TOKEN_TTL.as_secs(),
        )?;
        auth = auth.with_token_ttl(Duration::from_secs(token_ttl_secs));

        if let Some(pepper) = lookup("PASSWORD_PEPPER").filter(|p| !p.is_empty()) {
            auth = auth.with_pepper(pepper.into_bytes());
        }

        Ok(Self {
            database_url,
            database_max_connections,
            database_acquire_timeout: Duration::from_secs(acquire_timeout_secs),
            bind_addr,
            frontend_origins,
            static_dir,
            auth,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        None => Ok(default),
    }
}

/// Base64 (standard alphabet) encoding of exactly 32 bytes
fn decode_secret(secret_b64: &str) -> anyhow::Result<[u8; 32]> {
    let bytes = platform::crypto::from_base64(secret_b64.trim())
        .context("AUTH_TOKEN_SECRET must be base64")?;
    <[u8; 32]>::try_from(bytes.as_slice())
        .map_err(|_| anyhow!("AUTH_TOKEN_SECRET must decode to 32 bytes (got {})", bytes.len()))
}
