use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable names - single source of truth
pub mod env_vars {
    pub const PORT: &str = "PORT";
    pub const BIND_ADDRESS: &str = "BIND_ADDRESS";
    pub const ARCHIVE_DIR: &str = "ARCHIVE_DIR";
    pub const STATIC_DIR: &str = "STATIC_DIR";
    /// Seconds an article may go unread before its content is dropped from memory
    pub const CACHE_EXPIRY_SECS: &str = "CACHE_EXPIRY_SECS";
    pub const CACHE_SWEEP_INTERVAL_SECS: &str = "CACHE_SWEEP_INTERVAL_SECS";
    /// Fixed admin key. When unset a random key is generated per process.
    pub const ADMIN_KEY: &str = "MARKLUME_ADMIN_KEY";
}

/// Default values
pub mod defaults {
    pub const PORT: u16 = 8000;
    pub const BIND_ADDRESS: &str = "0.0.0.0";
    pub const ARCHIVE_DIR: &str = "archive";
    pub const STATIC_DIR: &str = "frontend/static";
    pub const CACHE_EXPIRY_SECS: u64 = 30 * 60;
    pub const CACHE_SWEEP_INTERVAL_SECS: u64 = 30 * 60;
}

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub bind_address: String,
    pub archive_dir: PathBuf,
    pub static_dir: PathBuf,
    pub cache_expiry: Duration,
    pub sweep_interval: Duration,
    pub admin_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_or_default(&lookup, env_vars::PORT, defaults::PORT);
        let expiry_secs =
            parse_or_default(&lookup, env_vars::CACHE_EXPIRY_SECS, defaults::CACHE_EXPIRY_SECS);
        // tokio intervals reject a zero period
        let sweep_secs = parse_or_default(
            &lookup,
            env_vars::CACHE_SWEEP_INTERVAL_SECS,
            defaults::CACHE_SWEEP_INTERVAL_SECS,
        )
        .max(1);

        Self {
            port,
            bind_address: lookup(env_vars::BIND_ADDRESS)
                .unwrap_or_else(|| defaults::BIND_ADDRESS.to_string()),
            archive_dir: PathBuf::from(
                lookup(env_vars::ARCHIVE_DIR).unwrap_or_else(|| defaults::ARCHIVE_DIR.to_string()),
            ),
            static_dir: PathBuf::from(
                lookup(env_vars::STATIC_DIR).unwrap_or_else(|| defaults::STATIC_DIR.to_string()),
            ),
            cache_expiry: Duration::from_secs(expiry_secs),
            sweep_interval: Duration::from_secs(sweep_secs),
            admin_key: lookup(env_vars::ADMIN_KEY).filter(|k| !k.trim().is_empty()),
        }
    }
}

fn parse_or_default<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match lookup(name) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("{} must be a valid number, got '{}'; using {}", name, raw, default);
                default
            }
        },
        None => default,
    }
}
