// ⚙️ Configuration - Environment-driven settings
//
// | variable                      | default                                   |
// |-------------------------------|-------------------------------------------|
// | PORT                          | 3000                                      |
// | COSTLENS_BIND_HOST            | 0.0.0.0                                   |
// | COSTLENS_SOURCE_URL           | https://www.numbeo.com/cost-of-living/in  |
// | COSTLENS_CACHE_TTL_SECS       | 3600                                      |
// | COSTLENS_FETCH_TIMEOUT_SECS   | 15                                        |
// | COSTLENS_RANKINGS_PATH        | data/raw_indices.txt                      |
// | COSTLENS_PUBLIC_DIR           | public                                    |
// | COSTLENS_LABELS_PATH          | unset (built-in label table)              |

use crate::cache::DEFAULT_TTL_SECS;
use crate::source::DEFAULT_SOURCE_URL;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub source_url: String,
    pub cache_ttl: Duration,
    pub fetch_timeout: Duration,
    pub rankings_path: PathBuf,
    pub public_dir: PathBuf,
    /// JSON label table replacing the built-in one
    pub labels_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "0.0.0.0".to_string(),
            port: 3000,
            source_url: DEFAULT_SOURCE_URL.to_string(),
            cache_ttl: Duration::from_secs(DEFAULT_TTL_SECS as u64),
            fetch_timeout: Duration::from_secs(15),
            rankings_path: PathBuf::from("data/raw_indices.txt"),
            public_dir: PathBuf::from("public"),
            labels_path: None,
        }
    }
}

impl Config {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary lookup (tests pass a map)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let cache_ttl_secs: u64 = parse_var(&lookup, "COSTLENS_CACHE_TTL_SECS")?
            .unwrap_or(defaults.cache_ttl.as_secs());
        let fetch_timeout_secs: u64 = parse_var(&lookup, "COSTLENS_FETCH_TIMEOUT_SECS")?
            .unwrap_or(defaults.fetch_timeout.as_secs());

        Ok(Config {
            host: lookup("COSTLENS_BIND_HOST").unwrap_or(defaults.host),
            port: parse_var(&lookup, "PORT")?.unwrap_or(defaults.port),
            source_url: lookup("COSTLENS_SOURCE_URL").unwrap_or(defaults.source_url),
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            rankings_path: lookup("COSTLENS_RANKINGS_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.rankings_path),
            public_dir: lookup("COSTLENS_PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.public_dir),
            labels_path: lookup("COSTLENS_LABELS_PATH")
                .filter(|raw| !raw.trim().is_empty())
                .map(PathBuf::from),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Cache TTL as the chrono duration the cache compares against
    pub fn cache_ttl_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.cache_ttl)
            .unwrap_or_else(|_| chrono::Duration::seconds(DEFAULT_TTL_SECS))
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        None => Ok(None),
    }
}
