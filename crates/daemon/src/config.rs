//! Daemon configuration, read from `STUDENTQUEUE_*` environment variables

use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

const DEFAULT_DB_PATH: &str = "~/.studentqueue/queues.db";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9531;
const DEFAULT_ADMIN_PASSWORD: &str = "password";
const DEFAULT_RATE_LIMIT_BURST: u32 = 20;
const DEFAULT_RATE_LIMIT_RATE: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub db_path: String,
    pub db_max_connections: u32,
    pub rpc_host: String,
    pub rpc_port: u16,
    pub admin_password: String,
    pub rate_limit_burst: u32,
    pub rate_limit_rate: u32,
    pub log_format: LogFormat,
    pub log_dir: Option<PathBuf>,
}

impl DaemonConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unparsable numbers fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = shellexpand::tilde(
            &lookup("STUDENTQUEUE_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string()),
        )
        .into_owned();

        let log_format = match lookup("STUDENTQUEUE_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Self {
            db_path,
            db_max_connections: parse_var(&lookup, "STUDENTQUEUE_DB_MAX_CONNECTIONS")
                .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS),
            rpc_host: lookup("STUDENTQUEUE_RPC_HOST")
                .unwrap_or_else(|| DEFAULT_RPC_HOST.to_string()),
            rpc_port: parse_var(&lookup, "STUDENTQUEUE_RPC_PORT").unwrap_or(DEFAULT_RPC_PORT),
            admin_password: lookup("STUDENTQUEUE_ADMIN_PASSWORD")
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
            rate_limit_burst: parse_var(&lookup, "STUDENTQUEUE_RATE_LIMIT_BURST")
                .unwrap_or(DEFAULT_RATE_LIMIT_BURST),
            rate_limit_rate: parse_var(&lookup, "STUDENTQUEUE_RATE_LIMIT_RATE")
                .unwrap_or(DEFAULT_RATE_LIMIT_RATE),
            log_format,
            log_dir: lookup("STUDENTQUEUE_LOG_DIR")
                .map(|dir| PathBuf::from(shellexpand::tilde(&dir).into_owned())),
        }
    }

    /// sqlx connection URL for the configured database file
    pub fn database_url(&self) -> String {
        format!("sqlite://{}", self.db_path)
    }

    /// Must run after logging is initialized
    pub fn warn_on_defaults(&self) {
        if self.admin_password == DEFAULT_ADMIN_PASSWORD {
            warn!("STUDENTQUEUE_ADMIN_PASSWORD not set, using the default admin password");
        }
    }
}

/// Parsed value of `key`, or `None` when unset or unparsable
fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|s| s.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> DaemonConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DaemonConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]);
        assert!(config.db_path.ends_with(".studentqueue/queues.db"));
        assert!(!config.db_path.starts_with('~'));
        assert_eq!(config.db_max_connections, 10);
        assert_eq!(config.rpc_host, "127.0.0.1");
        assert_eq!(config.rpc_port, 9531);
        assert_eq!(config.admin_password, "password");
        assert_eq!(config.rate_limit_burst, 20);
        assert_eq!(config.rate_limit_rate, 5);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("STUDENTQUEUE_DB_PATH", "/tmp/q.db"),
            ("STUDENTQUEUE_RPC_PORT", "9000"),
            ("STUDENTQUEUE_ADMIN_PASSWORD", "s3cret"),
            ("STUDENTQUEUE_LOG_FORMAT", "json"),
            ("STUDENTQUEUE_LOG_DIR", "/var/log/studentqueue"),
        ]);
        assert_eq!(config.database_url(), "sqlite:///tmp/q.db");
        assert_eq!(config.rpc_port, 9000);
        assert_eq!(config.admin_password, "s3cret");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/studentqueue")));
    }

    #[test]
    fn test_numeric_overrides_of_different_widths() {
        let config = config(&[
            ("STUDENTQUEUE_DB_MAX_CONNECTIONS", "3"),
            ("STUDENTQUEUE_RPC_PORT", " 9600 "),
            ("STUDENTQUEUE_RATE_LIMIT_BURST", "7"),
            ("STUDENTQUEUE_RATE_LIMIT_RATE", "2"),
        ]);
        assert_eq!(config.db_max_connections, 3);
        assert_eq!(config.rpc_port, 9600);
        assert_eq!(config.rate_limit_burst, 7);
        assert_eq!(config.rate_limit_rate, 2);
    }

    #[test]
    fn test_port_out_of_range_falls_back() {
        let config = config(&[("STUDENTQUEUE_RPC_PORT", "70000")]);
        assert_eq!(config.rpc_port, 9531);
    }

    #[test]
    fn test_bad_numbers_fall_back() {
        let config = config(&[
            ("STUDENTQUEUE_RPC_PORT", "not-a-port"),
            ("STUDENTQUEUE_RATE_LIMIT_BURST", "-3"),
        ]);
        assert_eq!(config.rpc_port, 9531);
        assert_eq!(config.rate_limit_burst, 20);
    }
}
