use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "UNFURL_LISTEN_ADDR";
pub const BASE_URL_ENV: &str = "UNFURL_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "UNFURL_STORAGE_BACKEND";
pub const REDIS_URL_ENV: &str = "UNFURL_REDIS_URL";
pub const TIKTOK_ENDPOINTS_ENV: &str = "UNFURL_TIKTOK_ENDPOINTS";
pub const INSTAGRAM_ENDPOINTS_ENV: &str = "UNFURL_INSTAGRAM_ENDPOINTS";
pub const TWITTER_MIRROR_ENV: &str = "UNFURL_TWITTER_MIRROR";
pub const PROVIDER_TIMEOUT_SECS_ENV: &str = "UNFURL_PROVIDER_TIMEOUT_SECS";
pub const RETENTION_DAYS_ENV: &str = "UNFURL_RETENTION_DAYS";
pub const SELECTION_ENV: &str = "UNFURL_PROVIDER_SELECTION";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_TIKTOK_ENDPOINTS: &str = "https://tikwm.com";
pub const DEFAULT_TWITTER_MIRROR: &str = "https://d.fxtwitter.com";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "redis")]
    Redis,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SelectionArg {
    #[value(name = "priority")]
    Priority,
    #[value(name = "shuffled")]
    Shuffled,
}

impl Display for SelectionArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionArg::Priority => write!(f, "priority"),
            SelectionArg::Shuffled => write!(f, "shuffled"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "unfurl-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Public base URL used when rendering short URLs in responses.
    #[arg(long, env = BASE_URL_ENV, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = REDIS_URL_ENV, required_if_eq("storage", "redis"))]
    pub redis_url: Option<String>,

    /// TikTok resolver endpoints, in fallback order.
    #[arg(
        long,
        env = TIKTOK_ENDPOINTS_ENV,
        value_delimiter = ',',
        default_value = DEFAULT_TIKTOK_ENDPOINTS
    )]
    pub tiktok_endpoints: Vec<String>,

    /// Instagram resolver endpoints, in fallback order.
    #[arg(long, env = INSTAGRAM_ENDPOINTS_ENV, value_delimiter = ',')]
    pub instagram_endpoints: Vec<String>,

    #[arg(long, env = TWITTER_MIRROR_ENV, default_value = DEFAULT_TWITTER_MIRROR)]
    pub twitter_mirror: String,

    #[arg(long, env = PROVIDER_TIMEOUT_SECS_ENV, default_value_t = 15)]
    pub provider_timeout_secs: u64,

    #[arg(long, env = RETENTION_DAYS_ENV, default_value_t = 7)]
    pub retention_days: i64,

    #[arg(
        long,
        env = SELECTION_ENV,
        value_enum,
        default_value_t = SelectionArg::Priority
    )]
    pub selection: SelectionArg,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse() {
        let cli = CLI::try_parse_from(["unfurl-gateway"]).unwrap();
        assert_eq!(cli.storage, StorageBackendArg::InMemory);
        assert_eq!(cli.retention_days, 7);
        assert_eq!(cli.tiktok_endpoints, vec!["https://tikwm.com"]);
        assert!(cli.instagram_endpoints.is_empty());
    }

    #[test]
    fn endpoint_lists_split_on_commas() {
        let cli = CLI::try_parse_from([
            "unfurl-gateway",
            "--tiktok-endpoints",
            "https://a.example,https://b.example",
        ])
        .unwrap();
        assert_eq!(
            cli.tiktok_endpoints,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn redis_backend_requires_a_url() {
        let err = CLI::try_parse_from(["unfurl-gateway", "--storage", "redis"]);
        assert!(err.is_err());

        let cli = CLI::try_parse_from([
            "unfurl-gateway",
            "--storage",
            "redis",
            "--redis-url",
            "redis://127.0.0.1:6379",
        ])
        .unwrap();
        assert_eq!(cli.storage, StorageBackendArg::Redis);
    }
}
