use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Kakao REST key, shared by the directions and local-search APIs.
    pub kakao_rest_api_key: String,
    /// Korea Expressway Corporation open-data key. The upstream accepts the
    /// literal `"test"` key at a reduced quota.
    pub expressway_api_key: String,
    pub snapshot_path: PathBuf,
    pub snapshot_ttl_secs: u64,
    pub http_timeout_secs: u64,
    pub http_max_retries: u32,
    pub http_retry_backoff_base_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("kakao_rest_api_key", &"[redacted]")
            .field("expressway_api_key", &"[redacted]")
            .field("snapshot_path", &self.snapshot_path)
            .field("snapshot_ttl_secs", &self.snapshot_ttl_secs)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("http_max_retries", &self.http_max_retries)
            .field(
                "http_retry_backoff_base_ms",
                &self.http_retry_backoff_base_ms,
            )
            .finish()
    }
}
