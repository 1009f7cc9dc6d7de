use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub polling: PollingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Runtime-data endpoint; `RUNTIME_DATA_URL` overrides it at startup.
    pub endpoint: String,
    /// How long a fetched payload may serve cache hits. 0 disables the cache.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

fn default_cache_ttl_secs() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_poll_enabled")]
    pub enabled: bool,
    /// Poll period. 0 leaves polling off even when enabled.
    #[serde(default = "default_poll_interval_ms")]
    pub interval_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            enabled: default_poll_enabled(),
            interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_poll_enabled() -> bool {
    true
}

fn default_poll_interval_ms() -> u64 {
    30_000
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        let mut config: AppConfig = toml::from_str(&s)?;
        // The one environment override, read once at startup.
        if let Ok(url) = std::env::var("RUNTIME_DATA_URL")
            && !url.is_empty()
        {
            config.upstream.endpoint = url;
        }
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            self.upstream.endpoint.starts_with("http://")
                || self.upstream.endpoint.starts_with("https://"),
            "upstream.endpoint must be an http(s) URL, got {:?}",
            self.upstream.endpoint
        );
        Ok(())
    }
}
