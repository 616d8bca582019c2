use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Budget for any single credential-store call, in milliseconds. A call
    /// that overruns fails the request with 503 instead of hanging it.
    pub store_timeout_ms: u64,
    /// Optional JSON fixture seeding the in-memory identity store.
    pub seed_path: Option<String>,
}

impl Config {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8774,
            store_timeout_ms: 5000,
            seed_path: None,
        }
    }
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();

    Ok(Config {
        port: std::env::var("AUTHGATE_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8774),
        store_timeout_ms: std::env::var("AUTHGATE_STORE_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5000),
        seed_path: std::env::var("AUTHGATE_SEED").ok(),
    })
}
