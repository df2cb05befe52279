use std::env;
use std::time::Duration;

const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;
const DEFAULT_REST_COMPLETION_DELAY_MS: u64 = 500;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub tick_interval_ms: u64,
    pub rest_completion_delay_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:setpace.db?mode=rwc".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            tick_interval_ms: parse_millis("TICK_INTERVAL_MS", DEFAULT_TICK_INTERVAL_MS),
            rest_completion_delay_ms: parse_millis(
                "REST_COMPLETION_DELAY_MS",
                DEFAULT_REST_COMPLETION_DELAY_MS,
            ),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn rest_completion_delay(&self) -> Duration {
        Duration::from_millis(self.rest_completion_delay_ms)
    }
}

fn parse_millis(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
