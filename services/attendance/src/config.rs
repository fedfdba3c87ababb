use std::time::Duration;

use muster_core::config::{optional, parse_or, require};

/// Google Distance Matrix JSON endpoint.
pub const DEFAULT_ROUTING_BASE_URL: &str =
    "https://maps.googleapis.com/maps/api/distancematrix/json";

/// Attendance service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AttendanceConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port to listen on (default 8080). Env var: `ATTENDANCE_PORT`.
    pub attendance_port: u16,
    pub routing: RoutingConfig,
}

/// Settings for the routed-distance provider.
#[derive(Debug, Clone)]
pub struct RoutingConfig {
    /// Env var: `ROUTING_BASE_URL`.
    pub base_url: String,
    /// Env var: `ROUTING_API_KEY`. When unset every routed-distance call fails.
    pub api_key: Option<String>,
    /// Per-attempt timeout. Env var: `ROUTING_TIMEOUT_MS` (default 5000).
    pub timeout: Duration,
    /// Retries after the first attempt. Env var: `ROUTING_MAX_RETRIES` (default 2).
    pub max_retries: u32,
    /// First retry delay, doubled on each further retry. Env var: `ROUTING_BACKOFF_MS` (default 200).
    pub initial_backoff: Duration,
}

impl AttendanceConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: require("DATABASE_URL"),
            attendance_port: parse_or("ATTENDANCE_PORT", 8080),
            routing: RoutingConfig::from_env(),
        }
    }
}

impl RoutingConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: parse_or("ROUTING_BASE_URL", DEFAULT_ROUTING_BASE_URL.to_owned()),
            api_key: optional("ROUTING_API_KEY"),
            timeout: Duration::from_millis(parse_or("ROUTING_TIMEOUT_MS", 5_000)),
            max_retries: parse_or("ROUTING_MAX_RETRIES", 2),
            initial_backoff: Duration::from_millis(parse_or("ROUTING_BACKOFF_MS", 200)),
        }
    }

    /// Delay before retry number `retry` (1-based), capped at 10 s.
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(Duration::from_secs(10))
    }
}
