//! Shared constants and invariants

/// storage key the token record lives under
pub const DEFAULT_STORAGE_KEY: &str = "access-token";
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_METRICS_PATH: &str = "/metrics";
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
pub const DEFAULT_SERVER_PORT: &str = "8085";

/// token endpoint, relative to the Drupal root
pub const TOKEN_ENDPOINT_PATH: &str = "/oauth/token";

// Environment variables
pub const ENV_CLIENT_ID: &str = "CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "CLIENT_SECRET";
pub const ENV_CLIENT_SCOPE: &str = "CLIENT_SCOPE";
pub const ENV_DRUPAL_ROOT: &str = "DRUPAL_ROOT";
pub const ENV_DRUPAL_USER: &str = "DRUPAL_USER";
pub const ENV_DRUPAL_PASSWORD: &str = "DRUPAL_PASSWORD";

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
