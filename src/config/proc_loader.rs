use std::path::Path;

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use tokio::fs;
use tracing::{debug, error};

use crate::config::proc_validator;
use crate::config::sources::ServiceConfig;
use crate::observability::metrics::get_metrics;

/// Load and validate config from YAML file
pub async fn file_to_config(path: &Path) -> Result<ServiceConfig> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read config '{}'", path.display()))?;

    let expanded = expand_env_vars(&content);
    parse_config(expanded).await
}

pub async fn parse_config(content: String) -> Result<ServiceConfig> {
    let metrics = get_metrics().await;
    let service_config: ServiceConfig = serde_yaml::from_str(&content).inspect_err(|e| {
        error!("parse config error: {}", e);
        metrics.config_validation_errors.inc();
    })?;

    check(service_config).await
}

/// Configuration taken from the six environment variables, validated.
pub async fn env_to_config() -> Result<ServiceConfig> {
    check(ServiceConfig::from_env()).await
}

async fn check(service_config: ServiceConfig) -> Result<ServiceConfig> {
    let metrics = get_metrics().await;
    debug!("validation config ...");
    proc_validator::ensure_valid(&service_config)
        .inspect_err(|_| metrics.config_validation_errors.inc())?;
    Ok(service_config)
}

/// Replace `${VAR}` and `${VAR:default}` with environment values
pub fn expand_env_vars(input: &str) -> String {
    let re = match Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}") {
        Ok(re) => re,
        Err(e) => {
            error!("{}", anyhow!(e));
            return input.to_owned();
        }
    };
    re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}
