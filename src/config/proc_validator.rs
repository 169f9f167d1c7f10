//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Checks:
//!   * every oauth credential is present
//!   * drupal root is an absolute http(s) URL
//!   * storage / http / logging / metrics / server invariants

use anyhow::{anyhow, Result};
use reqwest::Url;
use tracing::{debug, error};

use crate::config::settings::{SettingsConfig, StorageConfig};
use crate::config::sources::{OAuthConfig, ServiceConfig};
use crate::utils::constants::LOG_LEVELS;

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_oauth(&cfg.oauth, &mut errors);
    validate_settings(&cfg.settings, &mut errors);

    if errors.is_empty() {
        debug!("config valid");
        Ok(())
    } else {
        error!("configuration validation errors ({}):", errors.len());
        for e in &errors {
            error!(" - {}", e);
        }
        Err(errors)
    }
}

/// Same as `validate_service_config`, folded into a single error.
pub fn ensure_valid(cfg: &ServiceConfig) -> Result<()> {
    validate_service_config(cfg).map_err(|errors| {
        anyhow!(
            "config is not valid, total errors: {}\n{}",
            errors.len(),
            errors.join("\n")
        )
    })
}

/// OAUTH CREDENTIALS
fn validate_oauth(oauth: &OAuthConfig, errors: &mut Vec<String>) {
    let required = [
        ("client_id", &oauth.client_id),
        ("client_secret", &oauth.client_secret),
        ("scope", &oauth.scope),
        ("drupal_root", &oauth.drupal_root),
        ("username", &oauth.username),
        ("password", &oauth.password),
    ];
    for (name, value) in required {
        if value.trim().is_empty() {
            errors.push(format!("oauth.{} is required", name));
        }
    }

    if !oauth.drupal_root.trim().is_empty() {
        match Url::parse(&oauth.drupal_root) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            Ok(url) => errors.push(format!(
                "oauth.drupal_root '{}' must use http or https, got '{}'",
                oauth.drupal_root,
                url.scheme()
            )),
            Err(e) => errors.push(format!(
                "oauth.drupal_root '{}' is not an absolute URL: {}",
                oauth.drupal_root, e
            )),
        }
    }
}

/// SETTINGS VALIDATION
fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    match &settings.storage {
        StorageConfig::Memory { .. } => {}
        StorageConfig::File { path, .. } => {
            if path.trim().is_empty() {
                errors.push("settings.storage.path is required for file storage".to_string());
            }
        }
    }
    if settings.storage.key().trim().is_empty() {
        errors.push("settings.storage.key must not be empty".to_string());
    }

    if settings.http.timeout_ms == 0 {
        errors.push("settings.http.timeout_ms must be > 0".to_string());
    }

    if settings.server.host.is_empty() {
        errors.push("settings.server.host must not be empty".to_string());
    }
    if settings.server.port.parse::<u16>().is_err() {
        errors.push(format!(
            "settings.server.port '{}' must be an integer in range 0-65535",
            settings.server.port
        ));
    }

    // metrics endpoint start with '/'
    let metrics = &settings.metrics;
    if !metrics.path.starts_with('/') {
        errors.push(format!(
            "settings.metrics.path '{}' must start with '/'",
            metrics.path
        ));
    }

    if let Some(logging) = &settings.logging {
        if !LOG_LEVELS.contains(&logging.level.as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' invalid; allowed: {:?}",
                logging.level, LOG_LEVELS
            ));
        }
    }
}
