use serde::Deserialize;
use std::fmt;

use crate::config::settings::SettingsConfig;
use crate::utils::constants::*;

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub oauth: OAuthConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
}

impl ServiceConfig {
    pub fn new(oauth: OAuthConfig) -> Self {
        Self { oauth, settings: SettingsConfig::default() }
    }

    /// Build the configuration from `CLIENT_ID`, `CLIENT_SECRET`, `CLIENT_SCOPE`,
    /// `DRUPAL_ROOT`, `DRUPAL_USER` and `DRUPAL_PASSWORD`. Unset variables are
    /// left empty and rejected by validation.
    pub fn from_env() -> Self {
        Self::new(OAuthConfig::from_env())
    }
}

/// ================================
/// OAuth client & resource owner
/// ================================
#[derive(Deserialize, Clone, PartialEq, Eq)]
pub struct OAuthConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default)]
    pub scope: String,
    /// Drupal base URL, e.g. https://cms.example.com
    #[serde(default)]
    pub drupal_root: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl OAuthConfig {
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).unwrap_or_default();
        Self {
            client_id: var(ENV_CLIENT_ID),
            client_secret: var(ENV_CLIENT_SECRET),
            scope: var(ENV_CLIENT_SCOPE),
            drupal_root: var(ENV_DRUPAL_ROOT),
            username: var(ENV_DRUPAL_USER),
            password: var(ENV_DRUPAL_PASSWORD),
        }
    }

    /// `${drupal_root}/oauth/token`, tolerating a trailing slash on the root
    pub fn token_url(&self) -> String {
        format!("{}{}", self.drupal_root.trim_end_matches('/'), TOKEN_ENDPOINT_PATH)
    }
}

// secrets never reach the logs
impl fmt::Debug for OAuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("scope", &self.scope)
            .field("drupal_root", &self.drupal_root)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}
