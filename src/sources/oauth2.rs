use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use http::header::ACCEPT;
use http::StatusCode;
use reqwest::Client;
use tracing::{debug, info};

use crate::cache::token::Token;
use crate::config::settings::HttpConfig;
use crate::config::sources::OAuthConfig;
use crate::helpers::time::get_instant;
use crate::observability::metrics::get_metrics;
use crate::sources::grant::Grant;

/// Why a token endpoint call did not produce a token.
#[derive(Debug)]
pub enum GrantError {
    /// endpoint answered with a non-2xx status
    Status(StatusCode, String),
    /// connection, timeout or body read failure
    Transport(reqwest::Error),
    /// 2xx body that is not a token response
    Decode(serde_json::Error),
}

impl GrantError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GrantError::Status(status, _) => Some(*status),
            GrantError::Transport(err) => err.status(),
            GrantError::Decode(_) => None,
        }
    }

    /// metric label
    pub fn reason(&self) -> &'static str {
        match self {
            GrantError::Status(_, _) => "status",
            GrantError::Transport(_) => "transport",
            GrantError::Decode(_) => "decode",
        }
    }
}

impl fmt::Display for GrantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrantError::Status(status, body) => {
                write!(f, "token endpoint returned {}: {}", status, body)
            }
            GrantError::Transport(err) => write!(f, "token endpoint unreachable: {}", err),
            GrantError::Decode(err) => write!(f, "invalid token response: {}", err),
        }
    }
}

impl std::error::Error for GrantError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GrantError::Status(_, _) => None,
            GrantError::Transport(err) => Some(err),
            GrantError::Decode(err) => Some(err),
        }
    }
}

/// HTTP client for `${drupal_root}/oauth/token`
#[derive(Debug, Clone)]
pub struct OAuth2Source {
    pub oauth: Arc<OAuthConfig>,
    pub token_url: String,
    pub client: Client,
}

impl OAuth2Source {
    pub fn new(oauth: OAuthConfig, http: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(http.timeout_ms))
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self::with_client(oauth, client))
    }

    pub fn with_client(oauth: OAuthConfig, client: Client) -> Self {
        let token_url = oauth.token_url();
        Self { oauth: Arc::new(oauth), token_url, client }
    }

    /// POST the grant form and parse the token response.
    pub async fn request_token(&self, grant: &Grant) -> Result<Token, GrantError> {
        let metrics = get_metrics().await;
        let grant_type = grant.grant_type();
        let start = get_instant();
        metrics.grant_requests.with_label_values(&[grant_type]).inc();

        info!("requesting token, grant '{}', url '{}'", grant_type, self.token_url);
        let result = self.send(grant).await;
        metrics
            .grant_duration
            .with_label_values(&[grant_type])
            .observe(start.elapsed().as_secs_f64());

        match result {
            Ok(token) => {
                debug!("grant '{}' succeeded, expires_in {}", grant_type, token.expires_in);
                Ok(token)
            }
            Err(err) => {
                metrics.grant_failures.with_label_values(&[grant_type, err.reason()]).inc();
                Err(err)
            }
        }
    }

    async fn send(&self, grant: &Grant) -> Result<Token, GrantError> {
        let response = self
            .client
            .post(&self.token_url)
            .header(ACCEPT, "application/json")
            .form(&grant.form(&self.oauth))
            .send()
            .await
            .map_err(GrantError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(GrantError::Transport)?;
        if !status.is_success() {
            return Err(GrantError::Status(status, body));
        }
        serde_json::from_str::<Token>(&body).map_err(GrantError::Decode)
    }
}
