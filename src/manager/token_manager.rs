use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::cache::store::TokenStore;
use crate::cache::token::{CachedToken, Token};
use crate::config::proc_validator::ensure_valid;
use crate::config::sources::ServiceConfig;
use crate::helpers::time::{Clock, SystemClock};
use crate::observability::metrics::get_metrics;
use crate::sources::grant::Grant;
use crate::sources::oauth2::{GrantError, OAuth2Source};

/// Result of a refresh-token grant.
#[derive(Debug)]
pub enum RefreshOutcome {
    Refreshed(Token),
    /// the endpoint did not hand out a token; callers fall back to the password grant
    Failed(GrantError),
}

/// Fetches, caches and refreshes the Drupal access token.
///
/// Every call reads the store afresh; there is no in-memory copy and no
/// de-duplication of concurrent grants, the last write wins.
#[derive(Debug)]
pub struct TokenManager<S: TokenStore, C: Clock = SystemClock> {
    source: OAuth2Source,
    store: S,
    clock: C,
    storage_key: String,
}

impl<S: TokenStore> TokenManager<S> {
    /// Validate `config` and build a manager on the system clock.
    pub fn new(config: &ServiceConfig, store: S) -> Result<Self> {
        Self::with_clock(config, store, SystemClock)
    }
}

impl<S: TokenStore, C: Clock> TokenManager<S, C> {
    pub fn with_clock(config: &ServiceConfig, store: S, clock: C) -> Result<Self> {
        ensure_valid(config)?;
        let source = OAuth2Source::new(config.oauth.clone(), &config.settings.http)?;
        Ok(Self {
            source,
            store,
            clock,
            storage_key: config.settings.storage.key().to_owned(),
        })
    }

    pub fn token_url(&self) -> &str {
        &self.source.token_url
    }

    /// Return a token whose `access_token` is usable right now.
    ///
    /// Served from the store when unexpired; otherwise refreshed, and when
    /// refreshing is impossible or fails, re-requested with the password
    /// grant. Only a password grant failure (or a store failure) is returned
    /// as an error.
    pub async fn get_token(&self) -> Result<Token> {
        let metrics = get_metrics().await;
        let now = self.clock.now();
        let raw = self
            .store
            .get(&self.storage_key)
            .await
            .with_context(|| format!("failed to read token record '{}'", self.storage_key))?;

        let refresh_token = match CachedToken::classify(raw.as_deref(), now) {
            CachedToken::Usable(token) => {
                debug!("token served from store, expires at {}", token.expiration_date);
                metrics.cache_hits.inc();
                return Ok(token);
            }
            CachedToken::Stale { refresh_token } => {
                metrics.cache_misses.with_label_values(&["stale"]).inc();
                refresh_token
            }
            CachedToken::Absent => {
                metrics.cache_misses.with_label_values(&["absent"]).inc();
                None
            }
        };

        if let Some(refresh_token) = refresh_token {
            match self.refresh_token(&refresh_token).await? {
                RefreshOutcome::Refreshed(token) => return Ok(token),
                RefreshOutcome::Failed(err) => {
                    warn!("token refresh failed, falling back to password grant: {}", err);
                }
            }
        } else if raw.is_some() {
            warn!("stored token record has no refresh token, requesting a new one");
        }

        self.fetch_oauth_token().await
    }

    /// Exchange `refresh_token` for a new token.
    ///
    /// Endpoint failures are returned as `RefreshOutcome::Failed`; only a
    /// store write failure is an `Err`.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshOutcome> {
        let grant = Grant::RefreshToken(refresh_token.to_owned());
        match self.source.request_token(&grant).await {
            Ok(response) => {
                let token = self.save_token(response).await?;
                info!("token refreshed, expires at {}", token.expiration_date);
                Ok(RefreshOutcome::Refreshed(token))
            }
            Err(err) => Ok(RefreshOutcome::Failed(err)),
        }
    }

    /// Request a new token with the resource owner password grant.
    pub async fn fetch_oauth_token(&self) -> Result<Token> {
        let response = self
            .source
            .request_token(&Grant::Password)
            .await
            .context("password grant failed")?;
        let token = self.save_token(response).await?;
        info!("new token obtained, expires at {}", token.expiration_date);
        Ok(token)
    }

    /// Stamp `response` with `date` and `expirationDate` and overwrite the
    /// stored record with it.
    pub async fn save_token(&self, response: Token) -> Result<Token> {
        let token = response.stamp(self.clock.now());
        let raw = serde_json::to_vec(&token).context("failed to serialize token record")?;
        self.store
            .set(&self.storage_key, raw)
            .await
            .with_context(|| format!("failed to write token record '{}'", self.storage_key))?;
        get_metrics().await.token_expiry_unix.set(token.expiration_date);
        Ok(token)
    }
}
