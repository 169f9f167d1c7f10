use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Token record as returned by `/oauth/token` and as kept in the store.
///
/// `date` and `expirationDate` are stamped locally by `TokenManager::save_token`,
/// every field the server sends beyond the known ones is kept in `extra`
/// and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// seconds, as provided by the server
    pub expires_in: i64,
    /// UNIX TIMESTAMP, when the record was stored
    #[serde(default)]
    pub date: i64,
    /// UNIX TIMESTAMP, `date + expires_in`
    #[serde(rename = "expirationDate", default)]
    pub expiration_date: i64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Token {
    pub fn new(access_token: String, refresh_token: Option<String>, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in,
            date: 0,
            expiration_date: 0,
            extra: Map::new(),
        }
    }

    /// Stamp the record with the storing time and the derived expiration.
    pub fn stamp(mut self, now: i64) -> Self {
        self.date = now;
        self.expiration_date = now.saturating_add(self.expires_in);
        self
    }

    /// Check if token can be handed out at `now`.
    ///
    /// Stricter than the expiry alone: a record with an empty `access_token`
    /// is never handed out, even when unexpired, and goes through refresh
    /// instead. Records written by `save_token` always pass this check.
    pub fn is_usable_at(&self, now: i64) -> bool {
        !self.access_token.is_empty() && self.expiration_date > now
    }

    pub fn token_type(&self) -> Option<&str> {
        self.extra.get("token_type").and_then(Value::as_str)
    }
}

/// What was found under the storage key.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedToken {
    Absent,
    /// unexpired with a non-empty `access_token`, see [`Token::is_usable_at`]
    Usable(Token),
    /// expired or malformed; carries whatever refresh token could be salvaged
    Stale { refresh_token: Option<String> },
}

impl CachedToken {
    /// Classify a raw stored record against `now`.
    ///
    /// A record that does not parse as a complete `Token` is still searched
    /// for a `refresh_token` field.
    pub fn classify(raw: Option<&[u8]>, now: i64) -> Self {
        let Some(raw) = raw else {
            return CachedToken::Absent;
        };

        match serde_json::from_slice::<Token>(raw) {
            Ok(token) if token.is_usable_at(now) => CachedToken::Usable(token),
            Ok(token) => CachedToken::Stale {
                refresh_token: token.refresh_token.filter(|t| !t.is_empty()),
            },
            Err(_) => CachedToken::Stale {
                refresh_token: salvage_refresh_token(raw),
            },
        }
    }
}

fn salvage_refresh_token(raw: &[u8]) -> Option<String> {
    serde_json::from_slice::<Value>(raw)
        .ok()?
        .get("refresh_token")?
        .as_str()
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
}
