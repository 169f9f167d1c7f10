//! # Drupal Token Library
//!
//! Obtains an OAuth2 access token from a Drupal backend with the resource
//! owner password grant, caches it in a key-value store, refreshes it when
//! expired and falls back to a new password grant when refreshing fails.
//!
//! Modules:
//! - `config` — service configuration, loading and validation
//! - `cache` — token record and token stores (memory, file)
//! - `sources` — grant forms and the `/oauth/token` client
//! - `manager` — `TokenManager::get_token` and its helpers
//! - `server` — local HTTP endpoint serving the current token

pub mod cache;
pub mod config;
pub mod helpers;
pub mod manager;
pub mod observability;
pub mod server;
pub mod sources;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::cache::store::{build_store, StoreKind, TokenStore};
pub use crate::cache::token::Token;
pub use crate::config::sources::{OAuthConfig, ServiceConfig};
pub use crate::manager::token_manager::{RefreshOutcome, TokenManager};
