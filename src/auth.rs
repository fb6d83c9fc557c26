//! Bearer token resolution
//!
//! The original dashboard kept its admin token in ambient global state.
//! Here the capability is explicit: an [`AuthTokens`] resolver owns a
//! file-persisted [`TokenStore`] plus an optional injected
//! [`SessionTokenProvider`], and the request executor asks it for a token
//! per request. Resolution order: in-memory cache, persisted file, session
//! provider (persisting the result for reuse). All three may come up
//! empty - anonymous requests are allowed through and the server rejects
//! them.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Source of a fresh session token, injected by the host application.
///
/// Implementations typically wrap whatever session the operator signed in
/// with. Returning `Ok(None)` means no active session.
#[async_trait]
pub trait SessionTokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<Option<String>>;
}

/// Persisted token file contents.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct StoredToken {
    #[serde(default)]
    admin_token: Option<String>,
}

/// File-backed bearer token storage.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: Option<PathBuf>,
}

impl TokenStore {
    /// Store under the user config directory.
    pub fn new() -> Self {
        Self {
            path: dirs::config_dir().map(|p| p.join("rancha-admin").join("token.json")),
        }
    }

    /// Store at an explicit path (tests, containers without a home dir).
    pub fn at_path(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// A store that never persists anything.
    pub fn disabled() -> Self {
        Self { path: None }
    }

    /// Read the persisted token, if any.
    pub fn load(&self) -> Option<String> {
        let path = self.path.as_ref()?;
        let content = std::fs::read_to_string(path).ok()?;
        let stored: StoredToken = serde_json::from_str(&content).unwrap_or_default();
        stored.admin_token.filter(|t| !t.is_empty())
    }

    /// Persist a token for reuse across sessions.
    ///
    /// Persistence failure is logged, not propagated: the request that
    /// triggered it still holds a usable token.
    pub fn save(&self, token: &str) {
        let Some(path) = self.path.as_ref() else {
            return;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let stored = StoredToken {
            admin_token: Some(token.to_string()),
        };
        match serde_json::to_string_pretty(&stored) {
            Ok(content) => {
                if let Err(err) = std::fs::write(path, content) {
                    tracing::warn!("failed to persist token: {}", err);
                }
            }
            Err(err) => tracing::warn!("failed to encode token file: {}", err),
        }
    }

    /// Remove the persisted token.
    pub fn clear(&self) {
        if let Some(path) = self.path.as_ref() {
            let _ = std::fs::remove_file(path);
        }
    }
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Token resolver shared by all clones of the API client.
#[derive(Clone)]
pub struct AuthTokens {
    store: TokenStore,
    session: Option<Arc<dyn SessionTokenProvider>>,
    cached: Arc<RwLock<Option<String>>>,
}

impl AuthTokens {
    pub fn new(store: TokenStore, session: Option<Arc<dyn SessionTokenProvider>>) -> Self {
        Self {
            store,
            session,
            cached: Arc::new(RwLock::new(None)),
        }
    }

    /// Anonymous resolver: no persisted token, no session provider.
    pub fn anonymous() -> Self {
        Self::new(TokenStore::disabled(), None)
    }

    /// Resolve a bearer token for the next request.
    pub async fn resolve(&self) -> Result<Option<String>> {
        {
            let cache = self.cached.read().await;
            if let Some(token) = cache.as_ref() {
                return Ok(Some(token.clone()));
            }
        }

        if let Some(token) = self.store.load() {
            let mut cache = self.cached.write().await;
            *cache = Some(token.clone());
            return Ok(Some(token));
        }

        if let Some(session) = self.session.as_ref() {
            if let Some(token) = session.access_token().await? {
                if !token.is_empty() {
                    self.store.save(&token);
                    let mut cache = self.cached.write().await;
                    *cache = Some(token.clone());
                    return Ok(Some(token));
                }
            }
        }

        Ok(None)
    }

    /// Drop cached and persisted tokens; next resolve asks the session
    /// provider again. Call on session change or after a 401.
    pub async fn refresh(&self) {
        {
            let mut cache = self.cached.write().await;
            *cache = None;
        }
        self.store.clear();
        tracing::debug!("auth tokens cleared, will re-resolve on next request");
    }
}
