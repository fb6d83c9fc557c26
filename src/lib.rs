//! Client library for the Casa Rancha admin API
//!
//! The data-access and view-state synchronization layer an admin
//! dashboard builds on. Three pieces:
//!
//! - [`client`] - authenticated HTTP against the backend: base URL from
//!   deployment config, bearer token resolved per request through the
//!   injected [`auth`] capability, one [`error::RequestError`] taxonomy.
//! - [`resources`] - one module per resource kind, normalizing the
//!   backend's wire shapes (nested `data` envelopes, raw timestamps,
//!   per-resource status vocabularies) into stable view models.
//! - [`cache`] and [`store`] - the query coordinator: deduplicated
//!   reads, previous data kept visible across page/filter changes, and
//!   mutation-driven cache updates (optimistic patches for deterministic
//!   status toggles, invalidate-and-refetch for everything else).
//!
//! # Example
//!
//! ```ignore
//! use rancha_admin::{AdminStore, ApiClient, AuthTokens, TokenStore};
//!
//! async fn example() -> rancha_admin::Result<()> {
//!     let auth = AuthTokens::new(TokenStore::new(), None);
//!     let store = AdminStore::new(ApiClient::from_env(auth)?);
//!
//!     let page = store.users(1, 10, Some("ada"), None).await?;
//!     let (from, to) = page.display_range();
//!     println!("showing {from} to {to} of {}", page.total);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod cache;
pub mod client;
pub mod envelope;
pub mod error;
pub mod http;
pub mod normalize;
pub mod resources;
pub mod store;

pub use auth::{AuthTokens, SessionTokenProvider, TokenStore};
pub use cache::{QueryCache, QueryKey, QueryState, SharedQueryCache};
pub use client::ApiClient;
pub use envelope::{Page, PaginationMeta};
pub use error::{RequestError, Result};
pub use store::AdminStore;
