//! Query/cache coordinator
//!
//! Deduplicates concurrent identical reads, serves previous data while a
//! refetch or a parameter change is in flight, and lets mutations either
//! invalidate affected queries or rewrite cached values in place.
//!
//! Per query key the state machine is `Idle -> Loading -> Success|Error`,
//! then `Success -> Revalidating -> Success|Error` on refetch. A failed
//! fetch keeps any previously cached value so tables stay populated
//! behind the error notification.
//!
//! The cache is the only shared mutable resource in the client layer:
//! consumers never touch cached values directly, they go through
//! [`QueryCache::fetch`] and the mutation helpers.

use crate::error::{RequestError, Result};
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

type FetchResult = std::result::Result<Value, RequestError>;
type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

/// Identity of a cached read: resource kind plus canonical parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    kind: String,
    params: String,
}

impl QueryKey {
    /// Key for a parameterized query. Parameter order is significant;
    /// callers build them in one place per resource so identical reads
    /// produce identical keys.
    pub fn new(kind: &str, params: &[(&str, String)]) -> Self {
        let params = params
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        Self {
            kind: kind.to_string(),
            params,
        }
    }

    /// Key for a query without parameters.
    pub fn bare(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            params: String::new(),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}?{}", self.kind, self.params)
        }
    }
}

/// Lifecycle of one cached query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QueryState {
    #[default]
    Idle,
    Loading,
    Success,
    Revalidating,
    Error(String),
}

#[derive(Default)]
struct Entry {
    state: QueryState,
    value: Option<Value>,
    stale: bool,
    /// Sequence number of the most recently started fetch for this key.
    /// A completing fetch only applies its result while it is still the
    /// latest one - last-triggered wins.
    latest_seq: u64,
}

struct InFlight {
    seq: u64,
    future: SharedFetch,
}

#[derive(Default)]
struct CacheInner {
    entries: HashMap<QueryKey, Entry>,
    in_flight: HashMap<QueryKey, InFlight>,
    /// Last successful value per resource kind, kept so a parameter
    /// change never blanks the table mid-flight.
    last_success: HashMap<String, Value>,
    next_seq: u64,
}

/// The coordinator. Cheap to clone via [`Arc`]; all methods take `&self`.
#[derive(Default)]
pub struct QueryCache {
    inner: Mutex<CacheInner>,
}

enum Plan {
    Hit(Value),
    Join(SharedFetch),
    Start(SharedFetch, u64),
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Read through the cache.
    ///
    /// A fresh cached value is returned without touching the network. A
    /// concurrent identical read joins the in-flight fetch instead of
    /// issuing its own. Otherwise `fetcher` runs; while it is pending
    /// the previous value (if any) stays readable via [`Self::peek`] and
    /// [`Self::displayed`].
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let plan = {
            let mut inner = self.lock();

            let fresh = inner
                .entries
                .get(&key)
                .filter(|entry| entry.state == QueryState::Success && !entry.stale)
                .and_then(|entry| entry.value.clone());

            if let Some(value) = fresh {
                Plan::Hit(value)
            } else if let Some(in_flight) = inner.in_flight.get(&key) {
                Plan::Join(in_flight.future.clone())
            } else {
                let seq = inner.next_seq;
                inner.next_seq += 1;

                let fut = fetcher();
                let shared = async move {
                    let value = fut.await?;
                    serde_json::to_value(value).map_err(|err| {
                        RequestError::new(format!("failed to encode cached value: {err}"))
                    })
                }
                .boxed()
                .shared();

                inner.in_flight.insert(
                    key.clone(),
                    InFlight {
                        seq,
                        future: shared.clone(),
                    },
                );

                let entry = inner.entries.entry(key.clone()).or_default();
                entry.state = if entry.value.is_some() {
                    QueryState::Revalidating
                } else {
                    QueryState::Loading
                };
                entry.latest_seq = seq;

                Plan::Start(shared, seq)
            }
        };

        match plan {
            Plan::Hit(value) => decode(value),
            Plan::Join(shared) => shared.await.and_then(decode),
            Plan::Start(shared, seq) => {
                let result = shared.await;
                self.complete(&key, seq, &result);
                result.and_then(decode)
            }
        }
    }

    fn complete(&self, key: &QueryKey, seq: u64, result: &FetchResult) {
        let mut guard = self.lock();
        let inner = &mut *guard;

        if inner.in_flight.get(key).map(|f| f.seq) == Some(seq) {
            inner.in_flight.remove(key);
        }

        let Some(entry) = inner.entries.get_mut(key) else {
            return;
        };
        if entry.latest_seq != seq {
            // a newer fetch owns this key now
            return;
        }

        match result {
            Ok(value) => {
                entry.state = QueryState::Success;
                entry.stale = false;
                entry.value = Some(value.clone());
                inner
                    .last_success
                    .insert(key.kind().to_string(), value.clone());
            }
            Err(err) => {
                tracing::debug!("fetch for {} failed: {}", key, err);
                entry.state = QueryState::Error(err.message.clone());
            }
        }
    }

    /// Current state of a key.
    pub fn state(&self, key: &QueryKey) -> QueryState {
        self.lock()
            .entries
            .get(key)
            .map(|entry| entry.state.clone())
            .unwrap_or_default()
    }

    /// Cached value for an exact key, fresh or stale.
    pub fn peek<T: DeserializeOwned>(&self, key: &QueryKey) -> Option<T> {
        let value = self.lock().entries.get(key)?.value.clone()?;
        decode(value).ok()
    }

    /// Last successful value for a resource kind, regardless of which
    /// parameters produced it. This is what keeps the previous page
    /// visible while a new page or filter is in flight.
    pub fn displayed<T: DeserializeOwned>(&self, kind: &str) -> Option<T> {
        let value = self.lock().last_success.get(kind).cloned()?;
        decode(value).ok()
    }

    /// Mark every query of a kind stale. Values stay readable; the next
    /// read revalidates against the server.
    pub fn invalidate(&self, kind: &str) {
        let mut inner = self.lock();
        for (key, entry) in inner.entries.iter_mut() {
            if key.kind == kind {
                entry.stale = true;
            }
        }
    }

    /// Mark a single query stale.
    pub fn invalidate_key(&self, key: &QueryKey) {
        if let Some(entry) = self.lock().entries.get_mut(key) {
            entry.stale = true;
        }
    }

    /// Drop every query of a kind entirely (cached values included).
    pub fn remove(&self, kind: &str) {
        let mut inner = self.lock();
        inner.entries.retain(|key, _| key.kind != kind);
        inner.in_flight.retain(|key, _| key.kind != kind);
        inner.last_success.remove(kind);
    }

    /// Rewrite every cached value of a kind in place.
    ///
    /// Used for optimistic patches where the new value is a pure
    /// function of the action taken. Values that no longer decode as
    /// `T` are skipped with a warning rather than corrupted.
    pub fn patch<T, F>(&self, kind: &str, mut f: F)
    where
        T: Serialize + DeserializeOwned,
        F: FnMut(&mut T),
    {
        let mut inner = self.lock();

        let mut rewrite = |value: &mut Value| match serde_json::from_value::<T>(value.clone()) {
            Ok(mut typed) => {
                f(&mut typed);
                match serde_json::to_value(&typed) {
                    Ok(updated) => *value = updated,
                    Err(err) => tracing::warn!("failed to re-encode patched value: {}", err),
                }
            }
            Err(err) => tracing::warn!("skipping patch of undecodable cached value: {}", err),
        };

        let mut patched = 0usize;
        for (key, entry) in inner.entries.iter_mut() {
            if key.kind == kind {
                if let Some(value) = entry.value.as_mut() {
                    rewrite(value);
                    patched += 1;
                }
            }
        }
        if let Some(value) = inner.last_success.get_mut(kind) {
            rewrite(value);
        }

        tracing::debug!("patched {} cached queries of kind {}", patched, kind);
    }
}

/// Shared handle used across pages and mutation helpers.
pub type SharedQueryCache = Arc<QueryCache>;

fn decode<T: DeserializeOwned>(value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|err| {
        tracing::warn!("cached value had unexpected shape: {}", err);
        RequestError::new("Unexpected response from server")
    })
}
