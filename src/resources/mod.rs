//! Resource modules
//!
//! One module per backend-managed resource kind. Each owns its wire
//! shapes, its view models, its status vocabulary, and the endpoint
//! functions that tie them together. Translation between backend and UI
//! vocabularies happens here and nowhere else:
//!
//! - timestamps consumed for display become `YYYY-MM-DD` strings at the
//!   normalizer, never re-parsed downstream;
//! - status vocabularies map through per-resource tables (the backend's
//!   vocabularies are not unified, so neither are ours);
//! - missing numeric fields default to 0 so percentage and total
//!   arithmetic never sees a hole.

use crate::error::{RequestError, Result};
use serde::Serialize;
use serde_json::Value;

pub mod ads;
pub mod ai_campaigns;
pub mod dashboard;
pub mod fomo;
pub mod ghost;
pub mod groups;
pub mod moderation;
pub mod notifications;
pub mod security;
pub mod support;
pub mod users;
pub mod verification;

/// Encode a request payload struct as a JSON body.
pub(crate) fn to_body<T: Serialize>(payload: &T) -> Result<Value> {
    serde_json::to_value(payload)
        .map_err(|err| RequestError::new(format!("failed to encode request body: {err}")))
}
