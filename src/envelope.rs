//! Response envelopes
//!
//! The backend wraps success payloads in a `data` field; list endpoints
//! add a `pagination` object. These helpers unwrap both into typed
//! values and reject unexpected shapes at the boundary instead of
//! letting them propagate into view code.

use crate::error::{RequestError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server-reported pagination, zero-defaulted so arithmetic never sees a
/// missing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PaginationMeta {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub page: u64,
    #[serde(default)]
    pub limit: u64,
}

#[derive(Deserialize)]
struct DataEnvelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct ListEnvelope<T> {
    data: Vec<T>,
    #[serde(default)]
    pagination: PaginationMeta,
}

/// Unwrap a `{ "data": ... }` envelope into the expected payload type.
pub fn data<T: DeserializeOwned>(payload: Value) -> Result<T> {
    match serde_json::from_value::<DataEnvelope<T>>(payload) {
        Ok(envelope) => Ok(envelope.data),
        Err(err) => {
            tracing::warn!("unexpected response shape: {}", err);
            Err(RequestError::new("Unexpected response from server"))
        }
    }
}

/// Unwrap a list envelope into its rows and pagination.
pub fn list<T: DeserializeOwned>(payload: Value) -> Result<(Vec<T>, PaginationMeta)> {
    match serde_json::from_value::<ListEnvelope<T>>(payload) {
        Ok(envelope) => Ok((envelope.data, envelope.pagination)),
        Err(err) => {
            tracing::warn!("unexpected list response shape: {}", err);
            Err(RequestError::new("Unexpected response from server"))
        }
    }
}

/// One page of a paginated listing, as consumed by table views.
///
/// `total` is the server-reported row count across all pages, never the
/// page length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, meta: PaginationMeta) -> Self {
        Self {
            items,
            total: meta.total,
            page: meta.page,
            limit: meta.limit,
        }
    }

    /// Number of pages needed to show every row.
    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(self.limit)
    }

    /// Inclusive row range shown by this page, for "Showing X to Y of Z"
    /// labels. Both bounds clamp to `total`, so a page past the end
    /// reads as an empty range rather than crashing.
    pub fn display_range(&self) -> (u64, u64) {
        let start = ((self.page.saturating_sub(1)) * self.limit + 1).min(self.total);
        let end = (self.page * self.limit).min(self.total);
        (start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn data_envelope_unwraps() {
        let value: u64 = data(json!({ "data": 7 })).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn missing_data_field_is_rejected() {
        let result: Result<u64> = data(json!({ "payload": 7 }));
        assert_eq!(
            result.unwrap_err().message,
            "Unexpected response from server"
        );
    }

    #[test]
    fn list_envelope_defaults_pagination() {
        let (rows, meta) = list::<u64>(json!({ "data": [1, 2, 3] })).unwrap();
        assert_eq!(rows, vec![1, 2, 3]);
        assert_eq!(meta, PaginationMeta::default());
    }

    #[test]
    fn display_range_matches_table_label() {
        let page = Page {
            items: vec![0u8; 10],
            total: 42,
            page: 3,
            limit: 10,
        };
        assert_eq!(page.display_range(), (21, 30));
        assert_eq!(page.total_pages(), 5);
    }

    #[test]
    fn last_partial_page_clamps_to_total() {
        let page = Page {
            items: vec![0u8; 2],
            total: 42,
            page: 5,
            limit: 10,
        };
        assert_eq!(page.display_range(), (41, 42));
    }

    #[test]
    fn page_past_the_end_is_empty_not_a_crash() {
        let page: Page<u8> = Page {
            items: vec![],
            total: 42,
            page: 9,
            limit: 10,
        };
        assert_eq!(page.display_range(), (42, 42));
        assert_eq!(page.total_pages(), 5);
    }

    #[test]
    fn empty_listing() {
        let page: Page<u8> = Page {
            items: vec![],
            total: 0,
            page: 1,
            limit: 10,
        };
        assert_eq!(page.display_range(), (0, 0));
        assert_eq!(page.total_pages(), 0);
    }

    #[test]
    fn zero_limit_never_divides_by_zero() {
        let page: Page<u8> = Page {
            items: vec![],
            total: 10,
            page: 1,
            limit: 0,
        };
        assert_eq!(page.total_pages(), 0);
    }
}
