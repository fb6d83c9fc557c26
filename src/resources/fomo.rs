//! FOMO windows
//!
//! Time-limited engagement windows. The one non-trivial client-side
//! validation in the system lives here: a window's duration must fall
//! within 5 minutes to 48 hours, inclusive, checked before any create or
//! update request is sent.

use crate::client::ApiClient;
use crate::envelope;
use crate::error::{RequestError, Result};
use crate::normalize::calendar_date;
use crate::resources::to_body;
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rejection message for an out-of-bounds window duration.
pub const DURATION_MESSAGE: &str = "Window must be between 5 minutes and 48 hours long";

const MIN_DURATION_SECS: i64 = 5 * 60;
const MAX_DURATION_SECS: i64 = 48 * 60 * 60;

/// Lifecycle of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowStatus {
    Active,
    Scheduled,
    Ended,
    Disabled,
}

impl WindowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Scheduled => "scheduled",
            Self::Ended => "ended",
            Self::Disabled => "disabled",
        }
    }
}

/// A FOMO window row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FomoWindow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: WindowStatus,
    pub start_date: String,
    pub end_date: String,
    pub max_posts_per_user: Option<u32>,
    pub posts_created: u64,
    pub users_participated: u64,
}

/// Payload for creating a window. Times are full RFC 3339 instants; the
/// duration gate runs on them before the request goes out.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowDraft {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_posts_per_user: Option<u32>,
}

/// Partial update; only the supplied fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_posts_per_user: Option<u32>,
}

/// Whether `end - start` lies within the allowed window duration.
///
/// Unparseable instants fail the check: the same rejection the operator
/// would get for an out-of-range duration, rather than a request the
/// server bounces with a less specific error.
pub fn duration_in_bounds(start_time: &str, end_time: &str) -> bool {
    let (Ok(start), Ok(end)) = (
        DateTime::parse_from_rfc3339(start_time),
        DateTime::parse_from_rfc3339(end_time),
    ) else {
        return false;
    };

    let seconds = (end - start).num_seconds();
    (MIN_DURATION_SECS..=MAX_DURATION_SECS).contains(&seconds)
}

fn check_duration(start_time: &str, end_time: &str) -> Result<()> {
    if duration_in_bounds(start_time, end_time) {
        Ok(())
    } else {
        Err(RequestError::new(DURATION_MESSAGE))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WindowStatsWire {
    #[serde(default)]
    post_count: u64,
    #[serde(default)]
    participant_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WindowWire {
    id: String,
    #[serde(default)]
    title: String,
    description: Option<String>,
    status: WindowStatus,
    #[serde(default)]
    start_time: String,
    #[serde(default)]
    end_time: String,
    max_posts_per_user: Option<u32>,
    #[serde(default)]
    stats: WindowStatsWire,
}

impl WindowWire {
    fn into_view(self) -> FomoWindow {
        FomoWindow {
            id: self.id,
            name: self.title,
            description: self.description.unwrap_or_default(),
            status: self.status,
            start_date: calendar_date(&self.start_time),
            end_date: calendar_date(&self.end_time),
            max_posts_per_user: self.max_posts_per_user,
            posts_created: self.stats.post_count,
            users_participated: self.stats.participant_count,
        }
    }
}

/// List all windows.
pub async fn windows(api: &ApiClient) -> Result<Vec<FomoWindow>> {
    let payload = api.get("/fomo/admin/windows").await?;
    let rows: Vec<WindowWire> = envelope::data(payload)?;
    Ok(rows.into_iter().map(WindowWire::into_view).collect())
}

/// Create a window. Fails client-side when the duration is out of
/// bounds.
pub async fn create(api: &ApiClient, draft: &WindowDraft) -> Result<()> {
    check_duration(&draft.start_time, &draft.end_time)?;
    api.post("/fomo/admin/windows", &to_body(draft)?).await?;
    Ok(())
}

/// Update a window. The duration gate runs when both instants are part
/// of the patch.
pub async fn update(api: &ApiClient, id: &str, patch: &WindowPatch) -> Result<()> {
    if let (Some(start), Some(end)) = (patch.start_time.as_deref(), patch.end_time.as_deref()) {
        check_duration(start, end)?;
    }
    api.patch(&format!("/fomo/admin/windows/{id}"), &to_body(patch)?)
        .await?;
    Ok(())
}

/// Delete a window.
pub async fn delete(api: &ApiClient, id: &str) -> Result<()> {
    api.delete(&format!("/fomo/admin/windows/{id}")).await?;
    Ok(())
}

/// Fetch the analytics blob for one window.
///
/// The payload has no stable contract; it is rendered verbatim by the
/// analytics dialog, so it stays an untyped value.
pub async fn analytics(api: &ApiClient, id: &str) -> Result<Value> {
    api.get(&format!("/fomo/admin/windows/{id}/analytics"))
        .await
}
