//! Content moderation queue
//!
//! Flagged posts awaiting review. The UI speaks pending/reviewed/hidden
//! while the backend speaks pending/approved/removed; the mapping table
//! lives here and applies to both the list filter parameter and the
//! response rows, so no other layer ever sees backend vocabulary.

use crate::client::ApiClient;
use crate::envelope::{self, Page};
use crate::error::Result;
use crate::normalize::calendar_date;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// UI status vocabulary for a flagged post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagStatus {
    Pending,
    Reviewed,
    Hidden,
}

impl FlagStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
            Self::Hidden => "hidden",
        }
    }

    /// Backend vocabulary for this status.
    pub fn backend(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "approved",
            Self::Hidden => "removed",
        }
    }

    /// Parse a backend status. Anything unrecognized is still pending.
    pub fn from_backend(s: &str) -> Self {
        match s {
            "approved" => Self::Reviewed,
            "removed" => Self::Hidden,
            _ => Self::Pending,
        }
    }

    /// Parse a UI status string.
    pub fn from_ui(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "reviewed" => Some(Self::Reviewed),
            "hidden" => Some(Self::Hidden),
            _ => None,
        }
    }
}

/// Review decision for a flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewAction {
    Approve,
    Hide,
}

impl ReviewAction {
    /// The backend status this decision writes.
    pub fn backend_status(&self) -> &'static str {
        match self {
            Self::Approve => "approved",
            Self::Hide => "removed",
        }
    }

    /// The UI status the decision lands on.
    pub fn resulting_status(&self) -> FlagStatus {
        match self {
            Self::Approve => FlagStatus::Reviewed,
            Self::Hide => FlagStatus::Hidden,
        }
    }
}

/// Attached media on a flagged post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlagMedia {
    #[serde(rename = "type")]
    pub media_type: String,
    pub url: String,
    pub thumbnail_url: Option<String>,
}

/// A flagged post as rendered by the moderation queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFlag {
    pub id: String,
    pub post_id: String,
    /// Short preview shown in the table row.
    pub content: String,
    /// Full content shown in the review dialog; falls back to the
    /// preview when the backend omits it.
    pub content_full: String,
    pub media: Vec<FlagMedia>,
    pub reason: String,
    pub flagged_at: String,
    pub status: FlagStatus,
    pub author: String,
    pub author_flagged_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthorWire {
    username: Option<String>,
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlagWire {
    id: String,
    #[serde(default)]
    post_id: String,
    #[serde(default)]
    content_preview: String,
    content_full: Option<String>,
    #[serde(default)]
    media: Vec<FlagMedia>,
    #[serde(default)]
    reason: String,
    author: Option<AuthorWire>,
    #[serde(default)]
    author_flagged_count: u64,
    status: Option<String>,
    display_status: Option<String>,
    #[serde(default)]
    created_at: String,
}

impl FlagWire {
    fn into_view(self) -> ContentFlag {
        // displayStatus is already UI vocabulary when present; the raw
        // status field still speaks backend.
        let status = self
            .display_status
            .as_deref()
            .and_then(FlagStatus::from_ui)
            .unwrap_or_else(|| FlagStatus::from_backend(self.status.as_deref().unwrap_or("")));

        let author = self
            .author
            .and_then(|a| {
                a.username
                    .filter(|s| !s.is_empty())
                    .or(a.display_name.filter(|s| !s.is_empty()))
            })
            .unwrap_or_else(|| "-".to_string());

        ContentFlag {
            id: self.id,
            post_id: self.post_id,
            content_full: self
                .content_full
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| self.content_preview.clone()),
            content: self.content_preview,
            media: self.media,
            reason: self.reason,
            flagged_at: calendar_date(&self.created_at),
            status,
            author,
            author_flagged_count: self.author_flagged_count,
        }
    }
}

/// List the moderation queue with an optional status filter.
pub async fn queue(
    api: &ApiClient,
    page: u64,
    limit: u64,
    status: Option<FlagStatus>,
) -> Result<Page<ContentFlag>> {
    let mut params = vec![("page", page.to_string()), ("limit", limit.to_string())];
    if let Some(status) = status {
        params.push(("status", status.backend().to_string()));
    }

    let payload = api.get_with_params("/moderation/queue", &params).await?;
    let (rows, meta) = envelope::list::<FlagWire>(payload)?;
    Ok(Page::new(
        rows.into_iter().map(FlagWire::into_view).collect(),
        meta,
    ))
}

/// Apply a review decision to a flag.
pub async fn review(api: &ApiClient, flag_id: &str, action: ReviewAction) -> Result<()> {
    api.patch(
        "/moderation/status",
        &json!({ "postId": flag_id, "status": action.backend_status() }),
    )
    .await?;
    Ok(())
}
