//! Ghost posting system
//!
//! Anonymized posts, their aggregate insights, and the reservable ghost
//! name pool. Ghost names are keyed by the name itself, not a generated
//! id, so the name travels in the URL path and must be percent-encoded.

use crate::client::ApiClient;
use crate::envelope::{self, Page};
use crate::error::Result;
use crate::normalize::{calendar_date, calendar_date_opt};
use crate::resources::to_body;
use serde::{Deserialize, Serialize};

/// Availability of a ghost name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GhostNameStatus {
    Available,
    Reserved,
    Restricted,
}

impl GhostNameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Reserved => "reserved",
            Self::Restricted => "restricted",
        }
    }
}

/// Aggregate ghost activity shown at the top of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GhostSummary {
    #[serde(default)]
    pub total_ghost_posts: u64,
    #[serde(default)]
    pub active_this_hour: u64,
    #[serde(default)]
    pub avg_engagement: f64,
}

/// A ghost post row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GhostPost {
    pub id: String,
    pub content: String,
    pub author: String,
    pub likes: u64,
    pub comments: u64,
    pub created_at: String,
}

/// Post-type breakdown for the insights panel.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GhostBreakdown {
    #[serde(default)]
    pub text_posts: u64,
    #[serde(default)]
    pub image_posts: u64,
    #[serde(default)]
    pub video_posts: u64,
    #[serde(default)]
    pub audio_posts: u64,
}

/// A flagged ghost post surfaced in the insights panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlaggedGhostPost {
    pub id: String,
    pub content_preview: String,
    pub ghost_name: Option<String>,
    pub report_count: u64,
    pub reasons: Vec<String>,
    pub flagged_at: String,
}

/// Insights payload: breakdown plus the flagged list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GhostInsights {
    pub breakdown: GhostBreakdown,
    pub flagged: Vec<FlaggedGhostPost>,
}

/// One entry of the ghost name pool. `name` is the primary key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GhostNameEntry {
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub work: String,
    pub status: GhostNameStatus,
    #[serde(default)]
    pub restricted: bool,
    #[serde(default)]
    pub reserved: bool,
}

/// The deterministic result of a name status change, used for the
/// optimistic cache patch: the flags follow the status.
pub fn apply_name_status(entry: &mut GhostNameEntry, status: GhostNameStatus) {
    entry.status = status;
    entry.restricted = status == GhostNameStatus::Restricted;
    entry.reserved = status == GhostNameStatus::Reserved;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GhostPostWire {
    id: String,
    #[serde(default)]
    content_preview: String,
    author: Option<String>,
    #[serde(default)]
    likes: u64,
    #[serde(default)]
    comments: u64,
    #[serde(default)]
    created_at: String,
}

impl GhostPostWire {
    fn into_view(self) -> GhostPost {
        GhostPost {
            id: self.id,
            content: self.content_preview,
            author: self
                .author
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| "Ghost".to_string()),
            likes: self.likes,
            comments: self.comments,
            created_at: calendar_date(&self.created_at),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GhostInsightsWire {
    #[serde(default)]
    breakdown: GhostBreakdown,
    #[serde(default)]
    flagged: Vec<FlaggedWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FlaggedWire {
    id: String,
    #[serde(default)]
    content_preview: String,
    ghost_name: Option<String>,
    #[serde(default)]
    report_count: u64,
    #[serde(default)]
    reasons: Vec<String>,
    flagged_at: Option<String>,
}

/// Fetch the ghost activity summary.
pub async fn summary(api: &ApiClient) -> Result<GhostSummary> {
    let payload = api.get("/ghost/admin/summary").await?;
    envelope::data(payload)
}

/// List ghost posts.
pub async fn posts(api: &ApiClient, page: u64, limit: u64) -> Result<Page<GhostPost>> {
    let params = [("page", page.to_string()), ("limit", limit.to_string())];
    let payload = api.get_with_params("/ghost/admin/posts", &params).await?;
    let (rows, meta) = envelope::list::<GhostPostWire>(payload)?;
    Ok(Page::new(
        rows.into_iter().map(GhostPostWire::into_view).collect(),
        meta,
    ))
}

/// Fetch the insights panel payload.
pub async fn insights(api: &ApiClient) -> Result<GhostInsights> {
    let payload = api.get("/ghost/admin/insights").await?;
    let wire: GhostInsightsWire = envelope::data(payload)?;

    Ok(GhostInsights {
        breakdown: wire.breakdown,
        flagged: wire
            .flagged
            .into_iter()
            .map(|item| FlaggedGhostPost {
                id: item.id,
                content_preview: item.content_preview,
                ghost_name: item.ghost_name,
                report_count: item.report_count,
                reasons: item.reasons,
                flagged_at: calendar_date_opt(item.flagged_at.as_deref()),
            })
            .collect(),
    })
}

/// List the ghost name pool.
pub async fn names(api: &ApiClient) -> Result<Vec<GhostNameEntry>> {
    let payload = api.get("/ghost/admin/names").await?;
    envelope::data(payload)
}

/// Change one name's availability.
pub async fn update_name_status(
    api: &ApiClient,
    name: &str,
    status: GhostNameStatus,
) -> Result<()> {
    #[derive(Serialize)]
    struct Body {
        status: GhostNameStatus,
    }

    let path = format!("/ghost/admin/names/{}", urlencoding::encode(name));
    api.patch(&path, &to_body(&Body { status })?).await?;
    Ok(())
}
