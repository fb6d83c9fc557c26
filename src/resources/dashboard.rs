//! Dashboard summary
//!
//! The landing page aggregates: platform totals, top active users,
//! today's AI engagement, the live FOMO window if one is running, and
//! flagged-content counters. Read-only.

use crate::client::ApiClient;
use crate::envelope;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Platform-wide totals.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    #[serde(default)]
    pub users: u64,
    #[serde(default)]
    pub online_now: u64,
    #[serde(default)]
    pub verified_accounts: u64,
    #[serde(default, rename = "ghostPosts24h")]
    pub ghost_posts_24h: u64,
    #[serde(default)]
    pub flagged_content: u64,
}

/// One row of the most-active-users list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopActiveUser {
    pub id: String,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub posts: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub interactions: u64,
}

/// AI-generated engagement so far today.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiEngagementToday {
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub replies: u64,
}

/// Live stats for a running FOMO window.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveWindowStats {
    #[serde(default)]
    pub post_count: u64,
    #[serde(default)]
    pub participant_count: u64,
}

/// A FOMO window currently running.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveFomoWindow {
    pub window_id: String,
    pub title: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub remaining_ms: u64,
    #[serde(default)]
    pub stats: LiveWindowStats,
}

/// Whether a FOMO window is live right now.
///
/// The backend discriminates on the `isActive` flag: the active shape
/// carries the window fields, the inactive shape is just the flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FomoStatus {
    Active {
        #[serde(rename = "isActive")]
        is_active: bool,
        #[serde(flatten)]
        window: ActiveFomoWindow,
    },
    Inactive {
        #[serde(rename = "isActive")]
        is_active: bool,
    },
}

impl FomoStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    pub fn window(&self) -> Option<&ActiveFomoWindow> {
        match self {
            Self::Active { window, .. } => Some(window),
            Self::Inactive { .. } => None,
        }
    }
}

/// Flagged explicit content counters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlaggedExplicitContent {
    #[serde(default)]
    pub total: u64,
    #[serde(default, rename = "hiddenUnder18")]
    pub hidden_under_18: u64,
    #[serde(default)]
    pub escalated: u64,
}

/// The full dashboard payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    #[serde(default)]
    pub totals: Totals,
    #[serde(default)]
    pub top_active_users: Vec<TopActiveUser>,
    #[serde(default)]
    pub ai_engagement_today: AiEngagementToday,
    pub fomo_status: FomoStatus,
    #[serde(default)]
    pub flagged_explicit_content: FlaggedExplicitContent,
}

/// Fetch the dashboard summary.
pub async fn summary(api: &ApiClient) -> Result<DashboardSummary> {
    let payload = api.get("/dashboard/summary").await?;
    envelope::data(payload)
}
