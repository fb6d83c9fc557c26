//! Ad campaigns

use crate::client::ApiClient;
use crate::envelope;
use crate::error::Result;
use crate::resources::to_body;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Creative format of a campaign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdContentType {
    Text,
    Image,
    Video,
    Audio,
}

/// Aggregate figures for the ads page header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdSummary {
    #[serde(default)]
    pub total_impressions: u64,
    #[serde(default)]
    pub total_clicks: u64,
    #[serde(default)]
    pub avg_ctr: f64,
    #[serde(default)]
    pub total_spend: f64,
    pub total_views: Option<u64>,
    pub total_reports: Option<u64>,
}

/// Engagement counters attached to a campaign.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdMetrics {
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub comments: u64,
    #[serde(default)]
    pub shares: u64,
    #[serde(default)]
    pub reports: u64,
    #[serde(default)]
    pub reposts: u64,
}

/// An ad campaign row. Start and end keep their full timestamps - ad
/// scheduling cares about the time of day, unlike the calendar-date
/// columns elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdCampaign {
    pub id: String,
    pub name: String,
    pub content_type: AdContentType,
    pub content_text: Option<String>,
    pub media_url: Option<String>,
    pub link_url: Option<String>,
    pub placement: Option<String>,
    #[serde(default)]
    pub impressions: u64,
    #[serde(default)]
    pub clicks: u64,
    /// Server-derived from impressions/clicks; never recomputed here.
    #[serde(default)]
    pub ctr: f64,
    #[serde(default)]
    pub spend: f64,
    #[serde(default)]
    pub status: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub metrics: Option<AdMetrics>,
}

/// Payload for a new campaign.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdDraft {
    pub name: String,
    pub content_type: AdContentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_user_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_group_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spend: Option<f64>,
}

impl Default for AdContentType {
    fn default() -> Self {
        Self::Text
    }
}

/// Fetch the ads summary.
pub async fn summary(api: &ApiClient) -> Result<AdSummary> {
    let payload = api.get("/ads/summary").await?;
    envelope::data(payload)
}

/// List all campaigns.
pub async fn campaigns(api: &ApiClient) -> Result<Vec<AdCampaign>> {
    let payload = api.get("/ads/campaigns").await?;
    envelope::data(payload)
}

/// Create a campaign.
pub async fn create(api: &ApiClient, draft: &AdDraft) -> Result<()> {
    api.post("/ads/campaigns", &to_body(draft)?).await?;
    Ok(())
}

/// Set a campaign's status.
pub async fn update_status(api: &ApiClient, id: &str, status: &str) -> Result<()> {
    api.patch(&format!("/ads/campaigns/{id}"), &json!({ "status": status }))
        .await?;
    Ok(())
}

/// Delete a campaign.
pub async fn delete(api: &ApiClient, id: &str) -> Result<()> {
    api.delete(&format!("/ads/campaigns/{id}")).await?;
    Ok(())
}
