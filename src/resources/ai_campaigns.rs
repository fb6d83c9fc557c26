//! AI engagement campaigns

use crate::client::ApiClient;
use crate::envelope;
use crate::error::Result;
use crate::normalize::calendar_date;
use crate::resources::to_body;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// What the campaign generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignType {
    Engagement,
    Posts,
    Comments,
}

/// Campaign lifecycle. The UI only toggles between active and paused;
/// completed is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Active,
    Paused,
    Completed,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }

    /// The status the pause/resume toggle moves to, if any.
    pub fn toggled(&self) -> Option<Self> {
        match self {
            Self::Active => Some(Self::Paused),
            Self::Paused => Some(Self::Active),
            Self::Completed => None,
        }
    }
}

/// An AI campaign row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiCampaign {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub campaign_type: CampaignType,
    pub status: CampaignStatus,
    pub interactions: u64,
    pub reach: u64,
    pub started_at: String,
}

/// Payload for a new campaign.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDraft {
    pub name: String,
    #[serde(rename = "type")]
    pub campaign_type: CampaignType,
    pub status: CampaignStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CampaignWire {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    campaign_type: CampaignType,
    status: CampaignStatus,
    #[serde(default)]
    interactions: u64,
    #[serde(default)]
    reach: u64,
    #[serde(default)]
    started_at: String,
}

impl CampaignWire {
    fn into_view(self) -> AiCampaign {
        AiCampaign {
            id: self.id,
            name: self.name,
            campaign_type: self.campaign_type,
            status: self.status,
            interactions: self.interactions,
            reach: self.reach,
            started_at: calendar_date(&self.started_at),
        }
    }
}

/// List all AI campaigns.
pub async fn list(api: &ApiClient) -> Result<Vec<AiCampaign>> {
    let payload = api.get("/ai-campaigns").await?;
    let rows: Vec<CampaignWire> = envelope::data(payload)?;
    Ok(rows.into_iter().map(CampaignWire::into_view).collect())
}

/// Create a campaign.
pub async fn create(api: &ApiClient, draft: &CampaignDraft) -> Result<()> {
    api.post("/ai-campaigns", &to_body(draft)?).await?;
    Ok(())
}

/// Set a campaign's status.
pub async fn update_status(api: &ApiClient, id: &str, status: CampaignStatus) -> Result<()> {
    api.patch(
        &format!("/ai-campaigns/{id}"),
        &json!({ "status": status.as_str() }),
    )
    .await?;
    Ok(())
}

/// Delete a campaign.
pub async fn delete(api: &ApiClient, id: &str) -> Result<()> {
    api.delete(&format!("/ai-campaigns/{id}")).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn toggle_skips_completed() {
        assert_eq!(CampaignStatus::Active.toggled(), Some(CampaignStatus::Paused));
        assert_eq!(CampaignStatus::Paused.toggled(), Some(CampaignStatus::Active));
        assert_eq!(CampaignStatus::Completed.toggled(), None);
    }

    #[test]
    fn row_normalizes_start_date() {
        let wire: CampaignWire = serde_json::from_value(json!({
            "id": "c1",
            "name": "Welcome wave",
            "type": "engagement",
            "status": "active",
            "interactions": 4200,
            "startedAt": "2024-02-10T09:30:00Z"
        }))
        .unwrap();

        let campaign = wire.into_view();
        assert_eq!(campaign.campaign_type, CampaignType::Engagement);
        assert_eq!(campaign.started_at, "2024-02-10");
        assert_eq!(campaign.reach, 0);
    }

    #[test]
    fn draft_serializes_type_field() {
        let draft = CampaignDraft {
            name: "Replies".into(),
            campaign_type: CampaignType::Comments,
            status: CampaignStatus::Paused,
        };
        assert_eq!(
            to_body(&draft).unwrap(),
            json!({ "name": "Replies", "type": "comments", "status": "paused" })
        );
    }
}
