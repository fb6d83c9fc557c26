//! Admin notifications
//!
//! Append-only broadcast records: there is no update or delete endpoint,
//! only listing what was sent and sending new ones.

use crate::client::ApiClient;
use crate::envelope;
use crate::error::Result;
use crate::normalize::calendar_date;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// A sent notification as rendered by the history table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationRecord {
    pub id: String,
    pub title: String,
    pub content: String,
    pub target_type: String,
    pub target_value: Option<String>,
    pub media_url: Option<String>,
    pub target_group: String,
    pub delivered_count: u64,
    /// Calendar date the notification went out.
    pub sent_at: String,
}

/// Draft for a new broadcast.
#[derive(Debug, Clone, Default)]
pub struct NotificationDraft {
    pub title: String,
    pub content: String,
    pub target_type: Option<String>,
    pub target_value: Option<String>,
    pub media_url: Option<String>,
    pub target_group: Option<String>,
}

/// Server acknowledgement for a sent broadcast.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SentNotification {
    pub id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotificationWire {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    target_group: String,
    target_type: Option<String>,
    target_value: Option<String>,
    media_url: Option<String>,
    #[serde(default)]
    delivered_count: u64,
    #[serde(default)]
    created_at: String,
}

impl NotificationWire {
    fn into_view(self) -> NotificationRecord {
        let target_type = self
            .target_type
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.target_group.clone());
        NotificationRecord {
            id: self.id,
            title: self.title,
            content: self.content,
            target_type,
            target_value: self.target_value,
            media_url: self.media_url,
            target_group: self.target_group,
            delivered_count: self.delivered_count,
            sent_at: calendar_date(&self.created_at),
        }
    }
}

/// List sent notifications, newest first.
pub async fn list(api: &ApiClient, page: u64, limit: u64) -> Result<Vec<NotificationRecord>> {
    let params = [("page", page.to_string()), ("limit", limit.to_string())];
    let payload = api
        .get_with_params("/admin-notifications/admin", &params)
        .await?;
    let rows: Vec<NotificationWire> = envelope::data(payload)?;
    Ok(rows.into_iter().map(NotificationWire::into_view).collect())
}

/// Send a broadcast. The target group defaults to the target type, then
/// to everyone.
pub async fn send(api: &ApiClient, draft: &NotificationDraft) -> Result<SentNotification> {
    let target_group = draft
        .target_group
        .clone()
        .or_else(|| draft.target_type.clone())
        .unwrap_or_else(|| "all".to_string());

    let mut body = json!({
        "title": draft.title,
        "content": draft.content,
        "targetGroup": target_group,
    });
    if let Some(target_type) = draft.target_type.as_deref() {
        body["targetType"] = json!(target_type);
    }
    if let Some(target_value) = draft.target_value.as_deref() {
        body["targetValue"] = json!(target_value);
    }
    if let Some(media_url) = draft.media_url.as_deref() {
        body["mediaUrl"] = json!(media_url);
    }

    let payload = api.post("/admin-notifications/admin", &body).await?;
    envelope::data(payload)
}
