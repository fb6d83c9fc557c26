//! Support tickets

use crate::client::ApiClient;
use crate::envelope::{self, Page};
use crate::error::Result;
use crate::normalize::calendar_date;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Ticket lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }

    pub fn from_backend(s: &str) -> Self {
        match s {
            "in_progress" => Self::InProgress,
            "resolved" => Self::Resolved,
            "closed" => Self::Closed,
            _ => Self::Open,
        }
    }
}

/// Ticket priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Low,
    Medium,
    High,
}

impl TicketPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn from_backend(s: &str) -> Self {
        match s {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Medium,
        }
    }
}

/// A ticket row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicket {
    pub id: String,
    pub subject: String,
    pub user: String,
    pub status: TicketStatus,
    pub priority: TicketPriority,
    pub created_at: String,
}

/// Partial status/priority update.
#[derive(Debug, Clone, Default)]
pub struct TicketUpdate {
    pub status: Option<TicketStatus>,
    pub priority: Option<TicketPriority>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TicketUserWire {
    display_name: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TicketWire {
    #[serde(rename = "_id")]
    id: String,
    #[serde(default)]
    subject: String,
    status: Option<String>,
    priority: Option<String>,
    #[serde(rename = "createdAt", default)]
    created_at: String,
    user: Option<TicketUserWire>,
}

impl TicketWire {
    fn into_view(self) -> SupportTicket {
        let user = self
            .user
            .and_then(|u| {
                u.display_name
                    .filter(|s| !s.is_empty())
                    .or(u.email.filter(|s| !s.is_empty()))
            })
            .unwrap_or_else(|| "Unknown".to_string());

        SupportTicket {
            id: self.id,
            subject: self.subject,
            user,
            status: TicketStatus::from_backend(self.status.as_deref().unwrap_or("")),
            priority: TicketPriority::from_backend(self.priority.as_deref().unwrap_or("")),
            created_at: calendar_date(&self.created_at),
        }
    }
}

/// List tickets.
pub async fn list(api: &ApiClient, page: u64, limit: u64) -> Result<Page<SupportTicket>> {
    let params = [("page", page.to_string()), ("limit", limit.to_string())];
    let payload = api
        .get_with_params("/support-ticket/admin/all-tickets", &params)
        .await?;
    let (rows, meta) = envelope::list::<TicketWire>(payload)?;
    Ok(Page::new(
        rows.into_iter().map(TicketWire::into_view).collect(),
        meta,
    ))
}

/// Change a ticket's status and/or priority.
pub async fn update(api: &ApiClient, ticket_id: &str, update: &TicketUpdate) -> Result<()> {
    let mut body = json!({ "ticketId": ticket_id });
    if let Some(status) = update.status {
        body["status"] = json!(status.as_str());
    }
    if let Some(priority) = update.priority {
        body["priority"] = json!(priority.as_str());
    }

    api.patch("/support-ticket/admin/update-status", &body)
        .await?;
    Ok(())
}

/// Resolve a ticket. A status shortcut, not a distinct endpoint.
pub async fn resolve(api: &ApiClient, ticket_id: &str) -> Result<()> {
    update(
        api,
        ticket_id,
        &TicketUpdate {
            status: Some(TicketStatus::Resolved),
            priority: None,
        },
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn legacy_id_and_user_fallbacks() {
        let wire: TicketWire = serde_json::from_value(json!({
            "_id": "t1",
            "subject": "Can't log in",
            "createdAt": "2024-06-01T10:00:00Z",
            "user": { "email": "sam@example.com" }
        }))
        .unwrap();

        let ticket = wire.into_view();
        assert_eq!(ticket.id, "t1");
        assert_eq!(ticket.user, "sam@example.com");
        assert_eq!(ticket.status, TicketStatus::Open);
        assert_eq!(ticket.priority, TicketPriority::Medium);
    }

    #[test]
    fn missing_user_renders_unknown() {
        let wire: TicketWire = serde_json::from_value(json!({
            "_id": "t2",
            "subject": "Feedback",
            "status": "in_progress",
            "priority": "high",
            "createdAt": "2024-06-02T10:00:00Z"
        }))
        .unwrap();

        let ticket = wire.into_view();
        assert_eq!(ticket.user, "Unknown");
        assert_eq!(ticket.status, TicketStatus::InProgress);
        assert_eq!(ticket.priority, TicketPriority::High);
    }
}
