//! Group administration
//!
//! Paginated group listing, the detail view, and the update, moderation,
//! broadcast-message, and delete operations.

use crate::client::ApiClient;
use crate::envelope::{self, Page};
use crate::error::Result;
use crate::normalize::calendar_date;
use crate::resources::to_body;
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Group visibility. Independent of the verified flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Private,
    Secret,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Secret => "secret",
        }
    }

    pub fn from_backend(s: &str) -> Self {
        match s {
            "private" => Self::Private,
            "secret" => Self::Secret,
            "public" => Self::Public,
            other => {
                tracing::warn!("unknown group visibility {:?}, treating as public", other);
                Self::Public
            }
        }
    }
}

/// Moderation state applied to a whole group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationStatus {
    Active,
    Restricted,
    Suspended,
}

impl ModerationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Restricted => "restricted",
            Self::Suspended => "suspended",
        }
    }
}

/// What members may still do while a group is moderated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationMode {
    Full,
    ChatOnly,
}

impl ModerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::ChatOnly => "chat_only",
        }
    }
}

/// Group row as rendered by the groups table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    pub description: String,
    pub members: u64,
    pub posts: u64,
    pub verified: bool,
    pub moderation_status: String,
    pub moderation_mode: String,
    pub created_at: String,
}

/// Full group record opened from a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupDetails {
    pub id: String,
    pub name: String,
    pub description: String,
    pub visibility: Visibility,
    pub verified: bool,
    pub members: u64,
    pub posts: u64,
    pub created_at: String,
    pub updated_at: String,
    pub avatar_url: Option<String>,
}

/// Partial update; only the supplied fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(rename = "isVerified", skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

/// Moderation update; only the supplied fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ModerationStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<ModerationMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupWire {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    members: u64,
    #[serde(default)]
    posts: u64,
    #[serde(default)]
    is_verified: bool,
    moderation_status: Option<String>,
    moderation_mode: Option<String>,
    #[serde(default)]
    created_at: String,
}

impl GroupWire {
    fn into_view(self) -> Group {
        Group {
            id: self.id,
            name: self.name,
            description: self.description,
            members: self.members,
            posts: self.posts,
            verified: self.is_verified,
            moderation_status: self.moderation_status.unwrap_or_else(|| "active".into()),
            moderation_mode: self.moderation_mode.unwrap_or_else(|| "full".into()),
            created_at: calendar_date(&self.created_at),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroupDetailsWire {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    visibility: String,
    #[serde(default)]
    is_verified: bool,
    #[serde(default)]
    members: u64,
    #[serde(default)]
    posts: u64,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    updated_at: String,
    avatar_url: Option<String>,
}

/// List groups with optional search text.
pub async fn list(
    api: &ApiClient,
    page: u64,
    limit: u64,
    search: Option<&str>,
) -> Result<Page<Group>> {
    let mut params = vec![("page", page.to_string()), ("limit", limit.to_string())];
    if let Some(search) = search.filter(|s| !s.is_empty()) {
        params.push(("search", search.to_string()));
    }

    let payload = api.get_with_params("/group/admin/groups", &params).await?;
    let (rows, meta) = envelope::list::<GroupWire>(payload)?;
    Ok(Page::new(
        rows.into_iter().map(GroupWire::into_view).collect(),
        meta,
    ))
}

/// Fetch one group's full record.
pub async fn details(api: &ApiClient, id: &str) -> Result<GroupDetails> {
    let payload = api.get(&format!("/group/admin/groups/{id}")).await?;
    let wire: GroupDetailsWire = envelope::data(payload)?;

    Ok(GroupDetails {
        id: wire.id,
        name: wire.name,
        description: wire.description,
        visibility: Visibility::from_backend(&wire.visibility),
        verified: wire.is_verified,
        members: wire.members,
        posts: wire.posts,
        created_at: calendar_date(&wire.created_at),
        updated_at: calendar_date(&wire.updated_at),
        avatar_url: wire.avatar_url,
    })
}

/// Update name, description, visibility, or the verified flag.
pub async fn update(api: &ApiClient, id: &str, update: &GroupUpdate) -> Result<()> {
    api.patch(&format!("/group/admin/groups/{id}"), &to_body(update)?)
        .await?;
    Ok(())
}

/// Change the group's moderation status or mode.
pub async fn update_moderation(api: &ApiClient, id: &str, update: &ModerationUpdate) -> Result<()> {
    api.patch(
        &format!("/group/admin/groups/{id}/moderation"),
        &to_body(update)?,
    )
    .await?;
    Ok(())
}

/// Send an admin broadcast message into the group.
pub async fn message(api: &ApiClient, id: &str, text: &str) -> Result<()> {
    api.post(
        &format!("/group/admin/groups/{id}/message"),
        &json!({ "message": text }),
    )
    .await?;
    Ok(())
}

/// Delete the group.
pub async fn delete(api: &ApiClient, id: &str) -> Result<()> {
    api.delete(&format!("/group/admin/groups/{id}")).await?;
    Ok(())
}
