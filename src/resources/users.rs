//! User administration
//!
//! Listing, profile lookup, and the status/verification actions. The
//! optimistic cache patch for a status action is the pure
//! [`apply_action`] so the store and the server-confirmed path share one
//! derivation.

use crate::client::ApiClient;
use crate::envelope::{self, Page};
use crate::error::Result;
use crate::normalize::{calendar_date, calendar_date_opt, first_non_empty};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Account status vocabulary. Backend and UI agree on this one, so the
/// mapping table is the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Inactive,
    Suspended,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::Suspended => "suspended",
        }
    }

    /// Backend query-parameter value for this status.
    pub fn backend(&self) -> &'static str {
        self.as_str()
    }

    pub fn from_backend(s: &str) -> Self {
        match s {
            "inactive" => Self::Inactive,
            "suspended" => Self::Suspended,
            "active" => Self::Active,
            other => {
                tracing::warn!("unknown user status {:?}, treating as active", other);
                Self::Active
            }
        }
    }
}

/// Admin action on a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Ban,
    Suspend,
    Restrict,
    Unban,
    Unsuspend,
    Unrestrict,
    Verify,
    Unverify,
}

impl UserAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ban => "ban",
            Self::Suspend => "suspend",
            Self::Restrict => "restrict",
            Self::Unban => "unban",
            Self::Unsuspend => "unsuspend",
            Self::Unrestrict => "unrestrict",
            Self::Verify => "verify",
            Self::Unverify => "unverify",
        }
    }
}

/// User row as rendered by the accounts table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub status: UserStatus,
    pub posts_count: u64,
    pub comments_count: u64,
    pub verified: bool,
    /// Calendar date, `YYYY-MM-DD`.
    pub join_date: String,
}

/// Profile detail opened from a user row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub email: String,
    pub phone_number: String,
    pub education: String,
    pub work: String,
    pub anonymous_id: String,
    pub verified: bool,
    pub join_date: String,
}

/// Payload for a status/verification action.
#[derive(Debug, Clone, Default)]
pub struct StatusUpdate {
    pub reason: Option<String>,
    pub suspended_until: Option<String>,
}

/// The new status a deterministic action yields, applied to cached rows
/// before the round trip completes. Verification actions toggle the
/// badge without touching status.
pub fn apply_action(user: &mut User, action: UserAction) {
    match action {
        UserAction::Ban | UserAction::Suspend => user.status = UserStatus::Suspended,
        UserAction::Restrict => user.status = UserStatus::Inactive,
        UserAction::Unban | UserAction::Unsuspend | UserAction::Unrestrict => {
            user.status = UserStatus::Active
        }
        UserAction::Verify => user.verified = true,
        UserAction::Unverify => user.verified = false,
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserWire {
    id: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    posts_count: u64,
    #[serde(default)]
    comments_count: u64,
    #[serde(default)]
    verified: bool,
    #[serde(default)]
    join_date: String,
}

impl UserWire {
    fn into_view(self) -> User {
        User {
            id: self.id,
            username: self.username,
            email: self.email,
            status: UserStatus::from_backend(&self.status),
            posts_count: self.posts_count,
            comments_count: self.comments_count,
            verified: self.verified,
            join_date: calendar_date(&self.join_date),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileWire {
    id: Option<String>,
    #[serde(rename = "_id")]
    legacy_id: Option<String>,
    username: Option<String>,
    display_name: Option<String>,
    #[serde(default)]
    email: String,
    phone_number: Option<String>,
    education: Option<String>,
    work: Option<String>,
    anonymous_id: Option<String>,
    #[serde(default)]
    is_verified: bool,
    created_at: Option<String>,
}

/// List users with optional search text and status filter.
pub async fn list(
    api: &ApiClient,
    page: u64,
    limit: u64,
    search: Option<&str>,
    status: Option<UserStatus>,
) -> Result<Page<User>> {
    let mut params = vec![("page", page.to_string()), ("limit", limit.to_string())];
    if let Some(search) = search.filter(|s| !s.is_empty()) {
        params.push(("search", search.to_string()));
    }
    if let Some(status) = status {
        params.push(("status", status.backend().to_string()));
    }

    let payload = api.get_with_params("/user/admin/users", &params).await?;
    let (rows, meta) = envelope::list::<UserWire>(payload)?;
    Ok(Page::new(
        rows.into_iter().map(UserWire::into_view).collect(),
        meta,
    ))
}

/// Fetch the profile detail for one user.
///
/// The detail endpoint is older than the list endpoint and leaks legacy
/// field names; every fallback here mirrors what it actually returns.
pub async fn profile(api: &ApiClient, user_id: &str) -> Result<UserProfile> {
    let payload = api.get(&format!("/user/user-details/{user_id}")).await?;
    let wire: ProfileWire = envelope::data(payload)?;

    Ok(UserProfile {
        id: wire
            .id
            .filter(|s| !s.is_empty())
            .or(wire.legacy_id.filter(|s| !s.is_empty()))
            .unwrap_or_else(|| user_id.to_string()),
        username: first_non_empty(&[wire.username.as_deref(), wire.display_name.as_deref()], "")
            .to_string(),
        email: wire.email,
        phone_number: wire.phone_number.unwrap_or_default(),
        education: wire.education.unwrap_or_default(),
        work: wire.work.unwrap_or_default(),
        anonymous_id: wire.anonymous_id.unwrap_or_default(),
        verified: wire.is_verified,
        join_date: calendar_date_opt(wire.created_at.as_deref()),
    })
}

/// Apply a status/verification action server-side.
pub async fn update_status(
    api: &ApiClient,
    user_id: &str,
    action: UserAction,
    update: &StatusUpdate,
) -> Result<()> {
    let mut body = json!({ "action": action.as_str() });
    if let Some(reason) = update.reason.as_deref() {
        body["reason"] = json!(reason);
    }
    if let Some(until) = update.suspended_until.as_deref() {
        body["suspendedUntil"] = json!(until);
    }

    api.patch(&format!("/user/admin/users/{user_id}/status"), &body)
        .await?;
    Ok(())
}
