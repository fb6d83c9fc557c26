//! Admin store
//!
//! Binds the API client to the query cache: one cached read per query
//! key, and per-mutation cache updates. Two strategies apply, chosen by
//! whether the mutation result is cheap to merge:
//!
//! - optimistic in-place patch for status toggles whose outcome is a
//!   pure function of the action (user status, ghost name status),
//!   applied before the round trip completes;
//! - invalidate-and-refetch for everything whose server-computed fields
//!   cannot safely be reconstructed locally (creates, deletes, campaign
//!   stats such as `ctr`).
//!
//! When a mutation that patched optimistically fails, the affected kinds
//! are invalidated so the next read reconciles with the server; the
//! optimistic value is never silently kept.

use crate::cache::{QueryCache, QueryKey};
use crate::client::ApiClient;
use crate::envelope::Page;
use crate::error::Result;
use crate::resources::{
    ads, ai_campaigns, dashboard, fomo, ghost, groups, moderation, notifications, security,
    support, users, verification,
};
use serde_json::Value;
use std::sync::Arc;

/// Query-key kinds, one per resource listing or summary.
pub mod kinds {
    pub const DASHBOARD_SUMMARY: &str = "dashboard-summary";
    pub const USERS: &str = "users";
    pub const USER_PROFILE: &str = "user-profile";
    pub const GROUPS: &str = "groups";
    pub const GROUP_DETAILS: &str = "group-details";
    pub const NOTIFICATIONS: &str = "notifications";
    pub const GHOST_SUMMARY: &str = "ghost-summary";
    pub const GHOST_POSTS: &str = "ghost-posts";
    pub const GHOST_INSIGHTS: &str = "ghost-insights";
    pub const GHOST_NAMES: &str = "ghost-names";
    pub const FOMO_WINDOWS: &str = "fomo-windows";
    pub const FOMO_ANALYTICS: &str = "fomo-analytics";
    pub const CONTENT_FLAGS: &str = "content-flags";
    pub const AI_CAMPAIGNS: &str = "ai-campaigns";
    pub const SUPPORT_TICKETS: &str = "support-tickets";
    pub const VERIFICATION_REQUESTS: &str = "verification-requests";
    pub const VERIFICATION_STATS: &str = "verification-stats";
    pub const AD_SUMMARY: &str = "ad-summary";
    pub const AD_CAMPAIGNS: &str = "ad-campaigns";
    pub const SECURITY_SUMMARY: &str = "security-summary";
}

/// Cached facade over the admin API. Cheap to clone; clones share the
/// cache.
#[derive(Clone)]
pub struct AdminStore {
    api: ApiClient,
    cache: Arc<QueryCache>,
}

impl AdminStore {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            cache: Arc::new(QueryCache::new()),
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    pub async fn dashboard_summary(&self) -> Result<dashboard::DashboardSummary> {
        let api = self.api.clone();
        self.cache
            .fetch(QueryKey::bare(kinds::DASHBOARD_SUMMARY), move || async move {
                dashboard::summary(&api).await
            })
            .await
    }

    // =========================================================================
    // Users
    // =========================================================================

    pub async fn users(
        &self,
        page: u64,
        limit: u64,
        search: Option<&str>,
        status: Option<users::UserStatus>,
    ) -> Result<Page<users::User>> {
        let key = QueryKey::new(
            kinds::USERS,
            &[
                ("page", page.to_string()),
                ("limit", limit.to_string()),
                ("search", search.unwrap_or_default().to_string()),
                (
                    "status",
                    status.map(|s| s.as_str()).unwrap_or("all").to_string(),
                ),
            ],
        );
        let api = self.api.clone();
        let search = search.map(str::to_string);
        self.cache
            .fetch(key, move || async move {
                users::list(&api, page, limit, search.as_deref(), status).await
            })
            .await
    }

    pub async fn user_profile(&self, user_id: &str) -> Result<users::UserProfile> {
        let key = QueryKey::new(kinds::USER_PROFILE, &[("id", user_id.to_string())]);
        let api = self.api.clone();
        let user_id = user_id.to_string();
        self.cache
            .fetch(key, move || async move {
                users::profile(&api, &user_id).await
            })
            .await
    }

    /// Forget cached profiles, e.g. when the manage dialog closes.
    pub fn drop_user_profiles(&self) {
        self.cache.remove(kinds::USER_PROFILE);
    }

    /// Apply a status/verification action.
    ///
    /// The new status is a deterministic function of the action, so
    /// cached user rows are patched before the round trip; the kinds are
    /// then invalidated either way - on success to pick up server-side
    /// counters, on failure to reconcile the optimistic patch.
    pub async fn update_user_status(
        &self,
        user_id: &str,
        action: users::UserAction,
        update: &users::StatusUpdate,
    ) -> Result<()> {
        self.cache.patch(kinds::USERS, |page: &mut Page<users::User>| {
            for user in page.items.iter_mut().filter(|u| u.id == user_id) {
                users::apply_action(user, action);
            }
        });

        let result = users::update_status(&self.api, user_id, action, update).await;
        self.cache.invalidate(kinds::USERS);
        self.cache.invalidate(kinds::USER_PROFILE);
        result
    }

    // =========================================================================
    // Groups
    // =========================================================================

    pub async fn groups(
        &self,
        page: u64,
        limit: u64,
        search: Option<&str>,
    ) -> Result<Page<groups::Group>> {
        let key = QueryKey::new(
            kinds::GROUPS,
            &[
                ("page", page.to_string()),
                ("limit", limit.to_string()),
                ("search", search.unwrap_or_default().to_string()),
            ],
        );
        let api = self.api.clone();
        let search = search.map(str::to_string);
        self.cache
            .fetch(key, move || async move {
                groups::list(&api, page, limit, search.as_deref()).await
            })
            .await
    }

    pub async fn group_details(&self, id: &str) -> Result<groups::GroupDetails> {
        let key = QueryKey::new(kinds::GROUP_DETAILS, &[("id", id.to_string())]);
        let api = self.api.clone();
        let id = id.to_string();
        self.cache
            .fetch(key, move || async move { groups::details(&api, &id).await })
            .await
    }

    pub async fn update_group(&self, id: &str, update: &groups::GroupUpdate) -> Result<()> {
        let result = groups::update(&self.api, id, update).await;
        if result.is_ok() {
            self.cache.invalidate(kinds::GROUPS);
            self.cache.invalidate(kinds::GROUP_DETAILS);
        }
        result
    }

    pub async fn update_group_moderation(
        &self,
        id: &str,
        update: &groups::ModerationUpdate,
    ) -> Result<()> {
        let result = groups::update_moderation(&self.api, id, update).await;
        if result.is_ok() {
            self.cache.invalidate(kinds::GROUPS);
        }
        result
    }

    /// Broadcast a message into a group. No cached state is affected.
    pub async fn message_group(&self, id: &str, text: &str) -> Result<()> {
        groups::message(&self.api, id, text).await
    }

    pub async fn delete_group(&self, id: &str) -> Result<()> {
        let result = groups::delete(&self.api, id).await;
        if result.is_ok() {
            self.cache.invalidate(kinds::GROUPS);
            self.cache.remove(kinds::GROUP_DETAILS);
        }
        result
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    pub async fn notifications(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<Vec<notifications::NotificationRecord>> {
        let key = QueryKey::new(
            kinds::NOTIFICATIONS,
            &[("page", page.to_string()), ("limit", limit.to_string())],
        );
        let api = self.api.clone();
        self.cache
            .fetch(key, move || async move {
                notifications::list(&api, page, limit).await
            })
            .await
    }

    pub async fn send_notification(
        &self,
        draft: &notifications::NotificationDraft,
    ) -> Result<notifications::SentNotification> {
        let result = notifications::send(&self.api, draft).await;
        if result.is_ok() {
            self.cache.invalidate(kinds::NOTIFICATIONS);
        }
        result
    }

    // =========================================================================
    // Ghost system
    // =========================================================================

    pub async fn ghost_summary(&self) -> Result<ghost::GhostSummary> {
        let api = self.api.clone();
        self.cache
            .fetch(QueryKey::bare(kinds::GHOST_SUMMARY), move || async move {
                ghost::summary(&api).await
            })
            .await
    }

    pub async fn ghost_posts(&self, page: u64, limit: u64) -> Result<Page<ghost::GhostPost>> {
        let key = QueryKey::new(
            kinds::GHOST_POSTS,
            &[("page", page.to_string()), ("limit", limit.to_string())],
        );
        let api = self.api.clone();
        self.cache
            .fetch(key, move || async move {
                ghost::posts(&api, page, limit).await
            })
            .await
    }

    pub async fn ghost_insights(&self) -> Result<ghost::GhostInsights> {
        let api = self.api.clone();
        self.cache
            .fetch(QueryKey::bare(kinds::GHOST_INSIGHTS), move || async move {
                ghost::insights(&api).await
            })
            .await
    }

    pub async fn ghost_names(&self) -> Result<Vec<ghost::GhostNameEntry>> {
        let api = self.api.clone();
        self.cache
            .fetch(QueryKey::bare(kinds::GHOST_NAMES), move || async move {
                ghost::names(&api).await
            })
            .await
    }

    /// Change a ghost name's availability. The resulting entry is a pure
    /// function of the status, so the cached pool is patched before the
    /// round trip.
    pub async fn update_ghost_name_status(
        &self,
        name: &str,
        status: ghost::GhostNameStatus,
    ) -> Result<()> {
        self.cache
            .patch(kinds::GHOST_NAMES, |entries: &mut Vec<ghost::GhostNameEntry>| {
                for entry in entries.iter_mut().filter(|e| e.name == name) {
                    ghost::apply_name_status(entry, status);
                }
            });

        let result = ghost::update_name_status(&self.api, name, status).await;
        if result.is_err() {
            self.cache.invalidate(kinds::GHOST_NAMES);
        }
        result
    }

    // =========================================================================
    // FOMO windows
    // =========================================================================

    pub async fn fomo_windows(&self) -> Result<Vec<fomo::FomoWindow>> {
        let api = self.api.clone();
        self.cache
            .fetch(QueryKey::bare(kinds::FOMO_WINDOWS), move || async move {
                fomo::windows(&api).await
            })
            .await
    }

    pub async fn create_fomo_window(&self, draft: &fomo::WindowDraft) -> Result<()> {
        let result = fomo::create(&self.api, draft).await;
        if result.is_ok() {
            self.cache.invalidate(kinds::FOMO_WINDOWS);
        }
        result
    }

    pub async fn update_fomo_window(&self, id: &str, patch: &fomo::WindowPatch) -> Result<()> {
        let result = fomo::update(&self.api, id, patch).await;
        if result.is_ok() {
            self.cache.invalidate(kinds::FOMO_WINDOWS);
        }
        result
    }

    pub async fn delete_fomo_window(&self, id: &str) -> Result<()> {
        let result = fomo::delete(&self.api, id).await;
        if result.is_ok() {
            self.cache.invalidate(kinds::FOMO_WINDOWS);
        }
        result
    }

    pub async fn fomo_window_analytics(&self, id: &str) -> Result<Value> {
        let key = QueryKey::new(kinds::FOMO_ANALYTICS, &[("id", id.to_string())]);
        let api = self.api.clone();
        let id = id.to_string();
        self.cache
            .fetch(key, move || async move { fomo::analytics(&api, &id).await })
            .await
    }

    // =========================================================================
    // Moderation
    // =========================================================================

    pub async fn content_flags(
        &self,
        page: u64,
        limit: u64,
        status: Option<moderation::FlagStatus>,
    ) -> Result<Page<moderation::ContentFlag>> {
        let key = QueryKey::new(
            kinds::CONTENT_FLAGS,
            &[
                ("page", page.to_string()),
                ("limit", limit.to_string()),
                (
                    "status",
                    status.map(|s| s.as_str()).unwrap_or("all").to_string(),
                ),
            ],
        );
        let api = self.api.clone();
        self.cache
            .fetch(key, move || async move {
                moderation::queue(&api, page, limit, status).await
            })
            .await
    }

    /// Review a flag. On confirmation the flag leaves every cached queue
    /// page; the totals are left to the next revalidation.
    pub async fn review_content(
        &self,
        flag_id: &str,
        action: moderation::ReviewAction,
    ) -> Result<()> {
        moderation::review(&self.api, flag_id, action).await?;

        self.cache.patch(
            kinds::CONTENT_FLAGS,
            |page: &mut Page<moderation::ContentFlag>| {
                page.items.retain(|flag| flag.id != flag_id);
            },
        );
        self.cache.invalidate(kinds::CONTENT_FLAGS);
        Ok(())
    }

    // =========================================================================
    // AI campaigns
    // =========================================================================

    pub async fn ai_campaigns(&self) -> Result<Vec<ai_campaigns::AiCampaign>> {
        let api = self.api.clone();
        self.cache
            .fetch(QueryKey::bare(kinds::AI_CAMPAIGNS), move || async move {
                ai_campaigns::list(&api).await
            })
            .await
    }

    pub async fn create_ai_campaign(&self, draft: &ai_campaigns::CampaignDraft) -> Result<()> {
        let result = ai_campaigns::create(&self.api, draft).await;
        if result.is_ok() {
            self.cache.invalidate(kinds::AI_CAMPAIGNS);
        }
        result
    }

    pub async fn update_ai_campaign_status(
        &self,
        id: &str,
        status: ai_campaigns::CampaignStatus,
    ) -> Result<()> {
        let result = ai_campaigns::update_status(&self.api, id, status).await;
        if result.is_ok() {
            self.cache.invalidate(kinds::AI_CAMPAIGNS);
        }
        result
    }

    pub async fn delete_ai_campaign(&self, id: &str) -> Result<()> {
        let result = ai_campaigns::delete(&self.api, id).await;
        if result.is_ok() {
            self.cache.invalidate(kinds::AI_CAMPAIGNS);
        }
        result
    }

    // =========================================================================
    // Support tickets
    // =========================================================================

    pub async fn support_tickets(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<Page<support::SupportTicket>> {
        let key = QueryKey::new(
            kinds::SUPPORT_TICKETS,
            &[("page", page.to_string()), ("limit", limit.to_string())],
        );
        let api = self.api.clone();
        self.cache
            .fetch(key, move || async move {
                support::list(&api, page, limit).await
            })
            .await
    }

    pub async fn update_support_ticket(
        &self,
        ticket_id: &str,
        update: &support::TicketUpdate,
    ) -> Result<()> {
        let result = support::update(&self.api, ticket_id, update).await;
        if result.is_ok() {
            self.cache.invalidate(kinds::SUPPORT_TICKETS);
        }
        result
    }

    pub async fn resolve_support_ticket(&self, ticket_id: &str) -> Result<()> {
        let result = support::resolve(&self.api, ticket_id).await;
        if result.is_ok() {
            self.cache.invalidate(kinds::SUPPORT_TICKETS);
        }
        result
    }

    // =========================================================================
    // Verification
    // =========================================================================

    pub async fn verification_requests(
        &self,
        status: Option<verification::VerificationStatus>,
    ) -> Result<Vec<verification::VerificationRequest>> {
        let key = QueryKey::new(
            kinds::VERIFICATION_REQUESTS,
            &[(
                "status",
                status.map(|s| s.as_str()).unwrap_or("all").to_string(),
            )],
        );
        let api = self.api.clone();
        self.cache
            .fetch(key, move || async move {
                verification::requests(&api, status).await
            })
            .await
    }

    pub async fn verification_stats(&self) -> Result<verification::VerificationStats> {
        let api = self.api.clone();
        self.cache
            .fetch(QueryKey::bare(kinds::VERIFICATION_STATS), move || async move {
                verification::stats(&api).await
            })
            .await
    }

    /// Load documents into a request if not present, then mirror them
    /// into any cached request lists so the next open needs no fetch.
    pub async fn ensure_verification_documents(
        &self,
        request: &mut verification::VerificationRequest,
    ) -> Result<()> {
        if request.documents.is_some() {
            return Ok(());
        }

        verification::ensure_documents(&self.api, request).await?;

        if let Some(documents) = request.documents.clone() {
            let id = request.id.clone();
            self.cache.patch(
                kinds::VERIFICATION_REQUESTS,
                |requests: &mut Vec<verification::VerificationRequest>| {
                    for cached in requests.iter_mut().filter(|r| r.id == id) {
                        cached.documents = Some(documents.clone());
                    }
                },
            );
        }
        Ok(())
    }

    pub async fn update_verification_request(
        &self,
        id: &str,
        decision: verification::VerificationDecision,
        reason: Option<&str>,
    ) -> Result<()> {
        let result = verification::update(&self.api, id, decision, reason).await;
        if result.is_ok() {
            self.cache.invalidate(kinds::VERIFICATION_REQUESTS);
            self.cache.invalidate(kinds::VERIFICATION_STATS);
        }
        result
    }

    // =========================================================================
    // Ads
    // =========================================================================

    pub async fn ad_summary(&self) -> Result<ads::AdSummary> {
        let api = self.api.clone();
        self.cache
            .fetch(QueryKey::bare(kinds::AD_SUMMARY), move || async move {
                ads::summary(&api).await
            })
            .await
    }

    pub async fn ad_campaigns(&self) -> Result<Vec<ads::AdCampaign>> {
        let api = self.api.clone();
        self.cache
            .fetch(QueryKey::bare(kinds::AD_CAMPAIGNS), move || async move {
                ads::campaigns(&api).await
            })
            .await
    }

    pub async fn create_ad_campaign(&self, draft: &ads::AdDraft) -> Result<()> {
        let result = ads::create(&self.api, draft).await;
        if result.is_ok() {
            self.invalidate_ads();
        }
        result
    }

    pub async fn update_ad_campaign_status(&self, id: &str, status: &str) -> Result<()> {
        let result = ads::update_status(&self.api, id, status).await;
        if result.is_ok() {
            self.invalidate_ads();
        }
        result
    }

    pub async fn delete_ad_campaign(&self, id: &str) -> Result<()> {
        let result = ads::delete(&self.api, id).await;
        if result.is_ok() {
            self.invalidate_ads();
        }
        result
    }

    /// `ctr` and the summary aggregates are server-derived; after any
    /// campaign mutation both are refetched rather than approximated.
    fn invalidate_ads(&self) {
        self.cache.invalidate(kinds::AD_CAMPAIGNS);
        self.cache.invalidate(kinds::AD_SUMMARY);
    }

    // =========================================================================
    // Security
    // =========================================================================

    pub async fn security_summary(&self) -> Result<security::SecuritySummary> {
        let api = self.api.clone();
        self.cache
            .fetch(QueryKey::bare(kinds::SECURITY_SUMMARY), move || async move {
                security::summary(&api).await
            })
            .await
    }
}
