//! Platform security status

use crate::client::ApiClient;
use crate::envelope;
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Security posture summary for the status page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySummary {
    #[serde(default)]
    pub ssl_status: String,
    pub ssl_valid_until: Option<String>,
    #[serde(default)]
    pub rate_limit_status: String,
    #[serde(default)]
    pub two_fa_adoption_percent: f64,
    #[serde(default, rename = "failedLogins24h")]
    pub failed_logins_24h: u64,
}

/// Fetch the security summary.
pub async fn summary(api: &ApiClient) -> Result<SecuritySummary> {
    let payload = api.get("/security/summary").await?;
    envelope::data(payload)
}
