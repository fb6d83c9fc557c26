//! Identity verification requests
//!
//! Badge verification submissions with uploaded identity documents. The
//! documents are heavy, so they are fetched lazily from the detail
//! endpoint on first view and cached on the request object; the
//! enrichment is idempotent.

use crate::client::ApiClient;
use crate::envelope;
use crate::error::Result;
use crate::normalize::{calendar_date, first_non_empty};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Review state of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pending,
    Approved,
    Rejected,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn from_backend(s: &str) -> Self {
        match s {
            "approved" => Self::Approved,
            "rejected" => Self::Rejected,
            _ => Self::Pending,
        }
    }
}

/// Decision written by the reviewer. Processing parks a request while
/// documents are checked out-of-band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationDecision {
    Approved,
    Rejected,
    Processing,
    Pending,
}

impl VerificationDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Processing => "processing",
            Self::Pending => "pending",
        }
    }
}

/// Uploaded identity documents. Fields are URLs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Documents {
    pub id_front: Option<String>,
    pub id_back: Option<String>,
    pub selfie: Option<String>,
}

impl Documents {
    pub fn is_empty(&self) -> bool {
        self.id_front.is_none() && self.id_back.is_none() && self.selfie.is_none()
    }
}

/// A verification request row.
///
/// `documents` is `None` until either the list payload carried them or
/// [`ensure_documents`] fetched them; `Some` means loaded, even if the
/// submitter uploaded nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    pub id: String,
    pub display_name: String,
    pub email: String,
    pub request_type: String,
    pub submitted_at: String,
    pub status: VerificationStatus,
    pub documents: Option<Documents>,
    pub reason: Option<String>,
}

/// Queue counters for the verification page header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationStats {
    #[serde(default)]
    pub pending: u64,
    #[serde(default, rename = "approved30d")]
    pub approved_30d: u64,
    #[serde(default, rename = "rejected30d")]
    pub rejected_30d: u64,
}

/// Full record from the detail endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailsWire {
    id: String,
    avatar: Option<String>,
    #[serde(default)]
    email: String,
    #[serde(default)]
    display_name: String,
    // the document keys are snake_case on an otherwise camelCase wire
    #[serde(default, rename = "id_front")]
    id_front: Option<String>,
    #[serde(default, rename = "id_back")]
    id_back: Option<String>,
    #[serde(default)]
    selfie: Option<String>,
    #[serde(default)]
    status: String,
    reason: Option<String>,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    updated_at: String,
}

/// Detail view model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationDetails {
    pub id: String,
    pub avatar: Option<String>,
    pub email: String,
    pub display_name: String,
    pub documents: Documents,
    pub status: VerificationStatus,
    pub reason: Option<String>,
    pub submitted_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequestWire {
    id: String,
    #[serde(default)]
    email: String,
    display_name: Option<String>,
    #[serde(default)]
    created_at: String,
    #[serde(default)]
    status: String,
    #[serde(default, rename = "id_front")]
    id_front: Option<String>,
    #[serde(default, rename = "id_back")]
    id_back: Option<String>,
    #[serde(default)]
    selfie: Option<String>,
    reason: Option<String>,
}

impl RequestWire {
    fn into_view(self) -> VerificationRequest {
        let documents = Documents {
            id_front: self.id_front,
            id_back: self.id_back,
            selfie: self.selfie,
        };
        VerificationRequest {
            id: self.id,
            display_name: first_non_empty(&[self.display_name.as_deref()], "-").to_string(),
            email: self.email,
            request_type: "Verification Badge".to_string(),
            submitted_at: calendar_date(&self.created_at),
            status: VerificationStatus::from_backend(&self.status),
            documents: (!documents.is_empty()).then_some(documents),
            reason: self.reason,
        }
    }
}

/// List verification requests, optionally filtered by status.
pub async fn requests(
    api: &ApiClient,
    status: Option<VerificationStatus>,
) -> Result<Vec<VerificationRequest>> {
    let mut params = Vec::new();
    if let Some(status) = status {
        params.push(("status", status.as_str().to_string()));
    }
    params.push(("limit", "100".to_string()));

    let payload = api
        .get_with_params("/verification/admin/requests", &params)
        .await?;
    let rows: Vec<RequestWire> = envelope::data(payload)?;
    Ok(rows.into_iter().map(RequestWire::into_view).collect())
}

/// Fetch the queue counters.
pub async fn stats(api: &ApiClient) -> Result<VerificationStats> {
    let payload = api.get("/verification/admin/stats").await?;
    envelope::data(payload)
}

/// Fetch one request's full record.
pub async fn details(api: &ApiClient, id: &str) -> Result<VerificationDetails> {
    let payload = api
        .get(&format!("/verification/admin/requests/{id}"))
        .await?;
    let wire: DetailsWire = envelope::data(payload)?;

    Ok(VerificationDetails {
        id: wire.id,
        avatar: wire.avatar,
        email: wire.email,
        display_name: wire.display_name,
        documents: Documents {
            id_front: wire.id_front,
            id_back: wire.id_back,
            selfie: wire.selfie,
        },
        status: VerificationStatus::from_backend(&wire.status),
        reason: wire.reason,
        submitted_at: calendar_date(&wire.created_at),
        updated_at: calendar_date(&wire.updated_at),
    })
}

/// Load documents into a request if they are not present yet.
///
/// A no-op when `documents` is already `Some` - opening the same detail
/// twice never issues a second fetch. A failed fetch degrades to
/// "documents unavailable" (the view renders without them) instead of
/// failing the caller; the next open retries.
pub async fn ensure_documents(api: &ApiClient, request: &mut VerificationRequest) -> Result<()> {
    if request.documents.is_some() {
        return Ok(());
    }

    match details(api, &request.id).await {
        Ok(full) => {
            request.documents = Some(full.documents);
            Ok(())
        }
        Err(err) => {
            tracing::warn!(
                "documents unavailable for request {}: {}",
                request.id,
                err
            );
            Ok(())
        }
    }
}

/// Write a review decision.
pub async fn update(
    api: &ApiClient,
    id: &str,
    decision: VerificationDecision,
    reason: Option<&str>,
) -> Result<()> {
    let mut body = json!({ "status": decision.as_str() });
    if let Some(reason) = reason {
        body["reason"] = json!(reason);
    }

    api.patch(&format!("/verification/admin/requests/{id}"), &body)
        .await?;
    Ok(())
}
