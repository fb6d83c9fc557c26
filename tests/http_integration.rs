//! Integration tests for the API client using wiremock
//!
//! These tests verify the request executor's contract against mocked
//! endpoints: bearer auth, envelope unwrapping, error surfacing, and the
//! per-resource normalizers end to end.

use rancha_admin::resources::{fomo, ghost, moderation, users, verification};
use rancha_admin::{ApiClient, AuthTokens, TokenStore};
use serde_json::json;
use wiremock::matchers::{bearer_token, body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Auth backed by a pre-seeded token file under the temp dir.
fn auth_with_token(test: &str, token: &str) -> AuthTokens {
    let file = std::env::temp_dir()
        .join("rancha-admin-it")
        .join(test)
        .join("token.json");
    let _ = std::fs::remove_file(&file);
    let store = TokenStore::at_path(file);
    store.save(token);
    AuthTokens::new(store, None)
}

fn client(server: &MockServer, auth: AuthTokens) -> ApiClient {
    ApiClient::new(&server.uri(), auth).expect("client should build")
}

mod executor_tests {
    use super::*;

    /// The persisted token rides along as a bearer header.
    #[tokio::test]
    async fn persisted_token_is_sent_as_bearer() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/security/summary"))
            .and(bearer_token("seeded-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "sslStatus": "valid",
                    "sslValidUntil": null,
                    "rateLimitStatus": "healthy",
                    "twoFaAdoptionPercent": 12.5,
                    "failedLogins24h": 3
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = client(&server, auth_with_token("bearer", "seeded-token"));
        let summary = rancha_admin::resources::security::summary(&api)
            .await
            .expect("summary should load");
        assert_eq!(summary.failed_logins_24h, 3);
    }

    /// Anonymous requests pass through; the server's rejection message
    /// surfaces verbatim.
    #[tokio::test]
    async fn anonymous_request_passes_through_and_surfaces_rejection() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/security/summary"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "message": "Unauthorized" })),
            )
            .mount(&server)
            .await;

        let api = client(&server, AuthTokens::anonymous());
        let err = rancha_admin::resources::security::summary(&api)
            .await
            .unwrap_err();
        assert_eq!(err.message, "Unauthorized");
    }

    /// A 400 with a message field raises exactly that message.
    #[tokio::test]
    async fn error_message_from_body_is_exact() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/ads/campaigns"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(json!({ "message": "Campaign name is required" })),
            )
            .mount(&server)
            .await;

        let api = client(&server, AuthTokens::anonymous());
        let draft = rancha_admin::resources::ads::AdDraft {
            name: String::new(),
            ..Default::default()
        };
        let err = rancha_admin::resources::ads::create(&api, &draft)
            .await
            .unwrap_err();
        assert_eq!(err.message, "Campaign name is required");
    }

    /// A non-JSON error body falls back to the generic message instead
    /// of raising a parse error.
    #[tokio::test]
    async fn non_json_error_body_falls_back_to_generic_message() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ads/summary"))
            .respond_with(ResponseTemplate::new(500).set_body_string("<html>Internal error</html>"))
            .mount(&server)
            .await;

        let api = client(&server, AuthTokens::anonymous());
        let err = rancha_admin::resources::ads::summary(&api).await.unwrap_err();
        assert_eq!(err.message, "Request failed");
    }

    /// A 2xx with a malformed envelope is rejected at the boundary, not
    /// propagated as a half-empty view model.
    #[tokio::test]
    async fn malformed_success_envelope_is_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/ads/summary"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "totals": {} })))
            .mount(&server)
            .await;

        let api = client(&server, AuthTokens::anonymous());
        let err = rancha_admin::resources::ads::summary(&api).await.unwrap_err();
        assert_eq!(err.message, "Unexpected response from server");
    }
}

mod normalizer_tests {
    use super::*;

    /// Users list end to end: envelope, pagination, date and status
    /// normalization.
    #[tokio::test]
    async fn users_list_normalizes_rows_and_pagination() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/user/admin/users"))
            .and(query_param("page", "2"))
            .and(query_param("limit", "10"))
            .and(query_param("search", "ada"))
            .and(query_param("status", "suspended"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "id": "u1",
                    "username": "ada",
                    "email": "ada@example.com",
                    "status": "suspended",
                    "postsCount": 5,
                    "commentsCount": 2,
                    "verified": true,
                    "joinDate": "2023-03-04T15:00:00.000Z"
                }],
                "pagination": { "total": 42, "page": 2, "limit": 10 }
            })))
            .mount(&server)
            .await;

        let api = client(&server, AuthTokens::anonymous());
        let page = users::list(&api, 2, 10, Some("ada"), Some(users::UserStatus::Suspended))
            .await
            .expect("list should load");

        assert_eq!(page.total, 42);
        assert_eq!(page.total_pages(), 5);
        assert_eq!(page.display_range(), (11, 20));
        assert_eq!(page.items[0].status, users::UserStatus::Suspended);
        assert_eq!(page.items[0].join_date, "2023-03-04");
    }

    /// The moderation filter speaks backend vocabulary on the wire and
    /// UI vocabulary in the result.
    #[tokio::test]
    async fn moderation_filter_maps_vocabulary_both_ways() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/moderation/queue"))
            .and(query_param("status", "approved"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{
                    "id": "f1",
                    "postId": "p1",
                    "contentPreview": "spam spam",
                    "reason": "spam",
                    "status": "approved",
                    "authorFlaggedCount": 2,
                    "createdAt": "2024-03-01T00:00:00Z"
                }],
                "pagination": { "total": 1, "page": 1, "limit": 10 }
            })))
            .mount(&server)
            .await;

        let api = client(&server, AuthTokens::anonymous());
        let page = moderation::queue(&api, 1, 10, Some(moderation::FlagStatus::Reviewed))
            .await
            .expect("queue should load");
        assert_eq!(page.items[0].status, moderation::FlagStatus::Reviewed);
    }

    /// Review decisions write the backend status vocabulary.
    #[tokio::test]
    async fn review_sends_backend_status() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/moderation/status"))
            .and(body_json(json!({ "postId": "f9", "status": "removed" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
            .expect(1)
            .mount(&server)
            .await;

        let api = client(&server, AuthTokens::anonymous());
        moderation::review(&api, "f9", moderation::ReviewAction::Hide)
            .await
            .expect("review should succeed");
    }

    /// Ghost names travel percent-encoded in the path.
    #[tokio::test]
    async fn ghost_name_is_percent_encoded_in_path() {
        let server = MockServer::start().await;

        Mock::given(method("PATCH"))
            .and(path("/ghost/admin/names/midnight%20fox"))
            .and(body_json(json!({ "status": "restricted" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
            .expect(1)
            .mount(&server)
            .await;

        let api = client(&server, AuthTokens::anonymous());
        ghost::update_name_status(&api, "midnight fox", ghost::GhostNameStatus::Restricted)
            .await
            .expect("update should succeed");
    }
}

mod validation_tests {
    use super::*;

    /// An out-of-bounds duration is rejected before any request is sent.
    #[tokio::test]
    async fn invalid_window_duration_never_reaches_the_server() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/fomo/admin/windows"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
            .expect(0)
            .mount(&server)
            .await;

        let api = client(&server, AuthTokens::anonymous());
        let draft = fomo::WindowDraft {
            title: "Too short".into(),
            description: None,
            start_time: "2024-01-01T00:00:00Z".into(),
            end_time: "2024-01-01T00:04:00Z".into(),
            max_posts_per_user: None,
        };

        let err = fomo::create(&api, &draft).await.unwrap_err();
        assert_eq!(err.message, fomo::DURATION_MESSAGE);
    }

    /// A window exactly 48 hours long is accepted and sent.
    #[tokio::test]
    async fn maximal_window_duration_is_accepted() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/fomo/admin/windows"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
            .expect(1)
            .mount(&server)
            .await;

        let api = client(&server, AuthTokens::anonymous());
        let draft = fomo::WindowDraft {
            title: "Whole weekend".into(),
            description: None,
            start_time: "2024-01-01T00:00:00Z".into(),
            end_time: "2024-01-03T00:00:00Z".into(),
            max_posts_per_user: Some(5),
        };
        fomo::create(&api, &draft)
            .await
            .expect("create should succeed");
    }
}

mod lazy_fetch_tests {
    use super::*;

    fn pending_request(id: &str) -> verification::VerificationRequest {
        verification::VerificationRequest {
            id: id.to_string(),
            display_name: "Kay".into(),
            email: "kay@example.com".into(),
            request_type: "Verification Badge".into(),
            submitted_at: "2024-07-01".into(),
            status: verification::VerificationStatus::Pending,
            documents: None,
            reason: None,
        }
    }

    /// The document enrichment fetches once and is a no-op afterwards.
    #[tokio::test]
    async fn ensure_documents_fetches_exactly_once() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/verification/admin/requests/v1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "id": "v1",
                    "email": "kay@example.com",
                    "displayName": "Kay",
                    "id_front": "https://cdn/front.jpg",
                    "id_back": "https://cdn/back.jpg",
                    "selfie": "https://cdn/selfie.jpg",
                    "status": "pending",
                    "createdAt": "2024-07-01T00:00:00Z",
                    "updatedAt": "2024-07-01T00:00:00Z"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let api = client(&server, AuthTokens::anonymous());
        let mut request = pending_request("v1");

        verification::ensure_documents(&api, &mut request)
            .await
            .expect("first enrichment should succeed");
        let first = request.documents.clone().expect("documents loaded");
        assert_eq!(first.selfie.as_deref(), Some("https://cdn/selfie.jpg"));

        verification::ensure_documents(&api, &mut request)
            .await
            .expect("second enrichment is a no-op");
        assert_eq!(request.documents, Some(first));
    }

    /// Already-loaded documents mean no network call at all.
    #[tokio::test]
    async fn loaded_documents_skip_the_network() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/verification/admin/requests/v2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
            .expect(0)
            .mount(&server)
            .await;

        let api = client(&server, AuthTokens::anonymous());
        let mut request = pending_request("v2");
        request.documents = Some(verification::Documents::default());

        verification::ensure_documents(&api, &mut request)
            .await
            .expect("no-op enrichment should succeed");
    }

    /// A failed document fetch degrades instead of failing the view.
    #[tokio::test]
    async fn failed_document_fetch_degrades() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/verification/admin/requests/v3"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let api = client(&server, AuthTokens::anonymous());
        let mut request = pending_request("v3");

        verification::ensure_documents(&api, &mut request)
            .await
            .expect("enrichment degrades rather than failing");
        assert_eq!(request.documents, None);
    }
}
