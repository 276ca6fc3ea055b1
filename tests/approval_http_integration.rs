//! End-to-end tests for the approval API.
//!
//! Every test drives the full router (all modules, layers included) over
//! the in-memory store and the hashing embedder, so no database or
//! embedding server is needed.

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use approval_cms::adapters::embedding::HashingEmbeddingProvider;
use approval_cms::adapters::memory::InMemoryStore;
use approval_cms::app::{build_router, AppPorts};
use approval_cms::config::ServerConfig;

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestApp {
    router: Router,
    store: InMemoryStore,
}

impl TestApp {
    fn new() -> Self {
        let store = InMemoryStore::new();
        let ports = AppPorts::in_memory(store.clone(), Arc::new(HashingEmbeddingProvider));
        Self {
            router: build_router(&ports, &ServerConfig::default()),
            store,
        }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    /// Create and submit a document, returning its id.
    async fn pending_document(&self, title: &str, content: &str) -> String {
        let (status, doc) = self
            .post(
                "/api/documents",
                json!({"title": title, "content": content, "author": "Policy Team"}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = doc["id"].as_str().unwrap().to_string();

        let (status, _) = self
            .post(&format!("/api/documents/{}/submit", id), json!({}))
            .await;
        assert_eq!(status, StatusCode::OK);
        id
    }

    async fn add_approver(&self, doc_id: &str, email: &str, order: i32) -> String {
        let (status, body) = self
            .post(
                &format!("/api/documents/{}/approvers", doc_id),
                json!({"email": email, "name": email, "order": order}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_str().unwrap().to_string()
    }

    async fn add_reviewer(&self, doc_id: &str, email: &str) -> String {
        let (status, body) = self
            .post(
                &format!("/api/documents/{}/reviewers", doc_id),
                json!({"email": email, "name": "Outside Counsel"}),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["token"].as_str().unwrap().to_string()
    }

    async fn resolve(&self, doc_id: &str, approver_id: &str, decision: &str) -> (StatusCode, Value) {
        self.post(
            &format!("/api/documents/{}/approvers/{}/resolve", doc_id, approver_id),
            json!({"status": decision, "actor_email": "lead@example.com", "actor_name": "Lead"}),
        )
        .await
    }

    async fn document_status(&self, doc_id: &str) -> String {
        let (status, body) = self.get(&format!("/api/documents/{}", doc_id)).await;
        assert_eq!(status, StatusCode::OK);
        body["document"]["status"].as_str().unwrap().to_string()
    }

    async fn audit_actions(&self, doc_id: &str) -> Vec<String> {
        let (status, body) = self.get(&format!("/api/documents/{}/audit", doc_id)).await;
        assert_eq!(status, StatusCode::OK);
        body.as_array()
            .unwrap()
            .iter()
            .map(|e| e["action"].as_str().unwrap().to_string())
            .collect()
    }
}

// =============================================================================
// Documents
// =============================================================================

#[tokio::test]
async fn create_document_returns_created_and_starts_as_draft() {
    let app = TestApp::new();

    let (status, body) = app
        .post(
            "/api/documents",
            json!({"title": "Leave Policy", "content": "Ten days", "actorEmail": "hr@example.com"}),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "draft");
    assert_eq!(body["author"], "Anonymous");

    let id = body["id"].as_str().unwrap();
    assert_eq!(app.audit_actions(id).await, vec!["DOCUMENT_CREATED"]);
}

#[tokio::test]
async fn create_document_without_title_is_bad_request() {
    let app = TestApp::new();

    let (status, body) = app.post("/api/documents", json!({"content": "x"})).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert_eq!(app.store.audit_count().await, 0);
}

#[tokio::test]
async fn content_update_appends_a_version() {
    let app = TestApp::new();
    let id = app.pending_document("Handbook", "first draft").await;

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/documents/{}", id),
            Some(json!({"content": "second draft"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "second draft");

    let (_, detail) = app.get(&format!("/api/documents/{}", id)).await;
    let versions = detail["versions"].as_array().unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0]["version_number"], 1);
}

#[tokio::test]
async fn update_cannot_change_status() {
    let app = TestApp::new();
    let id = app.pending_document("Handbook", "text").await;

    let (status, _) = app
        .send(
            Method::PUT,
            &format!("/api/documents/{}", id),
            Some(json!({"status": "approved"})),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.document_status(&id).await, "pending");
}

#[tokio::test]
async fn direct_approval_requires_pending_document() {
    let app = TestApp::new();
    let (_, doc) = app
        .post("/api/documents", json!({"title": "Draft", "content": "x"}))
        .await;
    let id = doc["id"].as_str().unwrap();

    let (status, body) = app
        .post(&format!("/api/documents/{}/approve", id), json!({}))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Can only approve pending documents");
}

#[tokio::test]
async fn malformed_document_id_is_bad_request() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/documents/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid document ID");
}

// =============================================================================
// Resolution and aggregation
// =============================================================================

#[tokio::test]
async fn three_approvers_settle_rejected_only_after_the_last_response() {
    let app = TestApp::new();
    let id = app.pending_document("Travel Policy", "Economy only").await;
    let a = app.add_approver(&id, "a@example.com", 1).await;
    let b = app.add_approver(&id, "b@example.com", 2).await;
    let c = app.add_approver(&id, "c@example.com", 3).await;

    let (_, first) = app.resolve(&id, &a, "approved").await;
    assert_eq!(first["settled"], false);
    assert_eq!(first["outcome"], "undecided");

    let (_, second) = app.resolve(&id, &b, "approved").await;
    assert_eq!(second["settled"], false);
    assert_eq!(app.document_status(&id).await, "pending");

    let (status, last) = app.resolve(&id, &c, "rejected").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(last["settled"], true);
    assert_eq!(last["document_status"], "rejected");
    assert_eq!(app.document_status(&id).await, "rejected");

    let actions = app.audit_actions(&id).await;
    assert_eq!(
        &actions[actions.len() - 4..],
        &[
            "APPROVER_APPROVED",
            "APPROVER_APPROVED",
            "APPROVER_REJECTED",
            "DOCUMENT_REJECTED"
        ]
    );
}

#[tokio::test]
async fn approver_and_external_reviewer_share_one_pool() {
    let app = TestApp::new();
    let id = app.pending_document("Vendor Contract", "Net 30").await;
    let approver = app.add_approver(&id, "a@example.com", 1).await;
    let token = app.add_reviewer(&id, "counsel@lawfirm.example").await;

    let (_, first) = app.resolve(&id, &approver, "approved").await;
    assert_eq!(first["settled"], false);

    let (status, second) = app
        .post(
            "/api/external/respond",
            json!({"token": token, "status": "approved", "comment": "  Looks fine  "}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["document_id"], id.as_str());
    assert_eq!(second["settled"], true);
    assert_eq!(app.document_status(&id).await, "approved");

    let (_, trail) = app.get(&format!("/api/documents/{}/audit", id)).await;
    let reviewer_entry = trail
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["action"] == "EXTERNAL_REVIEWER_APPROVED")
        .unwrap();
    assert_eq!(reviewer_entry["actor_email"], "counsel@lawfirm.example");
    assert_eq!(reviewer_entry["details"], "Looks fine");

    let terminal = trail.as_array().unwrap().last().unwrap();
    assert_eq!(terminal["action"], "DOCUMENT_APPROVED");
    assert_eq!(terminal["actor_email"], "system");
    assert_eq!(terminal["details"], "All 2 participants responded");
}

#[tokio::test]
async fn unknown_token_is_not_found_and_changes_nothing() {
    let app = TestApp::new();
    let id = app.pending_document("Policy", "Text").await;
    app.add_reviewer(&id, "r@example.com").await;
    let audit_before = app.store.audit_count().await;

    let (status, body) = app
        .post(
            "/api/external/respond",
            json!({"token": "0".repeat(64), "status": "approved"}),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["code"].is_string());
    assert_eq!(app.store.audit_count().await, audit_before);
    assert_eq!(app.document_status(&id).await, "pending");
}

#[tokio::test]
async fn resolving_twice_is_conflict_without_audit() {
    let app = TestApp::new();
    let id = app.pending_document("Policy", "Text").await;
    let a = app.add_approver(&id, "a@example.com", 1).await;
    app.add_approver(&id, "b@example.com", 2).await;

    let (status, _) = app.resolve(&id, &a, "approved").await;
    assert_eq!(status, StatusCode::OK);
    let audit_before = app.store.audit_count().await;

    let (status, body) = app.resolve(&id, &a, "rejected").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ALREADY_RESOLVED");
    assert_eq!(app.store.audit_count().await, audit_before);
}

#[tokio::test]
async fn invalid_resolution_status_is_bad_request() {
    let app = TestApp::new();
    let id = app.pending_document("Policy", "Text").await;
    let a = app.add_approver(&id, "a@example.com", 1).await;

    let (status, _) = app.resolve(&id, &a, "maybe").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (_, approvers) = app.get(&format!("/api/documents/{}/approvers", id)).await;
    assert_eq!(approvers[0]["status"], "pending");
}

#[tokio::test]
async fn audit_failure_rolls_back_the_resolution() {
    let app = TestApp::new();
    let id = app.pending_document("Policy", "Text").await;
    let a = app.add_approver(&id, "a@example.com", 1).await;
    let audit_before = app.store.audit_count().await;

    app.store.set_fail_audit_writes(true);
    let (status, body) = app.resolve(&id, &a, "approved").await;
    app.store.set_fail_audit_writes(false);

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "DATABASE_ERROR");
    assert_eq!(app.store.audit_count().await, audit_before);
    assert_eq!(app.document_status(&id).await, "pending");

    let (_, approvers) = app.get(&format!("/api/documents/{}/approvers", id)).await;
    assert_eq!(approvers[0]["status"], "pending");

    // The participant can still respond once storage recovers
    let (status, body) = app.resolve(&id, &a, "approved").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["document_status"], "approved");
}

#[tokio::test]
async fn removing_the_last_pending_approver_settles_the_document() {
    let app = TestApp::new();
    let id = app.pending_document("Policy", "Text").await;
    let a = app.add_approver(&id, "a@example.com", 1).await;
    let b = app.add_approver(&id, "b@example.com", 2).await;
    let (_, first) = app.resolve(&id, &a, "approved").await;
    assert_eq!(first["settled"], false);

    let (status, _) = app
        .send(
            Method::DELETE,
            &format!("/api/documents/{}/approvers/{}", id, b),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.document_status(&id).await, "approved");
    let actions = app.audit_actions(&id).await;
    assert_eq!(
        &actions[actions.len() - 2..],
        &["APPROVER_REMOVED", "DOCUMENT_APPROVED"]
    );
}

#[tokio::test]
async fn approvers_are_listed_in_chain_order() {
    let app = TestApp::new();
    let id = app.pending_document("Policy", "Text").await;
    app.add_approver(&id, "second@example.com", 2).await;
    app.add_approver(&id, "first@example.com", 1).await;

    let (status, body) = app.get(&format!("/api/documents/{}/approvers", id)).await;

    assert_eq!(status, StatusCode::OK);
    let emails: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["email"].as_str().unwrap())
        .collect();
    assert_eq!(emails, vec!["first@example.com", "second@example.com"]);
}

// =============================================================================
// Deadlines, audit feed and search
// =============================================================================

#[tokio::test]
async fn deadline_can_be_set_read_and_removed() {
    let app = TestApp::new();
    let id = app.pending_document("Policy", "Text").await;
    let uri = format!("/api/documents/{}/deadline", id);

    let (status, body) = app.get(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"deadline": null}));

    let (status, body) = app.post(&uri, json!({"deadline": "2020-01-15"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overdue"], true);

    let (_, body) = app.get(&uri).await;
    assert!(body["deadline"].is_string());

    let (status, _) = app.send(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = app.get(&uri).await;
    assert_eq!(body, json!({"deadline": null}));

    let actions = app.audit_actions(&id).await;
    assert!(actions.contains(&"DEADLINE_SET".to_string()));
    assert!(actions.contains(&"DEADLINE_REMOVED".to_string()));
}

#[tokio::test]
async fn unparseable_deadline_is_bad_request() {
    let app = TestApp::new();
    let id = app.pending_document("Policy", "Text").await;

    let (status, _) = app
        .post(
            &format!("/api/documents/{}/deadline", id),
            json!({"deadline": "next tuesday"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn recent_audit_feed_is_newest_first_and_limited() {
    let app = TestApp::new();
    app.pending_document("One", "a").await;
    app.pending_document("Two", "b").await;

    let (status, body) = app.get("/api/audit?limit=3").await;

    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["action"], "SUBMITTED_FOR_REVIEW");
}

#[tokio::test]
async fn search_ranks_the_matching_document_first() {
    let app = TestApp::new();
    app.pending_document("Leave", "annual leave and vacation days").await;
    app.pending_document("Expenses", "travel expense reimbursement receipts").await;

    let (status, body) = app.get("/api/search?q=vacation%20days").await;

    assert_eq!(status, StatusCode::OK);
    let hits = body.as_array().unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0]["title"], "Leave");
    assert!(hits[0]["similarity"].as_f64().unwrap() > hits[1]["similarity"].as_f64().unwrap());
}

#[tokio::test]
async fn search_without_query_is_bad_request() {
    let app = TestApp::new();
    let (status, body) = app.get("/api/search").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Query parameter required");
}

#[tokio::test]
async fn stats_count_pending_documents() {
    let app = TestApp::new();
    app.pending_document("One", "a").await;
    app.post("/api/documents", json!({"title": "Draft", "content": "b"}))
        .await;

    let (status, body) = app.get("/api/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["pending"], 1);
    assert_eq!(body["approved"], 0);
}
