//! Composition root: wires ports into handlers and handlers into the router.

use axum::{http::HeaderValue, http::Method, routing::get, Json, Router};
use serde_json::{json, Value};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::adapters::embedding::{DisabledEmbeddingProvider, HttpEmbeddingProvider};
use crate::adapters::http::{
    approval_routes, audit_routes, deadline_routes, document_routes, ApprovalHandlers,
    AuditHandlers, DeadlineHandlers, DocumentHandlers,
};
use crate::adapters::memory::InMemoryStore;
use crate::adapters::postgres::{
    PostgresApprovalRepository, PostgresAuditLog, PostgresDeadlineRepository,
    PostgresDocumentRepository, PostgresDocumentSearch, PostgresDocumentUnitOfWork,
};
use crate::application::handlers::approval::{
    AddApproverHandler, AddReviewerHandler, ListParticipantsHandler, RemoveApproverHandler,
    RemoveReviewerHandler, ResolveParticipantHandler,
};
use crate::application::handlers::audit::ListAuditHandler;
use crate::application::handlers::deadline::DeadlineHandler;
use crate::application::handlers::document::{
    CreateDocumentHandler, DecideDocumentHandler, DeleteDocumentHandler, DocumentStatsHandler,
    GetDocumentHandler, SubmitDocumentHandler, UpdateDocumentHandler,
};
use crate::application::handlers::search::SearchDocumentsHandler;
use crate::config::{EmbeddingConfig, ServerConfig};
use crate::ports::{
    ApprovalRepository, AuditLog, DeadlineRepository, DocumentRepository, DocumentSearch,
    DocumentUnitOfWork, EmbeddingError, EmbeddingProvider,
};

/// Every port the handlers depend on.
#[derive(Clone)]
pub struct AppPorts {
    pub documents: Arc<dyn DocumentRepository>,
    pub approvals: Arc<dyn ApprovalRepository>,
    pub unit_of_work: Arc<dyn DocumentUnitOfWork>,
    pub audit: Arc<dyn AuditLog>,
    pub deadlines: Arc<dyn DeadlineRepository>,
    pub search: Arc<dyn DocumentSearch>,
    pub embeddings: Arc<dyn EmbeddingProvider>,
}

impl AppPorts {
    /// All storage ports backed by one shared in-memory store.
    pub fn in_memory(store: InMemoryStore, embeddings: Arc<dyn EmbeddingProvider>) -> Self {
        let store = Arc::new(store);
        Self {
            documents: store.clone(),
            approvals: store.clone(),
            unit_of_work: store.clone(),
            audit: store.clone(),
            deadlines: store.clone(),
            search: store,
            embeddings,
        }
    }

    /// All storage ports backed by PostgreSQL through `pool`.
    pub fn postgres(pool: PgPool, embeddings: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            documents: Arc::new(PostgresDocumentRepository::new(pool.clone())),
            approvals: Arc::new(PostgresApprovalRepository::new(pool.clone())),
            unit_of_work: Arc::new(PostgresDocumentUnitOfWork::new(pool.clone())),
            audit: Arc::new(PostgresAuditLog::new(pool.clone())),
            deadlines: Arc::new(PostgresDeadlineRepository::new(pool.clone())),
            search: Arc::new(PostgresDocumentSearch::new(pool)),
            embeddings,
        }
    }
}

/// Build the embedding provider selected by configuration.
///
/// # Errors
///
/// - `Network` if the HTTP client cannot be built
pub fn embedding_provider(
    config: &EmbeddingConfig,
) -> Result<Arc<dyn EmbeddingProvider>, EmbeddingError> {
    if !config.enabled {
        return Ok(Arc::new(DisabledEmbeddingProvider));
    }
    Ok(Arc::new(HttpEmbeddingProvider::new(config.http_config())?))
}

fn document_handlers(ports: &AppPorts) -> DocumentHandlers {
    DocumentHandlers {
        create: Arc::new(CreateDocumentHandler::new(
            ports.unit_of_work.clone(),
            ports.embeddings.clone(),
        )),
        get: Arc::new(GetDocumentHandler::new(ports.documents.clone())),
        update: Arc::new(UpdateDocumentHandler::new(
            ports.documents.clone(),
            ports.embeddings.clone(),
        )),
        delete: Arc::new(DeleteDocumentHandler::new(ports.documents.clone())),
        submit: Arc::new(SubmitDocumentHandler::new(ports.unit_of_work.clone())),
        decide: Arc::new(DecideDocumentHandler::new(ports.unit_of_work.clone())),
        stats: Arc::new(DocumentStatsHandler::new(ports.documents.clone())),
        search: Arc::new(SearchDocumentsHandler::new(
            ports.embeddings.clone(),
            ports.search.clone(),
        )),
    }
}

fn approval_handlers(ports: &AppPorts) -> ApprovalHandlers {
    ApprovalHandlers {
        add_approver: Arc::new(AddApproverHandler::new(ports.unit_of_work.clone())),
        remove_approver: Arc::new(RemoveApproverHandler::new(ports.unit_of_work.clone())),
        add_reviewer: Arc::new(AddReviewerHandler::new(ports.unit_of_work.clone())),
        remove_reviewer: Arc::new(RemoveReviewerHandler::new(ports.unit_of_work.clone())),
        list: Arc::new(ListParticipantsHandler::new(ports.approvals.clone())),
        resolve: Arc::new(ResolveParticipantHandler::new(ports.unit_of_work.clone())),
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Full API router with tracing, CORS and timeout layers.
pub fn build_router(ports: &AppPorts, server: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(document_routes(document_handlers(ports)))
        .merge(approval_routes(approval_handlers(ports)))
        .merge(deadline_routes(DeadlineHandlers {
            deadlines: Arc::new(DeadlineHandler::new(
                ports.deadlines.clone(),
                ports.unit_of_work.clone(),
            )),
        }))
        .merge(audit_routes(AuditHandlers {
            list: Arc::new(ListAuditHandler::new(ports.audit.clone())),
        }))
        // Layers run bottom-up: trace sees every request first
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
}
