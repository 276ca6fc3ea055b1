//! Document queries.

use std::sync::Arc;

use crate::domain::document::{Document, DocumentError, DocumentStatus, DocumentVersion};
use crate::domain::foundation::DocumentId;
use crate::ports::DocumentRepository;

#[derive(Debug, Clone)]
pub struct GetDocumentQuery {
    pub document_id: DocumentId,
}

/// Document with its content history, newest version first.
#[derive(Debug, Clone)]
pub struct DocumentWithVersions {
    pub document: Document,
    pub versions: Vec<DocumentVersion>,
}

#[derive(Debug, Clone, Default)]
pub struct ListDocumentsQuery {
    pub status: Option<DocumentStatus>,
}

pub struct GetDocumentHandler {
    documents: Arc<dyn DocumentRepository>,
}

impl GetDocumentHandler {
    pub fn new(documents: Arc<dyn DocumentRepository>) -> Self {
        Self { documents }
    }

    pub async fn handle(&self, query: GetDocumentQuery) -> Result<DocumentWithVersions, DocumentError> {
        let document = self
            .documents
            .find_by_id(&query.document_id)
            .await?
            .ok_or(DocumentError::NotFound(query.document_id))?;
        let versions = self.documents.versions(&query.document_id).await?;

        Ok(DocumentWithVersions { document, versions })
    }

    /// Most recently updated first.
    pub async fn list(&self, query: ListDocumentsQuery) -> Result<Vec<Document>, DocumentError> {
        Ok(self.documents.list(query.status).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;

    #[tokio::test]
    async fn missing_document_is_not_found() {
        let handler = GetDocumentHandler::new(Arc::new(InMemoryStore::new()));
        let id = DocumentId::new();

        let err = handler.handle(GetDocumentQuery { document_id: id }).await.unwrap_err();

        assert_eq!(err, DocumentError::NotFound(id));
    }

    #[tokio::test]
    async fn returns_document_with_versions() {
        let store = Arc::new(InMemoryStore::new());
        let doc = Document::new(DocumentId::new(), "T".into(), "v1".into(), None).unwrap();
        store.save(&doc, None).await.unwrap();
        store
            .append_version(&DocumentVersion::next(*doc.id(), "v2".into(), None))
            .await
            .unwrap();
        store
            .append_version(&DocumentVersion::next(*doc.id(), "v3".into(), Some(1)))
            .await
            .unwrap();

        let handler = GetDocumentHandler::new(store);
        let result = handler.handle(GetDocumentQuery { document_id: *doc.id() }).await.unwrap();

        assert_eq!(result.document, doc);
        let numbers: Vec<u32> = result.versions.iter().map(|v| v.version_number).collect();
        assert_eq!(numbers, vec![2, 1]);
    }
}
