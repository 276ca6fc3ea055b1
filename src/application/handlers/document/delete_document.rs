//! DeleteDocument - Removes a document with its versions, participants and
//! deadline. Audit entries outlive it.

use std::sync::Arc;
use tracing::info;

use crate::domain::document::DocumentError;
use crate::domain::foundation::DocumentId;
use crate::ports::DocumentRepository;

#[derive(Debug, Clone)]
pub struct DeleteDocumentCommand {
    pub document_id: DocumentId,
}

pub struct DeleteDocumentHandler {
    documents: Arc<dyn DocumentRepository>,
}

impl DeleteDocumentHandler {
    pub fn new(documents: Arc<dyn DocumentRepository>) -> Self {
        Self { documents }
    }

    pub async fn handle(&self, cmd: DeleteDocumentCommand) -> Result<(), DocumentError> {
        self.documents.delete(&cmd.document_id).await?;
        info!(document_id = %cmd.document_id, "document deleted");
        Ok(())
    }
}
