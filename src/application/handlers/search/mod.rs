mod search_documents;

pub use search_documents::{SearchDocumentsHandler, SearchDocumentsQuery};
