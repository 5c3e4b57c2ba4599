use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use super::ChatPrompt;
use super::Document;
use super::DocumentUpload;
use super::HistoryEntry;
use super::QueryResponse;
use super::UploadReceipt;

#[async_trait]
pub trait KnowledgeBase {
    /// Used at startup to verify the service is reachable before the user
    /// starts asking questions.
    async fn health_check(&self) -> Result<()>;

    /// All documents currently stored by the service.
    async fn list_documents(&self) -> Result<Vec<Document>>;

    /// Sends a single validated file to be chunked and indexed.
    async fn upload_document(&self, upload: &DocumentUpload) -> Result<UploadReceipt>;

    async fn delete_document(&self, id: i64) -> Result<()>;

    /// Asks a question, returning the answer and the sources it was built
    /// from.
    async fn query(&self, prompt: &ChatPrompt) -> Result<QueryResponse>;

    async fn history(&self, limit: usize) -> Result<Vec<HistoryEntry>>;
}

pub type KnowledgeBaseBox = Arc<dyn KnowledgeBase + Send + Sync>;
