#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::models::detail_or;
use crate::domain::models::error_detail;
use crate::domain::models::Action;
use crate::domain::models::ChatPrompt;
use crate::domain::models::DocumentUpload;
use crate::domain::models::Event;
use crate::domain::models::KnowledgeBaseBox;

pub fn help_text() -> String {
    let text = r#"
COMMANDS:
- /upload (/u) [PATH] - Uploads a single PDF, DOCX, TXT or MD file to the knowledge base.
- /delete (/d) [NUMBER] - Deletes the document shown at NUMBER in the documents sidebar.
- /documents (/docs, /ls) - Reloads the documents list.
- /history (/hi) [LIMIT?] - Shows previously asked questions stored by the backend.
- /sources (/s) [NUMBER] - Sets how many sources each answer should cite.
- /clear (/cl) - Clears the conversation. Documents are untouched.
- /quit /exit (/q) - Exit KBChat.
- /help (/h) - Provides this help menu.

Anything else you type is sent as a question about your documents.

HOTKEYS:
- Up arrow - Scroll up
- Down arrow - Scroll down
- CTRL+U - Page up
- CTRL+D - Page down
- CTRL+L - Clear the conversation
- CTRL+C - Cancel waiting for an answer if in progress, otherwise exit.
        "#;

    return text.trim().to_string();
}

async fn query(
    kb: KnowledgeBaseBox,
    prompt: ChatPrompt,
    tx: mpsc::UnboundedSender<Event>,
) -> Result<()> {
    match kb.query(&prompt).await {
        Ok(response) => tx.send(Event::ChatAnswered(prompt.request_id, response))?,
        Err(err) => {
            tracing::error!(error = ?err, "Query failed");
            let detail = error_detail(&err).unwrap_or_else(|| return err.to_string());
            tx.send(Event::ChatFailed(prompt.request_id, detail))?;
        }
    }

    return Ok(());
}

async fn history(kb: KnowledgeBaseBox, limit: usize, tx: mpsc::UnboundedSender<Event>) -> Result<()> {
    match kb.history(limit).await {
        Ok(entries) => tx.send(Event::ChatHistoryLoaded(entries))?,
        Err(err) => {
            let detail = detail_or(&err, "Failed to load chat history");
            tx.send(Event::ChatHistoryFailed(detail))?;
        }
    }

    return Ok(());
}

async fn list_documents(kb: KnowledgeBaseBox, tx: mpsc::UnboundedSender<Event>) -> Result<()> {
    match kb.list_documents().await {
        Ok(documents) => tx.send(Event::DocumentsLoaded(documents))?,
        Err(err) => {
            tracing::error!(error = ?err, "Failed to load documents");
            tx.send(Event::DocumentsFailed(detail_or(
                &err,
                "Failed to load documents",
            )))?;
        }
    }

    return Ok(());
}

async fn upload_document(
    kb: KnowledgeBaseBox,
    upload: DocumentUpload,
    tx: mpsc::UnboundedSender<Event>,
) -> Result<()> {
    match kb.upload_document(&upload).await {
        Ok(receipt) => tx.send(Event::DocumentUploaded(upload.filename, receipt))?,
        Err(err) => {
            tracing::error!(error = ?err, filename = upload.filename.as_str(), "Upload failed");
            let detail = detail_or(&err, "Upload failed");
            tx.send(Event::DocumentUploadFailed(upload.filename, detail))?;
        }
    }

    return Ok(());
}

async fn delete_document(kb: KnowledgeBaseBox, id: i64, tx: mpsc::UnboundedSender<Event>) -> Result<()> {
    match kb.delete_document(id).await {
        Ok(_) => tx.send(Event::DocumentDeleted(id))?,
        Err(err) => {
            tracing::error!(error = ?err, id = id, "Delete failed");
            let detail = detail_or(&err, "Failed to delete document");
            tx.send(Event::DocumentDeleteFailed(id, detail))?;
        }
    }

    return Ok(());
}

/// Runs every network call requested by the UI on its own task, reporting the
/// outcome back as an `Event`.
pub struct ActionsService {}

impl ActionsService {
    pub async fn start(
        kb: KnowledgeBaseBox,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        // Lazy default.
        let mut chat_worker: JoinHandle<Result<()>> = tokio::spawn(async {
            return Ok(());
        });

        while let Some(action) = rx.recv().await {
            let worker_kb = kb.clone();
            let worker_tx = tx.clone();

            match action {
                Action::ChatAbort() => {
                    chat_worker.abort();
                }
                Action::ChatQuery(prompt) => {
                    tracing::debug!(num_sources = prompt.num_sources, "Sending query");
                    chat_worker = tokio::spawn(query(worker_kb, prompt, worker_tx));
                }
                Action::ChatHistory(limit) => {
                    tokio::spawn(history(worker_kb, limit, worker_tx));
                }
                Action::DocumentsRefresh() => {
                    tokio::spawn(list_documents(worker_kb, worker_tx));
                }
                Action::DocumentUpload(upload) => {
                    tokio::spawn(upload_document(worker_kb, upload, worker_tx));
                }
                Action::DocumentDelete(id) => {
                    tokio::spawn(delete_document(worker_kb, id, worker_tx));
                }
            }
        }

        return Ok(());
    }
}
