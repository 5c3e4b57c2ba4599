#[cfg(test)]
#[path = "http_test.rs"]
mod tests;

use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::multipart;
use tokio::fs;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::ApiError;
use crate::domain::models::ChatPrompt;
use crate::domain::models::Document;
use crate::domain::models::DocumentUpload;
use crate::domain::models::HistoryEntry;
use crate::domain::models::KnowledgeBase;
use crate::domain::models::QueryResponse;
use crate::domain::models::UploadReceipt;

async fn ensure_success(res: reqwest::Response, context: &str) -> Result<reqwest::Response> {
    if res.status().is_success() {
        return Ok(res);
    }

    let status = res.status().as_u16();
    let body = res.text().await.unwrap_or_default();
    let err = ApiError::from_body(status, &body);
    tracing::error!(status = status, detail = ?err.detail, "{}", context);

    return Err(err.into());
}

pub struct HttpKnowledgeBase {
    url: String,
    timeout: String,
    client: reqwest::Client,
}

impl Default for HttpKnowledgeBase {
    fn default() -> HttpKnowledgeBase {
        return HttpKnowledgeBase::new(
            &Config::get(ConfigKey::ApiURL),
            &Config::get(ConfigKey::HealthCheckTimeout),
        );
    }
}

impl HttpKnowledgeBase {
    pub fn new(url: &str, timeout: &str) -> HttpKnowledgeBase {
        return HttpKnowledgeBase {
            url: url.trim_end_matches('/').to_string(),
            timeout: timeout.to_string(),
            client: reqwest::Client::new(),
        };
    }
}

#[async_trait]
impl KnowledgeBase for HttpKnowledgeBase {
    #[allow(clippy::implicit_return)]
    async fn health_check(&self) -> Result<()> {
        if self.url.is_empty() {
            bail!("Knowledge base URL is not defined");
        }

        let res = self
            .client
            .get(format!("{url}/documents/", url = self.url))
            .timeout(Duration::from_millis(self.timeout.parse::<u64>()?))
            .send()
            .await;

        let res = match res {
            Ok(res) => res,
            Err(err) => {
                tracing::error!(error = ?err, "Knowledge base is not reachable");
                bail!("Knowledge base is not reachable at {}", self.url);
            }
        };

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                "Knowledge base health check failed"
            );
            bail!("Knowledge base health check failed");
        }

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn list_documents(&self) -> Result<Vec<Document>> {
        let res = self
            .client
            .get(format!("{url}/documents/", url = self.url))
            .send()
            .await?;

        let docs = ensure_success(res, "Failed to list documents")
            .await?
            .json::<Vec<Document>>()
            .await?;
        tracing::debug!(count = docs.len(), "Listed documents");

        return Ok(docs);
    }

    #[allow(clippy::implicit_return)]
    async fn upload_document(&self, upload: &DocumentUpload) -> Result<UploadReceipt> {
        let bytes = fs::read(&upload.path).await?;
        let part = multipart::Part::bytes(bytes)
            .file_name(upload.filename.to_string())
            .mime_str(upload.file_type.mime())?;
        let form = multipart::Form::new().part("file", part);

        let res = self
            .client
            .post(format!("{url}/documents/upload", url = self.url))
            .multipart(form)
            .send()
            .await?;

        let receipt = ensure_success(res, "Failed to upload document")
            .await?
            .json::<UploadReceipt>()
            .await?;
        tracing::debug!(
            filename = upload.filename.as_str(),
            chunks = ?receipt.chunks,
            "Uploaded document"
        );

        return Ok(receipt);
    }

    #[allow(clippy::implicit_return)]
    async fn delete_document(&self, id: i64) -> Result<()> {
        let res = self
            .client
            .delete(format!("{url}/documents/{id}", url = self.url))
            .send()
            .await?;

        ensure_success(res, "Failed to delete document").await?;
        tracing::debug!(id = id, "Deleted document");

        return Ok(());
    }

    #[allow(clippy::implicit_return)]
    async fn query(&self, prompt: &ChatPrompt) -> Result<QueryResponse> {
        let res = self
            .client
            .post(format!("{url}/chat/query", url = self.url))
            .json(prompt)
            .send()
            .await?;

        let answer = ensure_success(res, "Failed to query knowledge base")
            .await?
            .json::<QueryResponse>()
            .await?;
        tracing::debug!(body = ?answer, "Query response");

        return Ok(answer);
    }

    #[allow(clippy::implicit_return)]
    async fn history(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
        let res = self
            .client
            .get(format!("{url}/chat/history", url = self.url))
            .query(&[("limit", limit)])
            .send()
            .await?;

        let entries = ensure_success(res, "Failed to fetch chat history")
            .await?
            .json::<Vec<HistoryEntry>>()
            .await?;

        return Ok(entries);
    }
}
