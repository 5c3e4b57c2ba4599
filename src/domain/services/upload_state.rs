#[cfg(test)]
#[path = "upload_state_test.rs"]
mod tests;

use std::time::Duration;
use std::time::Instant;

use anyhow::bail;
use anyhow::Result;

const SUCCESS_RESET: Duration = Duration::from_secs(3);
const ERROR_RESET: Duration = Duration::from_secs(4);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadStatus {
    Idle,
    Uploading(String),
    Success(String),
    Error(String),
}

pub struct UploadState {
    status: UploadStatus,
    changed_at: Instant,
}

impl Default for UploadState {
    fn default() -> UploadState {
        return UploadState {
            status: UploadStatus::Idle,
            changed_at: Instant::now(),
        };
    }
}

impl UploadState {
    pub fn status(&self) -> &UploadStatus {
        return &self.status;
    }

    pub fn is_uploading(&self) -> bool {
        return matches!(self.status, UploadStatus::Uploading(_));
    }

    pub fn begin(&mut self, filename: &str) -> Result<()> {
        if let UploadStatus::Uploading(current) = &self.status {
            bail!(format!(
                "Still uploading {current}. Wait for it to finish before uploading another file."
            ));
        }

        self.set(UploadStatus::Uploading(filename.to_string()));
        return Ok(());
    }

    pub fn succeed(&mut self, filename: &str) {
        self.set(UploadStatus::Success(filename.to_string()));
    }

    pub fn fail(&mut self, detail: &str) {
        self.set(UploadStatus::Error(detail.to_string()));
    }

    /// Returns a finished upload to idle once it has been displayed long
    /// enough.
    pub fn tick(&mut self, now: Instant) {
        let reset_after = match self.status {
            UploadStatus::Success(_) => SUCCESS_RESET,
            UploadStatus::Error(_) => ERROR_RESET,
            _ => return,
        };

        if now.saturating_duration_since(self.changed_at) >= reset_after {
            self.set(UploadStatus::Idle);
        }
    }

    pub fn describe(&self) -> String {
        match &self.status {
            UploadStatus::Idle => return "Use /upload PATH to add a document".to_string(),
            UploadStatus::Uploading(filename) => return format!("Uploading {filename}…"),
            UploadStatus::Success(_) => return "Upload complete!".to_string(),
            UploadStatus::Error(_) => return "Upload failed. Try again.".to_string(),
        }
    }

    fn set(&mut self, status: UploadStatus) {
        self.status = status;
        self.changed_at = Instant::now();
    }
}
