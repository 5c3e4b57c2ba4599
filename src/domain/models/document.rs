#[cfg(test)]
#[path = "document_test.rs"]
mod tests;

use std::path;

use anyhow::bail;
use anyhow::Result;
use chrono::DateTime;
use chrono::NaiveDateTime;
use serde_derive::Deserialize;
use serde_derive::Serialize;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub filename: String,
    pub file_type: String,
    pub upload_date: String,
    pub num_chunks: u32,
}

impl Document {
    /// Calendar day of the upload, or the raw value when the backend sent
    /// something that isn't ISO-8601.
    pub fn upload_day(&self) -> String {
        if let Ok(date) = DateTime::parse_from_rfc3339(&self.upload_date) {
            return date.format("%Y-%m-%d").to_string();
        }

        if let Ok(date) = NaiveDateTime::parse_from_str(&self.upload_date, "%Y-%m-%dT%H:%M:%S%.f")
        {
            return date.format("%Y-%m-%d").to_string();
        }

        return self.upload_date.to_string();
    }

    pub fn summary(&self) -> String {
        return format!("{} chunks • {}", self.num_chunks, self.upload_day());
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum FileType {
    Pdf,
    Docx,
    Txt,
    Md,
}

impl FileType {
    pub fn from_path(file_path: &path::Path) -> Option<FileType> {
        let ext = file_path.extension()?.to_str()?.to_lowercase();
        return FileType::iter().find(|file_type| return file_type.to_string() == ext);
    }

    pub fn mime(&self) -> &'static str {
        match self {
            FileType::Pdf => return "application/pdf",
            FileType::Docx => {
                return "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            FileType::Txt => return "text/plain",
            FileType::Md => return "text/markdown",
        }
    }

    pub fn accepted() -> String {
        return FileType::iter()
            .map(|file_type| return file_type.to_string().to_uppercase())
            .collect::<Vec<String>>()
            .join(" · ");
    }
}

/// A file that passed client side validation and may be sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentUpload {
    pub path: path::PathBuf,
    pub filename: String,
    pub file_type: FileType,
}

impl DocumentUpload {
    pub fn from_path(file_path: &path::Path) -> Result<DocumentUpload> {
        let filename = match file_path.file_name() {
            Some(name) => name.to_string_lossy().to_string(),
            None => bail!("No file selected"),
        };

        let file_type = match FileType::from_path(file_path) {
            Some(file_type) => file_type,
            None => bail!(format!(
                "Unsupported file type for {filename}. Accepted types are {}",
                FileType::accepted()
            )),
        };

        if !file_path.is_file() {
            bail!(format!("File {} does not exist", file_path.display()));
        }

        return Ok(DocumentUpload {
            path: file_path.to_path_buf(),
            filename,
            file_type,
        });
    }

    /// Parses the argument of `/upload`. Only a single file is accepted.
    pub fn from_args(args: &[String]) -> Result<DocumentUpload> {
        let paths = args
            .iter()
            .map(|e| return e.trim())
            .filter(|e| return !e.is_empty())
            .collect::<Vec<&str>>();

        if paths.is_empty() {
            bail!("You must pass a file path to upload.");
        }

        let joined = paths.join(" ");
        let joined_path = path::PathBuf::from(&joined);
        if paths.len() > 1 && !joined_path.exists() {
            bail!("Only one file can be uploaded at a time.");
        }

        return DocumentUpload::from_path(&joined_path);
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub chunks: Option<u32>,
}
