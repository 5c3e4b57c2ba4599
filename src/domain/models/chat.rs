use serde_derive::Deserialize;
use serde_derive::Serialize;

/// A citation returned by the backend alongside an answer.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub source_number: u32,
    pub filename: String,
    pub chunk_index: u32,
    pub content_preview: String,
}

impl Source {
    pub fn title(&self) -> String {
        return format!(
            "[{}] {} (chunk {})",
            self.source_number, self.filename, self.chunk_index
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatPrompt {
    pub question: String,
    pub num_sources: usize,
    /// Id of the user message this prompt answers. Never sent to the backend.
    #[serde(skip)]
    pub request_id: String,
}

impl ChatPrompt {
    pub fn new(question: &str, num_sources: usize) -> ChatPrompt {
        return ChatPrompt {
            question: question.to_string(),
            num_sources,
            request_id: String::new(),
        };
    }

    pub fn with_request_id(mut self, request_id: &str) -> ChatPrompt {
        self.request_id = request_id.to_string();
        return self;
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<Source>,
}

/// One persisted question/answer pair from `GET /chat/history`. The backend
/// does not promise a shape, so everything falls back to defaults.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub answer: String,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub timestamp: Option<String>,
}
