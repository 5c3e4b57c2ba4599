use super::ChatPrompt;
use super::DocumentUpload;

pub enum Action {
    ChatAbort(),
    ChatHistory(usize),
    ChatQuery(ChatPrompt),
    DocumentDelete(i64),
    DocumentUpload(DocumentUpload),
    DocumentsRefresh(),
}
