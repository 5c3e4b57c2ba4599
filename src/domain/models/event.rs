use tui_textarea::Input;

use super::Document;
use super::HistoryEntry;
use super::QueryResponse;
use super::UploadReceipt;

pub enum Event {
    ChatAnswered(String, QueryResponse),
    ChatFailed(String, String),
    ChatHistoryLoaded(Vec<HistoryEntry>),
    ChatHistoryFailed(String),
    DocumentDeleted(i64),
    DocumentDeleteFailed(i64, String),
    DocumentUploaded(String, UploadReceipt),
    DocumentUploadFailed(String, String),
    DocumentsLoaded(Vec<Document>),
    DocumentsFailed(String),
    KeyboardCharInput(Input),
    KeyboardCTRLC(),
    KeyboardCTRLL(),
    KeyboardEnter(),
    KeyboardPaste(String),
    UIScrollDown(),
    UIScrollUp(),
    UIScrollPageDown(),
    UIScrollPageUp(),
    UITick(),
}
