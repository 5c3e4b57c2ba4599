#[cfg(test)]
#[path = "message_test.rs"]
mod tests;

use chrono::DateTime;
use chrono::Local;
use uuid::Uuid;

use super::Author;
use super::Source;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MessageType {
    Normal,
    Error,
}

#[derive(Clone, Debug)]
pub struct Message {
    pub id: String,
    pub author: Author,
    pub text: String,
    pub sources: Vec<Source>,
    pub timestamp: DateTime<Local>,
    mtype: MessageType,
}

impl Message {
    pub fn new(author: Author, text: &str) -> Message {
        return Message::new_with_type(author, MessageType::Normal, text);
    }

    pub fn new_with_type(author: Author, mtype: MessageType, text: &str) -> Message {
        return Message {
            id: Uuid::new_v4().to_string(),
            author,
            text: text.to_string().replace('\t', "  "),
            sources: vec![],
            timestamp: Local::now(),
            mtype,
        };
    }

    pub fn new_with_sources(author: Author, text: &str, sources: Vec<Source>) -> Message {
        let mut msg = Message::new(author, text);
        msg.sources = sources;
        return msg;
    }

    pub fn message_type(&self) -> MessageType {
        return self.mtype;
    }

    pub fn is_error(&self) -> bool {
        return self.message_type() == MessageType::Error;
    }
}
