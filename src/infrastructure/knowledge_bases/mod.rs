pub mod http;

use std::sync::Arc;

use crate::domain::models::KnowledgeBaseBox;

pub struct KnowledgeBaseManager {}

impl KnowledgeBaseManager {
    pub fn get() -> KnowledgeBaseBox {
        return Arc::new(http::HttpKnowledgeBase::default());
    }
}
