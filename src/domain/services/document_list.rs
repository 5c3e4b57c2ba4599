#[cfg(test)]
#[path = "document_list_test.rs"]
mod tests;

use std::collections::HashMap;

use crate::domain::models::Document;

/// Documents shown in the sidebar. Deletes are applied optimistically and a
/// refused delete puts the document back where it was.
#[derive(Default)]
pub struct DocumentList {
    documents: Vec<Document>,
    loading: bool,
    pending_deletes: HashMap<i64, (usize, Document)>,
}

impl DocumentList {
    pub fn documents(&self) -> &[Document] {
        return &self.documents;
    }

    pub fn len(&self) -> usize {
        return self.documents.len();
    }

    pub fn is_loading(&self) -> bool {
        return self.loading;
    }

    pub fn begin_refresh(&mut self) {
        self.loading = true;
    }

    pub fn replace(&mut self, documents: Vec<Document>) {
        self.documents = documents;
        self.loading = false;
    }

    pub fn refresh_failed(&mut self) {
        self.loading = false;
    }

    /// Resolves the 1-based position displayed next to each document.
    pub fn get_by_position(&self, position: usize) -> Option<&Document> {
        if position == 0 {
            return None;
        }

        return self.documents.get(position - 1);
    }

    pub fn remove_optimistic(&mut self, id: i64) -> bool {
        let idx = match self.documents.iter().position(|doc| return doc.id == id) {
            Some(idx) => idx,
            None => return false,
        };

        let removed = self.documents.remove(idx);
        self.pending_deletes.insert(id, (idx, removed));

        return true;
    }

    pub fn confirm_delete(&mut self, id: i64) {
        self.pending_deletes.remove(&id);
    }

    pub fn rollback_delete(&mut self, id: i64) {
        let (idx, document) = match self.pending_deletes.remove(&id) {
            Some(pending) => pending,
            None => return,
        };

        if self.documents.iter().any(|doc| return doc.id == id) {
            return;
        }

        tracing::debug!(id = id, "Restoring document after failed delete");
        let idx = idx.min(self.documents.len());
        self.documents.insert(idx, document);
    }
}
