#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use std::time::Instant;

use anyhow::Result;
use ratatui::prelude::Rect;
use tokio::sync::mpsc;

use super::actions::help_text;
use super::BubbleList;
use super::Conversation;
use super::DocumentList;
use super::Notifications;
use super::Scroll;
use super::Themes;
use super::UploadState;
use crate::domain::models::Action;
use crate::domain::models::Author;
use crate::domain::models::DocumentUpload;
use crate::domain::models::Event;
use crate::domain::models::HistoryEntry;
use crate::domain::models::KnowledgeBaseBox;
use crate::domain::models::Message;
use crate::domain::models::MessageType;
use crate::domain::models::Notification;
use crate::domain::models::SlashCommand;

fn format_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No questions have been asked yet.".to_string();
    }

    return entries
        .iter()
        .map(|entry| {
            let mut res = format!("- {}", entry.question);
            if let Some(timestamp) = &entry.timestamp {
                res = format!("{res} ({timestamp})");
            }
            return res;
        })
        .collect::<Vec<String>>()
        .join("\n");
}

pub struct AppState {
    pub bubble_list: BubbleList,
    pub conversation: Conversation,
    pub documents: DocumentList,
    pub history_limit: usize,
    pub last_known_height: u16,
    pub last_known_width: u16,
    pub notifications: Notifications,
    pub num_sources: usize,
    pub scroll: Scroll,
    pub upload: UploadState,
}

impl AppState {
    pub fn new(
        theme_name: &str,
        theme_file: &str,
        num_sources: usize,
        history_limit: usize,
    ) -> Result<AppState> {
        let theme = Themes::get(theme_name, theme_file)?;

        return Ok(AppState {
            bubble_list: BubbleList::new(theme),
            conversation: Conversation::default(),
            documents: DocumentList::default(),
            history_limit,
            last_known_height: 0,
            last_known_width: 0,
            notifications: Notifications::default(),
            num_sources,
            scroll: Scroll::default(),
            upload: UploadState::default(),
        });
    }

    /// Warns in the chat when the service can't be reached. The UI still
    /// starts so documents can be retried with `/documents`.
    pub async fn health_check(&mut self, kb: &KnowledgeBaseBox, api_url: &str) {
        if let Err(err) = kb.health_check().await {
            tracing::error!(error = ?err, api_url = api_url, "Health check failed");
            self.add_message(Message::new_with_type(
                Author::KBChat,
                MessageType::Error,
                &format!("Hey, it looks like the knowledge base at {api_url} isn't running, I can't connect to it. Double check it's up, then run /documents to try again.\n\nError: {err}"),
            ));
        }
    }

    pub fn refresh_documents(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        self.documents.begin_refresh();
        tx.send(Action::DocumentsRefresh())?;
        return Ok(());
    }

    /// Returns `(should_break, should_continue)`. `should_continue` is true
    /// when the input was a command and must not be sent as a question.
    pub fn handle_slash_commands(
        &mut self,
        input_str: &str,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<(bool, bool)> {
        let command = match SlashCommand::parse(input_str) {
            Some(command) => command,
            None => return Ok((false, false)),
        };

        if command.is_quit() {
            return Ok((true, false));
        }

        if command.is_help() {
            self.add_message(Message::new(Author::KBChat, &help_text()));
        } else if command.is_clear() {
            self.clear();
        } else if command.is_documents() {
            self.refresh_documents(tx)?;
        } else if command.is_upload() {
            self.upload_document(&command, tx)?;
        } else if command.is_delete() {
            self.delete_document(&command, tx)?;
        } else if command.is_history() {
            match command.number_arg() {
                Ok(limit) => {
                    tx.send(Action::ChatHistory(limit.unwrap_or(self.history_limit)))?;
                }
                Err(err) => self.add_error(&err.to_string()),
            }
        } else if command.is_sources() {
            match command.number_arg() {
                Ok(Some(num_sources)) => {
                    self.num_sources = num_sources;
                    self.add_message(Message::new(
                        Author::KBChat,
                        &format!("Answers will now cite up to {num_sources} sources."),
                    ));
                }
                Ok(None) => self.add_error("You must pass a number of sources, such as `/sources 3`."),
                Err(err) => self.add_error(&err.to_string()),
            }
        }

        return Ok((false, true));
    }

    /// Sends a question unless the input is blank or an answer is pending.
    pub fn submit_question(
        &mut self,
        input_str: &str,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<bool> {
        let prompt = match self.conversation.submit(input_str, self.num_sources) {
            Some(prompt) => prompt,
            None => return Ok(false),
        };

        self.sync_dependants();
        self.scroll.last();
        tx.send(Action::ChatQuery(prompt))?;

        return Ok(true);
    }

    /// Cancels a pending question. Returns false when there was nothing to
    /// cancel.
    pub fn abort(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<bool> {
        if !self.conversation.is_loading() {
            return Ok(false);
        }

        tx.send(Action::ChatAbort())?;
        self.conversation.abort();
        self.sync_dependants();
        self.scroll.last();

        return Ok(true);
    }

    pub fn clear(&mut self) {
        self.conversation.clear();
        self.scroll = Scroll::default();
        self.sync_dependants();
    }

    fn upload_document(
        &mut self,
        command: &SlashCommand,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<()> {
        let upload = match DocumentUpload::from_args(&command.args) {
            Ok(upload) => upload,
            Err(err) => {
                self.add_error(&err.to_string());
                return Ok(());
            }
        };

        if let Err(err) = self.upload.begin(&upload.filename) {
            self.add_error(&err.to_string());
            return Ok(());
        }

        tx.send(Action::DocumentUpload(upload))?;
        return Ok(());
    }

    fn delete_document(
        &mut self,
        command: &SlashCommand,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<()> {
        let position = match command.number_arg() {
            Ok(Some(position)) => position,
            Ok(None) => {
                self.add_error("You must pass the number of a document from the sidebar, such as `/delete 1`.");
                return Ok(());
            }
            Err(err) => {
                self.add_error(&err.to_string());
                return Ok(());
            }
        };

        let id = match self.documents.get_by_position(position) {
            Some(document) => document.id,
            None => {
                self.add_error(&format!(
                    "{position} is not a valid number from the documents list."
                ));
                return Ok(());
            }
        };

        if self.documents.remove_optimistic(id) {
            tx.send(Action::DocumentDelete(id))?;
        }

        return Ok(());
    }

    /// Applies the result of a request made by `ActionsService`.
    pub fn handle_event(&mut self, event: Event, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        match event {
            Event::ChatAnswered(request_id, response) => {
                self.conversation.receive_answer(&request_id, response);
                self.sync_dependants();
                self.scroll.last();
            }
            Event::ChatFailed(request_id, detail) => {
                if self.conversation.receive_failure(&request_id, &detail) {
                    self.notifications
                        .push(Notification::error("Failed to get a response"));
                }
                self.sync_dependants();
                self.scroll.last();
            }
            Event::ChatHistoryLoaded(entries) => {
                self.add_message(Message::new(Author::KBChat, &format_history(&entries)));
            }
            Event::ChatHistoryFailed(detail) => {
                self.add_error(&detail);
            }
            Event::DocumentsLoaded(documents) => {
                self.documents.replace(documents);
            }
            Event::DocumentsFailed(_) => {
                self.documents.refresh_failed();
                self.notifications
                    .push(Notification::error("Failed to load documents"));
            }
            Event::DocumentDeleted(id) => {
                self.documents.confirm_delete(id);
                self.notifications.push(Notification::success("Document deleted"));
            }
            Event::DocumentDeleteFailed(id, _) => {
                self.documents.rollback_delete(id);
                self.notifications
                    .push(Notification::error("Failed to delete document"));
            }
            Event::DocumentUploaded(filename, _) => {
                self.upload.succeed(&filename);
                self.notifications.push(Notification::success(&format!(
                    "\"{filename}\" uploaded successfully"
                )));
                self.refresh_documents(tx)?;
            }
            Event::DocumentUploadFailed(_, detail) => {
                self.upload.fail(&detail);
                self.notifications.push(Notification::error(&detail));
            }
            _ => (),
        }

        return Ok(());
    }

    pub fn tick(&mut self, now: Instant) {
        self.upload.tick(now);
        self.notifications.tick(now);
    }

    pub fn set_rect(&mut self, rect: Rect) {
        self.last_known_width = rect.width;
        self.last_known_height = rect.height;
        self.sync_dependants();
    }

    pub fn add_message(&mut self, message: Message) {
        self.conversation.push_notice(message);
        self.sync_dependants();
        self.scroll.last();
    }

    fn add_error(&mut self, text: &str) {
        self.add_message(Message::new_with_type(
            Author::KBChat,
            MessageType::Error,
            text,
        ));
    }

    fn sync_dependants(&mut self) {
        self.bubble_list
            .set_messages(self.conversation.messages(), self.last_known_width.into());

        self.scroll.set_state(
            self.bubble_list.len().try_into().unwrap_or(u16::MAX),
            self.last_known_height,
        );
    }
}
