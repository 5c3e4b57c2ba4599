mod action;
mod api_error;
mod author;
mod chat;
mod document;
mod event;
mod knowledge_base;
mod loading;
mod message;
mod notification;
mod slash_commands;
mod textarea;

pub use action::*;
pub use api_error::*;
pub use author::*;
pub use chat::*;
pub use document::*;
pub use event::*;
pub use knowledge_base::*;
pub use loading::*;
pub use message::*;
pub use notification::*;
pub use slash_commands::*;
pub use textarea::*;
