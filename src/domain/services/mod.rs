pub mod actions;
mod app_state;
mod bubble;
mod bubble_list;
mod conversation;
mod document_list;
pub mod events;
mod notifications;
mod scroll;
mod syntaxes;
mod themes;
mod upload_state;

pub use app_state::*;
pub use bubble::*;
pub use bubble_list::*;
pub use conversation::*;
pub use document_list::*;
pub use notifications::*;
pub use scroll::*;
pub use syntaxes::*;
pub use themes::*;
pub use upload_state::*;
