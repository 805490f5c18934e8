pub mod command;
pub mod conversation;

pub use conversation::Conversation;
