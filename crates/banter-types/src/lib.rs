pub mod api;
pub mod models;
pub mod signals;
pub mod validate;

pub use models::{Conversation, Message, MessageRole, Session, UserProfile};
pub use signals::SessionSignal;
