//! HTTP access to the chat API: one configured client plus the stateless
//! domain services (auth, conversations, upload) that map each operation
//! to a single request/response round trip.

pub mod auth;
pub mod conversations;
pub mod error;
pub mod http;
pub mod upload;

pub use auth::AuthService;
pub use conversations::ConversationService;
pub use error::{ApiError, ErrorCode};
pub use http::{ApiClient, ClientConfig};
pub use upload::UploadService;
