//! Client-side reactive state: the session and chat store modules, the
//! application root that owns them, and the inactivity monitor.
//!
//! Stores follow one discipline: state changes only through declared
//! mutation functions, and asynchronous actions call a domain service
//! first, then commit mutations with the server-confirmed result.

pub mod app;
pub mod chat;
pub mod idle;
pub mod session;

pub use app::AppState;
pub use chat::ChatStore;
pub use idle::{Activity, IdleMonitor};
pub use session::SessionStore;
