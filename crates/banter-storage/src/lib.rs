//! The single persistence seam for the client layer.
//!
//! Every component that needs the shared key-value entries (the HTTP
//! wrapper reading the token, the session store persisting it) goes through
//! one injected [`Storage`] handle instead of touching the medium directly.

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Well-known keys shared across layers.
pub mod keys {
    /// Bearer credential string.
    pub const TOKEN: &str = "token";
    /// Serialized user profile.
    pub const USER: &str = "user";
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage contains invalid data: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Read/write/clear contract over string keys. Last writer wins; no
/// locking beyond what an implementation needs for its own consistency.
pub trait Storage: Send + Sync {
    fn read(&self, key: &str) -> Option<String>;
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
    fn clear(&self) -> Result<(), StorageError>;
}
