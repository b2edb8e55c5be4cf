use serde::{Deserialize, Serialize};

/// Out-of-band session events.
///
/// The HTTP layer tears the session down on a 401 as a side effect, outside
/// the normal call/return path; subscribers (the app shell, ultimately the
/// login screen) learn about it through this signal rather than through the
/// error returned to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionSignal {
    /// The server rejected the credential; the token has been cleared.
    Expired,
    /// No user activity within the inactivity window.
    IdleTimeout,
}
