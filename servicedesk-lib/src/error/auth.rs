//! Session error types

/// Errors raised while obtaining a session token.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No session is available; the user has to log in first.
    #[error("Not logged in")]
    NotLoggedIn,

    /// The stored token is no longer accepted.
    #[error("Session expired: {message}")]
    Expired { message: String },

    /// The token could not be loaded from the session store.
    #[error("Session store error: {0}")]
    Store(String),
}
