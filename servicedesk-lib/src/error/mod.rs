//! Error types

mod api;
mod auth;
mod config;

pub use api::*;
pub use auth::*;
pub use config::*;

/// Top-level error returned by the client and the grid controller.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The transport failed: non-success status, network failure or an
    /// undecodable body.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The session store could not produce a token.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The grid was configured inconsistently.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The grid runtime task has shut down and no longer accepts commands.
    #[error("Grid runtime is closed")]
    RuntimeClosed,
}

impl Error {
    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(api) => api.status_code(),
            _ => None,
        }
    }

    /// Returns `true` if this error came from the transport.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Api(_) | Self::Auth(_))
    }
}
