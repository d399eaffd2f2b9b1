//! Web API access

pub mod query;
mod transport;

pub use transport::ResourceTransport;
pub use transport::Transport;
