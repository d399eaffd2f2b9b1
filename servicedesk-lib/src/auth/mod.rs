//! Session tokens

mod token;

pub use token::AccessToken;
pub use token::AuthScheme;
pub use token::NoAuth;
pub use token::StaticTokenProvider;
pub use token::TokenProvider;
