//! TokenProvider trait and AccessToken

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::error::AuthError;

/// Authorization header scheme used when sending the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    /// `Authorization: Token <key>` (REST framework token authentication).
    #[default]
    Token,
    /// `Authorization: Bearer <key>`.
    Bearer,
}

impl AuthScheme {
    fn prefix(self) -> &'static str {
        match self {
            AuthScheme::Token => "Token",
            AuthScheme::Bearer => "Bearer",
        }
    }
}

/// A session token issued by the console's login endpoint.
#[derive(Debug, Clone)]
pub struct AccessToken {
    /// The token key.
    pub access_token: String,
    /// How the token is presented to the API.
    pub scheme: AuthScheme,
    /// When the token expires, if known.
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Creates a new token using the default `Token` scheme.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            scheme: AuthScheme::default(),
            expires_at: None,
        }
    }

    /// Creates a new bearer token.
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            scheme: AuthScheme::Bearer,
            expires_at: None,
        }
    }

    /// Sets the expiration time.
    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Returns `true` if the token has expired.
    ///
    /// Returns `false` if expiration time is unknown.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Utc::now() >= exp)
    }

    /// Returns the value for the `Authorization` header.
    pub fn header_value(&self) -> String {
        format!("{} {}", self.scheme.prefix(), self.access_token)
    }
}

/// Source of session tokens for the HTTP client.
///
/// The session store itself (login form, persistence) lives outside this
/// crate. The client asks for a token before every request; returning
/// `Ok(None)` sends the request unauthenticated.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Gets the token for the API at `base_url`.
    async fn get_token(&self, base_url: &str) -> Result<Option<AccessToken>, AuthError>;
}

/// A provider that always returns the same token.
///
/// # Example
///
/// ```
/// use servicedesk_lib::auth::StaticTokenProvider;
///
/// let provider = StaticTokenProvider::new("0123456789abcdef");
/// ```
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: AccessToken,
}

impl StaticTokenProvider {
    /// Creates a provider for a `Token`-scheme key.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            token: AccessToken::new(access_token),
        }
    }

    /// Creates a provider from an existing token.
    pub fn from_token(token: AccessToken) -> Self {
        Self { token }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn get_token(&self, _base_url: &str) -> Result<Option<AccessToken>, AuthError> {
        if self.token.is_expired() {
            return Err(AuthError::Expired {
                message: "static token passed its expiry".to_string(),
            });
        }
        Ok(Some(self.token.clone()))
    }
}

/// A provider for APIs that need no authentication.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

#[async_trait]
impl TokenProvider for NoAuth {
    async fn get_token(&self, _base_url: &str) -> Result<Option<AccessToken>, AuthError> {
        Ok(None)
    }
}
