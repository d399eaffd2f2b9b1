//! Main ServiceDeskClient

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use reqwest::Client;
use reqwest::header::ACCEPT;
use reqwest::header::AUTHORIZATION;
use url::Url;

use crate::api::ResourceTransport;
use crate::api::query::QueryParams;
use crate::auth::NoAuth;
use crate::auth::TokenProvider;
use crate::error::ApiError;
use crate::error::Error;
use crate::model::Row;

/// HTTP client for the console's JSON API.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across grids.
///
/// # Example
///
/// ```ignore
/// use servicedesk_lib::{ServiceDeskClient, auth::StaticTokenProvider};
///
/// let client = ServiceDeskClient::builder()
///     .url("http://localhost:8000")
///     .token_provider(StaticTokenProvider::new("my-token"))
///     .build();
///
/// let tickets = client.resource("api/tickets/");
/// ```
#[derive(Clone)]
pub struct ServiceDeskClient {
    inner: Arc<ServiceDeskClientInner>,
}

struct ServiceDeskClientInner {
    base_url: String,
    token_provider: Arc<dyn TokenProvider>,
    http_client: Client,
    timeout: Option<Duration>,
}

impl ServiceDeskClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> ServiceDeskClientBuilder<Missing> {
        ServiceDeskClientBuilder::new()
    }

    /// Returns the base URL of the API.
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Returns a transport bound to one collection endpoint, e.g.
    /// `api/tickets/`.
    pub fn resource(&self, path: impl Into<String>) -> ResourceTransport {
        ResourceTransport::new(self.clone(), path)
    }

    /// Builds the absolute URL for an endpoint path with query parameters.
    pub fn endpoint_url(&self, path: &str, params: &QueryParams) -> Result<Url, ApiError> {
        let mut base = self.inner.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }
        let mut url = Url::parse(&base)?.join(path.trim_start_matches('/'))?;
        params.apply_to(&mut url);
        Ok(url)
    }

    /// Performs a GET and decodes the body as an array of rows.
    ///
    /// Single attempt. Any non-success status is an [`ApiError::Http`].
    pub async fn get_rows(&self, path: &str, params: &QueryParams) -> Result<Vec<Row>, Error> {
        let url = self.endpoint_url(path, params)?;

        let mut request = self
            .inner
            .http_client
            .get(url.clone())
            .header(ACCEPT, "application/json");

        if let Some(token) = self
            .inner
            .token_provider
            .get_token(&self.inner.base_url)
            .await?
        {
            request = request.header(AUTHORIZATION, token.header_value());
        }

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        debug!("GET {}", url);
        let response = request.send().await.map_err(ApiError::from)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                status.canonical_reason().unwrap_or_default().to_string()
            } else {
                body
            };
            return Err(Error::Api(ApiError::http(status.as_u16(), message)));
        }

        let body = response.text().await.map_err(ApiError::from)?;
        match serde_json::from_str::<Vec<Row>>(&body) {
            Ok(rows) => {
                debug!("GET {} -> {} rows", url, rows.len());
                Ok(rows)
            }
            Err(e) => Err(Error::Api(ApiError::parse_with_body(e.to_string(), body))),
        }
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`ServiceDeskClient`].
///
/// Uses the typestate pattern so that `build` is only available once the
/// base URL is set. Without a token provider, requests are sent
/// unauthenticated.
///
/// # Example
///
/// ```ignore
/// let client = ServiceDeskClient::builder()
///     .url("http://localhost:8000")
///     .timeout(Duration::from_secs(30))
///     .build();
/// ```
pub struct ServiceDeskClientBuilder<U> {
    url: U,
    token_provider: Arc<dyn TokenProvider>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl ServiceDeskClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            token_provider: Arc::new(NoAuth),
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the API base URL, e.g. `http://localhost:8000`.
    pub fn url(self, url: impl Into<String>) -> ServiceDeskClientBuilder<Set<String>> {
        ServiceDeskClientBuilder {
            url: Set(url.into()),
            token_provider: self.token_provider,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for ServiceDeskClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> ServiceDeskClientBuilder<U> {
    /// Sets the token provider used for the `Authorization` header.
    pub fn token_provider<T: TokenProvider + 'static>(mut self, provider: T) -> Self {
        self.token_provider = Arc::new(provider);
        self
    }

    /// Sets a shared token provider.
    pub fn shared_token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.token_provider = provider;
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl ServiceDeskClientBuilder<Set<String>> {
    /// Builds the [`ServiceDeskClient`].
    pub fn build(self) -> ServiceDeskClient {
        let http_client = self.http_client.unwrap_or_else(|| {
            let mut builder = Client::builder();
            if let Some(timeout) = self.connect_timeout {
                builder = builder.connect_timeout(timeout);
            }
            builder.build().expect("Failed to build HTTP client")
        });

        ServiceDeskClient {
            inner: Arc::new(ServiceDeskClientInner {
                base_url: self.url.0,
                token_provider: self.token_provider,
                http_client,
                timeout: self.timeout,
            }),
        }
    }
}
