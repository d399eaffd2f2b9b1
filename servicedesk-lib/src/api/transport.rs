//! The fetch seam between the grid and the network.

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::query::QueryParams;
use crate::error::Error;
use crate::model::Row;
use crate::ServiceDeskClient;

/// Executes one GET for a grid and returns the decoded rows.
///
/// Implementations make a single attempt. Non-success statuses, network
/// failures and undecodable bodies are all errors; the grid never retries.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches the rows matching `params`.
    async fn fetch(&self, params: &QueryParams) -> Result<Vec<Row>, Error>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn fetch(&self, params: &QueryParams) -> Result<Vec<Row>, Error> {
        (**self).fetch(params).await
    }
}

/// A [`Transport`] for one collection endpoint of the API.
///
/// Created with [`ServiceDeskClient::resource`].
#[derive(Clone)]
pub struct ResourceTransport {
    client: ServiceDeskClient,
    path: String,
}

impl ResourceTransport {
    pub(crate) fn new(client: ServiceDeskClient, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
        }
    }

    /// Returns the endpoint path relative to the client's base URL.
    pub fn path(&self) -> &str {
        &self.path
    }
}

#[async_trait]
impl Transport for ResourceTransport {
    async fn fetch(&self, params: &QueryParams) -> Result<Vec<Row>, Error> {
        self.client.get_rows(&self.path, params).await
    }
}
