use http::StatusCode;
use thiserror::Error;

/// Failure raised by a [`Transport`](crate::transport::Transport)
/// implementation when the HTTP exchange itself did not complete.
#[derive(Debug, Error)]
#[error("transport error: {0}")]
pub struct TransportError(#[source] pub Box<dyn std::error::Error + Send + Sync>);

impl TransportError {
    pub fn new<E>(source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        TransportError(source.into())
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The underlying HTTP exchange failed (connection refused, timeout,
    /// DNS). Never retried by the client itself.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The `X-Consul-Index` header was missing or not an unsigned decimal.
    /// Fatal for the query regardless of status code: without an index the
    /// caller cannot continue watching safely.
    #[error("invalid X-Consul-Index header: {0}")]
    InvalidIndexHeader(String),

    /// The server answered with a status other than 200 or 404.
    #[error("unexpected response status: {0}")]
    UnexpectedStatus(StatusCode),

    /// The response body did not match the shape expected for the endpoint.
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}
