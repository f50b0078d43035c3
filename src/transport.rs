//! Synchronous transport seam between the catalog client and an HTTP
//! implementation. The client only ever needs `GET url -> (status, headers,
//! body)`; pooling, TLS and redirects stay on the transport's side of the
//! line.

use http::{HeaderMap, StatusCode};

use crate::error::TransportError;

/// A completed HTTP exchange, body fully read.
#[derive(Debug)]
pub struct HttpResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
        HttpResponse {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Blocking HTTP GET. Implementations must be safe to share across
/// concurrently running watch loops.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> Result<HttpResponse, TransportError>;
}

#[cfg(feature = "reqwest-transport")]
pub use self::reqwest_transport::ReqwestTransport;

#[cfg(feature = "reqwest-transport")]
mod reqwest_transport {
    use super::{HttpResponse, Transport, TransportError};

    /// Default transport over `reqwest::blocking`.
    ///
    /// The bundled client is built without a request timeout: a blocking
    /// query's deadline is the `wait` duration the server was given, and the
    /// call is expected to hang until then.
    pub struct ReqwestTransport {
        client: reqwest::blocking::Client,
    }

    impl ReqwestTransport {
        pub fn new() -> Result<Self, TransportError> {
            let client = reqwest::blocking::Client::builder()
                .timeout(None)
                .build()
                .map_err(TransportError::new)?;
            Ok(ReqwestTransport { client })
        }

        /// Wrap a pre-configured client. Callers setting their own request
        /// timeout must keep it above the wait durations they intend to use.
        pub fn with_client(client: reqwest::blocking::Client) -> Self {
            ReqwestTransport { client }
        }
    }

    impl Transport for ReqwestTransport {
        fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
            let resp = self.client.get(url).send().map_err(TransportError::new)?;
            let status = resp.status();
            let headers = resp.headers().clone();
            let body = resp.bytes().map_err(TransportError::new)?.to_vec();
            Ok(HttpResponse::new(status, headers, body))
        }
    }
}
