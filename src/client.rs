use std::time::Duration;

use http::{HeaderMap, StatusCode};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::api::Endpoint;
use crate::error::CatalogError;
use crate::transport::{HttpResponse, Transport};
use crate::types::{QueryMeta, QueryOptions, QueryResponse};

pub(crate) const INDEX_HEADER: &str = "X-Consul-Index";

const QUERY_ENCODE: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'#').add(b'<').add(b'>');
const SEGMENT_ENCODE: &AsciiSet = &QUERY_ENCODE
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%');

/// Client configuration, fixed at construction time.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Consul agent, scheme included.
    pub address: String,
    /// Datacenter sent as `dc` on every query unless overridden per call.
    /// `None` leaves the agent's own datacenter in charge.
    pub datacenter: Option<String>,
    /// Default cap on how long the server may hold a blocking query open.
    pub wait_time: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            address: "http://127.0.0.1:8500".to_string(),
            datacenter: None,
            wait_time: None,
        }
    }
}

/// Read-only client for the catalog endpoints. Holds no state between calls
/// beyond its configuration, so one instance can serve any number of
/// concurrent watch loops.
pub struct Client {
    config: Config,
    transport: Box<dyn Transport>,
}

impl Client {
    /// Client over the bundled reqwest transport.
    #[cfg(feature = "reqwest-transport")]
    pub fn new(config: Config) -> Result<Self, CatalogError> {
        let transport = crate::transport::ReqwestTransport::new()?;
        Ok(Self::with_transport(config, transport))
    }

    pub fn with_transport<T: Transport + 'static>(config: Config, transport: T) -> Self {
        Client {
            config,
            transport: Box::new(transport),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// One blocking query against `endpoint`, decoded into the payload type
    /// that endpoint is declared to return.
    pub(crate) fn query<T>(
        &self,
        endpoint: &Endpoint<'_>,
        opts: &QueryOptions,
    ) -> Result<QueryResponse<T>, CatalogError>
    where
        T: DeserializeOwned,
    {
        let url = self.request_url(endpoint, opts);
        trace!(%url, "issuing catalog query");
        let resp = self.transport.get(&url)?;
        classify(resp)
    }

    fn request_url(&self, endpoint: &Endpoint<'_>, opts: &QueryOptions) -> String {
        let dc = opts
            .datacenter
            .as_deref()
            .or(self.config.datacenter.as_deref());
        let wait = opts.wait_time.or(self.config.wait_time);
        build_url(&self.config.address, endpoint, dc, opts.wait_index, wait)
    }
}

/// Three-way split on the response status. 404 is not an error here: the
/// catalog uses it for "legitimately absent, keep watching from this index",
/// which is why the index header is demanded before the status is looked at.
fn classify<T>(resp: HttpResponse) -> Result<QueryResponse<T>, CatalogError>
where
    T: DeserializeOwned,
{
    let meta = QueryMeta {
        modify_index: parse_index(resp.headers())?,
    };
    match resp.status() {
        StatusCode::NOT_FOUND => {
            debug!(index = meta.modify_index, "resource absent");
            Ok(QueryResponse { meta, body: None })
        }
        StatusCode::OK => {
            let body = serde_json::from_slice(resp.body())?;
            Ok(QueryResponse {
                meta,
                body: Some(body),
            })
        }
        status => Err(CatalogError::UnexpectedStatus(status)),
    }
}

fn parse_index(headers: &HeaderMap) -> Result<u64, CatalogError> {
    let value = headers
        .get(INDEX_HEADER)
        .ok_or_else(|| CatalogError::InvalidIndexHeader("missing".to_string()))?;
    let text = value
        .to_str()
        .map_err(|_| CatalogError::InvalidIndexHeader("non-ascii value".to_string()))?;
    text.parse::<u64>()
        .map_err(|_| CatalogError::InvalidIndexHeader(text.to_string()))
}

/// Pure request-target builder. Empty path segments are skipped, so an empty
/// resource name never produces a doubled separator.
fn build_url(
    address: &str,
    endpoint: &Endpoint<'_>,
    dc: Option<&str>,
    wait_index: u64,
    wait_time: Option<Duration>,
) -> String {
    let mut url = String::new();
    url.push_str(address.trim_end_matches('/'));
    url.push_str("/v1/catalog");
    for segment in endpoint.segments() {
        if segment.is_empty() {
            continue;
        }
        url.push('/');
        url.push_str(&utf8_percent_encode(segment, SEGMENT_ENCODE).to_string());
    }
    let mut first = true;
    let mut push_param = |url: &mut String, key: &str, value: &str| {
        url.push(if first { '?' } else { '&' });
        first = false;
        url.push_str(key);
        url.push('=');
        url.push_str(&utf8_percent_encode(value, QUERY_ENCODE).to_string());
    };
    if let Some(dc) = dc.filter(|dc| !dc.is_empty()) {
        push_param(&mut url, "dc", dc);
    }
    if wait_index > 0 {
        push_param(&mut url, "index", &wait_index.to_string());
        // The wait cap only means anything alongside a wait index; an
        // index-0 query returns immediately no matter what.
        if let Some(wait) = wait_time {
            push_param(&mut url, "wait", &format!("{}ms", wait.as_millis()));
        }
    }
    url
}
