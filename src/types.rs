use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

/// A node providing a service, as returned by `/v1/catalog/service/<name>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Node {
    pub node: String,
    pub address: String,
    #[serde(rename = "ServiceID")]
    pub service_id: String,
    pub service_name: String,
    // Consul serializes an untagged service as `"ServiceTags": null`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub service_tags: Vec<String>,
    pub service_port: i32,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Service name to declared tags, as returned by `/v1/catalog/services`.
/// Key order carries no meaning.
pub type Services = HashMap<String, Vec<String>>;

/// Per-call query tuning. `wait_index` of 0 asks for the current state
/// immediately; a non-zero value long-polls until the endpoint's index moves
/// past it or the wait time elapses.
#[derive(Debug, Clone, Default)]
pub struct QueryOptions {
    /// Overrides the client's configured datacenter for this call.
    pub datacenter: Option<String>,
    pub wait_index: u64,
    /// Overrides the client's configured wait time. Only sent when
    /// `wait_index > 0`.
    pub wait_time: Option<Duration>,
}

/// Freshness marker attached to every catalog response, including 404s.
/// Non-decreasing per endpoint from the server's perspective; unrelated
/// catalog writes may bump it without changing this endpoint's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueryMeta {
    pub modify_index: u64,
}

/// Outcome of a single catalog query.
///
/// `body` is `None` when the server answered 404: the resource legitimately
/// does not exist right now, and `meta.modify_index` is still a valid index
/// to keep watching from.
#[derive(Debug, Clone)]
pub struct QueryResponse<T> {
    pub meta: QueryMeta,
    pub body: Option<T>,
}

impl<T> QueryResponse<T> {
    pub fn is_empty(&self) -> bool {
        self.body.is_none()
    }
}
