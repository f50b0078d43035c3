//! Typed catalog operations. Each endpoint declares the payload shape its
//! responses decode into; nothing is inferred from response content.

use crate::client::Client;
use crate::error::CatalogError;
use crate::types::{Node, QueryOptions, QueryResponse, Services};
use crate::watch::Watch;

/// Which catalog sub-resource a query addresses. The selector fixes both the
/// request path and the payload shape of the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    /// `/v1/catalog/datacenters` — ordered list of datacenter names.
    Datacenters,
    /// `/v1/catalog/services` — map of service name to declared tags.
    Services,
    /// `/v1/catalog/service/<name>` — ordered list of nodes providing a
    /// service.
    ServiceNodes(&'a str),
}

impl Endpoint<'_> {
    pub(crate) fn segments(&self) -> [&str; 2] {
        match *self {
            Endpoint::Datacenters => ["datacenters", ""],
            Endpoint::Services => ["services", ""],
            Endpoint::ServiceNodes(name) => ["service", name],
        }
    }
}

impl Client {
    /// Known datacenter names, in server order.
    pub fn datacenters(&self) -> Result<QueryResponse<Vec<String>>, CatalogError> {
        self.datacenters_with_options(&QueryOptions::default())
    }

    pub fn datacenters_with_options(
        &self,
        opts: &QueryOptions,
    ) -> Result<QueryResponse<Vec<String>>, CatalogError> {
        self.query(&Endpoint::Datacenters, opts)
    }

    /// All registered services and their tags.
    pub fn services(&self) -> Result<QueryResponse<Services>, CatalogError> {
        self.services_with_options(&QueryOptions::default())
    }

    pub fn services_with_options(
        &self,
        opts: &QueryOptions,
    ) -> Result<QueryResponse<Services>, CatalogError> {
        self.query(&Endpoint::Services, opts)
    }

    /// Nodes providing `service`, exactly in server order. Callers scanning
    /// for a preferred node can rely on the ordering being untouched.
    pub fn service_nodes(&self, service: &str) -> Result<QueryResponse<Vec<Node>>, CatalogError> {
        self.service_nodes_with_options(service, &QueryOptions::default())
    }

    pub fn service_nodes_with_options(
        &self,
        service: &str,
        opts: &QueryOptions,
    ) -> Result<QueryResponse<Vec<Node>>, CatalogError> {
        self.query(&Endpoint::ServiceNodes(service), opts)
    }

    /// Watch the datacenter list for changes. `opts.wait_index` seeds the
    /// watch, so a caller can resume from a previously observed index;
    /// `opts.wait_time` caps each long poll.
    pub fn watch_datacenters(
        &self,
        opts: QueryOptions,
    ) -> Watch<Vec<String>, impl FnMut(u64) -> Result<QueryResponse<Vec<String>>, CatalogError> + '_>
    {
        let start = opts.wait_index;
        let mut opts = opts;
        Watch::new(move |index| {
            opts.wait_index = index;
            self.query(&Endpoint::Datacenters, &opts)
        })
        .from_index(start)
    }

    /// Watch the service map for changes.
    pub fn watch_services(
        &self,
        opts: QueryOptions,
    ) -> Watch<Services, impl FnMut(u64) -> Result<QueryResponse<Services>, CatalogError> + '_>
    {
        let start = opts.wait_index;
        let mut opts = opts;
        Watch::new(move |index| {
            opts.wait_index = index;
            self.query(&Endpoint::Services, &opts)
        })
        .from_index(start)
    }

    /// Watch the node list of one service for changes. A 404 is a watchable
    /// state here: the watch reports the service's absence and keeps
    /// waiting for it to appear.
    pub fn watch_service_nodes<'a>(
        &'a self,
        service: &str,
        opts: QueryOptions,
    ) -> Watch<Vec<Node>, impl FnMut(u64) -> Result<QueryResponse<Vec<Node>>, CatalogError> + 'a>
    {
        let service = service.to_string();
        let start = opts.wait_index;
        let mut opts = opts;
        Watch::new(move |index| {
            opts.wait_index = index;
            self.query(&Endpoint::ServiceNodes(&service), &opts)
        })
        .from_index(start)
    }
}
