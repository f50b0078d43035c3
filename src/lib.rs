//! Blocking-query client for the Consul catalog HTTP API.
//!
//! The catalog can hold a query open until the queried resource changes past
//! a caller-supplied index, which turns change detection into a long poll
//! instead of a busy loop. This crate wraps that protocol: it builds the
//! `index`/`wait` query parameters, splits responses three ways (absent but
//! valid, data, protocol error), extracts the `X-Consul-Index` freshness
//! header from every response, and composes the pieces into a [`Watch`] loop.
//!
//! ```no_run
//! use consul_catalog::{Client, Config, QueryOptions};
//! use std::time::Duration;
//!
//! # fn main() -> Result<(), consul_catalog::CatalogError> {
//! let client = Client::new(Config::default())?;
//!
//! let dcs = client.datacenters()?;
//! println!("datacenters at index {}: {:?}", dcs.meta.modify_index, dcs.body);
//!
//! let mut watch = client.watch_service_nodes(
//!     "web",
//!     QueryOptions {
//!         wait_time: Some(Duration::from_secs(30)),
//!         ..Default::default()
//!     },
//! );
//! while let Some(event) = watch.next_change()? {
//!     match event.payload {
//!         Some(nodes) => println!("web has {} nodes at index {}", nodes.len(), event.index),
//!         None => println!("web is not registered (index {})", event.index),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod transport;
pub mod types;
pub mod watch;

pub use api::Endpoint;
pub use client::{Client, Config};
pub use error::{CatalogError, TransportError};
#[cfg(feature = "reqwest-transport")]
pub use transport::ReqwestTransport;
pub use transport::{HttpResponse, Transport};
pub use types::{Node, QueryMeta, QueryOptions, QueryResponse, Services};
pub use watch::{Watch, WatchEvent};
