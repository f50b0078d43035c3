//! End-to-end tests against a mock agent, exercising the bundled reqwest
//! transport. Fixtures mirror real catalog responses, including the
//! `ServiceTags: null` shape Consul emits for untagged services.

use std::time::Duration;

use consul_catalog::{CatalogError, Client, Config, QueryOptions};
use httpmock::prelude::*;

const CONSUL_NODE: &str = r#"[{
    "Node": "localhost",
    "Address": "127.0.0.1",
    "ServiceID": "consul",
    "ServiceName": "consul",
    "ServiceTags": null,
    "ServicePort": 8000
}]"#;

fn client_for(server: &MockServer) -> Client {
    Client::new(Config {
        address: server.base_url(),
        ..Config::default()
    })
    .unwrap()
}

#[test]
fn datacenters_round_trip() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/v1/catalog/datacenters");
        then.status(200)
            .header("X-Consul-Index", "1")
            .body(r#"["dc1", "dc2"]"#);
    });

    let resp = client_for(&server).datacenters().unwrap();

    mock.assert();
    assert_eq!(resp.meta.modify_index, 1);
    assert_eq!(resp.body.unwrap(), vec!["dc1", "dc2"]);
}

#[test]
fn missing_service_is_valid_empty() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/catalog/service/foobar");
        then.status(404).header("X-Consul-Index", "1");
    });

    let resp = client_for(&server).service_nodes("foobar").unwrap();

    assert!(resp.is_empty());
    assert_eq!(resp.meta.modify_index, 1);
}

#[test]
fn service_nodes_decode_null_tags() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/catalog/service/consul");
        then.status(200)
            .header("X-Consul-Index", "1")
            .body(CONSUL_NODE);
    });

    let resp = client_for(&server).service_nodes("consul").unwrap();

    let nodes = resp.body.unwrap();
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].node, "localhost");
    assert_eq!(nodes[0].service_name, "consul");
    assert!(nodes[0].service_tags.is_empty());
    assert_eq!(nodes[0].service_port, 8000);
}

#[test]
fn services_decode_as_tag_map() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/catalog/services");
        then.status(200)
            .header("X-Consul-Index", "12")
            .body(r#"{"consul": [], "web": ["primary", "v1"]}"#);
    });

    let resp = client_for(&server).services().unwrap();

    let services = resp.body.unwrap();
    assert_eq!(resp.meta.modify_index, 12);
    assert_eq!(services["consul"], Vec::<String>::new());
    assert_eq!(services["web"], vec!["primary", "v1"]);
}

#[test]
fn blocking_parameters_reach_the_wire() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/catalog/service/web")
            .query_param("dc", "dc2")
            .query_param("index", "42")
            .query_param("wait", "30000ms");
        then.status(200).header("X-Consul-Index", "43").body("[]");
    });

    let client = Client::new(Config {
        address: server.base_url(),
        datacenter: Some("dc1".to_string()),
        wait_time: None,
    })
    .unwrap();
    let resp = client
        .service_nodes_with_options(
            "web",
            &QueryOptions {
                datacenter: Some("dc2".to_string()),
                wait_index: 42,
                wait_time: Some(Duration::from_secs(30)),
            },
        )
        .unwrap();

    mock.assert();
    assert_eq!(resp.meta.modify_index, 43);
}

#[test]
fn unexpected_status_is_a_protocol_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/catalog/datacenters");
        then.status(500)
            .header("X-Consul-Index", "1")
            .body("internal error");
    });

    let err = client_for(&server).datacenters().unwrap_err();

    assert!(matches!(err, CatalogError::UnexpectedStatus(s) if s.as_u16() == 500));
}

#[test]
fn response_without_index_header_is_rejected() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/v1/catalog/datacenters");
        then.status(200).body(r#"["dc1"]"#);
    });

    let err = client_for(&server).datacenters().unwrap_err();

    assert!(matches!(err, CatalogError::InvalidIndexHeader(_)));
}

#[test]
fn watch_observes_an_index_advance() {
    let server = MockServer::start();
    let mut first = server.mock(|when, then| {
        when.method(GET).path("/v1/catalog/datacenters");
        then.status(200)
            .header("X-Consul-Index", "1")
            .body(r#"["dc1"]"#);
    });

    let client = client_for(&server);
    let mut watch = client.watch_datacenters(QueryOptions::default());

    let event = watch.next_change().unwrap().unwrap();
    assert_eq!(event.index, 1);
    assert_eq!(event.payload.unwrap(), vec!["dc1"]);

    first.delete();
    let second = server.mock(|when, then| {
        when.method(GET)
            .path("/v1/catalog/datacenters")
            .query_param("index", "1");
        then.status(200)
            .header("X-Consul-Index", "2")
            .body(r#"["dc1", "dc2"]"#);
    });

    let event = watch.next_change().unwrap().unwrap();
    second.assert();
    assert_eq!(event.index, 2);
    assert_eq!(event.payload.unwrap(), vec!["dc1", "dc2"]);
    assert_eq!(watch.last_index(), 2);
}
