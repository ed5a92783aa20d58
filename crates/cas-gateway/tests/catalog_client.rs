//! CatalogClient against a mocked catalog.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cas_core::{FetchError, Policy};
use cas_gateway::catalog::{CatalogClient, MediaCatalog};

fn client() -> CatalogClient {
    CatalogClient::new(Duration::from_millis(500), Duration::from_millis(200)).unwrap()
}

fn endpoint(server: &MockServer) -> String {
    server.address().to_string()
}

#[tokio::test]
async fn fetches_and_decodes_descriptor() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "encodings": [
                {"uri": "http://cdn/a.mpd", "metaId": "m", "encodingProfileId": "p",
                 "drmId": "6", "status": 1, "created": 1, "updated": 2}
            ],
            "attributes": {"title": "A"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let media = client().fetch("abc", &endpoint(&server)).await.unwrap();
    assert_eq!(media.encodings.len(), 1);
    assert_eq!(media.encodings[0].uri, "http://cdn/a.mpd");
    assert_eq!(media.attributes["title"].as_str(), Some("A"));
}

#[tokio::test]
async fn odd_attributes_do_not_block_authorization() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/sparse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "encodings": [
                {"uri": "http://cdn/five.mpd", "drmId": "5"},
                {"uri": "http://cdn/six.mpd", "drmId": "6"}
            ],
            "attributes": {"title": "A", "rating": null, "tags": ["x"], "views": u64::MAX}
        })))
        .mount(&server)
        .await;

    let media = client().fetch("sparse", &endpoint(&server)).await.unwrap();
    assert!(media.attributes["rating"].is_null());
    let picked = Policy::default().select(&media.encodings).unwrap();
    assert_eq!(picked.uri, "http://cdn/six.mpd");
}

#[tokio::test]
async fn non_200_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Try again later"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client().fetch("missing", &endpoint(&server)).await.unwrap_err();
    assert_eq!(err, FetchError::Status { status: 404 });
}

#[tokio::test]
async fn other_success_codes_are_errors_too() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let err = client().fetch("x", &endpoint(&server)).await.unwrap_err();
    assert_eq!(err, FetchError::Status { status: 204 });
}

#[tokio::test]
async fn malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/bad"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let err = client().fetch("bad", &endpoint(&server)).await.unwrap_err();
    assert_eq!(err.kind(), "decode");
}

#[tokio::test]
async fn refused_connection_is_network_error() {
    let server = MockServer::start().await;
    let addr = endpoint(&server);
    drop(server);

    let err = client().fetch("abc", &addr).await.unwrap_err();
    assert_eq!(err.kind(), "network");
}

#[tokio::test]
async fn slow_catalog_hits_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"encodings": []}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let started = std::time::Instant::now();
    let err = client().fetch("slow", &endpoint(&server)).await.unwrap_err();
    assert_eq!(err.kind(), "network");
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn content_id_is_percent_encoded_on_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/media/a%20b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"encodings": []})))
        .expect(1)
        .mount(&server)
        .await;

    let media = client().fetch("a b", &endpoint(&server)).await.unwrap();
    assert!(media.encodings.is_empty());
}
