//! End-to-end tests for the proxy relay and static fallback.

use std::time::Duration;

use devserve::routing::ProxyTable;

mod common;

const CSV_RESPONSE: &str = "HTTP/1.1 200 OK\r\nContent-Type: text/csv\r\nX-Custom: yes\r\nContent-Length: 8\r\nConnection: close\r\n\r\na,b\n1,2\n";

#[tokio::test]
async fn test_proxy_forwards_and_relays_verbatim() {
    let (upstream_addr, mut requests) = common::start_recording_upstream(CSV_RESPONSE).await;

    let static_dir = common::temp_static_dir("verbatim");
    let table = ProxyTable::from_pairs([(format!("http://{}", upstream_addr).as_str(), "DATA")]);
    let addr = common::start_server(common::test_config(static_dir, table)).await;

    let response = reqwest::get(format!("http://{}/DATA/file.csv", addr))
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "text/csv");
    assert_eq!(response.headers()["x-custom"], "yes");
    assert_eq!(response.text().await.unwrap(), "a,b\n1,2\n");

    // The upstream saw exactly the rewritten path.
    let line = requests.recv().await.unwrap();
    assert_eq!(line, "GET /file.csv HTTP/1.1");
}

#[tokio::test]
async fn test_prefix_alone_hits_upstream_root() {
    let (upstream_addr, mut requests) = common::start_recording_upstream(CSV_RESPONSE).await;

    let static_dir = common::temp_static_dir("root");
    let table = ProxyTable::from_pairs([(format!("http://{}", upstream_addr).as_str(), "DATA")]);
    let addr = common::start_server(common::test_config(static_dir, table)).await;

    let response = reqwest::get(format!("http://{}/DATA", addr)).await.unwrap();
    assert_eq!(response.status(), 200);

    let line = requests.recv().await.unwrap();
    assert_eq!(line, "GET / HTTP/1.1");
}

#[tokio::test]
async fn test_no_match_serves_static_untouched() {
    let (upstream_addr, mut requests) = common::start_recording_upstream(CSV_RESPONSE).await;

    let static_dir = common::temp_static_dir("static");
    std::fs::write(static_dir.join("readme.txt"), "hello from disk\n").unwrap();
    let table = ProxyTable::from_pairs([(format!("http://{}", upstream_addr).as_str(), "DATA")]);
    let addr = common::start_server(common::test_config(static_dir, table)).await;

    let response = reqwest::get(format!("http://{}/readme.txt", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "hello from disk\n");

    // The router never touched the upstream.
    assert!(requests.try_recv().is_err());
}

#[tokio::test]
async fn test_empty_table_everything_static() {
    let static_dir = common::temp_static_dir("empty-table");
    std::fs::write(static_dir.join("DATA"), "a real file\n").unwrap();
    let addr = common::start_server(common::test_config(static_dir, ProxyTable::new())).await;

    let response = reqwest::get(format!("http://{}/DATA", addr)).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "a real file\n");
}

#[tokio::test]
async fn test_prefix_shadows_same_named_file() {
    let (upstream_addr, _requests) = common::start_recording_upstream(CSV_RESPONSE).await;

    let static_dir = common::temp_static_dir("shadow");
    std::fs::write(static_dir.join("DATA"), "a real file\n").unwrap();
    let table = ProxyTable::from_pairs([(format!("http://{}", upstream_addr).as_str(), "DATA")]);
    let addr = common::start_server(common::test_config(static_dir, table)).await;

    // The prefix wins over the file of the same name.
    let response = reqwest::get(format!("http://{}/DATA", addr)).await.unwrap();
    assert_eq!(response.headers()["content-type"], "text/csv");
    assert_eq!(response.text().await.unwrap(), "a,b\n1,2\n");
}

#[tokio::test]
async fn test_unreachable_upstream_is_502_and_server_survives() {
    // Bind and drop a listener to obtain a port with nothing behind it.
    let closed = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let closed_addr = closed.local_addr().unwrap();
    drop(closed);

    let static_dir = common::temp_static_dir("refused");
    std::fs::write(static_dir.join("readme.txt"), "still alive\n").unwrap();
    let table = ProxyTable::from_pairs([(format!("http://{}", closed_addr).as_str(), "DATA")]);
    let addr = common::start_server(common::test_config(static_dir, table)).await;

    let response = reqwest::get(format!("http://{}/DATA/missing.csv", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), 502);

    // An unrelated request on another connection still succeeds.
    let response = reqwest::get(format!("http://{}/readme.txt", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "still alive\n");
}

#[tokio::test]
async fn test_hung_upstream_times_out_with_504() {
    let upstream_addr = common::start_black_hole_upstream().await;

    let static_dir = common::temp_static_dir("timeout");
    let table = ProxyTable::from_pairs([(format!("http://{}", upstream_addr).as_str(), "DATA")]);
    let mut config = common::test_config(static_dir, table);
    config.upstream_timeout = Some(Duration::from_millis(300));
    let addr = common::start_server(config).await;

    let response = reqwest::get(format!("http://{}/DATA/slow", addr))
        .await
        .unwrap();
    assert_eq!(response.status(), 504);
}

#[tokio::test]
async fn test_non_get_method_not_proxied() {
    let (upstream_addr, mut requests) = common::start_recording_upstream(CSV_RESPONSE).await;

    let static_dir = common::temp_static_dir("non-get");
    let table = ProxyTable::from_pairs([(format!("http://{}", upstream_addr).as_str(), "DATA")]);
    let addr = common::start_server(common::test_config(static_dir, table)).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{}/DATA/file.csv", addr))
        .body("ignored")
        .send()
        .await
        .unwrap();

    // The static handler answers with its own method handling; the
    // upstream is never contacted.
    assert!(response.status().is_client_error());
    assert!(requests.try_recv().is_err());
}

#[tokio::test]
async fn test_query_string_forwarded() {
    let (upstream_addr, mut requests) = common::start_recording_upstream(CSV_RESPONSE).await;

    let static_dir = common::temp_static_dir("query");
    let table = ProxyTable::from_pairs([(format!("http://{}", upstream_addr).as_str(), "DATA")]);
    let addr = common::start_server(common::test_config(static_dir, table)).await;

    reqwest::get(format!("http://{}/DATA/file.csv?sep=comma", addr))
        .await
        .unwrap();

    let line = requests.recv().await.unwrap();
    assert_eq!(line, "GET /file.csv?sep=comma HTTP/1.1");
}
