use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use reqhelper::{call, Error, Parsed, Parser, RequestConfig, ReqwestExecutor};

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
struct Item {
    id: u64,
    name: String,
}

fn executor() -> ReqwestExecutor {
    ReqwestExecutor::with_default_timeout().unwrap()
}

#[tokio::test]
async fn test_get_with_query_pairs() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("limit", "2"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"items": []})))
        .expect(1)
        .mount(&server)
        .await;

    let config = RequestConfig::new()
        .with_query_pair("limit", "2")
        .with_query_pair("offset", "0");
    let result = call(&executor(), &format!("{}/items", server.uri()), config)
        .await
        .unwrap();

    assert_eq!(result, Some(Parsed::Json(serde_json::json!({"items": []}))));
}

#[tokio::test]
async fn test_query_values_are_percent_encoded() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "rust & http"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let config = RequestConfig::get().with_query_pair("q", "rust & http");
    let result = call(&executor(), &format!("{}/search", server.uri()), config)
        .await
        .unwrap();

    assert_eq!(result, Some(Parsed::Json(serde_json::json!([]))));
}

#[tokio::test]
async fn test_text_query_is_appended_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .and(query_param("sort", "name"))
        .and(query_param("page", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"page": 3})))
        .mount(&server)
        .await;

    let config = RequestConfig::get().with_query("sort=name&page=3");
    call(&executor(), &format!("{}/items", server.uri()), config)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), Some("sort=name&page=3"));
}

#[tokio::test]
async fn test_post_serializes_body() {
    let server = MockServer::start().await;

    let created = Item {
        id: 7,
        name: "x".to_string(),
    };

    Mock::given(method("POST"))
        .and(path("/items"))
        .and(body_string(r#"{"name":"x"}"#))
        .respond_with(ResponseTemplate::new(201).set_body_json(&created))
        .expect(1)
        .mount(&server)
        .await;

    let config = RequestConfig::post()
        .with_body(serde_json::json!({"name": "x"}))
        .unwrap();
    let result = call(&executor(), &format!("{}/items", server.uri()), config)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(result.deserialize::<Item>().unwrap(), created);
}

#[tokio::test]
async fn test_text_body_is_sent_unchanged() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/notes/1"))
        .and(body_string("name=x; raw"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let config = RequestConfig::put()
        .with_text_body("name=x; raw")
        .parser(Parser::Text);
    let result = call(&executor(), &format!("{}/notes/1", server.uri()), config)
        .await
        .unwrap();

    assert_eq!(result, Some(Parsed::Text(String::new())));
}

#[tokio::test]
async fn test_headers_pass_through() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/items/1"))
        .and(header("Authorization", "Bearer token"))
        .and(header("X-Client", "reqhelper"))
        .respond_with(ResponseTemplate::new(200).set_body_string("deleted"))
        .expect(1)
        .mount(&server)
        .await;

    let executor = executor().with_default_header("X-Client", "reqhelper");
    let config = RequestConfig::delete()
        .with_header("Authorization", "Bearer token")
        .parser(Parser::Text);
    let result = call(&executor, &format!("{}/items/1", server.uri()), config)
        .await
        .unwrap();

    assert_eq!(result, Some(Parsed::Text("deleted".to_string())));
}

#[tokio::test]
async fn test_not_found_suppressed_calls_on_error_once() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items/999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": "Not found"
        })))
        .mount(&server)
        .await;

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let config = RequestConfig::get()
        .throw_error(false)
        .on_error(move |response| sink.lock().unwrap().push(response.status));

    let result = call(&executor(), &format!("{}/items/999", server.uri()), config)
        .await
        .unwrap();

    assert_eq!(result, None);
    assert_eq!(*seen.lock().unwrap(), vec![404]);
}

#[tokio::test]
async fn test_server_error_is_returned_as_response() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let err = call(
        &executor(),
        &format!("{}/broken", server.uri()),
        RequestConfig::get(),
    )
    .await
    .unwrap_err();

    let response = err.into_response().unwrap();
    assert_eq!(response.status, 503);
    assert_eq!(response.status_text, "Service Unavailable");
    assert_eq!(response.text(), "maintenance");
}

#[tokio::test]
async fn test_malformed_json_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    let config = RequestConfig::get().throw_error(false);
    let result = call(&executor(), &format!("{}/html", server.uri()), config).await;

    assert!(matches!(result, Err(Error::Decode(_))));
}

#[tokio::test]
async fn test_relative_address_uses_base_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let executor = executor()
        .with_base_url(&format!("{}/v1/", server.uri()))
        .unwrap();
    let result = call(&executor, "status", RequestConfig::get()).await.unwrap();

    assert_eq!(result, Some(Parsed::Json(serde_json::json!({"ok": true}))));
}

#[tokio::test]
async fn test_per_request_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"ok": true}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let config = RequestConfig::get().with_timeout(Duration::from_millis(50));
    let result = call(&executor(), &format!("{}/slow", server.uri()), config).await;

    assert!(matches!(result, Err(Error::Transport { .. })));
}
