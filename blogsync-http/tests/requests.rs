use blogsync_http::{Auth, HttpClient, HttpError, RequestOpts};
use reqwest::header::{HeaderName, HeaderValue};
use serde::Deserialize;
use std::borrow::Cow;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Deserialize)]
struct Item {
    id: String,
}

#[tokio::test]
async fn get_json_sends_query_and_auth_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v3/items"))
        .and(query_param("maxResults", "100"))
        .and(header("authorization", "GoogleLogin auth=tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "7"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&format!("{}/v3", server.uri())).unwrap();
    let item: Item = client
        .get_json(
            "items",
            RequestOpts {
                auth: Some(Auth::Header {
                    name: HeaderName::from_static("authorization"),
                    value: HeaderValue::from_static("GoogleLogin auth=tok"),
                }),
                query: Some(vec![("maxResults", Cow::Borrowed("100"))]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(item.id, "7");
}

#[tokio::test]
async fn api_errors_carry_status_and_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(400).set_body_json(
            serde_json::json!({"error": {"code": 400, "message": "Invalid value"}}),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .post_json::<_, serde_json::Value>("items", &serde_json::json!({}), RequestOpts::default())
        .await
        .unwrap_err();
    match err {
        HttpError::Api { status, message, .. } => {
            assert_eq!(status.as_u16(), 400);
            assert_eq!(message, "Invalid value");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn server_errors_are_not_retried_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let err = client
        .get_json::<serde_json::Value>("flaky", RequestOpts::default())
        .await
        .unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(503));
}

#[tokio::test]
async fn retry_budget_is_honoured() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap().with_retries(1);
    let err = client
        .get_json::<serde_json::Value>("flaky", RequestOpts::default())
        .await
        .unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(500));
}

#[tokio::test]
async fn form_posts_are_url_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/accounts/ClientLogin"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("Email=me%40example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Auth=xyz\n"))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    let text = client
        .post_form_text(
            "accounts/ClientLogin",
            &[("Email", "me@example.com"), ("Passwd", "secret")],
            RequestOpts::default(),
        )
        .await
        .unwrap();
    assert_eq!(text, "Auth=xyz\n");
}

#[tokio::test]
async fn delete_ignores_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/items/9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpClient::new(&server.uri()).unwrap();
    client.delete("items/9", RequestOpts::default()).await.unwrap();
}
