use blogsync_blogger::{BloggerApi, NewComment, NewPost, PostQuery, PublishClient};
use blogsync_common::SyncError;
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn logged_in(server: &MockServer) -> BloggerApi {
    Mock::given(method("POST"))
        .and(path("/accounts/ClientLogin"))
        .and(body_string_contains("service=blogger"))
        .respond_with(ResponseTemplate::new(200).set_body_string("SID=s\nLSID=l\nAuth=tok\n"))
        .mount(server)
        .await;

    let mut api = BloggerApi::new(&format!("{}/blogger/v3", server.uri()))
        .unwrap()
        .with_login_url(&format!("{}/accounts/ClientLogin", server.uri()))
        .with_blog_id("42");
    api.login("me@example.com", "pw").await.unwrap();
    api
}

#[tokio::test]
async fn login_failure_is_an_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/accounts/ClientLogin"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Error=BadAuthentication\n"))
        .mount(&server)
        .await;

    let mut api = BloggerApi::new(&server.uri())
        .unwrap()
        .with_login_url(&format!("{}/accounts/ClientLogin", server.uri()));
    let err = api.login("me@example.com", "wrong").await.unwrap_err();
    assert!(matches!(err, SyncError::Auth(ref m) if m.contains("BadAuthentication")));
    assert!(!api.is_authenticated());
}

#[tokio::test]
async fn calls_before_login_are_rejected() {
    let api = BloggerApi::new("http://127.0.0.1:9/").unwrap().with_blog_id("1");
    let err = api.list_posts(&PostQuery::default()).await.unwrap_err();
    assert!(matches!(err, SyncError::Auth(_)));
}

#[tokio::test]
async fn list_posts_pages_with_token() {
    let server = MockServer::start().await;
    let api = logged_in(&server).await;

    Mock::given(method("GET"))
        .and(path("/blogger/v3/blogs/42/posts"))
        .and(query_param("maxResults", "100"))
        .and(query_param("pageToken", "p2"))
        .and(header("authorization", "GoogleLogin auth=tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "7", "title": "Hello", "published": "2007-01-02T09:00:00Z"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = api
        .list_posts(&PostQuery {
            page_token: Some("p2".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(page.posts.len(), 1);
    assert_eq!(page.posts[0].summary().title, "Hello");
    assert!(page.next_page_token.is_none());
}

#[tokio::test]
async fn create_post_sends_title_author_date_and_label() {
    let server = MockServer::start().await;
    let api = logged_in(&server).await;

    Mock::given(method("POST"))
        .and(path("/blogger/v3/blogs/42/posts"))
        .and(body_partial_json(json!({
            "title": "Hello",
            "content": "Hi there",
            "published": "2007-01-02T09:00:00Z",
            "author": {"displayName": "Pontus"},
            "labels": ["misc"]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "tag:blogger.com,1999:blog-42.post-99",
            "title": "Hello",
            "selfLink": "https://example.invalid/blogs/42/posts/99"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let post = NewPost::new("Hello", "Hi there", "Pontus", "2007-01-02T09:00:00Z")
        .with_label(Some("misc"));
    let created = api.create_post(&post).await.unwrap();
    let summary = created.summary();
    assert_eq!(summary.post_number(), "99");
    assert_eq!(summary.edit_url, "https://example.invalid/blogs/42/posts/99");
}

#[tokio::test]
async fn create_post_failure_is_a_remote_call_error() {
    let server = MockServer::start().await;
    let api = logged_in(&server).await;

    Mock::given(method("POST"))
        .and(path("/blogger/v3/blogs/42/posts"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = api
        .create_post(&NewPost::new("t", "c", "a", "p"))
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::RemoteCall(_)));
}

#[tokio::test]
async fn comment_failure_is_a_comment_error() {
    let server = MockServer::start().await;
    let api = logged_in(&server).await;

    Mock::given(method("POST"))
        .and(path("/blogger/v3/blogs/42/posts/99/comments"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "comments disabled"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = api
        .create_comment("99", &NewComment::new("Nice post", "Jane", "2007-01-03T08:00:00Z"))
        .await
        .unwrap_err();
    assert!(matches!(err, SyncError::CommentCreate(ref m) if m.contains("comments disabled")));
}

#[tokio::test]
async fn delete_post_uses_edit_reference() {
    let server = MockServer::start().await;
    let api = logged_in(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/blogger/v3/blogs/42/posts/99"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let edit_url = format!("{}/blogger/v3/blogs/42/posts/99", server.uri());
    api.delete_post(&edit_url).await.unwrap();
}

#[tokio::test]
async fn resolve_blog_id_picks_first_blog() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/accounts/ClientLogin"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Auth=tok\n"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/self/blogs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "111", "name": "First"}, {"id": "222", "name": "Second"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut api = BloggerApi::new(&server.uri())
        .unwrap()
        .with_login_url(&format!("{}/accounts/ClientLogin", server.uri()));
    api.login("me@example.com", "pw").await.unwrap();
    assert_eq!(api.resolve_blog_id().await.unwrap(), "111");
    // cached afterwards
    assert_eq!(api.resolve_blog_id().await.unwrap(), "111");
}

#[tokio::test]
async fn access_token_skips_login() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blogs/5/posts/1/comments"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "c1", "content": "hi", "author": {"displayName": "Jane"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = BloggerApi::new(&server.uri())
        .unwrap()
        .with_access_token("abc")
        .with_blog_id("5");
    let comments = api.list_comments("1").await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].id, "c1");
}
