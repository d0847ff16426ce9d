//! Thin wrapper around the Blogger REST resources with blogsync defaults.
//!
//! Handles login, blog selection and request shaping before delegating to the
//! shared HTTP client. No call is retried unless the caller configures a
//! retry budget.
use crate::auth::{Credential, client_login};
use crate::publish::PublishClient;
use crate::types::{
    Blog, BlogList, CommentList, NewComment, NewPost, PostList, PostPage, PostQuery,
    RemoteComment, RemotePost,
};
use async_trait::async_trait;
use blogsync_common::{Result, SyncError};
use blogsync_http::{HttpClient, HttpError, RequestOpts};
use std::borrow::Cow;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/blogger/v3/";
pub const DEFAULT_LOGIN_URL: &str = "https://www.google.com/accounts/ClientLogin";
pub const DEFAULT_SOURCE: &str = "blogsync-0.1";

#[derive(Clone)]
pub struct BloggerApi {
    http: HttpClient,
    login_url: String,
    source: String,
    credential: Option<Credential>,
    blog_id: Option<String>,
}

impl BloggerApi {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = HttpClient::new(base_url).map_err(|e| SyncError::Config(e.to_string()))?;
        Ok(Self {
            http,
            login_url: DEFAULT_LOGIN_URL.to_string(),
            source: DEFAULT_SOURCE.to_string(),
            credential: None,
            blog_id: None,
        })
    }

    pub fn with_login_url(mut self, url: &str) -> Self {
        self.login_url = url.to_string();
        self
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = source.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.http = self.http.with_timeout(timeout);
        self
    }

    pub fn with_retries(mut self, n: usize) -> Self {
        self.http = self.http.with_retries(n);
        self
    }

    /// Use a pre-issued OAuth access token instead of a password login.
    pub fn with_access_token(mut self, token: &str) -> Self {
        self.credential = Some(Credential::Bearer(token.to_string()));
        self
    }

    pub fn with_blog_id(mut self, blog_id: &str) -> Self {
        self.blog_id = Some(blog_id.to_string());
        self
    }

    /// Sign in with email and password. Any failure is an [`SyncError::Auth`].
    pub async fn login(&mut self, email: &str, password: &str) -> Result<()> {
        let cred = client_login(&self.http, &self.login_url, &self.source, email, password).await?;
        self.credential = Some(cred);
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential.is_some()
    }

    /// Pick the first blog of the signed-in user unless one was configured.
    pub async fn resolve_blog_id(&mut self) -> Result<&str> {
        if self.blog_id.is_none() {
            let blogs = self.list_blogs().await?;
            let first = blogs
                .into_iter()
                .next()
                .ok_or_else(|| SyncError::Config("account has no blogs".into()))?;
            tracing::info!(
                target: "blogger",
                blog_id = %first.id,
                blog_name = first.name.as_deref().unwrap_or("-"),
                "blogger.blog.selected"
            );
            self.blog_id = Some(first.id);
        }
        self.blog_id()
    }

    pub fn blog_id(&self) -> Result<&str> {
        self.blog_id
            .as_deref()
            .ok_or_else(|| SyncError::Config("no blog selected".into()))
    }

    fn opts(&self) -> Result<RequestOpts<'_>> {
        let cred = self
            .credential
            .as_ref()
            .ok_or_else(|| SyncError::Auth("not logged in".into()))?;
        Ok(RequestOpts {
            auth: Some(cred.as_auth()?),
            ..Default::default()
        })
    }

    fn posts_path(&self) -> Result<String> {
        Ok(format!("blogs/{}/posts", self.blog_id()?))
    }

    fn comments_path(&self, post_id: &str) -> Result<String> {
        Ok(format!("blogs/{}/posts/{}/comments", self.blog_id()?, post_id))
    }
}

fn remote(e: HttpError) -> SyncError {
    match e.status().map(|s| s.as_u16()) {
        Some(401) => SyncError::Auth(e.to_string()),
        _ => SyncError::RemoteCall(e.to_string()),
    }
}

#[async_trait]
impl PublishClient for BloggerApi {
    async fn list_blogs(&self) -> Result<Vec<Blog>> {
        let list: BlogList = self
            .http
            .get_json("users/self/blogs", self.opts()?)
            .await
            .map_err(remote)?;
        Ok(list.items.unwrap_or_default())
    }

    async fn list_posts(&self, query: &PostQuery) -> Result<PostPage> {
        let mut params: Vec<(&str, Cow<'_, str>)> =
            vec![("maxResults", query.max_results.to_string().into())];
        if let Some(tok) = &query.page_token {
            params.push(("pageToken", tok.as_str().into()));
        }
        if let Some(start) = &query.start_date {
            params.push(("startDate", start.as_str().into()));
        }
        if let Some(end) = &query.end_date {
            params.push(("endDate", end.as_str().into()));
        }

        let path = self.posts_path()?;
        let list: PostList = self
            .http
            .get_json(
                &path,
                RequestOpts {
                    query: Some(params),
                    ..self.opts()?
                },
            )
            .await
            .map_err(remote)?;

        let page = PostPage::from(list);
        tracing::debug!(
            target: "blogger",
            count = page.posts.len(),
            has_next = page.next_page_token.is_some(),
            "blogger.posts.page"
        );
        Ok(page)
    }

    async fn create_post(&self, post: &NewPost) -> Result<RemotePost> {
        let path = self.posts_path()?;
        let created: RemotePost = self
            .http
            .post_json(&path, post, self.opts()?)
            .await
            .map_err(remote)?;
        tracing::debug!(target: "blogger", post_id = %created.id, "blogger.post.created");
        Ok(created)
    }

    async fn update_post_title(&self, post: &RemotePost, title: &str) -> Result<RemotePost> {
        let mut updated = post.clone();
        updated.title = Some(title.to_string());
        let (path, allow_absolute) = match &post.self_link {
            Some(link) => (link.clone(), true),
            None => (format!("{}/{}", self.posts_path()?, post.id), false),
        };
        self.http
            .put_json(
                &path,
                &updated,
                RequestOpts {
                    allow_absolute,
                    ..self.opts()?
                },
            )
            .await
            .map_err(remote)
    }

    async fn delete_post(&self, edit_url: &str) -> Result<()> {
        self.http
            .delete(
                edit_url,
                RequestOpts {
                    allow_absolute: true,
                    ..self.opts()?
                },
            )
            .await
            .map_err(remote)
    }

    async fn list_comments(&self, post_id: &str) -> Result<Vec<RemoteComment>> {
        let path = self.comments_path(post_id)?;
        let list: CommentList = self
            .http
            .get_json(&path, self.opts()?)
            .await
            .map_err(remote)?;
        Ok(list.items.unwrap_or_default())
    }

    async fn create_comment(&self, post_id: &str, comment: &NewComment) -> Result<RemoteComment> {
        let path = self
            .comments_path(post_id)
            .map_err(|e| SyncError::CommentCreate(e.to_string()))?;
        tracing::debug!(target: "blogger", %path, "blogger.comment.create");
        self.http
            .post_json(&path, comment, self.opts()?)
            .await
            .map_err(|e| SyncError::CommentCreate(e.to_string()))
    }

    async fn delete_comment(&self, post_id: &str, comment_id: &str) -> Result<()> {
        let path = format!("{}/{}", self.comments_path(post_id)?, comment_id);
        self.http
            .delete(&path, self.opts()?)
            .await
            .map_err(remote)
    }
}
