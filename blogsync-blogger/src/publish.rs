use crate::types::{Blog, NewComment, NewPost, PostPage, PostQuery, RemoteComment, RemotePost};
use async_trait::async_trait;
use blogsync_common::Result;

/// Remote CRUD over posts and comments of one blog.
///
/// The import run only needs listing and creation; the rest backs the
/// maintenance commands. Every call is awaited to completion before the
/// next one is issued.
#[async_trait]
pub trait PublishClient: Send + Sync {
    /// Blogs owned by the signed-in user.
    async fn list_blogs(&self) -> Result<Vec<Blog>>;

    /// One page of the post feed.
    async fn list_posts(&self, query: &PostQuery) -> Result<PostPage>;

    async fn create_post(&self, post: &NewPost) -> Result<RemotePost>;

    /// Replace the title of an existing post, keeping everything else.
    async fn update_post_title(&self, post: &RemotePost, title: &str) -> Result<RemotePost>;

    /// Delete a post through its edit reference.
    async fn delete_post(&self, edit_url: &str) -> Result<()>;

    async fn list_comments(&self, post_id: &str) -> Result<Vec<RemoteComment>>;

    /// Failures surface as `SyncError::CommentCreate`.
    async fn create_comment(&self, post_id: &str, comment: &NewComment) -> Result<RemoteComment>;

    async fn delete_comment(&self, post_id: &str, comment_id: &str) -> Result<()>;
}
