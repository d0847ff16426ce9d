//! Publish Client for the hosted blog service.
//!
//! [`BloggerApi`] talks to the Blogger REST resources (blogs, posts,
//! comments) and implements [`PublishClient`], the seam the import driver
//! programs against. Types mirror the service's JSON payloads.
pub mod auth;
pub mod client;
pub mod publish;
pub mod types;

pub use auth::Credential;
pub use client::BloggerApi;
pub use publish::PublishClient;
pub use types::{
    Author, Blog, NewComment, NewPost, PostPage, PostQuery, RemoteComment, RemotePost,
    RemotePostSummary, post_number,
};
