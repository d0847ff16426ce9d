use crate::date::comparable_timestamp;
use blogsync_blogger::{PostQuery, PublishClient, RemotePostSummary};
use blogsync_common::Result;
use std::collections::HashSet;
use std::time::Duration;

/// Knobs for one import run.
#[derive(Debug, Clone)]
pub struct ImportSettings {
    /// Author name put on every created post.
    pub author_name: String,
    /// Posts requested per feed page.
    pub page_size: u32,
    /// Hard ceiling on feed pages fetched for the duplicate check. Posts
    /// beyond `page_size * max_pages` are not considered.
    pub max_pages: u32,
    /// Pause after each successfully created comment.
    pub comment_delay: Duration,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            author_name: "Blog Import".to_string(),
            page_size: 100,
            max_pages: 10,
            comment_delay: Duration::from_secs(160),
        }
    }
}

/// State shared by every record of one run: the publish client and the
/// snapshot of posts that already exist remotely.
///
/// Built once with [`ImportSession::open`] and dropped when the run ends.
pub struct ImportSession<'c, C: PublishClient + ?Sized> {
    client: &'c C,
    settings: ImportSettings,
    existing: Vec<RemotePostSummary>,
}

impl<'c, C: PublishClient + ?Sized> ImportSession<'c, C> {
    /// Fetch the remote feed and keep it for duplicate detection.
    pub async fn open(client: &'c C, settings: ImportSettings) -> Result<Self> {
        let mut existing = Vec::new();
        let mut seen = HashSet::new();
        let mut query = PostQuery {
            max_results: settings.page_size,
            ..Default::default()
        };

        let mut pages = 0;
        let mut more = false;
        while pages < settings.max_pages {
            let page = client.list_posts(&query).await?;
            pages += 1;
            for post in &page.posts {
                if seen.insert(post.id.clone()) {
                    existing.push(post.summary());
                }
            }
            match page.next_page_token {
                Some(token) => {
                    more = true;
                    query.page_token = Some(token);
                }
                None => {
                    more = false;
                    break;
                }
            }
        }

        if more {
            tracing::warn!(
                pages,
                posts = existing.len(),
                "import.feed.truncated: older posts are not checked for duplicates"
            );
        }
        tracing::info!(pages, posts = existing.len(), "import.feed.fetched");

        Ok(Self {
            client,
            settings,
            existing,
        })
    }

    pub fn client(&self) -> &'c C {
        self.client
    }

    pub fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    pub fn existing(&self) -> &[RemotePostSummary] {
        &self.existing
    }

    /// First remote post, in feed order, with the same title and the same
    /// published instant as `published` (a normalized UTC timestamp).
    pub fn find_existing(&self, title: &str, published: &str) -> Option<&RemotePostSummary> {
        let wanted = comparable_timestamp(published);
        self.existing
            .iter()
            .find(|s| s.title == title && comparable_timestamp(&s.published) == wanted)
    }
}
