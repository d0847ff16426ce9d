use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blog {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BlogList {
    #[serde(default)]
    pub items: Option<Vec<Blog>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Author {
    pub fn named(name: &str) -> Self {
        Self {
            display_name: Some(name.to_string()),
        }
    }
}

/// A post as returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePost {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
    /// Public permalink.
    #[serde(default)]
    pub url: Option<String>,
    /// Edit reference used for updates and deletes.
    #[serde(default)]
    pub self_link: Option<String>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub labels: Option<Vec<String>>,
}

impl RemotePost {
    /// Read-only view used for duplicate detection.
    pub fn summary(&self) -> RemotePostSummary {
        RemotePostSummary {
            id: self.id.clone(),
            title: self.title.clone().unwrap_or_default(),
            published: self.published.clone().unwrap_or_default(),
            url: self.url.clone().unwrap_or_default(),
            edit_url: self.self_link.clone().unwrap_or_default(),
        }
    }
}

/// Just enough of a remote post to decide whether a record was already imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePostSummary {
    pub id: String,
    pub title: String,
    pub published: String,
    pub url: String,
    pub edit_url: String,
}

impl RemotePostSummary {
    /// Numeric post identifier: the last `-`-delimited token of the id.
    ///
    /// Feed ids look like `tag:blogger.com,1999:blog-123.post-456`; plain
    /// numeric ids come back unchanged.
    ///
    /// ```
    /// use blogsync_blogger::RemotePostSummary;
    ///
    /// let s = RemotePostSummary {
    ///     id: "tag:blogger.com,1999:blog-123.post-456".into(),
    ///     title: String::new(),
    ///     published: String::new(),
    ///     url: String::new(),
    ///     edit_url: String::new(),
    /// };
    /// assert_eq!(s.post_number(), "456");
    /// ```
    pub fn post_number(&self) -> &str {
        post_number(&self.id)
    }
}

pub fn post_number(id: &str) -> &str {
    id.rsplit('-').next().unwrap_or(id)
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PostList {
    #[serde(default)]
    pub items: Option<Vec<RemotePost>>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// One page of the post feed.
#[derive(Debug, Clone, Default)]
pub struct PostPage {
    pub posts: Vec<RemotePost>,
    pub next_page_token: Option<String>,
}

impl From<PostList> for PostPage {
    fn from(list: PostList) -> Self {
        Self {
            posts: list.items.unwrap_or_default(),
            next_page_token: list.next_page_token,
        }
    }
}

/// Listing parameters for the post feed.
#[derive(Debug, Clone)]
pub struct PostQuery {
    pub max_results: u32,
    pub page_token: Option<String>,
    /// Inclusive lower bound (RFC 3339).
    pub start_date: Option<String>,
    /// Exclusive upper bound (RFC 3339).
    pub end_date: Option<String>,
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            max_results: 100,
            page_token: None,
            start_date: None,
            end_date: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewPost {
    pub kind: &'static str,
    pub title: String,
    pub content: String,
    pub author: Author,
    pub published: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

impl NewPost {
    pub fn new(title: &str, content: &str, author_name: &str, published: &str) -> Self {
        Self {
            kind: "blogger#post",
            title: title.to_string(),
            content: content.to_string(),
            author: Author::named(author_name),
            published: published.to_string(),
            labels: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: Option<&str>) -> Self {
        if let Some(l) = label.filter(|l| !l.is_empty()) {
            self.labels.push(l.to_string());
        }
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteComment {
    pub id: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub self_link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CommentList {
    #[serde(default)]
    pub items: Option<Vec<RemoteComment>>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewComment {
    pub kind: &'static str,
    pub content: String,
    pub author: Author,
    pub published: String,
}

impl NewComment {
    pub fn new(content: &str, author_name: &str, published: &str) -> Self {
        Self {
            kind: "blogger#comment",
            content: content.to_string(),
            author: Author::named(author_name),
            published: published.to_string(),
        }
    }
}
