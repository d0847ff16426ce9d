use anyhow::{Context, Result};
use blogsync_blogger::{BloggerApi, PostQuery, PublishClient, RemotePost};
use blogsync_config::ImportConfig;
use blogsync_import::{ImportSettings, run_import};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub async fn import(api: &BloggerApi, cfg: &ImportConfig, input: &Path, audit_log: &Path) -> Result<()> {
    let file = File::open(input).with_context(|| format!("opening {}", input.display()))?;
    let settings = ImportSettings {
        author_name: cfg.author_name.clone(),
        page_size: cfg.page_size,
        max_pages: cfg.max_pages,
        comment_delay: cfg.comment_delay(),
    };
    tracing::info!(
        input = %input.display(),
        audit_log = %audit_log.display(),
        "blogsync.import.start"
    );
    let report = run_import(api, settings, BufReader::new(file), audit_log).await?;
    println!(
        "created {} posts, {} already present, {} malformed; {} comments ({} failed)",
        report.created,
        report.skipped_existing,
        report.failed_records,
        report.comments_created,
        report.comments_failed
    );
    Ok(())
}

pub async fn list_blogs(api: &BloggerApi) -> Result<()> {
    for blog in api.list_blogs().await? {
        println!("{}", blog.name.as_deref().unwrap_or(&blog.id));
    }
    Ok(())
}

fn display_title(post: &RemotePost) -> &str {
    match post.title.as_deref() {
        Some(t) if !t.is_empty() => t,
        _ => "No Title",
    }
}

pub async fn list_posts(
    api: &BloggerApi,
    start_date: Option<String>,
    end_date: Option<String>,
) -> Result<()> {
    let mut query = PostQuery {
        start_date,
        end_date,
        ..Default::default()
    };
    loop {
        let page = api.list_posts(&query).await?;
        for post in &page.posts {
            println!("{}", display_title(post));
        }
        match page.next_page_token {
            Some(token) => query.page_token = Some(token),
            None => break,
        }
    }
    Ok(())
}

pub async fn list_comments(api: &BloggerApi, post_id: &str) -> Result<()> {
    for comment in api.list_comments(post_id).await? {
        let author = comment
            .author
            .as_ref()
            .and_then(|a| a.display_name.as_deref())
            .unwrap_or("anonymous");
        println!(
            "{author} {}",
            comment.published.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

pub async fn rename_post(api: &BloggerApi, post_id: &str, title: &str) -> Result<()> {
    let post = find_post(api, post_id).await?;
    let updated = api.update_post_title(&post, title).await?;
    tracing::info!(post_id, title = display_title(&updated), "blogsync.post.renamed");
    Ok(())
}

async fn find_post(api: &BloggerApi, post_id: &str) -> Result<RemotePost> {
    let mut query = PostQuery::default();
    loop {
        let page = api.list_posts(&query).await?;
        if let Some(post) = page
            .posts
            .into_iter()
            .find(|p| blogsync_blogger::post_number(&p.id) == post_id)
        {
            return Ok(post);
        }
        match page.next_page_token {
            Some(token) => query.page_token = Some(token),
            None => anyhow::bail!("post {post_id} not found"),
        }
    }
}

pub async fn delete_comment(api: &BloggerApi, post_id: &str, comment_id: &str) -> Result<()> {
    api.delete_comment(post_id, comment_id).await?;
    tracing::info!(post_id, comment_id, "blogsync.comment.deleted");
    Ok(())
}

pub async fn delete_all_posts(api: &BloggerApi) -> Result<()> {
    let page = api.list_posts(&PostQuery::default()).await?;
    for post in &page.posts {
        let summary = post.summary();
        if summary.edit_url.is_empty() {
            tracing::warn!(post_id = %summary.id, "blogsync.post.no_edit_link");
            continue;
        }
        api.delete_post(&summary.edit_url).await?;
        tracing::info!(
            post_id = summary.post_number(),
            title = %summary.title,
            "blogsync.post.deleted"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untitled_posts_print_placeholder() {
        let mut post = RemotePost {
            id: "1".into(),
            title: None,
            content: None,
            published: None,
            updated: None,
            url: None,
            self_link: None,
            author: None,
            labels: None,
        };
        assert_eq!(display_title(&post), "No Title");
        post.title = Some(String::new());
        assert_eq!(display_title(&post), "No Title");
        post.title = Some("Hello".into());
        assert_eq!(display_title(&post), "Hello");
    }
}
