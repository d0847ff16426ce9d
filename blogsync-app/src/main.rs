use anyhow::{Context, Result};
use blogsync_blogger::BloggerApi;
use blogsync_common::observability::init_logging;
use blogsync_config::{BlogsyncConfig, BlogsyncConfigLoader, default_config_path};
use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

/// Import a flat-file blog export into a hosted blog.
#[derive(Debug, Parser)]
#[command(name = "blogsync", version)]
struct Cli {
    #[arg(long, env = "BLOGSYNC_EMAIL", value_parser = NonEmptyStringValueParser::new())]
    email: String,

    #[arg(
        long,
        env = "BLOGSYNC_PASSWORD",
        hide_env_values = true,
        value_parser = NonEmptyStringValueParser::new()
    )]
    password: String,

    /// YAML config file (defaults to ./blogsync.yaml, then the user config dir).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Target blog; defaults to the first blog of the account.
    #[arg(long, global = true)]
    blog_id: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Import the export file (default).
    Import {
        #[arg(long)]
        input: Option<PathBuf>,
        #[arg(long)]
        audit_log: Option<PathBuf>,
    },
    /// Print the titles of the account's blogs.
    ListBlogs,
    /// Print post titles, optionally limited to a published window.
    ListPosts {
        /// Inclusive lower bound, RFC 3339.
        #[arg(long)]
        start_date: Option<String>,
        /// Exclusive upper bound, RFC 3339.
        #[arg(long)]
        end_date: Option<String>,
    },
    /// Print comment authors and timestamps of one post.
    ListComments {
        #[arg(long)]
        post_id: String,
    },
    /// Change the title of one post.
    RenamePost {
        #[arg(long)]
        post_id: String,
        #[arg(long)]
        title: String,
    },
    DeleteComment {
        #[arg(long)]
        post_id: String,
        #[arg(long)]
        comment_id: String,
    },
    /// Delete every post on the first page of the feed.
    DeleteAllPosts,
}

fn load_config(cli: &Cli) -> Result<BlogsyncConfig> {
    let mut loader = BlogsyncConfigLoader::new();
    match &cli.config {
        Some(path) => loader = loader.with_file(path),
        None => {
            if let Some(path) = default_config_path() {
                loader = loader.with_optional_file(path);
            }
        }
    }
    let mut cfg = loader.load().context("loading configuration")?;
    if let Some(id) = &cli.blog_id {
        cfg.blog_id = Some(id.clone());
    }
    Ok(cfg)
}

async fn connect(cli: &Cli, cfg: &BlogsyncConfig) -> Result<BloggerApi> {
    let mut api = BloggerApi::new(&cfg.api.base_url)?
        .with_login_url(&cfg.api.login_url)
        .with_source(&cfg.api.source)
        .with_timeout(cfg.api.timeout())
        .with_retries(cfg.api.max_retries);
    if let Some(id) = &cfg.blog_id {
        api = api.with_blog_id(id);
    }

    match &cfg.api.access_token {
        Some(token) => api = api.with_access_token(token),
        None => api.login(&cli.email, &cli.password).await?,
    }
    tracing::info!(email = %cli.email, "blogsync.login.ok");

    api.resolve_blog_id().await?;
    Ok(api)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins over file, CLI wins over both)
    let cfg = load_config(&cli)?;
    let log_path = init_logging(cfg.logging.to_log_config())?;
    tracing::debug!(log = %log_path.display(), "blogsync.start");

    let api = connect(&cli, &cfg).await?;

    match cli.command.unwrap_or(Command::Import {
        input: None,
        audit_log: None,
    }) {
        Command::Import { input, audit_log } => {
            let input = input.unwrap_or_else(|| cfg.import.input.clone());
            let audit_log = audit_log.unwrap_or_else(|| cfg.import.audit_log.clone());
            commands::import(&api, &cfg.import, &input, &audit_log).await
        }
        Command::ListBlogs => commands::list_blogs(&api).await,
        Command::ListPosts {
            start_date,
            end_date,
        } => commands::list_posts(&api, start_date, end_date).await,
        Command::ListComments { post_id } => commands::list_comments(&api, &post_id).await,
        Command::RenamePost { post_id, title } => {
            commands::rename_post(&api, &post_id, &title).await
        }
        Command::DeleteComment {
            post_id,
            comment_id,
        } => commands::delete_comment(&api, &post_id, &comment_id).await,
        Command::DeleteAllPosts => commands::delete_all_posts(&api).await,
    }
}
