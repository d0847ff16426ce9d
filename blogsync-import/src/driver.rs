//! One import run: records in, posts and comments out, audit lines written.
use crate::audit::AuditLog;
use crate::date::normalize_date;
use crate::parser::RecordParser;
use crate::record::{CommentRecord, PostRecord};
use crate::session::{ImportSession, ImportSettings};
use blogsync_blogger::{NewComment, NewPost, PublishClient, RemotePostSummary};
use blogsync_common::{Result, SyncError};
use std::io::{BufRead, Write};
use std::path::Path;

/// Tallies of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub created: usize,
    pub skipped_existing: usize,
    pub failed_records: usize,
    pub comments_created: usize,
    pub comments_failed: usize,
}

/// Where a record ended up remotely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRef {
    /// Numeric id used to address the post's comments.
    pub post_id: String,
    /// Edit reference, or the permalink when the service gave none.
    pub url: String,
    pub created: bool,
}

impl PostRef {
    fn from_summary(summary: &RemotePostSummary, created: bool) -> Self {
        let url = if summary.edit_url.is_empty() {
            summary.url.clone()
        } else {
            summary.edit_url.clone()
        };
        Self {
            post_id: summary.post_number().to_string(),
            url,
            created,
        }
    }
}

/// Import every record in order.
///
/// Record `n` (1-based, counting malformed records too) produces the audit
/// line `n <url>` once it exists remotely. Malformed records and comment
/// failures are logged and skipped; any other error ends the run.
pub async fn import_records<C, I, W>(
    session: &ImportSession<'_, C>,
    records: I,
    audit: &mut AuditLog<W>,
) -> Result<ImportReport>
where
    C: PublishClient + ?Sized,
    I: IntoIterator<Item = Result<PostRecord>>,
    W: Write,
{
    let mut report = ImportReport::default();

    for (i, parsed) in records.into_iter().enumerate() {
        let index = i + 1;
        let record = match parsed {
            Ok(record) => record,
            Err(SyncError::Format(msg)) => {
                tracing::warn!(index, error = %msg, "import.record.malformed");
                report.failed_records += 1;
                continue;
            }
            Err(e) => return Err(e),
        };

        let post = match publish_post(session, &record, index).await {
            Ok(post) => post,
            Err(SyncError::Format(msg)) => {
                tracing::warn!(index, error = %msg, "import.record.malformed");
                report.failed_records += 1;
                continue;
            }
            Err(e) => return Err(e),
        };
        if post.created {
            report.created += 1;
        } else {
            report.skipped_existing += 1;
        }
        audit.record(index, &post.url)?;

        for (n, comment) in record.comments.iter().enumerate() {
            match publish_comment(session, &post, comment).await {
                Ok(()) => {
                    report.comments_created += 1;
                    let delay = session.settings().comment_delay;
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                Err(e) if e.is_recoverable() => {
                    tracing::warn!(
                        index,
                        comment = n + 1,
                        post_id = %post.post_id,
                        error = %e,
                        "import.comment.failed"
                    );
                    report.comments_failed += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    tracing::info!(
        created = report.created,
        skipped_existing = report.skipped_existing,
        failed_records = report.failed_records,
        comments_created = report.comments_created,
        comments_failed = report.comments_failed,
        "import.finished"
    );
    Ok(report)
}

async fn publish_post<C: PublishClient + ?Sized>(
    session: &ImportSession<'_, C>,
    record: &PostRecord,
    index: usize,
) -> Result<PostRef> {
    let title = record.title()?;
    let published = normalize_date(record.date()?)?;

    if let Some(existing) = session.find_existing(title, &published) {
        let post = PostRef::from_summary(existing, false);
        tracing::info!(index, title, post_id = %post.post_id, "import.post.exists");
        return Ok(post);
    }

    let settings = session.settings();
    let new_post = NewPost::new(title, &record.content, &settings.author_name, &published)
        .with_label(record.primary_category());
    let created = session.client().create_post(&new_post).await?;
    let post = PostRef::from_summary(&created.summary(), true);
    tracing::info!(index, title, post_id = %post.post_id, url = %post.url, "import.post.created");
    Ok(post)
}

async fn publish_comment<C: PublishClient + ?Sized>(
    session: &ImportSession<'_, C>,
    post: &PostRef,
    comment: &CommentRecord,
) -> Result<()> {
    let published = normalize_date(&comment.date)
        .map_err(|e| SyncError::CommentCreate(e.to_string()))?;
    let new_comment = NewComment::new(&comment.text, &comment.author, &published);
    let created = session
        .client()
        .create_comment(&post.post_id, &new_comment)
        .await?;
    tracing::debug!(post_id = %post.post_id, comment_id = %created.id, "import.comment.created");
    Ok(())
}

/// Full run over an export stream: fetch the remote feed, parse, import,
/// and write the audit log at `audit_path` (truncated first).
pub async fn run_import<C, R>(
    client: &C,
    settings: ImportSettings,
    input: R,
    audit_path: &Path,
) -> Result<ImportReport>
where
    C: PublishClient + ?Sized,
    R: BufRead,
{
    let mut audit = AuditLog::create(audit_path)?;
    let session = ImportSession::open(client, settings).await?;
    let records: Vec<Result<PostRecord>> = RecordParser::new(input).collect();
    tracing::info!(records = records.len(), "import.input.parsed");

    import_records(&session, records, &mut audit).await
}
