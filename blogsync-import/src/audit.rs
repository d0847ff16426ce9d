use blogsync_common::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Append-only `<index> <edit url>` lines, one per imported post.
///
/// Each line is flushed as soon as it is written so a crashed run still
/// leaves a usable record of what was created.
pub struct AuditLog<W: Write> {
    out: W,
}

impl AuditLog<BufWriter<File>> {
    /// Create or truncate the log at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        tracing::debug!(path = %path.display(), "import.audit.opened");
        Ok(Self::from_writer(BufWriter::new(file)))
    }
}

impl<W: Write> AuditLog<W> {
    pub fn from_writer(out: W) -> Self {
        Self { out }
    }

    pub fn record(&mut self, index: usize, url: &str) -> Result<()> {
        writeln!(self.out, "{index} {url}")?;
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
