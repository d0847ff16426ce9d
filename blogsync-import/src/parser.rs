//! Reader for the line-oriented export format.
//!
//! One record looks like this (lines are whitespace-trimmed before matching):
//!
//! ```text
//! title: Hello
//! date: 01/02/2007 10:00:00
//! primary category: misc
//! -----
//! BODY:
//! Hi there
//! -----
//! COMMENT:
//! AUTHOR: Jane
//! EMAIL: jane@example.com
//! IP: 10.0.0.1
//! URL:
//! DATE: 01/03/2007 09:00:00
//! Nice post
//! -----
//! --------
//! ```
//!
//! Header and comment field values start two characters after the first
//! `:` (the colon and one separator character). Body and comment lines are
//! concatenated without a separator.
use crate::record::{CommentRecord, PostRecord, DATE_FIELD, TITLE_FIELD};
use blogsync_common::{Result, SyncError};
use std::io::BufRead;

/// Ends the header block, the body, and each comment.
pub const SECTION_END: &str = "-----";
/// Ends a whole record.
pub const RECORD_END: &str = "--------";
pub const BODY_MARKER: &str = "BODY:";
pub const COMMENT_MARKER: &str = "COMMENT:";
/// A comment block always carries this many metadata lines between its
/// author line and its date line. Literal layout of the export format; the
/// lines are skipped without being inspected.
pub const SKIPPED_COMMENT_METADATA_LINES: usize = 3;

/// Split `key: value` at the first `:`. The key is lower-cased; the value
/// starts two characters after the colon (the colon and one separator).
///
/// ```
/// use blogsync_import::parser::split_field;
///
/// assert_eq!(
///     split_field("Primary Category: misc"),
///     Some(("primary category".to_string(), "misc".to_string()))
/// );
/// assert_eq!(split_field("url:"), Some(("url".to_string(), String::new())));
/// assert_eq!(split_field("no colon here"), None);
/// ```
pub fn split_field(line: &str) -> Option<(String, String)> {
    let (key, rest) = line.split_once(':')?;
    Some((key.to_lowercase(), skip_separator(rest).to_string()))
}

fn skip_separator(rest: &str) -> &str {
    let mut chars = rest.chars();
    chars.next();
    chars.as_str()
}

/// Trimmed, UTF-8 decoded lines with position tracking.
struct LineSource<R> {
    reader: R,
    buf: Vec<u8>,
    line_no: usize,
    last_was_record_end: bool,
}

impl<R: BufRead> LineSource<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_no: 0,
            last_was_record_end: false,
        }
    }

    /// `Ok(None)` once the stream is exhausted.
    fn next_line(&mut self) -> Result<Option<String>> {
        self.buf.clear();
        if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        self.last_was_record_end = false;
        let line = match std::str::from_utf8(&self.buf) {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                return Err(SyncError::Format(format!(
                    "line {} is not valid UTF-8: {e}",
                    self.line_no
                )))
            }
        };
        self.last_was_record_end = line == RECORD_END;
        Ok(Some(line))
    }
}

/// Iterator over the records of an export stream.
///
/// A malformed record yields one `Err(SyncError::Format)` and the parser
/// resumes after that record's `--------` terminator. I/O errors end the
/// iteration. The stream is read strictly forward; restarting means
/// reopening it.
pub struct RecordParser<R> {
    lines: LineSource<R>,
    finished: bool,
}

impl<R: BufRead> RecordParser<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: LineSource::new(reader),
            finished: false,
        }
    }

    fn malformed(&self, what: &str) -> SyncError {
        SyncError::Format(format!("line {}: {what}", self.lines.line_no))
    }

    fn field_value(&self, line: &str, what: &str) -> Result<String> {
        split_field(line)
            .map(|(_, value)| value)
            .ok_or_else(|| self.malformed(&format!("{what} line {line:?} has no ':'")))
    }

    /// Parse the next record. `Ok(None)` when only blank lines remain.
    ///
    /// End of stream inside a record yields whatever was read so far, which
    /// still has to carry a title and a date.
    pub fn parse_record(&mut self) -> Result<Option<PostRecord>> {
        let mut record = PostRecord::default();
        let mut started = false;

        // header
        loop {
            let Some(line) = self.lines.next_line()? else {
                if !started {
                    return Ok(None);
                }
                return self.finish(record).map(Some);
            };
            if line == SECTION_END {
                break;
            }
            if line.is_empty() {
                continue;
            }
            started = true;
            let (key, value) = split_field(&line)
                .ok_or_else(|| self.malformed(&format!("header line {line:?} has no ':'")))?;
            record.fields.insert(key, value);
        }

        match self.lines.next_line()? {
            None => return self.finish(record).map(Some),
            Some(line) if line == BODY_MARKER => {}
            Some(line) => {
                return Err(self.malformed(&format!("expected {BODY_MARKER:?}, found {line:?}")))
            }
        }

        // body
        loop {
            match self.lines.next_line()? {
                None => return self.finish(record).map(Some),
                Some(line) if line == SECTION_END => break,
                Some(line) => record.content.push_str(&line),
            }
        }

        // comments until the record terminator
        loop {
            match self.lines.next_line()? {
                None => break,
                Some(line) if line == RECORD_END => break,
                Some(line) if line == COMMENT_MARKER => {
                    let (comment, complete) = self.parse_comment()?;
                    record.comments.push(comment);
                    if !complete {
                        break;
                    }
                }
                Some(_) => {}
            }
        }

        self.finish(record).map(Some)
    }

    /// Returns the comment and whether it was closed before end of stream.
    fn parse_comment(&mut self) -> Result<(CommentRecord, bool)> {
        let mut comment = CommentRecord::default();

        let Some(line) = self.lines.next_line()? else {
            return Ok((comment, false));
        };
        comment.author = self.field_value(&line, "comment author")?;

        for _ in 0..SKIPPED_COMMENT_METADATA_LINES {
            if self.lines.next_line()?.is_none() {
                return Ok((comment, false));
            }
        }

        let Some(line) = self.lines.next_line()? else {
            return Ok((comment, false));
        };
        comment.date = self.field_value(&line, "comment date")?;

        loop {
            match self.lines.next_line()? {
                None => return Ok((comment, false)),
                Some(line) if line == SECTION_END => return Ok((comment, true)),
                Some(line) => comment.text.push_str(&line),
            }
        }
    }

    fn finish(&self, record: PostRecord) -> Result<PostRecord> {
        for key in [TITLE_FIELD, DATE_FIELD] {
            if !record.fields.contains_key(key) {
                return Err(SyncError::Format(format!(
                    "record ending at line {} has no `{key}` field",
                    self.lines.line_no
                )));
            }
        }
        Ok(record)
    }

    /// Skip to just past the current record's terminator.
    fn resync(&mut self) -> Result<()> {
        if self.lines.last_was_record_end {
            return Ok(());
        }
        while let Some(line) = self.lines.next_line()? {
            if line == RECORD_END {
                break;
            }
        }
        Ok(())
    }
}

impl<R: BufRead> Iterator for RecordParser<R> {
    type Item = Result<PostRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.parse_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err @ SyncError::Format(_)) => {
                if let Err(io) = self.resync() {
                    tracing::warn!(error = %io, "import.parse.resync_failed");
                    self.finished = true;
                }
                Some(Err(err))
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

/// Parse every record of an export stream, in order.
pub fn parse_records<R: BufRead>(reader: R) -> RecordParser<R> {
    RecordParser::new(reader)
}
