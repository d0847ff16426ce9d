use blogsync_common::{Result, SyncError};
use std::collections::BTreeMap;

pub const TITLE_FIELD: &str = "title";
pub const DATE_FIELD: &str = "date";
pub const CATEGORY_FIELD: &str = "primary category";

/// One post from the export file plus the comments nested under it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostRecord {
    /// Header fields keyed by lower-cased name. Open-ended: every `key: value`
    /// line before the header terminator lands here.
    pub fields: BTreeMap<String, String>,
    pub content: String,
    pub comments: Vec<CommentRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentRecord {
    pub author: String,
    /// Local `MM/DD/YYYY HH:MM:SS` timestamp, as exported.
    pub date: String,
    pub text: String,
}

impl PostRecord {
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Field that must be present for the record to be importable.
    pub fn require(&self, key: &str) -> Result<&str> {
        self.field(key)
            .ok_or_else(|| SyncError::Format(format!("record has no `{key}` field")))
    }

    pub fn title(&self) -> Result<&str> {
        self.require(TITLE_FIELD)
    }

    pub fn date(&self) -> Result<&str> {
        self.require(DATE_FIELD)
    }

    pub fn primary_category(&self) -> Option<&str> {
        self.field(CATEGORY_FIELD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_field_is_a_format_error() {
        let mut record = PostRecord::default();
        record.fields.insert("title".into(), "Hello".into());
        assert_eq!(record.title().unwrap(), "Hello");
        assert!(matches!(record.date(), Err(SyncError::Format(_))));
        assert!(record.primary_category().is_none());
    }
}
