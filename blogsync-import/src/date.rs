//! Export timestamps are local wall-clock `MM/DD/YYYY HH:MM:SS`; the blog
//! service wants UTC `YYYY-MM-DDTHH:MM:SSZ`.
use blogsync_common::{Result, SyncError};
use chrono::{DateTime, LocalResult, NaiveDateTime, TimeDelta, TimeZone, Utc};
use regex::Regex;
use std::sync::LazyLock;

pub const EXPORT_FORMAT: &str = "%m/%d/%Y %H:%M:%S";
pub const ISO_UTC_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Published timestamps are compared on this many leading characters.
pub const TIMESTAMP_COMPARE_WIDTH: usize = 66;

static EXPORT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{2}/[0-9]{2}/[0-9]{4} [0-9]{2}:[0-9]{2}:[0-9]{2}$")
        .expect("static pattern compiles")
});

/// Convert an export timestamp, read in the machine's local zone, to UTC.
pub fn normalize_date(raw: &str) -> Result<String> {
    normalize_date_in(raw, &chrono::Local)
}

/// Same as [`normalize_date`] with an explicit zone for the wall-clock input.
///
/// ```
/// use blogsync_import::date::normalize_date_in;
/// use chrono::{FixedOffset, Utc};
///
/// assert_eq!(
///     normalize_date_in("01/02/2007 10:00:00", &Utc).unwrap(),
///     "2007-01-02T10:00:00Z"
/// );
/// let cet = FixedOffset::east_opt(3600).unwrap();
/// assert_eq!(
///     normalize_date_in("01/02/2007 10:00:00", &cet).unwrap(),
///     "2007-01-02T09:00:00Z"
/// );
/// ```
pub fn normalize_date_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> Result<String> {
    if !EXPORT_PATTERN.is_match(raw) {
        return Err(SyncError::Format(format!(
            "date {raw:?} does not match MM/DD/YYYY HH:MM:SS"
        )));
    }
    let naive = NaiveDateTime::parse_from_str(raw, EXPORT_FORMAT)
        .map_err(|e| SyncError::Format(format!("date {raw:?}: {e}")))?;

    let instant = match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        // fall-back overlap: first occurrence
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        // spring-forward gap: read with the offset in force before the jump
        LocalResult::None => tz
            .from_local_datetime(&(naive + TimeDelta::hours(1)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| {
                SyncError::Format(format!("date {raw:?} does not exist in the local zone"))
            })?,
    };
    Ok(instant.format(ISO_UTC_FORMAT).to_string())
}

/// Key used by the duplicate check: the timestamp rendered in the canonical
/// UTC form when it parses as RFC 3339 (remote feeds carry offsets and
/// fractional seconds), truncated to [`TIMESTAMP_COMPARE_WIDTH`] characters.
pub fn comparable_timestamp(raw: &str) -> String {
    let canonical = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc).format(ISO_UTC_FORMAT).to_string())
        .unwrap_or_else(|_| raw.to_string());
    canonical.chars().take(TIMESTAMP_COMPARE_WIDTH).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Local};

    #[test]
    fn utc_input_is_unchanged_apart_from_layout() {
        assert_eq!(
            normalize_date_in("12/31/1999 23:59:59", &Utc).unwrap(),
            "1999-12-31T23:59:59Z"
        );
    }

    #[test]
    fn offsets_cross_day_boundaries() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            normalize_date_in("03/01/2008 01:30:00", &tz).unwrap(),
            "2008-02-29T23:30:00Z"
        );
        let west = FixedOffset::west_opt(8 * 3600).unwrap();
        assert_eq!(
            normalize_date_in("01/02/2007 20:00:00", &west).unwrap(),
            "2007-01-03T04:00:00Z"
        );
    }

    #[test]
    fn rejects_anything_but_the_fixed_layout() {
        for bad in [
            "1/2/2007 10:00:00",
            "01/02/07 10:00:00",
            "01/02/2007 10:00",
            "01/02/2007T10:00:00",
            "01/02/2007 10:00:00Z",
            " 01/02/2007 10:00:00",
            "ab/02/2007 10:00:00",
            "13/02/2007 10:00:00",
            "02/30/2007 10:00:00",
            "01/02/2007 24:00:00",
            "",
        ] {
            assert!(
                matches!(normalize_date_in(bad, &Utc), Err(SyncError::Format(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn local_output_round_trips_to_the_same_instant() {
        let re = Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}Z$").unwrap();
        for raw in ["01/02/2007 10:00:00", "07/15/2010 23:05:09", "11/30/1999 00:00:01"] {
            let out = normalize_date(raw).unwrap();
            assert!(re.is_match(&out), "{out}");

            let back = DateTime::parse_from_rfc3339(&out).unwrap();
            let naive = NaiveDateTime::parse_from_str(raw, EXPORT_FORMAT).unwrap();
            let local = Local.from_local_datetime(&naive).earliest().unwrap();
            assert_eq!(back.timestamp(), local.timestamp());
        }
    }

    #[test]
    fn comparable_timestamp_canonicalises_offsets() {
        assert_eq!(
            comparable_timestamp("2007-01-02T02:00:00.000-08:00"),
            "2007-01-02T10:00:00Z"
        );
        assert_eq!(comparable_timestamp("2007-01-02T10:00:00Z"), "2007-01-02T10:00:00Z");
    }

    #[test]
    fn comparable_timestamp_truncates_unparseable_values() {
        let long = "x".repeat(100);
        assert_eq!(comparable_timestamp(&long).len(), TIMESTAMP_COMPARE_WIDTH);
        assert_eq!(comparable_timestamp("not a date"), "not a date");
    }
}
