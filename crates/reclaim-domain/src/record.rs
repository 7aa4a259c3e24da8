//! Record module - row identifiers, table names and the timestamp wire format

use chrono::{DateTime, Utc};
use std::fmt;

/// Format used for every timestamp column (UTC, second precision)
///
/// Lexical order of formatted values equals chronological order, which lets
/// the store compare timestamps as plain text.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Primary key of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordId(i64);

impl RecordId {
    /// Create a RecordId from a raw database value
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Get the raw value
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tables known to the sweep
///
/// Table names are never taken from user input; the store interpolates
/// [`Table::as_str`] into SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    /// Every content element (entries, users, ...)
    Elements,
    /// Per-site rows of an element
    ElementsSites,
    /// Localized content rows of an element
    Content,
    /// Entry rows, keyed by element id
    Entries,
    /// User rows, keyed by element id
    Users,
    /// Login sessions
    Sessions,
    /// Sections
    Sections,
    /// Per-site settings of a section
    SectionsSites,
    /// Entry types
    EntryTypes,
    /// Asset volumes
    Volumes,
    /// Folders inside a volume
    VolumeFolders,
}

impl Table {
    /// Get the table name as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Elements => "elements",
            Table::ElementsSites => "elements_sites",
            Table::Content => "content",
            Table::Entries => "entries",
            Table::Users => "users",
            Table::Sessions => "sessions",
            Table::Sections => "sections",
            Table::SectionsSites => "sections_sites",
            Table::EntryTypes => "entrytypes",
            Table::Volumes => "volumes",
            Table::VolumeFolders => "volumefolders",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render a timestamp in the column format
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use reclaim_domain::format_timestamp;
///
/// let ts = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
/// assert_eq!(format_timestamp(ts), "2024-03-09 07:05:01");
/// ```
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}
