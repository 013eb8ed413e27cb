//! Naming and ordering of rotated log archives.
//!
//! When an active log file such as `cli.log` grows past its size limit it is
//! renamed to an archive with the rotation time embedded in the name:
//!
//! ```text
//! cli.log  →  cli_2026-03-14_12-00-05.log
//! ```
//!
//! If a second rotation happens within the same second, a sequence number is
//! appended so the first archive is never overwritten:
//!
//! ```text
//! cli_2026-03-14_12-00-05-1.log
//! ```
//!
//! Archives order by `(timestamp, sequence)`, which is what retention uses to
//! decide which files are the newest.

use chrono::NaiveDateTime;

/// `strftime` pattern for the timestamp embedded in archive names.
pub const ARCHIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Length of a rendered [`ARCHIVE_TIMESTAMP_FORMAT`] string.
const ARCHIVE_TIMESTAMP_LEN: usize = 19;

/// The sortable identity of one archive file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArchiveStamp {
    pub timestamp: NaiveDateTime,
    pub sequence: u32,
}

/// Builds an archive file name from the active file's stem and extension.
///
/// `extension` includes its leading dot (`".log"`) or is empty.
pub fn archive_file_name(stem: &str, extension: &str, stamp: ArchiveStamp) -> String {
    let time = stamp.timestamp.format(ARCHIVE_TIMESTAMP_FORMAT);
    if stamp.sequence == 0 {
        format!("{stem}_{time}{extension}")
    } else {
        format!("{stem}_{time}-{}{extension}", stamp.sequence)
    }
}

/// Parses a file name produced by [`archive_file_name`].
///
/// Returns `None` for any name that is not an archive of `stem`/`extension`,
/// including the active file itself and archives of other categories.
pub fn parse_archive_file_name(file_name: &str, stem: &str, extension: &str) -> Option<ArchiveStamp> {
    let rest = file_name.strip_prefix(stem)?.strip_prefix('_')?;
    let rest = rest.strip_suffix(extension)?;

    let time_text = rest.get(..ARCHIVE_TIMESTAMP_LEN)?;
    let timestamp = NaiveDateTime::parse_from_str(time_text, ARCHIVE_TIMESTAMP_FORMAT).ok()?;

    let sequence = match &rest[ARCHIVE_TIMESTAMP_LEN..] {
        "" => 0,
        suffix => suffix.strip_prefix('-')?.parse().ok()?,
    };

    Some(ArchiveStamp { timestamp, sequence })
}
