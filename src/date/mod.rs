pub mod atom;
pub mod exif;
pub mod heic;
pub mod mov;

use chrono::{DateTime, NaiveDateTime, TimeDelta, TimeZone};
use chrono_tz::Tz;

use crate::config::{EXIF_FORMAT, NAME_FORMAT};

/// Capture time of a media file, with one-second precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    /// Wall-clock time as stored in the file.
    Naive(NaiveDateTime),
    /// Wall-clock time together with the instant it maps to in a zone.
    Zoned {
        local: NaiveDateTime,
        instant: DateTime<Tz>,
    },
}

impl Timestamp {
    /// Pin `local` to `tz`. The wall-clock time is kept as read.
    pub fn zoned(local: NaiveDateTime, tz: Tz) -> Option<Self> {
        apply_zone(local, tz).map(|instant| Timestamp::Zoned { local, instant })
    }

    /// Render the wall-clock time as a filename stem: `YYYY-MM-DD HH.MM.SS`.
    pub fn format(&self) -> String {
        let local = match self {
            Timestamp::Naive(local) => local,
            Timestamp::Zoned { local, .. } => local,
        };
        local.format(NAME_FORMAT).to_string()
    }
}

/// Interpret `naive` as wall-clock time in `tz`.
///
/// Ambiguous times (clocks going back) resolve to the earlier instant. Times
/// skipped by a forward transition are moved one hour later.
pub fn apply_zone(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&naive).earliest().or_else(|| {
        let shifted = naive.checked_add_signed(TimeDelta::hours(1))?;
        tz.from_local_datetime(&shifted).earliest()
    })
}

/// Parse an EXIF date string (`YYYY:MM:DD HH:MM:SS`).
pub fn parse_exif_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), EXIF_FORMAT).ok()
}
