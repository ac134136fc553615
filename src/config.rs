use std::path::{Path, PathBuf};

use chrono_tz::Tz;

use crate::error::{Error, Result};

/// Filename stem pattern, e.g. `2019-05-10 14.22.31`.
pub const NAME_FORMAT: &str = "%Y-%m-%d %H.%M.%S";
/// Pattern of EXIF date strings.
pub const EXIF_FORMAT: &str = "%Y:%m:%d %H:%M:%S";
pub const DEFAULT_TIMEZONE: &str = "Europe/Madrid";
/// Movie headers older than this are zeroed or bogus.
pub const MIN_VALID_YEAR: i32 = 1990;

#[derive(Debug, Clone)]
pub struct Config {
    pub directory: PathBuf,
    pub timezone: Tz,
    pub min_year: i32,
}

impl Config {
    pub fn new(directory: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            directory: directory.as_ref().to_path_buf(),
            timezone: parse_timezone(DEFAULT_TIMEZONE)?,
            min_year: MIN_VALID_YEAR,
        })
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| Error::UnknownTimezone(name.to_string()))
}
