use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use log::warn;

use crate::config::Config;
use crate::date::{self, exif, heic, mov, Timestamp};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Video,
    Jpeg,
    Heic,
}

impl MediaKind {
    /// Order of the rename passes.
    pub const PASSES: [MediaKind; 3] = [MediaKind::Video, MediaKind::Jpeg, MediaKind::Heic];

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            MediaKind::Video => &["mp4", "mov"],
            MediaKind::Jpeg => &["jpg", "jpeg"],
            MediaKind::Heic => &["heic"],
        }
    }

    /// Case-insensitive lookup, with or without the leading dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        Self::PASSES
            .into_iter()
            .find(|kind| kind.extensions().contains(&ext.as_str()))
    }

    /// Name used in the summary line.
    pub fn label(self) -> &'static str {
        match self {
            MediaKind::Video => "mov/mp4",
            MediaKind::Jpeg => "jpg",
            MediaKind::Heic => "heic",
        }
    }

    /// Capture time of `path`, `None` when the file carries none.
    ///
    /// Only movie times are pinned to the configured zone; photo times stay
    /// naive.
    pub fn extract(self, path: &Path, config: &Config) -> Result<Option<Timestamp>> {
        match self {
            MediaKind::Video => {
                let mut reader = BufReader::new(File::open(path)?);
                let Some(local) = mov::read_creation_time(&mut reader, config.min_year)? else {
                    return Ok(None);
                };
                Ok(Timestamp::zoned(local, config.timezone))
            }
            MediaKind::Jpeg => {
                let text = exif::read_jpeg_datetime(path)?;
                Ok(text.and_then(|s| parse_text(path, &s)))
            }
            MediaKind::Heic => {
                let text = heic::read_heic_datetime(path)?;
                Ok(text.and_then(|s| parse_text(path, &s)))
            }
        }
    }
}

fn parse_text(path: &Path, text: &str) -> Option<Timestamp> {
    let parsed = date::parse_exif_datetime(text).map(Timestamp::Naive);
    if parsed.is_none() {
        warn!("{}: unparseable EXIF date {:?}", path.display(), text);
    }
    parsed
}

/// A media file found in the target directory.
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub path: PathBuf,
    pub stem: String,
    /// Extension including the dot, as found on disk.
    pub ext: String,
    pub kind: MediaKind,
}

impl MediaFile {
    /// `None` for names outside the supported extensions.
    pub fn from_entry(dir: &Path, name: &str) -> Option<Self> {
        let (stem, ext) = split_name(name);
        let kind = MediaKind::from_extension(ext)?;
        Some(Self {
            path: dir.join(name),
            stem: stem.to_string(),
            ext: ext.to_string(),
            kind,
        })
    }

    pub fn name(&self) -> String {
        format!("{}{}", self.stem, self.ext)
    }
}

/// Split at the last dot. Leading dots never start an extension.
pub fn split_name(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(i) if !name[..i].trim_start_matches('.').is_empty() => (&name[..i], &name[i..]),
        _ => (name, ""),
    }
}
