//! Creation time of QuickTime / MP4 files, read from `moov/mvhd`.

use std::io::{self, Read, Seek, SeekFrom};

use chrono::{DateTime, Datelike, Local, NaiveDateTime};

use super::atom::{self, AtomHeader};
use crate::error::{Error, Result};

/// Seconds between 1904-01-01 (QuickTime epoch) and 1970-01-01.
pub const QUICKTIME_EPOCH_OFFSET: i64 = 2_082_844_800;

/// Locate the movie header and return its creation time as local wall-clock
/// time. Headers dated before `min_year` yield `None`.
pub fn read_creation_time<R: Read + Seek>(
    reader: &mut R,
    min_year: i32,
) -> Result<Option<NaiveDateTime>> {
    seek_to_movie(reader)?;

    let header = next_header(reader)?
        .ok_or_else(|| Error::MalformedAtom("movie atom is empty".to_string()))?;
    match &header.kind {
        b"cmov" => return Err(Error::CompressedMovie),
        b"mvhd" => {}
        other => return Err(Error::ExpectedMovieHeader(atom::fourcc(other))),
    }

    let version_flags: [u8; 4] = read_array(reader)?;
    let raw = if version_flags[0] == 1 {
        u64::from_be_bytes(read_array(reader)?)
    } else {
        u64::from(u32::from_be_bytes(read_array(reader)?))
    };

    Ok(to_local(raw, min_year))
}

/// Convert a QuickTime timestamp to local time, dropping implausible years.
pub fn to_local(raw: u64, min_year: i32) -> Option<NaiveDateTime> {
    let secs = i64::try_from(raw)
        .ok()?
        .checked_sub(QUICKTIME_EPOCH_OFFSET)?;
    let local = DateTime::from_timestamp(secs, 0)?
        .with_timezone(&Local)
        .naive_local();
    (local.year() >= min_year).then_some(local)
}

/// Skip top-level atoms until the stream sits on the first byte of `moov`'s payload.
fn seek_to_movie<R: Read + Seek>(reader: &mut R) -> Result<()> {
    loop {
        let header = next_header(reader)?.ok_or(Error::MovieNotFound)?;
        if &header.kind == b"moov" {
            return Ok(());
        }
        let len = header.payload_len().ok_or(Error::MovieNotFound)?;
        let len = i64::try_from(len).map_err(|_| {
            Error::MalformedAtom(format!("atom `{}` is too large", atom::fourcc(&header.kind)))
        })?;
        reader.seek(SeekFrom::Current(len))?;
    }
}

/// `None` once the stream is exhausted.
fn next_header<R: Read>(reader: &mut R) -> Result<Option<AtomHeader>> {
    match atom::read_header(reader) {
        Ok(header) => Ok(Some(header)),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            Err(Error::MalformedAtom(e.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

fn read_array<R: Read, const N: usize>(reader: &mut R) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    reader
        .read_exact(&mut buf)
        .map_err(|_| Error::MalformedAtom("truncated movie header".to_string()))?;
    Ok(buf)
}
