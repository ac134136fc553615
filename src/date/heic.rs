//! EXIF date of HEIC images.
//!
//! The `meta` box lists items in `iinf` and their byte ranges in `iloc`; the
//! first item of type `Exif` holds a TIFF structure prefixed by a 4-byte
//! offset to the TIFF header.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use exif::{Context, In, Reader, Tag};
use log::warn;

use super::atom::{self, FourCc};
use super::exif::ascii_value;
use crate::error::{Error, Result};

/// EXIF DateTime in the 0th IFD.
pub const TAG_DATETIME: u16 = 306;

/// Read tag 306 of the first `Exif` item as text.
pub fn read_heic_datetime(path: &Path) -> Result<Option<String>> {
    let data = fs::read(path)?;
    match find_datetime(&data) {
        Err(Error::MalformedAtom(reason)) => {
            warn!("{}: unreadable HEIC metadata ({})", path.display(), reason);
            Ok(None)
        }
        other => other,
    }
}

pub fn find_datetime(data: &[u8]) -> Result<Option<String>> {
    let Some(payload) = exif_item(data)? else {
        return Ok(None);
    };
    let Some(tiff) = tiff_data(&payload) else {
        return Ok(None);
    };
    let exif = match Reader::new().read_raw(tiff.to_vec()) {
        Ok(exif) => exif,
        Err(e) => {
            log::debug!("Exif item is not a TIFF structure: {}", e);
            return Ok(None);
        }
    };
    Ok(exif
        .get_field(Tag(Context::Tiff, TAG_DATETIME), In::PRIMARY)
        .and_then(ascii_value))
}

/// Bytes of the first `Exif` item, `None` if the file has no such item.
fn exif_item(data: &[u8]) -> Result<Option<Vec<u8>>> {
    let Some(meta) = child(data, b"meta")? else {
        return Ok(None);
    };
    let meta = meta.get(4..).ok_or_else(|| truncated("meta"))?;

    let Some(iinf) = child(meta, b"iinf")? else {
        return Ok(None);
    };
    let Some(item_id) = first_exif_id(iinf)? else {
        return Ok(None);
    };
    let Some(iloc) = child(meta, b"iloc")? else {
        return Ok(None);
    };
    let Some(location) = locate(iloc, item_id)? else {
        return Ok(None);
    };

    let source = match location.construction_method {
        0 => data,
        1 => child(meta, b"idat")?.ok_or_else(|| truncated("idat"))?,
        method => {
            log::debug!("unsupported iloc construction method {}", method);
            return Ok(None);
        }
    };

    let mut payload = Vec::new();
    for (offset, length) in location.extents {
        let start = usize::try_from(offset).map_err(|_| truncated("iloc"))?;
        let end = if length == 0 {
            source.len()
        } else {
            usize::try_from(length)
                .ok()
                .and_then(|len| start.checked_add(len))
                .ok_or_else(|| truncated("iloc"))?
        };
        let extent = source
            .get(start..end)
            .ok_or_else(|| truncated("Exif item"))?;
        payload.extend_from_slice(extent);
    }
    Ok(Some(payload))
}

/// Strip the TIFF header offset (and an optional `Exif\0\0` marker).
fn tiff_data(payload: &[u8]) -> Option<&[u8]> {
    let skip = u32::from_be_bytes(payload.get(..4)?.try_into().ok()?);
    let tiff = payload.get(4usize.checked_add(usize::try_from(skip).ok()?)?..)?;
    Some(tiff.strip_prefix(b"Exif\0\0").unwrap_or(tiff))
}

fn first_exif_id(iinf: &[u8]) -> Result<Option<u32>> {
    let mut r = ByteReader::new(iinf, "iinf");
    let version = r.u8()?;
    r.skip(3)?;
    if version == 0 {
        r.u16()?;
    } else {
        r.u32()?;
    }

    for (kind, infe) in boxes(r.rest())? {
        if &kind != b"infe" {
            continue;
        }
        let mut r = ByteReader::new(infe, "infe");
        let version = r.u8()?;
        r.skip(3)?;
        if version < 2 {
            continue;
        }
        let id = if version == 2 {
            u32::from(r.u16()?)
        } else {
            r.u32()?
        };
        r.u16()?; // item_protection_index
        if r.take(4)? == b"Exif" {
            return Ok(Some(id));
        }
    }
    Ok(None)
}

struct ItemLocation {
    construction_method: u16,
    /// (offset, length) pairs; a length of 0 spans to the end of the source.
    extents: Vec<(u64, u64)>,
}

fn locate(iloc: &[u8], item_id: u32) -> Result<Option<ItemLocation>> {
    let mut r = ByteReader::new(iloc, "iloc");
    let version = r.u8()?;
    r.skip(3)?;
    let sizes = r.u8()?;
    let (offset_size, length_size) = (sizes >> 4, sizes & 0x0f);
    let sizes = r.u8()?;
    let base_offset_size = sizes >> 4;
    let index_size = if version == 1 || version == 2 {
        sizes & 0x0f
    } else {
        0
    };
    let item_count = if version < 2 {
        u32::from(r.u16()?)
    } else {
        r.u32()?
    };

    for _ in 0..item_count {
        let id = if version < 2 {
            u32::from(r.u16()?)
        } else {
            r.u32()?
        };
        let construction_method = if version == 1 || version == 2 {
            r.u16()? & 0x000f
        } else {
            0
        };
        r.u16()?; // data_reference_index
        let base_offset = r.uint(base_offset_size)?;
        let extent_count = r.u16()?;

        let mut extents = Vec::with_capacity(usize::from(extent_count));
        for _ in 0..extent_count {
            r.uint(index_size)?;
            let offset = r.uint(offset_size)?;
            let length = r.uint(length_size)?;
            let offset = base_offset
                .checked_add(offset)
                .ok_or_else(|| truncated("iloc"))?;
            extents.push((offset, length));
        }

        if id == item_id {
            return Ok(Some(ItemLocation {
                construction_method,
                extents,
            }));
        }
    }
    Ok(None)
}

/// Split a byte range into consecutive boxes.
fn boxes(data: &[u8]) -> Result<Vec<(FourCc, &[u8])>> {
    let mut cursor = Cursor::new(data);
    let mut out = Vec::new();
    while (cursor.position() as usize) < data.len() {
        let header = atom::read_header(&mut cursor)
            .map_err(|e| Error::MalformedAtom(e.to_string()))?;
        let start = cursor.position() as usize;
        let end = match header.payload_len() {
            Some(len) => usize::try_from(len)
                .ok()
                .and_then(|len| start.checked_add(len))
                .filter(|&end| end <= data.len())
                .ok_or_else(|| overrun(&header.kind))?,
            None => data.len(),
        };
        out.push((header.kind, &data[start..end]));
        cursor.set_position(end as u64);
    }
    Ok(out)
}

fn child<'a>(data: &'a [u8], kind: &FourCc) -> Result<Option<&'a [u8]>> {
    Ok(boxes(data)?
        .into_iter()
        .find(|(k, _)| k == kind)
        .map(|(_, payload)| payload))
}

fn truncated(what: &str) -> Error {
    Error::MalformedAtom(format!("truncated `{}`", what))
}

fn overrun(kind: &FourCc) -> Error {
    Error::MalformedAtom(format!("`{}` overruns its parent", atom::fourcc(kind)))
}

struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    what: &'static str,
}

impl<'a> ByteReader<'a> {
    fn new(data: &'a [u8], what: &'static str) -> Self {
        Self { data, pos: 0, what }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let bytes = self
            .pos
            .checked_add(n)
            .and_then(|end| self.data.get(self.pos..end))
            .ok_or_else(|| truncated(self.what))?;
        self.pos += n;
        Ok(bytes)
    }

    fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16> {
        Ok(self.uint(2)? as u16)
    }

    fn u32(&mut self) -> Result<u32> {
        Ok(self.uint(4)? as u32)
    }

    /// Big-endian unsigned integer of `size` bytes (0 to 8).
    fn uint(&mut self, size: u8) -> Result<u64> {
        if size > 8 {
            return Err(Error::MalformedAtom(format!("{}-byte field in `{}`", size, self.what)));
        }
        Ok(self
            .take(usize::from(size))?
            .iter()
            .fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
    }

    fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}
