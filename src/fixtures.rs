//! Synthetic media files for tests.

use crate::date::atom::FourCc;

pub fn atom(kind: &FourCc, payload: &[u8]) -> Vec<u8> {
    let mut out = ((payload.len() + 8) as u32).to_be_bytes().to_vec();
    out.extend(kind);
    out.extend(payload);
    out
}

pub fn mvhd(version: u8, creation: u64) -> Vec<u8> {
    let mut body = vec![version, 0, 0, 0];
    if version == 1 {
        body.extend(creation.to_be_bytes());
        body.extend(creation.to_be_bytes());
        body.extend(600u32.to_be_bytes());
        body.extend(0u64.to_be_bytes());
    } else {
        body.extend((creation as u32).to_be_bytes());
        body.extend((creation as u32).to_be_bytes());
        body.extend(600u32.to_be_bytes());
        body.extend(0u32.to_be_bytes());
    }
    body.extend([0u8; 80]);
    atom(b"mvhd", &body)
}

/// QuickTime movie: `ftyp`, `wide`, `mdat`, then `moov` with a v0 header.
pub fn mov(creation: u32) -> Vec<u8> {
    let mut out = atom(b"ftyp", b"qt  \x00\x00\x02\x00qt  ");
    out.extend(atom(b"wide", &[]));
    out.extend(atom(b"mdat", &[0x5A; 64]));
    let mut moov = mvhd(0, u64::from(creation));
    moov.extend(atom(b"trak", &[0u8; 24]));
    out.extend(atom(b"moov", &moov));
    out
}

fn ifd_entry(out: &mut Vec<u8>, tag: u16, kind: u16, count: u32, value: u32) {
    out.extend(tag.to_be_bytes());
    out.extend(kind.to_be_bytes());
    out.extend(count.to_be_bytes());
    out.extend(value.to_be_bytes());
}

fn ascii(value: &str) -> Vec<u8> {
    let mut text = value.as_bytes().to_vec();
    text.push(0);
    assert!(text.len() > 4, "inline ASCII values are not supported");
    text
}

/// Big-endian TIFF with a single ASCII tag in IFD0.
pub fn tiff_primary_ascii(tag: u16, value: &str) -> Vec<u8> {
    let text = ascii(value);
    let mut out = b"MM\x00\x2a\x00\x00\x00\x08".to_vec();
    out.extend(1u16.to_be_bytes());
    ifd_entry(&mut out, tag, 2, text.len() as u32, 26);
    out.extend(0u32.to_be_bytes());
    out.extend(text);
    out
}

/// Big-endian TIFF whose IFD0 points to an Exif IFD holding one ASCII tag.
pub fn tiff_exif_ascii(tag: u16, value: &str) -> Vec<u8> {
    let text = ascii(value);
    let mut out = b"MM\x00\x2a\x00\x00\x00\x08".to_vec();
    out.extend(1u16.to_be_bytes());
    ifd_entry(&mut out, 0x8769, 4, 1, 26);
    out.extend(0u32.to_be_bytes());
    out.extend(1u16.to_be_bytes());
    ifd_entry(&mut out, tag, 2, text.len() as u32, 44);
    out.extend(0u32.to_be_bytes());
    out.extend(text);
    out
}

pub fn jpeg(tiff: &[u8]) -> Vec<u8> {
    let mut out = vec![0xFF, 0xD8, 0xFF, 0xE1];
    out.extend(((tiff.len() + 8) as u16).to_be_bytes());
    out.extend(b"Exif\0\0");
    out.extend(tiff);
    out.extend([0xFF, 0xD9]);
    out
}

pub fn jpeg_without_exif() -> Vec<u8> {
    let mut out = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
    out.extend(b"JFIF\0\x01\x01\x00\x00\x01\x00\x01\x00\x00");
    out.extend([0xFF, 0xD9]);
    out
}

/// HEIF `Exif` item payload: zero TIFF header offset, then the TIFF bytes.
pub fn exif_item(tiff: &[u8]) -> Vec<u8> {
    let mut out = 0u32.to_be_bytes().to_vec();
    out.extend(tiff);
    out
}

/// HEIF file with one item per entry, numbered from 1, stored in `mdat`.
pub fn heic(items: &[(FourCc, Vec<u8>)]) -> Vec<u8> {
    let mut out = atom(b"ftyp", b"heic\x00\x00\x00\x00mif1heic");
    let meta_len = heic_meta(items, 0).len();
    let data_start = out.len() + meta_len + 8;
    out.extend(heic_meta(items, data_start as u32));
    let payload: Vec<u8> = items.iter().flat_map(|(_, p)| p.iter().copied()).collect();
    out.extend(atom(b"mdat", &payload));
    out
}

fn hdlr() -> Vec<u8> {
    let mut hdlr = vec![0u8; 8];
    hdlr.extend(b"pict");
    hdlr.extend([0u8; 13]);
    atom(b"hdlr", &hdlr)
}

/// `iinf` with version 2 `infe` entries numbered from 1.
fn iinf(kinds: &[FourCc]) -> Vec<u8> {
    let mut iinf = vec![0u8; 4];
    iinf.extend((kinds.len() as u16).to_be_bytes());
    for (i, kind) in kinds.iter().enumerate() {
        let mut infe = vec![2, 0, 0, 0];
        infe.extend(((i + 1) as u16).to_be_bytes());
        infe.extend([0, 0]);
        infe.extend(kind);
        infe.push(0);
        iinf.extend(atom(b"infe", &infe));
    }
    atom(b"iinf", &iinf)
}

fn heic_meta(items: &[(FourCc, Vec<u8>)], data_start: u32) -> Vec<u8> {
    let kinds: Vec<FourCc> = items.iter().map(|(kind, _)| *kind).collect();

    let mut iloc = vec![0u8, 0, 0, 0, 0x44, 0x00];
    iloc.extend((items.len() as u16).to_be_bytes());
    let mut offset = data_start;
    for (i, (_, payload)) in items.iter().enumerate() {
        iloc.extend(((i + 1) as u16).to_be_bytes());
        iloc.extend(0u16.to_be_bytes());
        iloc.extend(1u16.to_be_bytes());
        iloc.extend(offset.to_be_bytes());
        iloc.extend((payload.len() as u32).to_be_bytes());
        offset += payload.len() as u32;
    }

    let mut meta = vec![0u8; 4];
    meta.extend(hdlr());
    meta.extend(iinf(&kinds));
    meta.extend(atom(b"iloc", &iloc));
    atom(b"meta", &meta)
}

/// HEIF file whose only item is `Exif`, stored inside `idat` as two extents
/// split at `split`, with filler bytes around them. `version` selects an
/// `iloc` of version 1 or 2; the item uses construction method 1.
pub fn heic_idat(version: u8, item: &[u8], split: usize) -> Vec<u8> {
    assert!(split > 0 && split < item.len(), "both extents need bytes");
    let (head, tail) = item.split_at(split);

    let mut idat = vec![0xEE; 3];
    idat.extend(head);
    idat.extend([0xEE; 2]);
    idat.extend(tail);

    let mut iloc = vec![version, 0, 0, 0, 0x44, 0x40];
    if version == 2 {
        iloc.extend(1u32.to_be_bytes());
        iloc.extend(1u32.to_be_bytes());
    } else {
        iloc.extend(1u16.to_be_bytes());
        iloc.extend(1u16.to_be_bytes());
    }
    iloc.extend(1u16.to_be_bytes());
    iloc.extend(0u16.to_be_bytes());
    // base offset 1, so extent offsets are relative to idat[1]
    iloc.extend(1u32.to_be_bytes());
    iloc.extend(2u16.to_be_bytes());
    iloc.extend(2u32.to_be_bytes());
    iloc.extend((head.len() as u32).to_be_bytes());
    iloc.extend(((head.len() + 4) as u32).to_be_bytes());
    iloc.extend((tail.len() as u32).to_be_bytes());

    let mut meta = vec![0u8; 4];
    meta.extend(hdlr());
    meta.extend(iinf(&[*b"Exif"]));
    meta.extend(atom(b"iloc", &iloc));
    meta.extend(atom(b"idat", &idat));

    let mut out = atom(b"ftyp", b"heic\x00\x00\x00\x00mif1heic");
    out.extend(atom(b"meta", &meta));
    out
}
