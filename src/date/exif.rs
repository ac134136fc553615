use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek};
use std::path::Path;

use exif::{Field, In, Reader, Tag, Value};

/// Read the raw DateTimeDigitized string of a JPEG file.
/// Files without EXIF data or without the tag yield `None`.
pub fn read_jpeg_datetime(path: &Path) -> io::Result<Option<String>> {
    let file = File::open(path)?;
    Ok(read_digitized(&mut BufReader::new(file)))
}

pub fn read_digitized<R: BufRead + Seek>(reader: &mut R) -> Option<String> {
    let exif = Reader::new().read_from_container(reader).ok()?;
    let field = exif.get_field(Tag::DateTimeDigitized, In::PRIMARY)?;
    ascii_value(field)
}

/// First string of an ASCII field, verbatim.
pub fn ascii_value(field: &Field) -> Option<String> {
    let Value::Ascii(ref strings) = field.value else {
        return None;
    };
    let text = String::from_utf8(strings.first()?.clone()).ok()?;
    let text = text.trim_matches('\0');
    (!text.is_empty()).then(|| text.to_string())
}
