//! Box headers shared by the QuickTime and HEIF readers.

use std::io::{self, Read};

pub type FourCc = [u8; 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtomHeader {
    pub kind: FourCc,
    /// Declared size including the header; 0 means "until end of stream".
    pub size: u64,
    pub header_len: u64,
}

impl AtomHeader {
    /// Payload length, `None` when the atom runs to the end of the stream.
    pub fn payload_len(&self) -> Option<u64> {
        (self.size != 0).then(|| self.size - self.header_len)
    }
}

/// Read one atom header: 4-byte big-endian size, 4-byte type tag and, when
/// the size is 1, a 64-bit extended size.
pub fn read_header<R: Read>(reader: &mut R) -> io::Result<AtomHeader> {
    let mut buf = [0u8; 8];
    reader.read_exact(&mut buf)?;
    let kind = [buf[4], buf[5], buf[6], buf[7]];

    let (size, header_len) = match u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) {
        1 => {
            let mut large = [0u8; 8];
            reader.read_exact(&mut large)?;
            (u64::from_be_bytes(large), 16)
        }
        n => (u64::from(n), 8),
    };

    if size != 0 && size < header_len {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("atom `{}` declares size {}", fourcc(&kind), size),
        ));
    }

    Ok(AtomHeader {
        kind,
        size,
        header_len,
    })
}

pub fn fourcc(kind: &FourCc) -> String {
    String::from_utf8_lossy(kind).into_owned()
}
