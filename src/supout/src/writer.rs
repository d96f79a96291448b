//! Building supout archives from named payloads.

use std::io::{self, Write};

use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::rif64;
use crate::{BEGIN_DELIMITER, END_DELIMITER};

/// Encoded characters per line inside a section block
pub const LINE_WIDTH: usize = 76;

/// Encode a single section body: `name \0 zlib(data)`, reverse-group encoded.
pub fn encode_section(name: &str, data: &[u8]) -> io::Result<String> {
    let mut raw = Vec::with_capacity(name.len() + 1 + data.len() / 2);
    raw.extend_from_slice(name.as_bytes());
    raw.push(0);

    let mut encoder = ZlibEncoder::new(raw, Compression::default());
    encoder.write_all(data)?;
    let raw = encoder.finish()?;

    Ok(rif64::reverse_group_encode(&raw))
}

/// Write one delimited section block.
///
/// Lines are wrapped on group boundaries so that every line holds whole
/// 4-character groups.
pub fn write_section<W: Write>(writer: &mut W, name: &str, data: &[u8]) -> io::Result<()> {
    let encoded = encode_section(name, data)?;

    writeln!(writer, "{}", BEGIN_DELIMITER)?;
    for line in encoded.as_bytes().chunks(LINE_WIDTH) {
        writer.write_all(line)?;
        writer.write_all(b"\n")?;
    }
    writeln!(writer, "{}", END_DELIMITER)?;

    Ok(())
}
