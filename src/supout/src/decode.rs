//! Section decoding: reverse-group decode, name split, zlib inflate.

use flate2::{Decompress, FlushDecompress, Status};
use thiserror::Error;

use crate::rif64;

/// Per-section decode failure. None of these abort a scan.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Empty section data")]
    EmptyInput,

    #[error("Section data length {len} is not a multiple of 4")]
    MalformedLength { len: usize },

    #[error("Invalid symbol '{}' at offset {offset}", .symbol.escape_ascii())]
    InvalidSymbol { symbol: u8, offset: usize },

    #[error("Section name is not null-terminated")]
    MissingNameTerminator,

    #[error("Section {name:?}: invalid zlib header: {reason}")]
    InflateInit { name: String, reason: String },

    #[error("Section {name:?}: failed to inflate payload: {reason}")]
    InflateRead { name: String, reason: String },
}

impl DecodeError {
    /// Name of the section the error belongs to, when it got far enough to know it
    pub fn section_name(&self) -> Option<&str> {
        match self {
            DecodeError::InflateInit { name, .. } | DecodeError::InflateRead { name, .. } => {
                Some(name)
            }
            _ => None,
        }
    }
}

/// A section split into its name and still-compressed payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionRecord {
    pub name: String,
    pub payload: Vec<u8>,
}

/// A fully decoded section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub data: Vec<u8>,
}

impl Section {
    /// Payload as text; invalid UTF-8 is replaced rather than rejected
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }
}

/// Decode one section body into its name and inflated payload.
pub fn decode<T: AsRef<[u8]>>(section: T) -> Result<Section, DecodeError> {
    let raw = rif64::reverse_group_decode(section)?;
    let record = split_record(&raw)?;
    let data = record.inflate()?;

    Ok(Section {
        name: record.name,
        data,
    })
}

/// Split decoded bytes at the first null byte.
///
/// The name is taken as-is; bytes that are not valid UTF-8 are replaced.
pub fn split_record(decoded: &[u8]) -> Result<SectionRecord, DecodeError> {
    let split = memchr::memchr(0, decoded).ok_or(DecodeError::MissingNameTerminator)?;

    Ok(SectionRecord {
        name: String::from_utf8_lossy(&decoded[..split]).into_owned(),
        payload: decoded[split + 1..].to_vec(),
    })
}

impl SectionRecord {
    /// Inflate the zlib payload.
    ///
    /// The two-byte stream header is checked up front so that a bad header is
    /// reported separately from damage inside the compressed body.
    pub fn inflate(&self) -> Result<Vec<u8>, DecodeError> {
        check_zlib_header(&self.payload).map_err(|reason| DecodeError::InflateInit {
            name: self.name.clone(),
            reason: reason.to_string(),
        })?;

        inflate_zlib(&self.payload).map_err(|reason| DecodeError::InflateRead {
            name: self.name.clone(),
            reason,
        })
    }
}

/// Validate a zlib stream header (RFC 1950 CMF/FLG)
fn check_zlib_header(data: &[u8]) -> Result<(), &'static str> {
    let [cmf, flg, ..] = *data else {
        return Err("stream shorter than header");
    };

    if cmf & 0x0F != 8 {
        return Err("unsupported compression method");
    }
    if cmf >> 4 > 7 {
        return Err("window size too large");
    }
    if (u16::from(cmf) << 8 | u16::from(flg)) % 31 != 0 {
        return Err("header checksum mismatch");
    }
    if flg & 0x20 != 0 {
        return Err("preset dictionary not supported");
    }

    Ok(())
}

/// Drain a zlib stream to its end marker.
///
/// Running out of input before the end marker counts as a failure; a stream that
/// stops early is truncated, not short.
fn inflate_zlib(data: &[u8]) -> Result<Vec<u8>, String> {
    let mut inflater = Decompress::new(true);
    let mut out = Vec::with_capacity(data.len().saturating_mul(4).max(64));

    loop {
        if out.capacity() - out.len() < 1024 {
            out.reserve(out.capacity().max(1024));
        }

        let before_in = inflater.total_in();
        let before_out = inflater.total_out();
        let consumed = before_in as usize;

        let status = inflater
            .decompress_vec(&data[consumed..], &mut out, FlushDecompress::None)
            .map_err(|e| e.to_string())?;

        match status {
            Status::StreamEnd => return Ok(out),
            Status::Ok | Status::BufError => {
                if inflater.total_in() == before_in && inflater.total_out() == before_out {
                    return Err(format!(
                        "compressed stream truncated after {} bytes",
                        before_in
                    ));
                }
            }
        }
    }
}
