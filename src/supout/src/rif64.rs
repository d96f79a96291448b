//! Reverse-group base64 used inside supout sections.
//!
//! The alphabet is the standard base64 one, but each 4-character group is read
//! least-significant symbol first and the resulting 24-bit value is emitted
//! least-significant byte first. Standard base64 decoders produce garbage on it.

use crate::decode::DecodeError;

/// Symbols of the section encoding. The trailing `=` sits at index 64 so that
/// `index % 64` maps padding to zero.
pub const RIF64_ALPHABET: &[u8; 65] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/=";

/// Characters per encoded group
pub const GROUP_CHARS: usize = 4;

/// Bytes per decoded group
pub const GROUP_BYTES: usize = 3;

const INVALID: u8 = 0xFF;

/// Reverse lookup: byte value -> 6-bit symbol index, `INVALID` if not in the alphabet
static LOOKUP: [u8; 256] = build_lookup();

const fn build_lookup() -> [u8; 256] {
    let mut table = [INVALID; 256];
    let mut i = 0;
    while i < RIF64_ALPHABET.len() {
        table[RIF64_ALPHABET[i] as usize] = (i % 64) as u8;
        i += 1;
    }
    table
}

/// Look up the 6-bit value of a symbol
#[inline]
pub fn symbol_index(symbol: u8) -> Option<u8> {
    match LOOKUP[symbol as usize] {
        INVALID => None,
        idx => Some(idx),
    }
}

/// Decode one group of four symbols into three bytes.
///
/// The first symbol carries bits 0..6, the fourth bits 18..24:
/// `value = c0 | c1 << 6 | c2 << 12 | c3 << 18`, emitted as
/// `[value & 0xFF, (value >> 8) & 0xFF, (value >> 16) & 0xFF]`.
#[inline]
pub fn decode_group(indices: [u8; GROUP_CHARS]) -> [u8; GROUP_BYTES] {
    let value = u32::from(indices[0])
        | u32::from(indices[1]) << 6
        | u32::from(indices[2]) << 12
        | u32::from(indices[3]) << 18;

    [
        (value & 0xFF) as u8,
        ((value >> 8) & 0xFF) as u8,
        ((value >> 16) & 0xFF) as u8,
    ]
}

/// Reverse the section encoding over a whole section body.
///
/// The input must be a non-empty sequence of complete 4-character groups. It is
/// taken as raw bytes; anything outside the alphabet is an `InvalidSymbol`.
pub fn reverse_group_decode<T: AsRef<[u8]>>(text: T) -> Result<Vec<u8>, DecodeError> {
    let bytes = text.as_ref();

    if bytes.is_empty() {
        return Err(DecodeError::EmptyInput);
    }
    if bytes.len() % GROUP_CHARS != 0 {
        return Err(DecodeError::MalformedLength { len: bytes.len() });
    }

    let mut out = Vec::with_capacity(bytes.len() / GROUP_CHARS * GROUP_BYTES);

    for (group_no, group) in bytes.chunks_exact(GROUP_CHARS).enumerate() {
        let mut indices = [0u8; GROUP_CHARS];
        for (i, &symbol) in group.iter().enumerate() {
            indices[i] = symbol_index(symbol).ok_or(DecodeError::InvalidSymbol {
                symbol,
                offset: group_no * GROUP_CHARS + i,
            })?;
        }
        out.extend_from_slice(&decode_group(indices));
    }

    Ok(out)
}

/// Encode bytes with the section encoding.
///
/// Input that is not a multiple of three bytes is zero-padded, so decoding the
/// result yields the original bytes followed by up to two zeros.
pub fn reverse_group_encode(bytes: &[u8]) -> String {
    let mut result = String::with_capacity(bytes.len().div_ceil(GROUP_BYTES) * GROUP_CHARS);

    for chunk in bytes.chunks(GROUP_BYTES) {
        let mut group = [0u8; GROUP_BYTES];
        group[..chunk.len()].copy_from_slice(chunk);

        let value =
            u32::from(group[0]) | u32::from(group[1]) << 8 | u32::from(group[2]) << 16;

        for i in 0..GROUP_CHARS {
            let idx = (value >> (i * 6)) & 0x3F;
            result.push(RIF64_ALPHABET[idx as usize] as char);
        }
    }

    result
}
