//! # supout
//!
//! Reader for RouterOS `supout.rif` support-output archives.
//!
//! A supout file is plain text holding one or more delimited sections. Each
//! section body is a reverse-group base64 variant of `name \0 zlib(data)`.
//! This library provides functionality to:
//! - Find section blocks in any line-oriented reader
//! - Decode the custom base64 variant
//! - Split out section names and inflate their payloads
//! - Write sections back out in the same format
//!
//! ## Example
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let file = BufReader::new(File::open("supout.rif")?);
//!
//! supout::scan_sections(file, |result| -> Result<(), Box<dyn std::error::Error>> {
//!     if let Ok(section) = result {
//!         println!("{}: {} bytes", section.name, section.data.len());
//!     }
//!     Ok(())
//! })?;
//! # Ok(())
//! # }
//! ```

pub mod decode;
pub mod rif64;
pub mod scanner;
pub mod writer;

/// Line that opens a section block
pub const BEGIN_DELIMITER: &str = "--BEGIN ROUTEROS SUPOUT SECTION";

/// Line that closes a section block
pub const END_DELIMITER: &str = "--END ROUTEROS SUPOUT SECTION";

#[doc(inline)]
pub use decode::{decode, split_record, DecodeError, Section, SectionRecord};
#[doc(inline)]
pub use rif64::{reverse_group_decode, reverse_group_encode};
#[doc(inline)]
pub use scanner::{scan_sections, RawSection, ScanError, ScanSummary, Scanner, SectionError};
#[doc(inline)]
pub use writer::{encode_section, write_section};
