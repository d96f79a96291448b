//! Locating delimited sections in a supout archive.

use std::io::{self, BufRead};

use thiserror::Error;
use tracing::{debug, warn};

use crate::decode::{self, DecodeError, Section};
use crate::{BEGIN_DELIMITER, END_DELIMITER};

/// A decode failure tied to its place in the input
#[derive(Error, Debug)]
#[error("section at line {line}: {source}")]
pub struct SectionError {
    /// Line number of the section's begin delimiter (1-based)
    pub line: usize,
    #[source]
    pub source: DecodeError,
}

impl SectionError {
    /// Section name, when the decoder got far enough to extract it
    pub fn section_name(&self) -> Option<&str> {
        self.source.section_name()
    }
}

/// Failure reading the archive itself; ends the scan
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Failed to read input at line {line}: {source}")]
    Io {
        line: usize,
        #[source]
        source: io::Error,
    },
}

/// Encoded text collected between one pair of delimiters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSection {
    /// Line number of the begin delimiter (1-based)
    pub line: usize,
    /// Section body as read, lines joined without separators
    pub data: Vec<u8>,
}

impl RawSection {
    pub fn decode(&self) -> Result<Section, SectionError> {
        decode::decode(&self.data).map_err(|source| SectionError {
            line: self.line,
            source,
        })
    }
}

/// Counts reported by [`scan_sections`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    pub decoded: usize,
    pub failed: usize,
}

/// Iterator over the completed sections of a line-oriented reader.
///
/// Lines are handled as raw bytes, so content that is not valid text only
/// affects the section it sits in. The accumulator is cleared on both
/// delimiters: text after an end delimiter is dropped until the next begin
/// delimiter, and an end delimiter with no open section is ignored. A section
/// without an end delimiter is never yielded.
pub struct Scanner<R> {
    reader: R,
    line: Vec<u8>,
    line_no: usize,
    open: Option<RawSection>,
    failed: bool,
}

impl<R: BufRead> Scanner<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
            line_no: 0,
            open: None,
            failed: false,
        }
    }

    /// Lines consumed so far
    pub fn line_no(&self) -> usize {
        self.line_no
    }
}

/// Strip a trailing `\n` or `\r\n`
fn trim_line_end(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

impl<R: BufRead> Iterator for Scanner<R> {
    type Item = Result<RawSection, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            self.line.clear();
            match self.reader.read_until(b'\n', &mut self.line) {
                Ok(0) => break,
                Ok(_) => self.line_no += 1,
                Err(source) => {
                    self.failed = true;
                    return Some(Err(ScanError::Io {
                        line: self.line_no + 1,
                        source,
                    }));
                }
            }
            let line = trim_line_end(&self.line);

            if line == BEGIN_DELIMITER.as_bytes() {
                if let Some(dropped) = &self.open {
                    debug!(
                        "Section at line {} restarted at line {} before its end",
                        dropped.line, self.line_no
                    );
                }
                self.open = Some(RawSection {
                    line: self.line_no,
                    data: Vec::new(),
                });
            } else if line == END_DELIMITER.as_bytes() {
                match self.open.take() {
                    Some(section) => {
                        debug!(
                            "Section at line {} complete ({} bytes)",
                            section.line,
                            section.data.len()
                        );
                        return Some(Ok(section));
                    }
                    None => debug!("Ignoring end delimiter at line {}", self.line_no),
                }
            } else if let Some(section) = &mut self.open {
                section.data.extend_from_slice(line);
            }
        }

        if let Some(section) = self.open.take() {
            debug!(
                "Section at line {} has no end delimiter, skipping",
                section.line
            );
        }

        None
    }
}

/// Decode every completed section, handing each result to `handle`.
///
/// Decode failures are logged and passed on; they never stop the scan. A read
/// failure on the input, or an error returned by `handle`, ends it early.
pub fn scan_sections<R, F, E>(reader: R, mut handle: F) -> Result<ScanSummary, E>
where
    R: BufRead,
    F: FnMut(Result<Section, SectionError>) -> Result<(), E>,
    E: From<ScanError>,
{
    let mut summary = ScanSummary::default();

    for raw in Scanner::new(reader) {
        let result = raw?.decode();

        match &result {
            Ok(section) => {
                debug!("Decoded section {:?} ({} bytes)", section.name, section.data.len());
                summary.decoded += 1;
            }
            Err(e) => {
                warn!("Error decoding {}", e);
                summary.failed += 1;
            }
        }

        handle(result)?;
    }

    Ok(summary)
}
