//! Section extraction: scan an archive and print or save each section.

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use supout::{ScanSummary, Section};

/// What to do with each decoded section
#[derive(Debug, Default)]
pub struct ExtractOptions {
    /// Print names only
    pub list: bool,
    /// Keep only these section names (all when empty)
    pub sections: Vec<String>,
    /// Write sections to files here instead of `out`
    pub output_dir: Option<PathBuf>,
}

impl ExtractOptions {
    fn wants(&self, name: &str) -> bool {
        self.sections.is_empty() || self.sections.iter().any(|s| s == name)
    }
}

/// Open `input` and extract its sections
pub fn run<W: Write>(input: &Path, options: &ExtractOptions, out: &mut W) -> Result<ScanSummary> {
    let file =
        File::open(input).with_context(|| format!("Failed to open {}", input.display()))?;

    extract(BufReader::new(file), options, out)
        .with_context(|| format!("Failed to extract {}", input.display()))
}

/// Extract sections from an open reader.
///
/// Sections that fail to decode are logged and skipped; only read and write
/// failures end the run.
pub fn extract<R: BufRead, W: Write>(
    reader: R,
    options: &ExtractOptions,
    out: &mut W,
) -> Result<ScanSummary> {
    let mut files = FileNamer::default();

    if let Some(dir) = &options.output_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let summary = supout::scan_sections(reader, |result| -> Result<()> {
        // Failures are already logged by the scan
        let Ok(section) = result else {
            return Ok(());
        };

        if !options.wants(&section.name) {
            return Ok(());
        }

        if options.list {
            writeln!(out, "{}", section.name)?;
        } else if let Some(dir) = &options.output_dir {
            let path = dir.join(files.file_name(&section.name));
            fs::write(&path, &section.data)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote section {:?} to {}", section.name, path.display());
        } else {
            print_section(out, &section)?;
        }

        Ok(())
    })?;

    out.flush()?;
    info!(
        "{} section(s) decoded, {} failed",
        summary.decoded, summary.failed
    );

    Ok(summary)
}

/// Header line, payload text, blank separator
fn print_section<W: Write>(out: &mut W, section: &Section) -> std::io::Result<()> {
    writeln!(out, "== SECTION {}", section.name)?;
    writeln!(out, "{}", section.text())?;
    writeln!(out)
}

/// Maps section names to unique, filesystem-safe file names
#[derive(Default)]
struct FileNamer {
    used: HashSet<String>,
}

impl FileNamer {
    fn file_name(&mut self, name: &str) -> String {
        let stem = sanitize(name);
        let mut candidate = format!("{}.txt", stem);
        let mut n = 2;
        while !self.used.insert(candidate.clone()) {
            candidate = format!("{}-{}.txt", stem, n);
            n += 1;
        }
        candidate
    }
}

fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() || cleaned.starts_with('.') {
        format!("section{}", cleaned)
    } else {
        cleaned
    }
}
