//! CLI argument definitions for supout

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "supout")]
#[command(about = "Extract and decompress sections from a RouterOS supout.rif file", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to supout.rif file
    pub input: PathBuf,

    /// Only print section names
    #[arg(short, long)]
    pub list: bool,

    /// Only output sections with this name (repeatable)
    #[arg(short, long = "section", value_name = "NAME")]
    pub sections: Vec<String>,

    /// Write each section to DIR/<name>.txt instead of stdout
    #[arg(short, long, value_name = "DIR", env = "SUPOUT_OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Config file (defaults to <config dir>/supout/config.toml)
    #[arg(long, value_name = "FILE", env = "SUPOUT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Default log filter for the chosen verbosity
    pub fn log_filter(&self) -> String {
        let level = match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        };
        format!("supout={},supout_cli={}", level, level)
    }
}
