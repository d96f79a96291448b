mod cli;
mod config;
mod extract;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use config::Config;
use extract::ExtractOptions;

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Parse errors exit 1 rather than clap's default 2; nothing to do if
            // stderr is gone.
            e.print().ok();
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => std::process::exit(0),
                _ => std::process::exit(1),
            }
        }
    };

    if cli.input.as_os_str().is_empty() {
        eprintln!("Usage: supout /path/to/supout.rif");
        std::process::exit(1);
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load(cli.config.as_deref())?;

    let options = ExtractOptions {
        list: cli.list,
        sections: cli.sections,
        output_dir: cli.output_dir.or(config.output_dir),
    };

    let stdout = std::io::stdout();
    extract::run(&cli.input, &options, &mut stdout.lock())?;

    Ok(())
}
