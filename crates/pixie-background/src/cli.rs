use std::path::PathBuf;

use clap::Parser;

/// Background coordinator for the PixieBrix action panel.
///
/// Reads messenger requests as JSON lines on stdin and writes responses and
/// host calls as JSON lines on stdout.
#[derive(Parser, Debug)]
#[command(name = "pixie-background", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter directive override (e.g. `pixie=debug`).
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}
