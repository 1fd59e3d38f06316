use std::path::PathBuf;

use clap::Parser;

mod app;
mod audio;
mod config;
mod controller;
mod library;
mod logging;
mod runtime;
mod ui;

/// Console music player.
#[derive(Parser, Debug)]
#[command(name = "cadenza", version, about)]
pub struct Args {
    /// Music folders to offer; overrides the folder list file.
    #[arg(value_name = "FOLDER")]
    pub folders: Vec<PathBuf>,

    /// Newline-delimited list of music folders.
    #[arg(long, value_name = "PATH")]
    pub folders_file: Option<PathBuf>,

    /// Directory for the rolling log file.
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Debug-level logging.
    #[arg(long)]
    pub dev: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run(Args::parse())
}
