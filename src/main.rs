//! mdlive - Live preview server for pandoc markdown.

mod actor;
mod bibliography;
mod cache;
mod cli;
mod config;
mod convert;
mod core;
mod logger;
mod utils;
mod viewer;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::Cli;
use config::PreviewConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = PreviewConfig::load(&cli)?;
    cli::serve::serve(config)
}
