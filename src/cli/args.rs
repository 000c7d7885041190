//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Live preview server for pandoc markdown
#[derive(Parser, Debug, Clone, Default)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: mdlive.toml if present)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Port number for viewer connections
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Directory that requested paths are resolved against
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub home: Option<PathBuf>,

    /// Math rendering option passed to the converter (e.g. mathjax, katex)
    #[arg(short, long)]
    pub math: Option<String>,

    /// Converter program (default: pandoc)
    #[arg(long, value_hint = clap::ValueHint::CommandName)]
    pub converter: Option<String>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}
