//! Command-line interface

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::CliOverrides;
use crate::convert::DEFAULT_DPI;

/// Process exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const INPUT_NOT_FOUND: i32 = 2;
}

/// Upload server for documents scanned with the phone app
#[derive(Debug, Parser)]
#[command(name = "phone-scanner", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Run the upload server (default when no command is given)
    Serve(ServeArgs),
    /// Convert an image file to PDF
    Convert(ConvertArgs),
    /// List uploaded files, newest first
    List(ListArgs),
    /// Show network and configuration info
    Info(InfoArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct ServeArgs {
    /// Port to listen on [default: 5000]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Address to bind to [default: 0.0.0.0]
    #[arg(short, long)]
    pub bind: Option<String>,

    /// Directory where uploads are stored [default: ./uploads]
    #[arg(short = 'd', long)]
    pub upload_dir: Option<PathBuf>,

    /// Maximum upload size in MB [default: 100]
    #[arg(long)]
    pub upload_limit: Option<usize>,

    /// Resolution recorded in converted PDFs [default: 100]
    #[arg(long)]
    pub dpi: Option<f32>,

    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl ServeArgs {
    /// Overrides for the values given on the command line
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            port: self.port,
            bind: self.bind.clone(),
            upload_dir: self.upload_dir.clone(),
            upload_limit_mb: self.upload_limit,
            dpi: self.dpi,
            ..CliOverrides::default()
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct ConvertArgs {
    /// Image file to convert
    pub input: PathBuf,

    /// Output PDF path [default: input with .pdf extension]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Resolution recorded in the PDF
    #[arg(long, default_value_t = DEFAULT_DPI)]
    pub dpi: f32,
}

#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Upload directory [default: from config, ./uploads]
    #[arg(short = 'd', long)]
    pub upload_dir: Option<PathBuf>,

    /// Show at most N files
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Print as JSON
    #[arg(long)]
    pub json: bool,

    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct InfoArgs {
    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Log level for a `-v` count, if it raises the default
pub fn verbosity_level(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("debug"),
        _ => Some("trace"),
    }
}
