//! Command-line interface for arcpack

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "arcpack")]
#[command(about = "Compress files and directories, extract archives", long_about = None)]
#[command(after_help = "\
Supported formats:
  zip, tar, tar.gz, tar.bz2, tar.xz, gz, bz2, 7z

Examples:
  arcpack pack images.zip folder/
  arcpack pack source.tar.gz folder/
  arcpack unpack archive.zip
  arcpack unpack archive.tar.xz")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compress a file or directory into an archive
    Pack {
        /// Output archive file; the suffix selects the format
        output: PathBuf,

        /// File or directory to compress
        source: PathBuf,
    },

    /// Extract an archive into a directory named after it
    Unpack {
        /// Archive file to extract
        archive: PathBuf,
    },
}
