use std::io;
use std::path::PathBuf;

use crate::capability::Direction;
use crate::format::ArchiveFormat;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unrecognized archive format: {0}")]
    UnknownFormat(String),

    #[error("{format} is not supported for {direction}")]
    Unsupported {
        format: ArchiveFormat,
        direction: Direction,
    },

    #[error("source path does not exist: {path}")]
    MissingSource { path: PathBuf, source: io::Error },

    #[error("{format} compresses a single file; {path} is a directory")]
    SingleFileOnly {
        format: ArchiveFormat,
        path: PathBuf,
    },

    #[error("failed to create directory {path}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("7z archive error: {0}")]
    SevenZ(#[from] sevenz_rust::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
