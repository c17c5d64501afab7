//! Generic archiver capabilities, resolved by format tag
//!
//! Formats without a native adapter (tar.bz2 packing, tar.xz both ways,
//! bz2 packing, 7z both ways) are served by handles looked up here. A
//! format or direction with no handle is a hard error, raised before any
//! output exists.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::codec::TarCodec;
use crate::error::{Error, Result};
use crate::format::ArchiveFormat;
use crate::{pack, unpack};

/// Operation direction a capability may implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Pack,
    Unpack,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pack => "packing",
            Self::Unpack => "unpacking",
        })
    }
}

/// First argument is always the archive file; second is the source tree
/// (pack) or the destination directory (unpack).
type OpFn = fn(&Path, &Path) -> Result<()>;

/// A resolved archiver capability, one optional handle per direction.
pub struct Capability {
    pub pack: Option<OpFn>,
    pub unpack: Option<OpFn>,
}

/// Resolve the archiver capability for a format tag. Formats handled by a
/// native adapter in the relevant direction are not listed for it.
pub fn lookup(format: ArchiveFormat) -> Option<Capability> {
    match format {
        ArchiveFormat::TarBz2 => Some(Capability {
            pack: Some(pack_tar_bz2),
            unpack: None,
        }),
        ArchiveFormat::TarXz => Some(Capability {
            pack: Some(pack_tar_xz),
            unpack: Some(unpack_tar_xz),
        }),
        ArchiveFormat::Bz2 => Some(Capability {
            pack: Some(pack_bz2),
            unpack: None,
        }),
        ArchiveFormat::SevenZ => Some(Capability {
            pack: Some(pack_7z),
            unpack: Some(unpack_7z),
        }),
        ArchiveFormat::Zip | ArchiveFormat::Tar | ArchiveFormat::TarGz | ArchiveFormat::Gz => None,
    }
}

/// Look up and invoke the handle for `format` in `direction`.
pub fn run(
    format: ArchiveFormat,
    direction: Direction,
    archive: &Path,
    path: &Path,
) -> Result<()> {
    let capability = lookup(format).ok_or(Error::Unsupported { format, direction })?;
    let op = match direction {
        Direction::Pack => capability.pack,
        Direction::Unpack => capability.unpack,
    };
    let op = op.ok_or(Error::Unsupported { format, direction })?;
    op(archive, path)
}

fn pack_tar_bz2(output: &Path, source: &Path) -> Result<()> {
    pack::pack_tar_with(output, source, TarCodec::Bzip2)
}

fn pack_tar_xz(output: &Path, source: &Path) -> Result<()> {
    pack::pack_tar_with(output, source, TarCodec::Xz)
}

fn unpack_tar_xz(archive: &Path, dest: &Path) -> Result<()> {
    unpack::unpack_tar_with(archive, dest, TarCodec::Xz)
}

fn pack_bz2(output: &Path, source: &Path) -> Result<()> {
    let mut input = File::open(source)?;
    let out = File::create(output)?;
    let mut encoder =
        bzip2::write::BzEncoder::new(BufWriter::new(out), bzip2::Compression::default());
    io::copy(&mut input, &mut encoder)?;
    encoder.finish()?.flush()?;
    Ok(())
}

fn pack_7z(output: &Path, source: &Path) -> Result<()> {
    sevenz_rust::compress_to_path(source, output)?;
    Ok(())
}

fn unpack_7z(archive: &Path, dest: &Path) -> Result<()> {
    sevenz_rust::decompress_file(archive, dest)?;
    Ok(())
}
