//! Pack a file or directory tree into an archive

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::capability::{self, Direction};
use crate::codec::TarCodec;
use crate::error::{Error, Result};
use crate::format::{detect_format, file_name_of, ArchiveFormat};

/// Compress `source` (a file or directory) into `output`, choosing the
/// format from `output`'s suffix.
///
/// Fails before creating `output` when the suffix is unrecognized, the
/// source is missing, or a single-file format is given a directory.
pub fn pack(output: &Path, source: &Path) -> Result<()> {
    let format = detect_format(&file_name_of(output))
        .ok_or_else(|| Error::UnknownFormat(output.display().to_string()))?;

    let metadata = fs::metadata(source).map_err(|err| Error::MissingSource {
        path: source.to_path_buf(),
        source: err,
    })?;

    if format.is_single_file() && metadata.is_dir() {
        return Err(Error::SingleFileOnly {
            format,
            path: source.to_path_buf(),
        });
    }

    match format {
        ArchiveFormat::Zip => pack_zip(output, source),
        ArchiveFormat::Tar => pack_tar_with(output, source, TarCodec::Plain),
        ArchiveFormat::TarGz => pack_tar_with(output, source, TarCodec::Gzip),
        ArchiveFormat::Gz => pack_gz(output, source),
        ArchiveFormat::TarBz2
        | ArchiveFormat::TarXz
        | ArchiveFormat::Bz2
        | ArchiveFormat::SevenZ => capability::run(format, Direction::Pack, output, source),
    }
}

fn pack_zip(output: &Path, source: &Path) -> Result<()> {
    let file = File::create(output)?;
    let mut writer = ZipWriter::new(file);
    let base = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(source).min_depth(1) {
        let entry = entry.map_err(io::Error::from)?;
        let Ok(rel) = entry.path().strip_prefix(source) else {
            continue;
        };
        let name = slash_name(rel);
        let options = entry_options(base, entry.path());

        if entry.file_type().is_dir() {
            // zip wants directory names slash-terminated
            writer.add_directory(format!("{name}/"), options)?;
        } else if entry.file_type().is_file() {
            writer.start_file(name, options)?;
            let mut input = File::open(entry.path())?;
            io::copy(&mut input, &mut writer)?;
        }
    }

    writer.finish()?;
    Ok(())
}

/// Walk `source` and append every file and directory below it to a tar
/// archive at `output`, compressed with `codec`. The source root itself is
/// not an entry.
pub(crate) fn pack_tar_with(output: &Path, source: &Path, codec: TarCodec) -> Result<()> {
    let file = File::create(output)?;
    let mut builder = tar::Builder::new(codec.writer(BufWriter::new(file)));

    for entry in WalkDir::new(source).min_depth(1) {
        let entry = entry.map_err(io::Error::from)?;
        let Ok(rel) = entry.path().strip_prefix(source) else {
            continue;
        };

        if entry.file_type().is_dir() {
            builder.append_dir(rel, entry.path())?;
        } else if entry.file_type().is_file() {
            let mut input = File::open(entry.path())?;
            builder.append_file(rel, &mut input)?;
        }
    }

    let mut inner = builder.into_inner()?.finish()?;
    inner.flush()?;
    Ok(())
}

fn pack_gz(output: &Path, source: &Path) -> Result<()> {
    let mut input = File::open(source)?;
    let out = File::create(output)?;
    let mut encoder =
        flate2::write::GzEncoder::new(BufWriter::new(out), flate2::Compression::default());
    io::copy(&mut input, &mut encoder)?;
    encoder.finish()?.flush()?;
    Ok(())
}

/// Forward-slash entry name for a relative path, independent of the host
/// separator.
fn slash_name(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(unix)]
fn entry_options(base: SimpleFileOptions, path: &Path) -> SimpleFileOptions {
    use std::os::unix::fs::PermissionsExt;
    match path.metadata() {
        Ok(meta) => base.unix_permissions(meta.permissions().mode()),
        Err(_) => base,
    }
}

#[cfg(not(unix))]
fn entry_options(base: SimpleFileOptions, _path: &Path) -> SimpleFileOptions {
    base
}
