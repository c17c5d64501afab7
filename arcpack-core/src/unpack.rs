//! Unpack an archive into a directory tree

use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::path::{Component, Path, PathBuf};

use bzip2::read::BzDecoder;
use flate2::read::GzDecoder;

use crate::capability::{self, Direction};
use crate::codec::TarCodec;
use crate::error::{Error, Result};
use crate::format::{base_prefix, detect_format, file_name_of, ArchiveFormat};
use crate::layout;

/// Unpack `archive` into a directory named after it (recognized suffix
/// stripped), created in the current working directory. Returns the
/// destination directory.
pub fn unpack(archive: &Path) -> Result<PathBuf> {
    let file_name = file_name_of(archive);
    let format = detect_format(&file_name)
        .ok_or_else(|| Error::UnknownFormat(archive.display().to_string()))?;
    let dest = PathBuf::from(base_prefix(&file_name));
    unpack_with(archive, &dest, format)?;
    Ok(dest)
}

/// Unpack `archive` into `dest`, creating it if absent.
pub fn unpack_into(archive: &Path, dest: &Path) -> Result<()> {
    let format = detect_format(&file_name_of(archive))
        .ok_or_else(|| Error::UnknownFormat(archive.display().to_string()))?;
    unpack_with(archive, dest, format)
}

fn unpack_with(archive: &Path, dest: &Path, format: ArchiveFormat) -> Result<()> {
    fs::create_dir_all(dest).map_err(|err| Error::CreateDir {
        path: dest.to_path_buf(),
        source: err,
    })?;

    match format {
        ArchiveFormat::Zip => unpack_zip(archive, dest)?,
        ArchiveFormat::Tar => unpack_tar_with(archive, dest, TarCodec::Plain)?,
        ArchiveFormat::TarGz => unpack_tar_with(archive, dest, TarCodec::Gzip)?,
        ArchiveFormat::TarBz2 => unpack_tar_with(archive, dest, TarCodec::Bzip2)?,
        ArchiveFormat::Gz => unpack_gz(archive, dest)?,
        ArchiveFormat::Bz2 => unpack_bz2(archive, dest)?,
        ArchiveFormat::TarXz | ArchiveFormat::SevenZ => {
            capability::run(format, Direction::Unpack, archive, dest)?
        }
    }

    layout::normalize_layout(dest)
}

fn unpack_zip(archive: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive)?;
    let mut zip = zip::ZipArchive::new(BufReader::new(file))?;

    for index in 0..zip.len() {
        let mut entry = zip.by_index(index)?;
        let Some(rel) = entry.enclosed_name() else {
            log::warn!("skipping zip entry with unsafe name: {}", entry.name());
            continue;
        };
        let target = dest.join(&rel);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = File::create(&target)?;
            io::copy(&mut entry, &mut out)?;
        }

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            set_mode(&target, mode);
        }
    }

    Ok(())
}

/// Sequentially materialize a tar stream under `dest`. Only regular files
/// and directories are written; other entry kinds are skipped.
pub(crate) fn unpack_tar_with(archive: &Path, dest: &Path, codec: TarCodec) -> Result<()> {
    let file = File::open(archive)?;
    let mut tar = tar::Archive::new(codec.reader(BufReader::new(file)));

    for entry in tar.entries()? {
        let mut entry = entry?;
        let rel = entry.path()?.into_owned();
        if !is_safe(&rel) {
            log::warn!("skipping tar entry with unsafe name: {}", rel.display());
            continue;
        }
        let target = dest.join(&rel);

        let kind = entry.header().entry_type();
        if kind.is_dir() {
            fs::create_dir_all(&target)?;
        } else if kind.is_file() {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out = File::create(&target)?;
            io::copy(&mut entry, &mut out)?;
        } else {
            log::debug!("skipping unsupported tar entry: {}", rel.display());
            continue;
        }

        #[cfg(unix)]
        if let Ok(mode) = entry.header().mode() {
            set_mode(&target, mode);
        }
    }

    Ok(())
}

fn unpack_gz(archive: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive)?;
    let mut decoder = GzDecoder::new(BufReader::new(file));

    // The gzip header is parsed on the first read; pull one chunk before
    // asking for the embedded name.
    let mut head = [0u8; 8192];
    let first = decoder.read(&mut head)?;

    let name = decoder
        .header()
        .and_then(|header| header.filename())
        .and_then(|raw| std::str::from_utf8(raw).ok())
        .and_then(|name| Path::new(name).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| base_prefix(&file_name_of(archive)));

    let mut out = File::create(dest.join(name))?;
    out.write_all(&head[..first])?;
    io::copy(&mut decoder, &mut out)?;
    Ok(())
}

fn unpack_bz2(archive: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive)?;
    let mut decoder = BzDecoder::new(BufReader::new(file));

    let name = base_prefix(&file_name_of(archive));
    let mut out = File::create(dest.join(name))?;
    io::copy(&mut decoder, &mut out)?;
    Ok(())
}

/// Entry names must stay below the destination: no absolute paths, no `..`.
fn is_safe(rel: &Path) -> bool {
    rel.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) {
    use std::os::unix::fs::PermissionsExt;
    if let Err(err) = fs::set_permissions(path, fs::Permissions::from_mode(mode)) {
        log::debug!("could not set permissions on {}: {err}", path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safe_names_stay_relative() {
        assert!(is_safe(Path::new("a/b/c.txt")));
        assert!(is_safe(Path::new("./a")));
        assert!(!is_safe(Path::new("../escape")));
        assert!(!is_safe(Path::new("a/../../escape")));
        assert!(!is_safe(Path::new("/etc/passwd")));
    }

    #[test]
    fn unknown_suffix_is_rejected_before_creating_anything() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out");
        let err = unpack_into(&dir.path().join("archive.xyz"), &dest).unwrap_err();
        assert!(matches!(err, Error::UnknownFormat(_)));
        assert!(!dest.exists());
    }
}
