//! Infrastructure implementation of the `Archiver` port using in-memory zip
//! bundles.
//!
//! Packing walks the save directory and deflates every regular file into a
//! single `Vec<u8>`; nothing is staged on disk. The actual compression runs
//! on the blocking pool so the watch loop (or a GUI event loop driving the
//! library) is never stalled by CPU work.

use std::fs::{self, File};
use std::io::{Cursor, Read};
use std::path::Path;

use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::application::ports::Archiver;
use crate::domain::ArchiveError;

/// Zip-backed [`Archiver`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ZipArchiver;

impl Archiver for ZipArchiver {
    async fn pack(&self, root: &Path) -> Result<Vec<u8>, ArchiveError> {
        let root = root.to_path_buf();
        tokio::task::spawn_blocking(move || pack_sync(&root))
            .await
            .map_err(|e| ArchiveError::Worker(e.to_string()))?
    }

    async fn unpack(&self, bytes: Vec<u8>, dest: &Path) -> Result<(), ArchiveError> {
        let dest = dest.to_path_buf();
        tokio::task::spawn_blocking(move || unpack_sync(&bytes, &dest))
            .await
            .map_err(|e| ArchiveError::Worker(e.to_string()))?
    }
}

/// Walk `root` and produce a zip bundle of relative paths.
///
/// Symlinks are skipped (never followed, never archived) so successive runs
/// of the same tree always produce the same entry set. Empty directories are
/// preserved.
///
/// # Errors
///
/// Returns [`ArchiveError::MissingRoot`] if `root` is not a directory, or a
/// read/write error for an unreadable entry. Never yields partial output.
pub fn pack_sync(root: &Path) -> Result<Vec<u8>, ArchiveError> {
    if !root.is_dir() {
        return Err(ArchiveError::MissingRoot(root.to_path_buf()));
    }

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

    for entry in WalkDir::new(root).follow_links(false).min_depth(1) {
        let entry = entry.map_err(|e| ArchiveError::Read {
            path: e.path().unwrap_or(root).to_path_buf(),
            source: e.into(),
        })?;
        let path = entry.path();
        let name = relative_name(root, path)?;

        if entry.file_type().is_dir() {
            writer
                .add_directory(name.as_str(), entry_options())
                .map_err(|e| write_error(path, e))?;
        } else if entry.file_type().is_file() {
            writer
                .start_file(name.as_str(), entry_options())
                .map_err(|e| write_error(path, e))?;
            let mut file = File::open(path).map_err(|e| ArchiveError::Read {
                path: path.to_path_buf(),
                source: e,
            })?;
            std::io::copy(&mut file, &mut writer).map_err(|e| ArchiveError::Read {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
        // Symlinks fall through: skipped by policy.
    }

    let cursor = writer
        .finish()
        .map_err(|e| write_error(root, e))?;
    Ok(cursor.into_inner())
}

/// Expand a zip bundle into `dest`, creating it if absent.
///
/// Each entry is read fully into memory before its file is written, so a
/// failure mid-extraction never leaves a truncated file behind; the file
/// being written when an error occurs is removed.
///
/// # Errors
///
/// Returns [`ArchiveError::Corrupt`] for malformed input (including entries
/// that would escape `dest`) or a write error for the destination.
pub fn unpack_sync(bytes: &[u8], dest: &Path) -> Result<(), ArchiveError> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| ArchiveError::Corrupt(e.to_string()))?;

    fs::create_dir_all(dest).map_err(|e| ArchiveError::Write {
        path: dest.to_path_buf(),
        source: e,
    })?;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| ArchiveError::Corrupt(e.to_string()))?;
        let Some(relative) = entry.enclosed_name() else {
            return Err(ArchiveError::Corrupt(format!(
                "entry '{}' escapes the destination",
                entry.name()
            )));
        };
        let out = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out).map_err(|e| ArchiveError::Write {
                path: out.clone(),
                source: e,
            })?;
            continue;
        }
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent).map_err(|e| ArchiveError::Write {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut data = Vec::with_capacity(usize::try_from(entry.size()).unwrap_or(0));
        entry
            .read_to_end(&mut data)
            .map_err(|e| ArchiveError::Corrupt(format!("entry '{}': {e}", entry.name())))?;

        if let Err(e) = fs::write(&out, &data) {
            let _ = fs::remove_file(&out);
            return Err(ArchiveError::Write {
                path: out,
                source: e,
            });
        }
    }

    Ok(())
}

/// Forward-slash relative entry name, regardless of host separator.
fn relative_name(root: &Path, path: &Path) -> Result<String, ArchiveError> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| ArchiveError::Corrupt(format!("'{}' is outside the root", path.display())))?;
    Ok(relative
        .iter()
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join("/"))
}

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

fn write_error(path: &Path, e: zip::result::ZipError) -> ArchiveError {
    ArchiveError::Write {
        path: path.to_path_buf(),
        source: std::io::Error::other(e),
    }
}
