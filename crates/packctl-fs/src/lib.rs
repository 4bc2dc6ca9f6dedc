//! Safe file replacement for pack files.
//!
//! Every rewrite goes through a sibling `<name>.tmp` file that is renamed over
//! the destination only after the full content has been written and flushed.
//! POSIX rename is atomic within the same filesystem, so readers of the
//! canonical path see either the old content or the new content, never a mix.

use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write temporary file {path}: {source}")]
    WriteTemp {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to replace {path} with {tmp}: {source}")]
    Replace {
        path: PathBuf,
        tmp: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Sibling temp path used while rewriting `path`: `values.yaml` → `values.yaml.tmp`.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name: OsString = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("file"));
    name.push(".tmp");
    path.with_file_name(name)
}

/// Read a whole file, annotating errors with the path.
pub fn read_to_string(path: &Path) -> Result<String, FsError> {
    fs::read_to_string(path).map_err(|source| FsError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `content` to `path` atomically: write to the sibling temp file, then rename.
pub fn atomic_write(path: &Path, content: &str) -> Result<(), FsError> {
    atomic_write_with(path, content, |tmp, dst| fs::rename(tmp, dst))
}

/// Like [`atomic_write`], with the final replace step supplied by the caller.
///
/// If `replace` fails the temp file is removed and the destination is left as it was.
pub fn atomic_write_with<F>(path: &Path, content: &str, replace: F) -> Result<(), FsError>
where
    F: FnOnce(&Path, &Path) -> io::Result<()>,
{
    let tmp = temp_path_for(path);
    if let Err(source) = write_synced(&tmp, content) {
        let _ = fs::remove_file(&tmp);
        return Err(FsError::WriteTemp { path: tmp, source });
    }
    if let Err(source) = replace(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(FsError::Replace {
            path: path.to_path_buf(),
            tmp,
            source,
        });
    }
    tracing::debug!("Replaced {} atomically", path.display());
    Ok(())
}

fn write_synced(path: &Path, content: &str) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()
}
