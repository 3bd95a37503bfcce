//! Atomic file write helpers.
//!
//! Writes go to a temp file in the destination directory and are renamed into
//! place. Readers either see the previous file or the complete new one.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileSync {
    /// `fsync` the temp file before renaming.
    SyncAll,
    SkipSync,
}

#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    pub sync: FileSync,
    /// Unix permission bits applied to the persisted file. Ignored elsewhere.
    pub mode: Option<u32>,
    /// Create missing parent directories.
    pub create_parents: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            sync: FileSync::SyncAll,
            mode: None,
            create_parents: true,
        }
    }
}

pub fn atomic_write(path: impl AsRef<Path>, bytes: &[u8]) -> io::Result<()> {
    atomic_write_with_options(path, bytes, WriteOptions::default())
}

pub fn atomic_write_with_options(
    path: impl AsRef<Path>,
    bytes: &[u8],
    options: WriteOptions,
) -> io::Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if options.create_parents {
        fs::create_dir_all(parent)?;
    }

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    if options.sync == FileSync::SyncAll {
        tmp.as_file().sync_all()?;
    }

    // Windows refuses to rename over an existing file.
    if let Err(err) = tmp.persist(path) {
        if !path.exists() {
            return Err(err.error);
        }
        fs::remove_file(path)?;
        err.file.persist(path).map_err(|e| e.error)?;
        tracing::debug!(path = %path.display(), "Replaced existing file after rename conflict");
    }

    #[cfg(unix)]
    if let Some(mode) = options.mode {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode))?;
    }

    Ok(())
}
