//! Build-directory layout: the ownership sentinel, the canonical
//! `bin`/`lib`/`obj` tree, and artifact relocation.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::PlatformError;

/// Name of the sentinel file marking a directory as aedif-owned
pub const SENTINEL_FILE: &str = ".aedif";

/// Exact sentinel content. The byte soup is deliberate: a file a user
/// would not produce by accident.
const SENTINEL_BYTES: &[u8] = b"The  \xab aedif\xbc building \t  \xcd tool\xde";

/// Check whether `dir` carries a valid aedif sentinel
pub fn is_aedif_dir(dir: &Path) -> bool {
    match fs::read(dir.join(SENTINEL_FILE)) {
        Ok(bytes) => bytes == SENTINEL_BYTES,
        Err(_) => false,
    }
}

/// Initialize a build directory: `bin/`, `lib/`, `obj/` and the sentinel
pub fn init_build_dir(dir: &Path) -> Result<(), PlatformError> {
    for sub in ["bin", "lib", "obj"] {
        fs::create_dir_all(dir.join(sub))?;
    }
    fs::write(dir.join(SENTINEL_FILE), SENTINEL_BYTES)?;
    debug!("initialized build directory {}", dir.display());
    Ok(())
}

/// Verify an existing directory is aedif-owned, or initialize a fresh one
///
/// A pre-existing directory without a valid sentinel is refused so that
/// aedif never cleans or overwrites a tree it does not own.
pub fn ensure_build_dir(dir: &Path) -> Result<(), PlatformError> {
    if dir.is_dir() {
        if !is_aedif_dir(dir) {
            return Err(PlatformError::ForeignBuildDir(
                dir.to_string_lossy().into_owned(),
            ));
        }
        // Re-create the canonical subtree; a partial clean may have
        // removed parts of it.
        for sub in ["bin", "lib", "obj"] {
            fs::create_dir_all(dir.join(sub))?;
        }
        return Ok(());
    }
    init_build_dir(dir)
}

/// Move `file` into `dest_dir`, keeping its filename
///
/// Uses `rename` and falls back to copy-and-remove when the destination
/// is on another filesystem.
pub fn move_into(file: &Path, dest_dir: &Path) -> Result<PathBuf, PlatformError> {
    let name = file
        .file_name()
        .ok_or_else(|| PlatformError::Io(std::io::Error::other("path has no filename")))?;
    let dest = dest_dir.join(name);

    if fs::rename(file, &dest).is_err() {
        fs::copy(file, &dest)?;
        fs::remove_file(file)?;
    }
    debug!("moved {} -> {}", file.display(), dest.display());
    Ok(dest)
}
