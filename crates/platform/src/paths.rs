//! Path expansion utilities

use crate::error::PlatformError;
use std::path::{Path, PathBuf};

/// Expand a path, resolving `~` to the user's home directory
///
/// # Examples
///
/// ```
/// use aedif_platform::expand_path;
///
/// let path = expand_path("~/.local/bin").unwrap();
/// assert!(path.starts_with(dirs::home_dir().unwrap()));
/// ```
pub fn expand_path<P: AsRef<Path>>(path: P) -> Result<PathBuf, PlatformError> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy();

    if path_str.starts_with("~/") {
        let home = dirs::home_dir().ok_or(PlatformError::NoHomeDirectory)?;
        Ok(home.join(&path_str[2..]))
    } else if path_str == "~" {
        dirs::home_dir().ok_or(PlatformError::NoHomeDirectory)
    } else {
        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_path_unchanged() {
        let path = expand_path("./build").unwrap();
        assert_eq!(path, PathBuf::from("./build"));
    }

    #[test]
    fn test_tilde_expansion() {
        let path = expand_path("~/.local/bin").unwrap();
        assert!(path.ends_with(".local/bin"));
        assert!(!path.to_string_lossy().contains('~'));
    }
}
