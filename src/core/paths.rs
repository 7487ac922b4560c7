use crate::defaults::CONFIG_FILE_NAMES;
use crate::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Base sheetsite config directory (universal ~/.config/sheetsite/ on all platforms)
pub fn sheetsite() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("sheetsite"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("sheetsite"))
    }
}

/// Global sheetsite.json config file path
pub fn global_config() -> Result<PathBuf> {
    Ok(sheetsite()?.join("sheetsite.json"))
}

/// First config file found in `dir`, in `CONFIG_FILE_NAMES` order.
pub fn local_config(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Resolve which config file to load.
///
/// An explicit path wins; otherwise the working directory is searched, then
/// the global file. Returns `None` when nothing exists.
pub fn discover_config(explicit: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    local_config(cwd).or_else(|| global_config().ok().filter(|p| p.is_file()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_is_returned_even_if_missing() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("custom.toml");
        assert_eq!(
            discover_config(Some(&explicit), dir.path()),
            Some(explicit.clone())
        );
    }

    #[test]
    fn json_preferred_over_toml_in_same_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sheetsite.toml"), "").unwrap();
        std::fs::write(dir.path().join("sheetsite.json"), "{}").unwrap();

        assert_eq!(
            local_config(dir.path()),
            Some(dir.path().join("sheetsite.json"))
        );
    }

    #[test]
    fn toml_found_when_alone() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sheetsite.toml"), "").unwrap();
        assert_eq!(
            local_config(dir.path()),
            Some(dir.path().join("sheetsite.toml"))
        );
    }
}
