//! File helpers shared by the stores and config loader.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{LedgerError, Result};

/// Maximum file size that can be read into memory (10 MB).
///
/// A grade history is a few kilobytes; anything near this limit is not a
/// file we wrote.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024; // 10 MB

/// Read a file into a string, refusing files over [`MAX_FILE_SIZE`].
pub fn read_to_string_limited(path: &Path) -> Result<String> {
    read_to_string_with_limit(path, MAX_FILE_SIZE)
}

/// Read a file into a string with a custom size limit.
///
/// # Errors
///
/// Returns a storage error if the file cannot be read or exceeds `max_size`.
pub fn read_to_string_with_limit(path: &Path, max_size: u64) -> Result<String> {
    let metadata = fs::metadata(path).map_err(|e| LedgerError::storage(path, e))?;

    let size = metadata.len();
    if size > max_size {
        return Err(LedgerError::storage(
            path,
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("file is too large ({size} bytes, max {max_size} bytes)"),
            ),
        ));
    }

    fs::read_to_string(path).map_err(|e| LedgerError::storage(path, e))
}

/// Replace `path` with `content` via temp file + rename.
///
/// The temp file lives next to the target so the rename stays on one
/// filesystem. Parent directories are created as needed.
pub fn atomic_write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| LedgerError::storage(parent, e))?;
        }
    }

    let temp_path = temp_path_for(path);
    {
        let mut file =
            fs::File::create(&temp_path).map_err(|e| LedgerError::storage(&temp_path, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| LedgerError::storage(&temp_path, e))?;
        file.sync_all()
            .map_err(|e| LedgerError::storage(&temp_path, e))?;
    }

    // Rename temp file to final path (atomic on POSIX)
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(LedgerError::storage(path, e));
    }
    Ok(())
}

/// `dir/.name.tmp` for `dir/name`.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_read_to_string_limited_success() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("test.txt");
        fs::write(&path, "Hello, world!").unwrap();

        assert_eq!(read_to_string_limited(&path).unwrap(), "Hello, world!");
    }

    #[test]
    fn test_read_to_string_limited_nonexistent() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nonexistent.txt");

        let err = read_to_string_limited(&path).unwrap_err();
        assert!(matches!(err, LedgerError::Storage { .. }));
    }

    #[test]
    fn test_read_to_string_with_limit_boundary() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("boundary.txt");
        fs::write(&path, "x".repeat(100)).unwrap();

        assert!(read_to_string_with_limit(&path, 100).is_ok());

        let err = read_to_string_with_limit(&path, 99).unwrap_err().to_string();
        assert!(err.contains("too large"));
        assert!(err.contains("100 bytes"));
    }

    #[test]
    fn test_atomic_write_creates_parents_and_cleans_temp() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("data.json");

        atomic_write(&path, "{}").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_atomic_write_overwrites() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data.json");

        atomic_write(&path, "first").unwrap();
        atomic_write(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_temp_path_for() {
        let path = Path::new("/tmp/grades/grade_data.json");
        assert_eq!(
            temp_path_for(path),
            PathBuf::from("/tmp/grades/.grade_data.json.tmp")
        );
    }
}
