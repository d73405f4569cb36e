//! Reading and atomically replacing the JSON files behind the local store
//!
//! Failures come back as `StoreError` so a failed write inside a commit is
//! classified the same way as any other backend failure.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use super::document::{StoreError, StoreErrorCode};

fn io_failure(action: &str, path: &Path, err: io::Error) -> StoreError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => StoreErrorCode::PermissionDenied,
        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => {
            StoreErrorCode::Unavailable
        }
        _ => StoreErrorCode::Internal,
    };
    StoreError::new(code, format!("failed to {} {}: {}", action, path.display(), err))
}

/// Sibling path the new contents are staged in before the rename
pub fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Load a JSON file, `None` when it doesn't exist yet
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(io_failure("open", path, e)),
    };

    serde_json::from_reader(BufReader::new(file))
        .map(Some)
        .map_err(|e| {
            StoreError::new(
                StoreErrorCode::Internal,
                format!("corrupt store file {}: {}", path.display(), e),
            )
        })
}

/// Replace `path` with `data` via a staged sibling file and a rename
///
/// Readers see either the old contents or the new ones, never a mix.
pub fn write_atomic<T: Serialize>(path: &Path, data: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| io_failure("create directory", parent, e))?;
    }

    let staged = staging_path(path);
    let written = File::create(&staged)
        .map_err(|e| io_failure("create", &staged, e))
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, data).map_err(|e| {
                StoreError::new(StoreErrorCode::InvalidArgument, format!("unserializable data: {}", e))
            })?;
            writer.flush().map_err(|e| io_failure("flush", &staged, e))?;
            writer
                .get_ref()
                .sync_all()
                .map_err(|e| io_failure("sync", &staged, e))
        })
        .and_then(|()| fs::rename(&staged, path).map_err(|e| io_failure("replace", path, e)));

    if written.is_err() && staged.is_file() {
        let _ = fs::remove_file(&staged);
    }
    written
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct Snapshot {
        label: String,
        documents: u32,
    }

    #[test]
    fn test_missing_file_loads_as_none() {
        let temp_dir = TempDir::new().unwrap();
        let loaded: Option<Snapshot> = load_json(&temp_dir.path().join("store.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_write_creates_parents_and_cleans_staging() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("store.json");
        let data = Snapshot {
            label: "journal".to_string(),
            documents: 7,
        };

        write_atomic(&path, &data).unwrap();
        assert!(!staging_path(&path).exists());
        assert_eq!(load_json::<Snapshot>(&path).unwrap(), Some(data));
    }

    #[test]
    fn test_blocked_staging_path_fails_and_keeps_old_contents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        let old = Snapshot {
            label: "old".to_string(),
            documents: 1,
        };
        write_atomic(&path, &old).unwrap();
        fs::create_dir(staging_path(&path)).unwrap();

        let err = write_atomic(&path, &Snapshot::default()).unwrap_err();
        assert!(!err.is_transient());
        assert!(staging_path(&path).is_dir());
        assert_eq!(load_json::<Snapshot>(&path).unwrap(), Some(old));
    }

    #[test]
    fn test_corrupt_file_is_an_internal_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("store.json");
        fs::write(&path, "not json at all").unwrap();

        let err = load_json::<Snapshot>(&path).unwrap_err();
        assert_eq!(err.code, StoreErrorCode::Internal);
        assert!(err.message.contains("corrupt store file"));
    }
}
