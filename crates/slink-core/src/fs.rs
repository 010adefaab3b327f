//! Filesystem utilities for atomic record writes.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Move a finished temp file over `destination`.
///
/// `fs::rename` refuses to replace an existing file on Windows; in that case
/// the destination is removed and the rename tried once more. The temp file
/// never outlives a failure.
pub fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    if let Err(initial_err) = fs::rename(temp_path, destination) {
        let _ = fs::remove_file(destination);
        fs::rename(temp_path, destination).map_err(|retry_err| {
            let _ = fs::remove_file(temp_path);
            io::Error::new(
                retry_err.kind(),
                format!(
                    "Could not move record into place (first: {}, retry: {})",
                    initial_err, retry_err
                ),
            )
        })?;
    }
    Ok(())
}

/// Write `contents` to `destination` via a sibling temp file, so readers
/// never observe a partially written record.
pub fn write_atomic(destination: &Path, contents: &[u8]) -> io::Result<()> {
    let file_name = destination
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "destination has no file name"))?;
    let temp_path = destination.with_file_name(format!(
        ".{}.{}.tmp",
        file_name.to_string_lossy(),
        std::process::id()
    ));

    let written = fs::File::create(&temp_path).and_then(|mut file| {
        file.write_all(contents)?;
        file.sync_all()
    });
    discard_on_error(&temp_path, written)?;

    rename_with_fallback(&temp_path, destination)
}

/// Remove `temp_path` if `result` is a failure, then hand the result back.
fn discard_on_error<T>(temp_path: &Path, result: io::Result<T>) -> io::Result<T> {
    if result.is_err() {
        let _ = fs::remove_file(temp_path);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_rename_overwrites_existing() {
        let dir = tempdir().unwrap();
        let temp = dir.path().join("temp.txt");
        let dest = dir.path().join("dest.txt");

        File::create(&dest).unwrap().write_all(b"old").unwrap();
        File::create(&temp).unwrap().write_all(b"new").unwrap();

        rename_with_fallback(&temp, &dest).unwrap();

        assert!(!temp.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
    }

    #[test]
    fn test_write_atomic_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("abc.patch");

        write_atomic(&dest, b"Subject: [PATCH] slink:{}").unwrap();

        assert_eq!(
            fs::read_to_string(&dest).unwrap(),
            "Subject: [PATCH] slink:{}"
        );
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn test_failed_write_removes_temp_file() {
        let dir = tempdir().unwrap();
        let temp = dir.path().join(".abc.patch.tmp");
        File::create(&temp).unwrap().write_all(b"half a rec").unwrap();

        let failed: io::Result<()> = Err(io::Error::new(io::ErrorKind::Other, "disk full"));
        let err = discard_on_error(&temp, failed).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert!(!temp.exists());
    }

    #[test]
    fn test_successful_write_keeps_temp_file() {
        let dir = tempdir().unwrap();
        let temp = dir.path().join(".abc.patch.tmp");
        File::create(&temp).unwrap();

        discard_on_error(&temp, Ok(())).unwrap();
        assert!(temp.exists());
    }
}
