//! Whole-file JSON persistence.
//!
//! Files are rewritten in full through a temp file in the same directory that
//! is renamed over the target, so readers never observe a partial write.
//! Serialising concurrent writers is left to the caller.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::Write;
use std::path::Path;

/// Read `path`, treating a missing or corrupt file as `T::default()`.
///
/// Corruption is logged at `warn`.
pub fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match std::fs::read(path) {
        Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), "corrupt JSON file, starting empty: {e}");
            T::default()
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => T::default(),
        Err(e) => {
            tracing::warn!(path = %path.display(), "unreadable JSON file, starting empty: {e}");
            T::default()
        }
    }
}

/// Atomically replace `path` with the pretty-printed JSON of `value`.
pub fn write_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let json = serde_json::to_vec_pretty(value)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&json)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_corrupt_files_read_as_default() {
        let dir = tempfile::tempdir().unwrap();
        let missing: Vec<String> = load_or_default(&dir.path().join("none.json"));
        assert!(missing.is_empty());

        let corrupt = dir.path().join("bad.json");
        std::fs::write(&corrupt, b"[1, 2,").unwrap();
        let parsed: Vec<u32> = load_or_default(&corrupt);
        assert!(parsed.is_empty());
    }

    #[test]
    fn write_replaces_whole_file_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("items.json");
        write_atomic(&path, &vec!["a", "b", "c"]).unwrap();
        write_atomic(&path, &vec!["z"]).unwrap();

        let back: Vec<String> = load_or_default(&path);
        assert_eq!(back, vec!["z"]);
        let files = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(files, 1);
    }
}
