//! Memoized dataset loading.
//!
//! The source file is read once per process lifetime and re-read only when
//! its identity changes. The stamp is (path, mtime, length); filter state
//! never participates in the key, since filtering is cheap and derived
//! downstream of the immutable dataset.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::data::loader::{LoadedData, load_records};
use crate::error::AppError;

/// Identity of a source file at load time.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SourceStamp {
    path: PathBuf,
    modified: SystemTime,
    len: u64,
}

fn stamp(path: &Path) -> Result<SourceStamp, AppError> {
    let meta = fs::metadata(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to stat dataset '{}': {e}", path.display()),
        )
    })?;
    // Platforms without mtime support fall back to a length-only stamp.
    let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
    Ok(SourceStamp {
        path: path.to_path_buf(),
        modified,
        len: meta.len(),
    })
}

/// Single-entry load cache.
#[derive(Debug, Default)]
pub struct DataCache {
    entry: Option<(SourceStamp, LoadedData)>,
}

impl DataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load through the cache.
    ///
    /// Re-reads only when the source stamp changed since the cached load;
    /// otherwise returns the memoized dataset.
    pub fn load(&mut self, path: &Path) -> Result<&LoadedData, AppError> {
        let current = stamp(path)?;
        let hit = matches!(&self.entry, Some((cached, _)) if *cached == current);

        if !hit {
            let loaded = load_records(path)?;
            self.entry = Some((current, loaded));
        }

        match &self.entry {
            Some((_, loaded)) => Ok(loaded),
            None => Err(AppError::new(4, "Dataset cache entry missing after load.")),
        }
    }

    /// Whether the cache currently holds an entry for `path` that is still
    /// current on disk.
    pub fn is_fresh(&self, path: &Path) -> bool {
        match (&self.entry, stamp(path)) {
            (Some((cached, _)), Ok(current)) => *cached == current,
            _ => false,
        }
    }

    /// Explicit teardown: drop the cached dataset so the next load re-reads
    /// the source.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    const HEADER: &str = "date,vendas_internas,exportacoes,importacoes,consumo_aparente\n";

    fn temp_csv(contents: &str) -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = env::temp_dir().join(format!(
            "sider_cache_test_{}_{id}.csv",
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn second_load_is_a_cache_hit() {
        let path = temp_csv(&format!("{HEADER}2023-01-01,100.0,50.0,20.0,120.0\n"));
        let mut cache = DataCache::new();

        let first_len = cache.load(&path).unwrap().records.len();
        assert!(cache.is_fresh(&path));
        let second_len = cache.load(&path).unwrap().records.len();
        assert_eq!(first_len, second_len);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn changed_source_is_reloaded() {
        let path = temp_csv(&format!("{HEADER}2023-01-01,100.0,50.0,20.0,120.0\n"));
        let mut cache = DataCache::new();
        assert_eq!(cache.load(&path).unwrap().records.len(), 1);

        // Different length guarantees a stamp change even on coarse mtimes.
        fs::write(
            &path,
            format!(
                "{HEADER}2023-01-01,100.0,50.0,20.0,120.0\n2023-02-01,110.0,55.0,22.0,132.0\n"
            ),
        )
        .unwrap();

        assert!(!cache.is_fresh(&path));
        assert_eq!(cache.load(&path).unwrap().records.len(), 2);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn invalidate_forces_reread() {
        let path = temp_csv(&format!("{HEADER}2023-01-01,100.0,50.0,20.0,120.0\n"));
        let mut cache = DataCache::new();
        cache.load(&path).unwrap();
        assert!(cache.is_fresh(&path));

        cache.invalidate();
        assert!(!cache.is_fresh(&path));
        assert_eq!(cache.load(&path).unwrap().records.len(), 1);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let mut cache = DataCache::new();
        let err = cache.load(Path::new("definitely-not-here.csv")).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
