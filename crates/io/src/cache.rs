//! Memoized record loading.
//!
//! A loaded table is reused until the file's modification time or length
//! changes. Entries are immutable and handed out as `Arc`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use once_cell::sync::Lazy;
use parking_lot::Mutex;

use clvchat_engine::{CoercionReport, RecordTable};

use crate::error::LoadError;

/// A cleaned table together with where it came from.
#[derive(Debug)]
pub struct LoadedTable {
    pub path: PathBuf,
    pub table: RecordTable,
    pub report: CoercionReport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Fingerprint {
    modified: Option<SystemTime>,
    len: u64,
    delimiter: Option<u8>,
}

#[derive(Default)]
pub struct TableCache {
    entries: Mutex<HashMap<PathBuf, (Fingerprint, Arc<LoadedTable>)>>,
}

static GLOBAL: Lazy<TableCache> = Lazy::new(TableCache::new);

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide cache.
    pub fn global() -> &'static TableCache {
        &GLOBAL
    }

    /// Return the cached table for `path`, loading it on first use or when
    /// the file changed since it was cached.
    pub fn get_or_load(&self, path: &Path, delimiter: Option<u8>) -> Result<Arc<LoadedTable>, LoadError> {
        let fingerprint = fingerprint(path, delimiter)?;
        let key = path.to_path_buf();

        if let Some((cached, table)) = self.entries.lock().get(&key) {
            if *cached == fingerprint {
                log::debug!("cache hit for {}", path.display());
                return Ok(Arc::clone(table));
            }
        }

        log::debug!("cache miss for {}", path.display());
        let prepared = crate::csv::load(path, delimiter)?;
        let loaded = Arc::new(LoadedTable {
            path: key.clone(),
            table: prepared.table,
            report: prepared.report,
        });
        self.entries.lock().insert(key, (fingerprint, Arc::clone(&loaded)));
        Ok(loaded)
    }

    pub fn invalidate(&self, path: &Path) {
        self.entries.lock().remove(path);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

fn fingerprint(path: &Path, delimiter: Option<u8>) -> Result<Fingerprint, LoadError> {
    let meta = std::fs::metadata(path).map_err(|e| LoadError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(Fingerprint {
        modified: meta.modified().ok(),
        len: meta.len(),
        delimiter,
    })
}
