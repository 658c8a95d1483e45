use super::{IndicatorTable, TableError};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

/// Holds the current table snapshot.
///
/// Readers take a cloned `Arc` and keep using it for the rest of their request, so a reload
/// never changes data underneath an in-flight computation.
#[derive(Debug)]
pub struct TableStore {
    current: RwLock<Arc<IndicatorTable>>,
}

impl TableStore {
    pub fn new(table: IndicatorTable) -> Self {
        Self {
            current: RwLock::new(Arc::new(table)),
        }
    }

    pub fn snapshot(&self) -> Arc<IndicatorTable> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swaps in a new table, returning the snapshot it replaced.
    pub fn replace(&self, table: IndicatorTable) -> Arc<IndicatorTable> {
        self.install(Arc::new(table))
    }

    fn install(&self, next: Arc<IndicatorTable>) -> Arc<IndicatorTable> {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *guard, next)
    }

    /// Parses `path` and swaps it in, returning the table this call installed.
    ///
    /// A failed parse leaves the current snapshot untouched.
    pub fn reload_from<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<Arc<IndicatorTable>, TableError> {
        let path = path.as_ref();
        let loaded = Arc::new(IndicatorTable::from_path(path)?);
        self.install(Arc::clone(&loaded));
        info!(path = %path.display(), districts = loaded.len(), "indicator table reloaded");
        Ok(loaded)
    }
}
