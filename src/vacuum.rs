//! Vacuum operations for database maintenance.
//!
//! Vacuum rebuilds the SQLite file to drop the free pages left behind by
//! deletes, then truncates the write-ahead log.

use crate::store::Store;
use eyre::{Context, Result};

/// Result of a vacuum operation.
#[derive(Debug)]
pub struct VacuumResult {
    /// Pages in the database before vacuum.
    pub page_count_before: u64,
    /// Pages in the database after vacuum.
    pub page_count_after: u64,
    /// Free pages that were waiting to be reclaimed.
    pub freelist_before: u64,
}

impl Store {
    /// Compact the database file.
    ///
    /// Runs outside of any transaction; the lifecycle operations always commit
    /// before returning, so this is safe to call between them.
    pub fn vacuum(&self) -> Result<VacuumResult> {
        let storage = self.storage();

        let page_count_before = storage.page_count()?;
        let freelist_before = storage.freelist_count()?;

        storage.vacuum().context("Failed to compact task database")?;

        let page_count_after = storage.page_count()?;

        log::info!(
            "Vacuumed {}: {} -> {} pages ({} free before)",
            storage.path().display(),
            page_count_before,
            page_count_after,
            freelist_before
        );

        Ok(VacuumResult {
            page_count_before,
            page_count_after,
            freelist_before,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::StoreQueryExt;
    use tempfile::TempDir;

    #[test]
    fn test_vacuum_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::open(temp_dir.path().join("tasks.db")).unwrap();

        let result = store.vacuum().unwrap();

        assert_eq!(result.freelist_before, 0);
        assert!(result.page_count_after <= result.page_count_before);
    }

    #[test]
    fn test_vacuum_reclaims_purged_pages() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open(temp_dir.path().join("tasks.db")).unwrap();

        for i in 0..500 {
            store.add(&format!("{:03} {}", i, "x".repeat(90))).unwrap();
        }
        assert_eq!(store.purge(true, false).unwrap(), 500);

        let result = store.vacuum().unwrap();

        assert!(result.freelist_before > 0);
        assert!(result.page_count_after < result.page_count_before);
        assert_eq!(store.storage().freelist_count().unwrap(), 0);
        assert!(store.tasks(true).unwrap().is_empty());
    }

    #[test]
    fn test_vacuum_keeps_live_rows() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = Store::open(temp_dir.path().join("tasks.db")).unwrap();

        store.add("Survivor").unwrap();
        store.vacuum().unwrap();

        assert_eq!(store.list_pending().unwrap(), vec!["Survivor"]);
    }
}
