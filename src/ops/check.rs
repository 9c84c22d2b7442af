use crate::io::store::{Duplicate, ScanFailure, Store, StoreError};

/// Problems found in a store
#[derive(Debug, Default)]
pub struct CheckReport {
    /// Files in either tree that do not parse
    pub failures: Vec<ScanFailure>,
    /// Tasks left in both trees by an interrupted archive
    pub duplicates: Vec<Duplicate>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.duplicates.is_empty()
    }
}

pub fn check_store(store: &Store) -> Result<CheckReport, StoreError> {
    let mut failures = store.scan()?.failures;
    failures.extend(store.scan_archive()?.failures);
    Ok(CheckReport {
        failures,
        duplicates: store.duplicates()?,
    })
}

/// Resolve duplicates by dropping the active copy, then re-check.
pub fn fix_store(store: &Store) -> Result<(Vec<Duplicate>, CheckReport), StoreError> {
    let fixed = store.reconcile()?;
    Ok((fixed, check_store(store)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::Task;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn clean_store_reports_nothing() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path());
        store.save("a", &mut Task::new("x")).unwrap();
        assert!(check_store(&store).unwrap().is_clean());
    }

    #[test]
    fn finds_broken_files_and_duplicates() {
        let tmp = TempDir::new().unwrap();
        let store = Store::new(tmp.path());
        let path = store.save("a", &mut Task::new("x")).unwrap();
        let record = store.load_all().unwrap()["a"][0].clone();
        let archived = store.archive(&record).unwrap();
        fs::copy(&archived, &path).unwrap();
        fs::write(store.archive_dir().join("junk.md"), "---\nnope").unwrap();

        let report = check_store(&store).unwrap();
        assert_eq!(report.duplicates.len(), 1);
        assert_eq!(report.failures.len(), 1);

        let (fixed, after) = fix_store(&store).unwrap();
        assert_eq!(fixed.len(), 1);
        assert!(after.duplicates.is_empty());
        assert_eq!(after.failures.len(), 1);
    }
}
