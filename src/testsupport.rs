//! Shared test fixtures.
//!
//! Small std-only helpers so the storage and cooldown test modules do not
//! each rebuild ad-hoc temp-dir and failing-backend code.

use crate::cooldown::storage::Storage;
use crate::error::StoreError;
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

static TEST_DIR_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Temporary directory fixture with best-effort cleanup.
#[derive(Debug)]
pub struct TestTempDir {
    path: PathBuf,
}

impl TestTempDir {
    /// Create a unique temporary directory with a readable prefix.
    pub fn new(prefix: &str) -> Self {
        let suffix = TEST_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let dir = std::env::temp_dir().join(format!("backstop-{prefix}-{millis}-{suffix}"));
        fs::create_dir_all(&dir).expect("failed to create temporary fixture directory");
        Self { path: dir }
    }

    /// Root directory path for this fixture.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Build a child path under the fixture root.
    pub fn child(&self, relative: &str) -> PathBuf {
        self.path.join(relative)
    }
}

impl Drop for TestTempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// Storage backend whose writes always fail, for swallow-and-count tests.
pub struct FailingStorage;

#[async_trait]
impl Storage for FailingStorage {
    async fn load(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Ok(None)
    }

    async fn save(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "writes disabled for this fixture",
        )))
    }

    async fn delete(&self, _key: &str) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_dir_fixture_creates_and_resolves_paths() {
        let fixture = TestTempDir::new("fixture");
        assert!(fixture.path().is_dir());
        assert!(fixture.child("nested/file.json").starts_with(fixture.path()));
    }

    #[tokio::test]
    async fn failing_storage_loads_nothing_and_rejects_saves() {
        let storage = FailingStorage;
        assert_eq!(storage.load("cooldowns").await.unwrap(), None);
        assert!(storage.save("cooldowns", "{}").await.is_err());
        assert!(storage.delete("cooldowns").await.is_ok());
    }
}
