//! Host inventory store
//!
//! The inventory is the sole unit of truth between invocations: an ordered
//! sequence of host records persisted as JSON under a single top-level
//! `hosts` field. Every mutation rewrites the whole document through a
//! same-directory temp file followed by a rename, so a reader can never
//! observe a half-written store.
//!
//! Passwords are stored in plaintext. That is the documented on-disk
//! format; treat the file's permissions accordingly.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, StoreError};

/// One remote target: hostname, login user, password credential.
///
/// Identity is positional (the record's index within the inventory), not
/// content-based: two identical records are still distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRecord {
    pub hostname: String,
    pub username: String,
    pub password: String,
}

impl HostRecord {
    /// Display form without the credential, e.g. `root@web01`.
    pub fn target(&self) -> String {
        format!("{}@{}", self.username, self.hostname)
    }
}

/// On-disk document shape.
#[derive(Debug, Default, Serialize, Deserialize)]
struct InventoryFile {
    hosts: Vec<HostRecord>,
}

/// Handle to the persisted inventory at a fixed path.
pub struct Inventory {
    path: PathBuf,
}

impl Inventory {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create an empty persisted inventory if none exists yet.
    pub fn bootstrap(&self) -> Result<()> {
        if self.path.exists() {
            return Ok(());
        }
        log::debug!("creating empty inventory at {}", self.path.display());
        self.save(&InventoryFile::default())
    }

    /// Read the full ordered sequence of host records.
    pub fn list(&self) -> Result<Vec<HostRecord>> {
        Ok(self.load()?.hosts)
    }

    /// Validate and append a record, then persist.
    pub fn append(&self, record: HostRecord) -> Result<()> {
        if record.hostname.trim().is_empty() {
            return Err(StoreError::Validation("hostname must not be empty".into()));
        }
        if record.username.trim().is_empty() {
            return Err(StoreError::Validation("username must not be empty".into()));
        }
        let mut inv = self.load()?;
        inv.hosts.push(record);
        self.save(&inv)
    }

    /// Remove the record at a 1-based position, shifting later entries
    /// down. Returns the removed record.
    ///
    /// Position 0 is the caller's "cancel" sentinel and is rejected here
    /// like any other out-of-range value.
    pub fn remove_at(&self, position: usize) -> Result<HostRecord> {
        let mut inv = self.load()?;
        let len = inv.hosts.len();
        if position == 0 || position > len {
            return Err(StoreError::OutOfRange { position, len });
        }
        let removed = inv.hosts.remove(position - 1);
        self.save(&inv)?;
        Ok(removed)
    }

    fn load(&self) -> Result<InventoryFile> {
        let unreadable = |reason: String| StoreError::Unreadable {
            path: self.path.clone(),
            reason,
        };

        let content = fs::read_to_string(&self.path).map_err(|e| unreadable(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| unreadable(e.to_string()))
    }

    fn save(&self, inv: &InventoryFile) -> Result<()> {
        let persist = |reason: String| StoreError::Persist {
            path: self.path.clone(),
            reason,
        };

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| persist(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(inv).map_err(|e| persist(e.to_string()))?;

        // Whole document to a sibling temp file, then swap it in.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(|e| persist(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| persist(e.to_string()))?;

        log::debug!("saved {} hosts to {}", inv.hosts.len(), self.path.display());
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(hostname: &str, username: &str) -> HostRecord {
        HostRecord {
            hostname: hostname.to_string(),
            username: username.to_string(),
            password: "secret".to_string(),
        }
    }

    fn store_in(dir: &TempDir) -> Inventory {
        let store = Inventory::open(dir.path().join("hosts.json"));
        store.bootstrap().unwrap();
        store
    }

    #[test]
    fn bootstrap_creates_empty_inventory() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert!(store.path().exists());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn bootstrap_keeps_existing_entries() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.append(record("web01", "root")).unwrap();

        store.bootstrap().unwrap();
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn list_without_file_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let store = Inventory::open(dir.path().join("missing.json"));
        assert!(matches!(store.list(), Err(StoreError::Unreadable { .. })));
    }

    #[test]
    fn list_with_malformed_file_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("hosts.json");
        fs::write(&path, "{ this is not json").unwrap();

        let store = Inventory::open(path);
        assert!(matches!(store.list(), Err(StoreError::Unreadable { .. })));
    }

    #[test]
    fn append_keeps_order_and_prior_entries() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.append(record("web01", "root")).unwrap();
        let before = store.list().unwrap();

        store.append(record("db01", "admin")).unwrap();
        let after = store.list().unwrap();

        assert_eq!(after.len(), 2);
        assert_eq!(&after[..1], &before[..]);
        assert_eq!(after[1], record("db01", "admin"));
    }

    #[test]
    fn append_rejects_empty_hostname() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let result = store.append(record("", "root"));
        assert!(matches!(result, Err(StoreError::Validation(_))));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn append_rejects_empty_username() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let result = store.append(record("web01", ""));
        assert!(matches!(result, Err(StoreError::Validation(_))));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn append_allows_empty_password() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        let mut rec = record("web01", "root");
        rec.password = String::new();
        store.append(rec).unwrap();
        assert_eq!(store.list().unwrap()[0].password, "");
    }

    #[test]
    fn identical_records_are_distinct_entries() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        store.append(record("web01", "root")).unwrap();
        store.append(record("web01", "root")).unwrap();
        assert_eq!(store.list().unwrap().len(), 2);

        store.remove_at(1).unwrap();
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn remove_shifts_later_positions_down() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.append(record("web01", "root")).unwrap();
        store.append(record("db01", "root")).unwrap();
        store.append(record("cache01", "root")).unwrap();

        let removed = store.remove_at(2).unwrap();
        assert_eq!(removed.hostname, "db01");

        let hosts = store.list().unwrap();
        assert_eq!(hosts.len(), 2);
        assert_eq!(hosts[0].hostname, "web01");
        assert_eq!(hosts[1].hostname, "cache01");
    }

    #[test]
    fn remove_rejects_zero_and_past_end() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.append(record("web01", "root")).unwrap();
        let before = store.list().unwrap();

        assert!(matches!(
            store.remove_at(0),
            Err(StoreError::OutOfRange { position: 0, len: 1 })
        ));
        assert!(matches!(
            store.remove_at(2),
            Err(StoreError::OutOfRange { position: 2, len: 1 })
        ));
        assert_eq!(store.list().unwrap(), before);
    }

    #[test]
    fn mutations_leave_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.append(record("web01", "root")).unwrap();
        store.remove_at(1).unwrap();

        let leftovers: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name != "hosts.json")
            .collect();
        assert!(leftovers.is_empty(), "unexpected files: {leftovers:?}");
    }

    #[test]
    fn untouched_entries_round_trip_unchanged() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.append(record("web01", "root")).unwrap();
        store.append(record("db01", "admin")).unwrap();
        store.append(record("cache01", "deploy")).unwrap();
        let before = store.list().unwrap();

        store.remove_at(2).unwrap();
        let after = store.list().unwrap();

        assert_eq!(after[0], before[0]);
        assert_eq!(after[1], before[2]);
    }
}
