//! Journal document persistence
//!
//! Handles saving and loading the journal document to/from a key-value
//! medium, with one generation of rollback protection.
//!
//! Slots:
//! - `rp:v1:doc` - the current document
//! - `rp:v1:backup` - the document as it was before the last save
//! - `rp:v1:temp` - staging copy, only present while a save is in flight
//! - `rp:device:id` - this device's identifier, independent of the document
//!
//! A save stages the new text before replacing the primary slot, so a
//! crash mid-save leaves either the old primary or a complete staging copy.

use chrono::Utc;
use tracing::{debug, info, warn};

use super::backend::KeyValueStore;
use super::error::{StorageError, StorageResult};
use crate::document::Document;
use crate::id::new_id;

pub const PRIMARY_KEY: &str = "rp:v1:doc";
pub const BACKUP_KEY: &str = "rp:v1:backup";
pub const TEMP_KEY: &str = "rp:v1:temp";
pub const DEVICE_ID_KEY: &str = "rp:device:id";

/// Reference capacity of the medium (typical browser storage quota)
pub const DEFAULT_CAPACITY_BYTES: usize = 5 * 1024 * 1024;

/// How a load arrived at its document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// Nothing was stored; a default document was created and saved
    FirstRun,
    /// The primary slot was valid
    Loaded,
    /// The primary slot was unusable; a staging copy left by an interrupted
    /// save was promoted
    RecoveredFromStaging { reason: String },
    /// The primary slot was unusable; the backup (one save behind) was
    /// promoted
    RecoveredFromBackup { reason: String },
    /// Nothing stored was usable; a fresh default document is returned
    TotalDataLoss { reason: String },
}

impl LoadStatus {
    /// Whether recent or all data may have been lost
    pub fn is_lossy(&self) -> bool {
        matches!(
            self,
            LoadStatus::RecoveredFromBackup { .. } | LoadStatus::TotalDataLoss { .. }
        )
    }

    /// Whether the user should be told about this load
    pub fn needs_attention(&self) -> bool {
        !matches!(self, LoadStatus::FirstRun | LoadStatus::Loaded)
    }

    /// Short human description
    pub fn describe(&self) -> String {
        match self {
            LoadStatus::FirstRun => "new journal created".to_string(),
            LoadStatus::Loaded => "loaded".to_string(),
            LoadStatus::RecoveredFromStaging { reason } => format!(
                "recovered from an interrupted save (primary copy unreadable: {})",
                reason
            ),
            LoadStatus::RecoveredFromBackup { reason } => format!(
                "recovered from backup; the most recent change may be lost (primary copy unreadable: {})",
                reason
            ),
            LoadStatus::TotalDataLoss { reason } => format!(
                "stored data was unreadable and a new empty journal was started ({})",
                reason
            ),
        }
    }
}

/// Result of [`DocumentStore::load_document`]
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub document: Document,
    pub status: LoadStatus,
}

/// Storage usage statistics
#[derive(Debug, Clone, PartialEq)]
pub struct StorageStats {
    pub primary_size: usize,
    pub backup_size: usize,
    pub total_size: usize,
    pub capacity: usize,
    /// Primary slot size as a percentage of capacity
    pub percent_used: f64,
}

impl StorageStats {
    /// Get human-readable total size
    pub fn total_size_human(&self) -> String {
        format_bytes(self.total_size)
    }
}

/// Whether a write copies the current primary into the backup slot first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rotation {
    Rotate,
    Skip,
}

/// Backup slot content displaced by a rotation
struct RotatedBackup {
    previous: Option<String>,
}

/// Persistence layer for the journal document
pub struct DocumentStore<B> {
    backend: B,
    capacity: usize,
}

impl<B: KeyValueStore> DocumentStore<B> {
    /// Create a store over `backend` with the default reference capacity
    pub fn new(backend: B) -> Self {
        Self::with_capacity(backend, DEFAULT_CAPACITY_BYTES)
    }

    /// Create a store reporting usage against `capacity` bytes
    pub fn with_capacity(backend: B, capacity: usize) -> Self {
        Self { backend, capacity }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Get this device's identifier, creating it on first use
    pub fn device_id(&mut self) -> StorageResult<String> {
        let existing = self
            .backend
            .get(DEVICE_ID_KEY)
            .map_err(|e| StorageError::from_read(e, DEVICE_ID_KEY))?;

        if let Some(id) = existing.map(|s| s.trim().to_string()) {
            if !id.is_empty() {
                return Ok(id);
            }
        }

        let id = new_id();
        self.backend
            .set(DEVICE_ID_KEY, &id)
            .map_err(|e| StorageError::from_write(e, DEVICE_ID_KEY))?;
        info!("Generated new device id {}", id);
        Ok(id)
    }

    /// Build an empty document for this device
    pub fn default_document(&mut self) -> StorageResult<Document> {
        Ok(Document::new(self.device_id()?))
    }

    /// Load the stored document
    ///
    /// - Nothing stored: a default document is created, saved and returned.
    /// - Primary valid: it is migrated and returned.
    /// - Primary unusable: the staging slot, then the backup slot, is tried;
    ///   the first valid one is promoted back to primary.
    /// - Nothing usable: a fresh default document is returned with
    ///   [`LoadStatus::TotalDataLoss`] and nothing is overwritten.
    ///
    /// The returned document always carries this device's id.
    pub fn load_document(&mut self) -> StorageResult<LoadOutcome> {
        let device_id = self.device_id()?;

        let failure = match self.backend.get(PRIMARY_KEY) {
            Ok(Some(text)) => match Document::parse(&text) {
                Ok(mut document) => {
                    document.device_id = device_id;
                    return Ok(LoadOutcome {
                        document,
                        status: LoadStatus::Loaded,
                    });
                }
                Err(e) => Some(e.to_string()),
            },
            Ok(None) => None,
            Err(e) => Some(StorageError::from_read(e, PRIMARY_KEY).to_string()),
        };

        if let Some(ref reason) = failure {
            warn!("Stored document is unusable: {}", reason);
        }

        if let Some(mut document) = self.read_valid(TEMP_KEY) {
            let reason = failure.unwrap_or_else(|| "primary copy missing".to_string());
            info!("Recovering document from staging slot");
            document.device_id = device_id;
            let document = self.write(&document, Rotation::Skip)?;
            return Ok(LoadOutcome {
                document,
                status: LoadStatus::RecoveredFromStaging { reason },
            });
        }

        let Some(reason) = failure else {
            info!("No stored document found, creating a new journal");
            let document = self.write(&Document::new(device_id), Rotation::Rotate)?;
            return Ok(LoadOutcome {
                document,
                status: LoadStatus::FirstRun,
            });
        };

        if let Some(mut document) = self.read_valid(BACKUP_KEY) {
            info!("Recovering document from backup slot");
            document.device_id = device_id;
            let document = self.write(&document, Rotation::Skip)?;
            return Ok(LoadOutcome {
                document,
                status: LoadStatus::RecoveredFromBackup { reason },
            });
        }

        warn!("Backup is unusable as well, starting with an empty journal");
        Ok(LoadOutcome {
            document: Document::new(device_id),
            status: LoadStatus::TotalDataLoss { reason },
        })
    }

    /// Save a document
    ///
    /// Stamps `exportedAt`, stages the new text, copies the current primary
    /// into the backup slot, then replaces the primary. Returns the document
    /// exactly as persisted. On failure the primary and backup slots keep
    /// their previous content.
    pub fn save_document(&mut self, doc: &Document) -> StorageResult<Document> {
        self.write(doc, Rotation::Rotate)
    }

    /// Storage usage of the primary and backup slots
    pub fn storage_stats(&self) -> StorageResult<StorageStats> {
        let primary_size = self.slot_len(PRIMARY_KEY)?;
        let backup_size = self.slot_len(BACKUP_KEY)?;
        let percent_used = if self.capacity == 0 {
            0.0
        } else {
            primary_size as f64 / self.capacity as f64 * 100.0
        };

        Ok(StorageStats {
            primary_size,
            backup_size,
            total_size: primary_size + backup_size,
            capacity: self.capacity,
            percent_used,
        })
    }

    /// Delete the document, backup and staging slots
    ///
    /// The device id is kept. Returns a fresh default document, which is not
    /// persisted until the caller saves it.
    pub fn clear_all(&mut self) -> StorageResult<Document> {
        for key in [PRIMARY_KEY, TEMP_KEY, BACKUP_KEY] {
            self.backend
                .remove(key)
                .map_err(|e| StorageError::from_write(e, key))?;
        }
        info!("Cleared all stored journal data");
        self.default_document()
    }

    /// Read a slot and parse it, or `None` if absent or unusable
    fn read_valid(&self, key: &str) -> Option<Document> {
        let text = match self.backend.get(key) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                warn!("Could not read '{}': {}", key, e);
                return None;
            }
        };
        match Document::parse(&text) {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!("Slot '{}' holds an unusable document: {}", key, e);
                None
            }
        }
    }

    fn slot_len(&self, key: &str) -> StorageResult<usize> {
        let value = self
            .backend
            .get(key)
            .map_err(|e| StorageError::from_read(e, key))?;
        Ok(value.map_or(0, |v| v.len()))
    }

    fn write(&mut self, doc: &Document, rotation: Rotation) -> StorageResult<Document> {
        let mut stamped = doc.clone();
        stamped.exported_at = Utc::now();
        let serialized = stamped.to_json()?;

        self.backend
            .set(TEMP_KEY, &serialized)
            .map_err(|e| StorageError::from_write(e, TEMP_KEY))?;

        let rotated = match rotation {
            Rotation::Rotate => match self.rotate_backup() {
                Ok(rotated) => rotated,
                Err(e) => {
                    self.discard_staging();
                    return Err(e);
                }
            },
            Rotation::Skip => None,
        };

        if let Err(e) = self.backend.set(PRIMARY_KEY, &serialized) {
            if let Some(rotated) = rotated {
                self.restore_backup(rotated);
            }
            self.discard_staging();
            return Err(StorageError::from_write(e, PRIMARY_KEY));
        }

        // The primary slot already holds the new document; a leftover
        // staging copy is harmless because loads only read it when the
        // primary is unusable.
        self.discard_staging();

        debug!(
            "Saved document ({} bytes, {} entities)",
            serialized.len(),
            stamped.entity_count()
        );
        Ok(stamped)
    }

    /// Copy the primary slot into the backup slot
    ///
    /// Returns what the backup slot held before, or `None` when there was no
    /// primary to rotate.
    fn rotate_backup(&mut self) -> StorageResult<Option<RotatedBackup>> {
        let current = self
            .backend
            .get(PRIMARY_KEY)
            .map_err(|e| StorageError::from_read(e, PRIMARY_KEY))?;
        let Some(current) = current else {
            return Ok(None);
        };

        let previous = self
            .backend
            .get(BACKUP_KEY)
            .map_err(|e| StorageError::from_read(e, BACKUP_KEY))?;
        self.backend
            .set(BACKUP_KEY, &current)
            .map_err(|e| StorageError::from_write(e, BACKUP_KEY))?;
        Ok(Some(RotatedBackup { previous }))
    }

    /// Put back the backup generation replaced by a save that then failed
    fn restore_backup(&mut self, rotated: RotatedBackup) {
        let result = match rotated.previous {
            Some(previous) => self.backend.set(BACKUP_KEY, &previous),
            None => self.backend.remove(BACKUP_KEY),
        };
        if let Err(e) = result {
            warn!("Could not restore previous backup: {}", e);
        }
    }

    fn discard_staging(&mut self) {
        if let Err(e) = self.backend.remove(TEMP_KEY) {
            warn!("Could not clear staging slot: {}", e);
        }
    }
}

/// Format a byte count for display
pub fn format_bytes(bytes: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 3] = ["Bytes", "KB", "MB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewProject, Project};
    use crate::storage::backend::{FileStore, MemoryStore};
    use crate::storage::schema::SCHEMA_VERSION;
    use std::io;
    use tempfile::TempDir;

    fn project(title: &str) -> Project {
        Project::new(NewProject {
            title: title.to_string(),
            ..Default::default()
        })
    }

    fn loaded(store: &mut DocumentStore<MemoryStore>) -> Document {
        store.load_document().unwrap().document
    }

    /// Memory backend that fails writes to one slot
    #[derive(Default)]
    struct RefusingStore {
        inner: MemoryStore,
        refused: Option<&'static str>,
    }

    impl KeyValueStore for RefusingStore {
        fn get(&self, key: &str) -> io::Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
            if self.refused == Some(key) {
                return Err(io::Error::other("device unplugged"));
            }
            self.inner.set(key, value)
        }

        fn remove(&mut self, key: &str) -> io::Result<()> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_first_run_creates_and_persists_default() {
        let mut store = DocumentStore::new(MemoryStore::new());

        let first = store.load_document().unwrap();
        assert_eq!(first.status, LoadStatus::FirstRun);
        assert_eq!(first.document.entity_count(), 0);
        assert_eq!(first.document.schema_version, SCHEMA_VERSION);
        assert!(store.backend().contains(PRIMARY_KEY));
        assert!(!store.backend().contains(TEMP_KEY));

        let second = store.load_document().unwrap();
        assert_eq!(second.status, LoadStatus::Loaded);
        assert_eq!(second.document, first.document);
    }

    #[test]
    fn test_device_id_is_stable() {
        let mut store = DocumentStore::new(MemoryStore::new());
        let id = store.device_id().unwrap();
        assert_eq!(store.device_id().unwrap(), id);
        assert_eq!(loaded(&mut store).device_id, id);
    }

    #[test]
    fn test_round_trip_advances_exported_at() {
        let mut store = DocumentStore::new(MemoryStore::new());
        let doc = loaded(&mut store).with_project(project("Garden"));

        let saved = store.save_document(&doc).unwrap();
        assert!(saved.exported_at >= doc.exported_at);

        let reloaded = loaded(&mut store);
        assert_eq!(reloaded, saved);

        let mut expected = doc.clone();
        expected.exported_at = reloaded.exported_at;
        assert_eq!(reloaded, expected);
    }

    #[test]
    fn test_backup_lags_one_save() {
        let mut store = DocumentStore::new(MemoryStore::new());
        let base = loaded(&mut store);

        let d1 = store.save_document(&base.clone().with_project(project("One"))).unwrap();
        let d2 = store
            .save_document(&d1.clone().with_project(project("Two")))
            .unwrap();

        let backup = store.backend().get(BACKUP_KEY).unwrap().unwrap();
        let primary = store.backend().get(PRIMARY_KEY).unwrap().unwrap();
        assert_eq!(Document::parse(&backup).unwrap(), d1);
        assert_eq!(Document::parse(&primary).unwrap(), d2);
    }

    #[test]
    fn test_corrupt_primary_recovers_from_backup() {
        let mut store = DocumentStore::new(MemoryStore::new());
        let device_id = store.device_id().unwrap();
        let backup = Document::new(device_id).with_project(project("Saved"));
        store
            .backend_mut()
            .set(BACKUP_KEY, &backup.to_json().unwrap())
            .unwrap();
        store.backend_mut().set(PRIMARY_KEY, "{truncated").unwrap();

        let outcome = store.load_document().unwrap();
        assert!(matches!(
            outcome.status,
            LoadStatus::RecoveredFromBackup { .. }
        ));
        assert!(outcome.status.is_lossy());

        let mut expected = backup.clone();
        expected.exported_at = outcome.document.exported_at;
        assert_eq!(outcome.document, expected);

        // Promoted back to primary, backup left intact
        assert_eq!(loaded(&mut store), outcome.document);
        let kept = store.backend().get(BACKUP_KEY).unwrap().unwrap();
        assert_eq!(Document::parse(&kept).unwrap(), backup);
    }

    #[test]
    fn test_invalid_shape_recovers_from_backup() {
        let mut store = DocumentStore::new(MemoryStore::new());
        let backup = store.default_document().unwrap();
        store
            .backend_mut()
            .set(BACKUP_KEY, &backup.to_json().unwrap())
            .unwrap();
        store
            .backend_mut()
            .set(PRIMARY_KEY, r#"{"version":1,"projects":{}}"#)
            .unwrap();

        let outcome = store.load_document().unwrap();
        match outcome.status {
            LoadStatus::RecoveredFromBackup { reason } => {
                assert!(reason.contains("projects must be an array"))
            }
            other => panic!("unexpected status {:?}", other),
        }
    }

    #[test]
    fn test_defective_entity_fields_load_from_primary() {
        let mut store = DocumentStore::new(MemoryStore::new());
        let backup = store.default_document().unwrap();
        store
            .backend_mut()
            .set(BACKUP_KEY, &backup.to_json().unwrap())
            .unwrap();
        let primary = r#"{
            "version": 2,
            "projects": [{
                "id": "p-new",
                "title": "Kiln",
                "status": "archived",
                "cadence": {"dayOfWeek": "3"},
                "createdAt": "not a date"
            }],
            "ideas": [],
            "logs": [],
            "wins": [],
            "settings": {}
        }"#;
        store.backend_mut().set(PRIMARY_KEY, primary).unwrap();

        let outcome = store.load_document().unwrap();
        assert_eq!(outcome.status, LoadStatus::Loaded);
        assert_eq!(outcome.document.projects.len(), 1);
        assert_eq!(outcome.document.projects[0].id, "p-new");
        assert_eq!(outcome.document.projects[0].cadence.day_of_week, 3);

        // The newer primary was not replaced by the backup
        assert_eq!(
            store.backend().get(PRIMARY_KEY).unwrap().as_deref(),
            Some(primary)
        );
    }

    #[test]
    fn test_staging_copy_preferred_over_backup() {
        let mut store = DocumentStore::new(MemoryStore::new());
        let device_id = store.device_id().unwrap();
        let older = Document::new(device_id.clone()).with_project(project("Older"));
        let newer = Document::new(device_id).with_project(project("Newer"));
        store
            .backend_mut()
            .set(BACKUP_KEY, &older.to_json().unwrap())
            .unwrap();
        store
            .backend_mut()
            .set(TEMP_KEY, &newer.to_json().unwrap())
            .unwrap();
        store.backend_mut().set(PRIMARY_KEY, "garbage").unwrap();

        let outcome = store.load_document().unwrap();
        assert!(matches!(
            outcome.status,
            LoadStatus::RecoveredFromStaging { .. }
        ));
        assert!(!outcome.status.is_lossy());
        assert_eq!(outcome.document.projects[0].title, "Newer");
        assert!(!store.backend().contains(TEMP_KEY));
    }

    #[test]
    fn test_missing_primary_with_staging_copy() {
        let mut store = DocumentStore::new(MemoryStore::new());
        let doc = store.default_document().unwrap().with_project(project("Crash"));
        store
            .backend_mut()
            .set(TEMP_KEY, &doc.to_json().unwrap())
            .unwrap();

        let outcome = store.load_document().unwrap();
        assert!(matches!(
            outcome.status,
            LoadStatus::RecoveredFromStaging { .. }
        ));
        assert_eq!(outcome.document.projects.len(), 1);
    }

    #[test]
    fn test_total_data_loss_is_flagged() {
        let mut store = DocumentStore::new(MemoryStore::new());
        store.backend_mut().set(PRIMARY_KEY, "nope").unwrap();
        store.backend_mut().set(BACKUP_KEY, "[]").unwrap();

        let outcome = store.load_document().unwrap();
        assert!(matches!(outcome.status, LoadStatus::TotalDataLoss { .. }));
        assert!(outcome.status.needs_attention());
        assert_eq!(outcome.document.entity_count(), 0);

        // Nothing overwritten
        assert_eq!(
            store.backend().get(PRIMARY_KEY).unwrap().as_deref(),
            Some("nope")
        );
    }

    #[test]
    fn test_quota_exceeded_leaves_primary_unchanged() {
        let mut store = DocumentStore::new(MemoryStore::with_capacity(4 * 1024));
        let doc = loaded(&mut store);
        let before = store.backend().get(PRIMARY_KEY).unwrap();

        let mut big = doc.clone();
        for i in 0..20 {
            big = big.with_project(project(&format!("Project {} {}", i, "x".repeat(200))));
        }

        let err = store.save_document(&big).unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert_eq!(store.backend().get(PRIMARY_KEY).unwrap(), before);
        assert!(!store.backend().contains(TEMP_KEY));
        assert_eq!(loaded(&mut store), doc);
    }

    #[test]
    fn test_failed_save_keeps_backup_generation() {
        let mut store = DocumentStore::new(RefusingStore::default());
        let base = store.load_document().unwrap().document;
        let d1 = store.save_document(&base.with_project(project("One"))).unwrap();
        let d2 = store
            .save_document(&d1.clone().with_project(project("Two")))
            .unwrap();
        let d3 = d2.clone().with_project(project("Three"));

        for refused in [PRIMARY_KEY, BACKUP_KEY, TEMP_KEY] {
            store.backend_mut().refused = Some(refused);
            let err = store.save_document(&d3).unwrap_err();
            match err {
                StorageError::WriteFailed { ref key, .. } => assert_eq!(key, refused),
                other => panic!("unexpected error {:?}", other),
            }

            let slot = |key: &str| {
                let text = store.backend().get(key).unwrap().unwrap();
                Document::parse(&text).unwrap()
            };
            assert_eq!(slot(PRIMARY_KEY), d2, "primary changed when {} failed", refused);
            assert_eq!(slot(BACKUP_KEY), d1, "backup changed when {} failed", refused);
            assert!(store.backend().get(TEMP_KEY).unwrap().is_none());
        }
    }

    #[test]
    fn test_storage_stats() {
        let mut store = DocumentStore::with_capacity(MemoryStore::new(), 1000);
        let empty = store.storage_stats().unwrap();
        assert_eq!(empty.total_size, 0);
        assert_eq!(empty.percent_used, 0.0);

        let doc = loaded(&mut store);
        store.save_document(&doc).unwrap();

        let stats = store.storage_stats().unwrap();
        let primary = store.backend().get(PRIMARY_KEY).unwrap().unwrap();
        assert_eq!(stats.primary_size, primary.len());
        assert!(stats.backup_size > 0);
        assert_eq!(stats.total_size, stats.primary_size + stats.backup_size);
        assert_eq!(stats.capacity, 1000);
        assert!((stats.percent_used - primary.len() as f64 / 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_clear_all_keeps_device_id() {
        let mut store = DocumentStore::new(MemoryStore::new());
        let doc = loaded(&mut store);
        store.save_document(&doc).unwrap();

        let fresh = store.clear_all().unwrap();
        assert_eq!(fresh.device_id, doc.device_id);
        assert!(!store.backend().contains(PRIMARY_KEY));
        assert!(!store.backend().contains(BACKUP_KEY));
        assert_eq!(store.load_document().unwrap().status, LoadStatus::FirstRun);
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let temp_dir = TempDir::new().unwrap();
        let saved = {
            let mut store = DocumentStore::new(FileStore::new(temp_dir.path()));
            let doc = store.load_document().unwrap().document;
            store
                .save_document(&doc.with_project(project("On disk")))
                .unwrap()
        };

        let mut store = DocumentStore::new(FileStore::new(temp_dir.path()));
        let outcome = store.load_document().unwrap();
        assert_eq!(outcome.status, LoadStatus::Loaded);
        assert_eq!(outcome.document, saved);
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(512), "512 Bytes");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5 MB");
    }
}
