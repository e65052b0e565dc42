//! Unified storage interface
//!
//! The `Store` holds the current journal document next to the persistence
//! layer that loaded it. Callers read the document, build a changed copy
//! and hand it back through [`Store::apply`], which saves before the new
//! copy becomes current, or [`Store::apply_deferred`], which makes it
//! current at once and lets the autosaver write it after a quiet period.
//!
//! Every write goes through one saver, so a direct save never races a
//! deferred one.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open()?;
//! if store.load_status().needs_attention() {
//!     eprintln!("{}", store.load_status().describe());
//! }
//!
//! let project = Project::new(NewProject { title: "Garden".into(), ..Default::default() });
//! store.apply(|doc| doc.with_project(project)).await?;
//! ```

use std::sync::{Arc, MutexGuard, PoisonError};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info};

use crate::config::Config;
use crate::document::Document;
use crate::export::export_document;
use crate::import::{get_import_preview, import_document, ImportPreview};
use crate::merge::MergeStrategy;
use crate::storage::debounce::shared;
use crate::storage::{
    DebouncedSaver, DocumentStore, FileStore, ImmediateSaver, LoadStatus, SaveDocument,
    SaveTicket, SharedStore, StorageError, StorageStats,
};

/// How the store persists documents
enum Saver {
    Immediate(ImmediateSaver<FileStore>),
    Debounced(DebouncedSaver),
}

impl Saver {
    /// Debounced when a delay is set and an async runtime is available
    fn new(persistence: &SharedStore<FileStore>, delay: Duration) -> Self {
        if delay.is_zero() {
            return Saver::Immediate(ImmediateSaver::new(persistence.clone()));
        }
        match tokio::runtime::Handle::try_current() {
            Ok(_) => Saver::Debounced(DebouncedSaver::spawn(persistence.clone(), delay)),
            Err(_) => {
                debug!("No async runtime, autosave writes immediately");
                Saver::Immediate(ImmediateSaver::new(persistence.clone()))
            }
        }
    }

    fn request_save(&self, doc: Document) -> SaveTicket {
        match self {
            Saver::Immediate(saver) => saver.request_save(doc),
            Saver::Debounced(saver) => saver.request_save(doc),
        }
    }

    async fn flush(&self) {
        if let Saver::Debounced(saver) = self {
            saver.flush().await;
        }
    }
}

/// Unified storage interface for Ploy
pub struct Store {
    /// The current document
    doc: Document,
    /// How the document was obtained when the store opened
    load_status: LoadStatus,
    /// Slot persistence, shared with the saver
    persistence: SharedStore<FileStore>,
    /// Writes documents, straight away or after the autosave delay
    saver: Saver,
    /// Configuration
    config: Config,
}

impl Store {
    /// Open the store, creating a new journal if none exists
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config)
    }

    /// Open the store with a specific configuration
    ///
    /// Deferred changes are debounced by `autosave_delay_ms` when called
    /// inside a tokio runtime; otherwise every save is immediate.
    pub fn open_with_config(config: Config) -> Result<Self> {
        let backend = FileStore::new(&config.data_dir);
        let mut persistence = DocumentStore::with_capacity(backend, config.storage_capacity_bytes);

        let outcome = persistence
            .load_document()
            .context("Failed to load journal document")?;

        let persistence = shared(persistence);
        let saver = Saver::new(&persistence, config.autosave_delay());

        Ok(Self {
            doc: outcome.document,
            load_status: outcome.status,
            persistence,
            saver,
            config,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the current document
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// How the document was loaded
    pub fn load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    /// This device's identifier
    pub fn device_id(&self) -> &str {
        &self.doc.device_id
    }

    /// Build a new document from the current one and persist it now
    ///
    /// Any deferred change still waiting is written along with it. The
    /// current document only changes if the save succeeds.
    pub async fn apply(&mut self, change: impl FnOnce(Document) -> Document) -> Result<()> {
        let next = change(self.doc.clone());
        self.save(next).await
    }

    /// Build a new document from the current one and save it later
    ///
    /// The document becomes current straight away. Bursts of deferred
    /// changes land as one write once `autosave_delay_ms` passes without a
    /// new one; the ticket resolves when that write happened.
    pub fn apply_deferred(&mut self, change: impl FnOnce(Document) -> Document) -> SaveTicket {
        let next = change(self.doc.clone());
        self.doc = next.clone();
        self.saver.request_save(next)
    }

    /// Write any deferred change now
    pub async fn flush(&self) {
        self.saver.flush().await;
    }

    async fn save(&mut self, doc: Document) -> Result<()> {
        let ticket = self.saver.request_save(doc);
        self.saver.flush().await;
        self.doc = ticket
            .wait()
            .await
            .map_err(shared_error)
            .context("Failed to save journal document")?;
        Ok(())
    }

    fn persistence(&self) -> MutexGuard<'_, DocumentStore<FileStore>> {
        self.persistence
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // ==================== Import / Export ====================

    /// Preview a candidate backup against the current document
    pub fn preview_import(&self, text: &str) -> ImportPreview {
        get_import_preview(text, &self.doc)
    }

    /// Merge a backup into the journal and save the result
    pub async fn import(&mut self, text: &str, strategy: MergeStrategy) -> Result<()> {
        let mut merged =
            import_document(text, &self.doc, strategy).context("Cannot import backup")?;
        merged.device_id = self.doc.device_id.clone();
        self.save(merged).await?;
        info!("Imported backup with strategy {}", strategy);
        Ok(())
    }

    /// Serialize the journal as a full backup
    pub fn export_backup(&self) -> Result<String> {
        export_document(&self.doc, &self.doc.device_id)
            .context("Failed to serialize journal document")
    }

    /// Remember that a backup was just taken
    pub async fn record_backup(&mut self) -> Result<()> {
        self.apply(|doc| doc.with_backup_recorded(Utc::now())).await
    }

    // ==================== Maintenance ====================

    /// Storage usage of the document and its backup
    pub fn storage_stats(&self) -> Result<StorageStats> {
        self.persistence()
            .storage_stats()
            .context("Failed to read storage statistics")
    }

    /// Wipe the journal and start over with an empty document
    pub async fn reset(&mut self) -> Result<()> {
        self.saver.flush().await;
        let fresh = self
            .persistence()
            .clear_all()
            .context("Failed to clear stored data")?;
        self.save(fresh).await?;
        self.load_status = LoadStatus::FirstRun;
        Ok(())
    }
}

/// Turn a saver error back into an owned storage error where possible
fn shared_error(err: Arc<StorageError>) -> anyhow::Error {
    match Arc::try_unwrap(err) {
        Ok(err) => err.into(),
        Err(shared) => anyhow::Error::new(shared),
    }
}

/// The storage failure behind `err`, if there is one
pub fn storage_error(err: &anyhow::Error) -> Option<&StorageError> {
    err.downcast_ref::<StorageError>()
        .or_else(|| err.downcast_ref::<Arc<StorageError>>().map(Arc::as_ref))
}
