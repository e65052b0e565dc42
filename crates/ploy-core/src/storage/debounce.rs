//! Save scheduling
//!
//! Two interchangeable ways to persist a document:
//!
//! - [`ImmediateSaver`] writes on every request.
//! - [`DebouncedSaver`] coalesces bursts of requests (keystroke-driven
//!   autosave) into one write after a quiet period. Each new request resets
//!   the timer; the document written is the most recent one requested.
//!
//! Both hand back a [`SaveTicket`] that resolves to the same result type,
//! so callers and tests can swap one for the other.

use std::io;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, warn};

use super::backend::KeyValueStore;
use super::error::StorageError;
use super::persistence::{DocumentStore, PRIMARY_KEY};
use crate::document::Document;

/// Default quiet period before a debounced write lands
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Outcome of a save request
///
/// The error is shared because one failed write resolves every request it
/// coalesced.
pub type SaveResult = Result<Document, Arc<StorageError>>;

/// A document store shared between the caller and a saver
pub type SharedStore<B> = Arc<Mutex<DocumentStore<B>>>;

/// Wrap a store for use with a saver
pub fn shared<B: KeyValueStore>(store: DocumentStore<B>) -> SharedStore<B> {
    Arc::new(Mutex::new(store))
}

/// Anything that accepts documents to persist
pub trait SaveDocument {
    /// Ask for `doc` to be saved; the ticket resolves once it has been
    /// written (or the write failed)
    fn request_save(&self, doc: Document) -> SaveTicket;
}

/// Pending or completed save
#[derive(Debug)]
pub struct SaveTicket {
    inner: TicketState,
}

#[derive(Debug)]
enum TicketState {
    Ready(SaveResult),
    Pending(oneshot::Receiver<SaveResult>),
}

impl SaveTicket {
    fn ready(result: SaveResult) -> Self {
        Self {
            inner: TicketState::Ready(result),
        }
    }

    fn pending(rx: oneshot::Receiver<SaveResult>) -> Self {
        Self {
            inner: TicketState::Pending(rx),
        }
    }

    /// Wait for the write; resolves to the document as persisted
    pub async fn wait(self) -> SaveResult {
        match self.inner {
            TicketState::Ready(result) => result,
            TicketState::Pending(rx) => rx.await.unwrap_or_else(|_| Err(saver_stopped())),
        }
    }
}

fn saver_stopped() -> Arc<StorageError> {
    Arc::new(StorageError::WriteFailed {
        key: PRIMARY_KEY.to_string(),
        source: io::Error::other("save scheduler stopped before writing"),
    })
}

fn save_locked<B: KeyValueStore>(store: &SharedStore<B>, doc: &Document) -> SaveResult {
    let mut store = store.lock().unwrap_or_else(PoisonError::into_inner);
    store.save_document(doc).map_err(Arc::new)
}

/// Writes every request straight away
pub struct ImmediateSaver<B> {
    store: SharedStore<B>,
}

impl<B: KeyValueStore> ImmediateSaver<B> {
    pub fn new(store: SharedStore<B>) -> Self {
        Self { store }
    }
}

impl<B: KeyValueStore> SaveDocument for ImmediateSaver<B> {
    fn request_save(&self, doc: Document) -> SaveTicket {
        SaveTicket::ready(save_locked(&self.store, &doc))
    }
}

/// Commands sent to the debounce task
enum SaveCommand {
    Save {
        doc: Document,
        reply: oneshot::Sender<SaveResult>,
    },
    Flush {
        done: oneshot::Sender<()>,
    },
}

/// Coalesces save requests into one write per quiet period
///
/// Dropping the saver writes any pending document before the background
/// task exits.
pub struct DebouncedSaver {
    command_tx: mpsc::UnboundedSender<SaveCommand>,
}

impl DebouncedSaver {
    /// Spawn the debounce task on the current tokio runtime
    pub fn spawn<B>(store: SharedStore<B>, delay: Duration) -> Self
    where
        B: KeyValueStore + Send + 'static,
    {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        tokio::spawn(debounce_loop(store, delay, command_rx));
        Self { command_tx }
    }

    /// Write any pending document now
    pub async fn flush(&self) {
        let (done, wait) = oneshot::channel();
        if self.command_tx.send(SaveCommand::Flush { done }).is_ok() {
            let _ = wait.await;
        }
    }
}

impl SaveDocument for DebouncedSaver {
    fn request_save(&self, doc: Document) -> SaveTicket {
        let (reply, rx) = oneshot::channel();
        match self.command_tx.send(SaveCommand::Save { doc, reply }) {
            Ok(()) => SaveTicket::pending(rx),
            Err(_) => SaveTicket::ready(Err(saver_stopped())),
        }
    }
}

/// The newest requested document and everyone waiting on it
struct Pending {
    doc: Document,
    waiters: Vec<oneshot::Sender<SaveResult>>,
}

async fn debounce_loop<B: KeyValueStore>(
    store: SharedStore<B>,
    delay: Duration,
    mut command_rx: mpsc::UnboundedReceiver<SaveCommand>,
) {
    let mut pending: Option<Pending> = None;
    let mut deadline: Option<Instant> = None;

    loop {
        tokio::select! {
            cmd = command_rx.recv() => match cmd {
                Some(SaveCommand::Save { doc, reply }) => {
                    match pending.as_mut() {
                        Some(p) => {
                            p.doc = doc;
                            p.waiters.push(reply);
                        }
                        None => {
                            pending = Some(Pending { doc, waiters: vec![reply] });
                        }
                    }
                    deadline = Some(Instant::now() + delay);
                }
                Some(SaveCommand::Flush { done }) => {
                    write_pending(&store, pending.take());
                    deadline = None;
                    let _ = done.send(());
                }
                None => {
                    write_pending(&store, pending.take());
                    break;
                }
            },
            _ = wait_until(deadline) => {
                write_pending(&store, pending.take());
                deadline = None;
            }
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

fn write_pending<B: KeyValueStore>(store: &SharedStore<B>, pending: Option<Pending>) {
    let Some(Pending { doc, mut waiters }) = pending else {
        return;
    };

    debug!("Writing debounced save ({} coalesced requests)", waiters.len());
    let result = save_locked(store, &doc);
    if let Err(e) = &result {
        warn!("Debounced save failed: {}", e);
    }

    // The newest request gets the result itself, so a lone waiter holds
    // the only reference to an error.
    let newest = waiters.pop();
    for waiter in waiters {
        let _ = waiter.send(result.clone());
    }
    if let Some(newest) = newest {
        let _ = newest.send(result);
    }
}
