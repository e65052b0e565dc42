//! Ploy Core Library
//!
//! This crate provides the core functionality for Ploy, a local-first
//! journal for personal projects: projects with a review cadence, ideas,
//! learning logs, wins and quarterly reflections.
//!
//! # Architecture
//!
//! - **Document**: one JSON document holds the whole journal. Changes build
//!   a new document; nothing is mutated in place.
//! - **Storage**: the document lives in a flat key-value medium with a
//!   one-save-behind backup and a staging slot for crash recovery.
//!
//! # Quick Start
//!
//! ```text
//! let mut store = Store::open()?;
//!
//! let project = Project::new(NewProject { title: "Garden".into(), ..Default::default() });
//! store.apply(|doc| doc.with_project(project)).await?;
//!
//! for project in store.document().active_projects() {
//!     println!("{}", project.title);
//! }
//! ```
//!
//! # Modules
//!
//! - `store`: Unified storage interface (main entry point)
//! - `models`: Projects, ideas, logs, wins, reflections and settings
//! - `document`: The journal document and its copy-on-write updates
//! - `queries`: Read-side helpers over a document
//! - `storage`: Key-value backends, slot persistence, schema migration, debounced saves
//! - `merge`: Combining two documents under a merge strategy
//! - `import`: Backup preview and import
//! - `export`: JSON backup, CSV and iCalendar export
//! - `config`: Application configuration

pub mod config;
pub mod document;
pub mod export;
pub mod id;
pub mod import;
mod lenient;
pub mod merge;
pub mod models;
pub mod queries;
pub mod storage;
pub mod store;

pub use config::Config;
pub use document::{Document, DocumentError};
pub use import::{ImportPreview, ImportSummary};
pub use merge::MergeStrategy;
pub use models::{
    Cadence, CadenceType, Idea, LearningLog, NewProject, Project, ProjectStatus,
    QuarterlyReflection, Settings, SupportPartner, Win, WinKind,
};
pub use storage::{LoadStatus, StorageError, StorageStats};
pub use store::Store;
