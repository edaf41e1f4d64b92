//! Bitacora - data-access layer for a practice journal
//!
//! Keeps the records of a consulting practice: clients, their appointments
//! and payments, personal and per-session energy readings, rituals and card
//! spreads.
//!
//! ## Architecture
//!
//! - **Record store**: each collection is one JSON array under one key, on
//!   SQLite, sled or in memory
//! - **Services**: one CRUD service per collection, with validation,
//!   per-collection write locks and change events
//! - **Resolver**: in-memory joins from dependent records to their client
//! - **Views**: dashboard, ledger, agenda and journal summaries
//!
//! ## Storage Layout
//!
//! ```text
//! ~/.local/share/bitacora/
//! ├── bitacora.db            # SQLite backend (default)
//! ├── collections.sled/      # sled backend
//! └── config.toml            # Configuration
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod resolver;
pub mod services;
pub mod store;
pub mod views;

// Re-exports
pub use config::{Backend, Config, ReferencePolicy};
pub use error::StorageError;
pub use models::{Collection, Record};
pub use resolver::{resolve_owner, WithOwner};
pub use services::{ClientService, EntityService, EventBus, Services, StoreEvent};
pub use store::{MemoryStore, RecordStore, SledStore, SqliteStore};
pub use views::{DashboardSummary, MonthSummary, Snapshot};
