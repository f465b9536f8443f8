//! # Storage Layer
//!
//! Medlog persists two records in a synchronous key-value store: the medicine
//! list and the intake log, each as one JSON array under a fixed key.
//!
//! ## Layers
//!
//! - [`backend::StorageBackend`]: raw `get` / `set` / `remove` of strings by key.
//!   This is the "how" of storage.
//!   - [`fs_backend::FsBackend`]: one `<key>.json` file per key in the data directory.
//!   - [`mem_backend::MemBackend`]: a `HashMap` for tests, able to simulate failures.
//! - [`med_store::MedStore`]: the "what". Knows the two keys, the seed list,
//!   the JSON shapes and the recovery rules.
//!
//! ## Storage Format
//!
//! For `FsBackend`:
//! ```text
//! <data-dir>/
//! ├── mediLog_medicines.json       # JSON array of medicines, in display order
//! ├── mediLog_intakeRecords.json   # JSON array of intake records, unordered
//! └── config.json                  # Settings (see config.rs)
//! ```
//!
//! ## Failure Policy
//!
//! Nothing read from or written to the backend raises past `MedStore`.
//! Reads fall back to defaults and report it through [`LoadOutcome`];
//! writes are logged and reported as a `bool`.

pub mod backend;
pub mod fs_backend;
pub mod med_store;
pub mod mem_backend;

pub use backend::StorageBackend;
pub use med_store::{MedStore, INTAKE_RECORDS_KEY, MEDICINES_KEY};

/// Result of loading a collection.
///
/// `Recovered` means the returned value is not what the store holds: the
/// record was unreadable or partly malformed and `value` is the fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome<T> {
    Ok(T),
    Recovered { value: T, cause: String },
}

impl<T> LoadOutcome<T> {
    pub fn value(&self) -> &T {
        match self {
            LoadOutcome::Ok(value) => value,
            LoadOutcome::Recovered { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            LoadOutcome::Ok(value) => value,
            LoadOutcome::Recovered { value, .. } => value,
        }
    }

    pub fn is_recovered(&self) -> bool {
        matches!(self, LoadOutcome::Recovered { .. })
    }

    pub fn cause(&self) -> Option<&str> {
        match self {
            LoadOutcome::Ok(_) => None,
            LoadOutcome::Recovered { cause, .. } => Some(cause),
        }
    }
}
