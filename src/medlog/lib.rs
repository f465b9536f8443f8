//! # Medlog Architecture
//!
//! Medlog is a **UI-agnostic medicine intake log**. The CLI shipped with it is one
//! client of the library; nothing below the API layer knows it exists.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prints results, prompts, exit codes    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Holds the session's medicines and intake records         │
//! │  - Resolves selectors (positions, ids, names)               │
//! │  - Adopts the collections the commands hand back            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs, history.rs)                  │
//! │  - Collection in, next collection out                       │
//! │  - Every mutation writes through to the store               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - StorageBackend trait: get / set / remove of JSON text    │
//! │  - FsBackend (production), MemBackend (testing)             │
//! │  - MedStore: the two records, seeding and recovery          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Persistence Model
//!
//! There are exactly two records, the medicine list and the intake log. Both
//! are always written whole: a command reads the full collection, transforms
//! it and writes the full collection back. Loading never fails. Missing or
//! corrupt data degrades to the seed medicines or an empty log, and the
//! [`store::LoadOutcome`] says whether that happened.
//!
//! ## Testing Strategy
//!
//! Commands are tested against [`store::mem_backend::MemBackend`], which can
//! also simulate broken storage. The filesystem backend and the binary have
//! integration tests under `tests/`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Domain operations and transfer (export/import/clear)
//! - [`history`]: Newest-first ordering, day buckets and calendar days
//! - [`selector`]: Resolving user input to medicines and records
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Core data types (`MedicineItem`, `IntakeRecord`)
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod history;
pub mod model;
pub mod selector;
pub mod store;
