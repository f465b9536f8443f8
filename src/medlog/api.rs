//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer and the single
//! entry point for UI clients.
//!
//! ## Role and Responsibilities
//!
//! - **Holds session state**: the medicine list and intake log are loaded once
//!   in [`MedlogApi::open`] and kept in memory. Each command receives the
//!   current collection and the API adopts the one it returns, even if the
//!   write-through to storage failed.
//! - **Normalizes inputs**: positions, ids and names become concrete items
//!   (see [`crate::selector`]).
//! - **Returns structured types**: `CmdResult`, never printed output.
//!
//! ## Generic Over StorageBackend
//!
//! - Production: `MedlogApi<FsBackend>`
//! - Testing: `MedlogApi<MemBackend>`

use crate::commands;
use crate::config::MedlogConfig;
use crate::error::{MedlogError, Result};
use crate::history;
use crate::model::{IntakeRecord, MedicineItem};
use crate::selector::{parse_selectors, resolve_medicine, resolve_record, Selector};
use crate::store::{MedStore, StorageBackend};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub struct MedlogApi<B: StorageBackend> {
    store: MedStore<B>,
    data_dir: PathBuf,
    medicines: Vec<MedicineItem>,
    intake_records: Vec<IntakeRecord>,
    load_warnings: Vec<CmdMessage>,
}

impl<B: StorageBackend> MedlogApi<B> {
    /// Loads both collections. Never fails: unreadable data is replaced by
    /// defaults and reported through [`MedlogApi::load_warnings`].
    pub fn open(backend: B, data_dir: PathBuf) -> Self {
        let store = MedStore::new(backend);
        let medicines = store.load_medicines();
        let records = store.load_intake_records();

        let mut load_warnings = Vec::new();
        if let Some(cause) = medicines.cause() {
            load_warnings.push(CmdMessage::warning(format!(
                "Stored medicines could not be fully read ({}); using what could be recovered",
                cause
            )));
        }
        if let Some(cause) = records.cause() {
            load_warnings.push(CmdMessage::warning(format!(
                "Stored intake records could not be fully read ({}); using what could be recovered",
                cause
            )));
        }

        Self {
            store,
            data_dir,
            medicines: medicines.into_value(),
            intake_records: records.into_value(),
            load_warnings,
        }
    }

    pub fn medicines(&self) -> &[MedicineItem] {
        &self.medicines
    }

    pub fn intake_records(&self) -> &[IntakeRecord] {
        &self.intake_records
    }

    pub fn load_warnings(&self) -> &[CmdMessage] {
        &self.load_warnings
    }

    pub fn store(&self) -> &MedStore<B> {
        &self.store
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn add_medicine(&mut self, name: &str) -> CmdResult {
        let result = commands::medicines::add(&self.store, &self.medicines, name);
        self.medicines = result.medicines.clone();
        result
    }

    pub fn delete_medicines<I: AsRef<str>>(&mut self, inputs: &[I]) -> Result<CmdResult> {
        let ids = self.resolve_medicine_ids(inputs)?;
        let mut combined = CmdResult::default();
        for id in ids {
            let result = commands::medicines::delete(&self.store, &self.medicines, &id);
            self.medicines = result.medicines;
            combined.affected_medicines.extend(result.affected_medicines);
            combined.messages.extend(result.messages);
        }
        Ok(combined.with_medicines(self.medicines.clone()))
    }

    /// Moves the medicine at 1-based position `from` to position `to`.
    pub fn move_medicine(&mut self, from: usize, to: usize) -> Result<CmdResult> {
        let len = self.medicines.len();
        for pos in [from, to] {
            if pos == 0 || pos > len {
                return Err(MedlogError::NotFound(format!(
                    "Position {} is out of range (1-{})",
                    pos, len
                )));
            }
        }
        let next = commands::medicines::move_item(&self.medicines, from - 1, to - 1);
        Ok(self.reorder_medicines(next))
    }

    /// Persists `new_order` as given. A list that is not a permutation of the
    /// current one is logged and flagged, but still saved.
    pub fn reorder_medicines(&mut self, new_order: Vec<MedicineItem>) -> CmdResult {
        let is_permutation = commands::medicines::is_permutation(&self.medicines, &new_order);
        if !is_permutation {
            tracing::warn!(
                "Reordered list ({} items) does not match current medicines ({} items)",
                new_order.len(),
                self.medicines.len()
            );
        }
        let mut result = commands::medicines::reorder(&self.store, new_order);
        if !is_permutation {
            result.add_message(CmdMessage::warning(
                "The new order does not contain exactly the current medicines",
            ));
        }
        self.medicines = result.medicines.clone();
        result
    }

    /// Reorders to the medicines named by `inputs`, one selector per input.
    pub fn order_medicines<I: AsRef<str>>(&mut self, inputs: &[I]) -> Result<CmdResult> {
        let mut new_order = Vec::with_capacity(inputs.len());
        for input in inputs {
            let selector = Selector::from_str(input.as_ref()).map_err(MedlogError::Api)?;
            new_order.push(resolve_medicine(&self.medicines, &selector)?.clone());
        }
        Ok(self.reorder_medicines(new_order))
    }

    pub fn record_intake<I: AsRef<str>>(
        &mut self,
        inputs: &[I],
        timestamp: i64,
        details: Option<&str>,
    ) -> Result<CmdResult> {
        let selectors = parse_selectors(inputs)?;
        let [selector] = selectors.as_slice() else {
            return Err(MedlogError::Api(
                "Select exactly one medicine to record".to_string(),
            ));
        };
        let medicine = resolve_medicine(&self.medicines, selector)?.clone();
        let result = commands::intake::add(
            &self.store,
            &self.intake_records,
            &medicine.id,
            &medicine.name,
            timestamp,
            details,
        );
        self.intake_records = result.intake_records.clone();
        Ok(result)
    }

    pub fn delete_intake_records<I: AsRef<str>>(&mut self, inputs: &[I]) -> Result<CmdResult> {
        let selectors = parse_selectors(inputs)?;
        let targets = selectors
            .iter()
            .map(|s| resolve_record(&self.intake_records, s))
            .collect::<Result<Vec<_>>>()?;

        let mut combined = CmdResult::default();
        for target in targets {
            let result = commands::intake::delete(&self.store, &self.intake_records, &target.id);
            self.intake_records = result.intake_records;
            combined.affected_records.extend(result.affected_records);
            combined.messages.extend(result.messages);
        }
        Ok(combined.with_intake_records(self.intake_records.clone()))
    }

    /// The intake log, newest first.
    pub fn history(&self) -> Vec<IntakeRecord> {
        history::sorted_newest_first(&self.intake_records)
    }

    pub fn export_json(&self) -> Result<String> {
        commands::transfer::export_json(&self.store)
    }

    pub fn export_to_file(&self, path: &Path) -> Result<CmdResult> {
        commands::transfer::export_to_file(&self.store, path)
    }

    pub fn import_str(&mut self, contents: &str) -> Result<CmdResult> {
        let result = commands::transfer::import(&self.store, contents)?;
        self.adopt_all(&result);
        Ok(result)
    }

    pub fn import_file(&mut self, path: &Path) -> Result<CmdResult> {
        let result = commands::transfer::import_file(&self.store, path)?;
        self.adopt_all(&result);
        Ok(result)
    }

    pub fn clear_all_data(&mut self) -> CmdResult {
        let result = commands::transfer::clear(&self.store);
        self.adopt_all(&result);
        result
    }

    pub fn config(&self, action: ConfigAction) -> Result<CmdResult> {
        commands::config::run(&self.data_dir, action)
    }

    /// The stored config, or defaults if it cannot be read.
    pub fn load_config(&self) -> MedlogConfig {
        MedlogConfig::load(&self.data_dir).unwrap_or_else(|e| {
            tracing::warn!("Could not read config, using defaults: {}", e);
            MedlogConfig::default()
        })
    }

    fn resolve_medicine_ids<I: AsRef<str>>(&self, inputs: &[I]) -> Result<Vec<String>> {
        parse_selectors(inputs)?
            .iter()
            .map(|s| resolve_medicine(&self.medicines, s).map(|m| m.id.clone()))
            .collect()
    }

    fn adopt_all(&mut self, result: &CmdResult) {
        self.medicines = result.medicines.clone();
        self.intake_records = result.intake_records.clone();
    }
}

pub use crate::commands::config::ConfigAction;
pub use crate::commands::{CmdMessage, CmdResult, MessageLevel};
