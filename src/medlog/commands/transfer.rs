//! Export, import and clear.
//!
//! These talk to the store directly instead of going through the medicine and
//! intake commands. The export document is
//!
//! ```text
//! { "medicines": [...], "intakeRecords": [...] }
//! ```
//!
//! pretty-printed, with no version field. Import checks only that shape at the
//! top level; array elements are stored as given.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::{MedlogError, Result};
use crate::model::{IntakeRecord, MedicineItem};
use crate::store::med_store::decode_lenient;
use crate::store::{LoadOutcome, MedStore, StorageBackend, INTAKE_RECORDS_KEY, MEDICINES_KEY};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Elements are kept as raw JSON so entries the typed model cannot read
/// still round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub medicines: Vec<Value>,
    pub intake_records: Vec<Value>,
}

/// Reads both collections fresh from the store, exactly as stored. Loading
/// medicines first seeds them if nothing was saved yet.
pub fn export_document<B: StorageBackend>(store: &MedStore<B>) -> ExportDocument {
    store.load_medicines();
    ExportDocument {
        medicines: store.stored_values(MEDICINES_KEY),
        intake_records: store.stored_values(INTAKE_RECORDS_KEY),
    }
}

pub fn export_json<B: StorageBackend>(store: &MedStore<B>) -> Result<String> {
    let doc = export_document(store);
    serde_json::to_string_pretty(&doc).map_err(MedlogError::Serialization)
}

pub fn export_to_file<B: StorageBackend>(store: &MedStore<B>, path: &Path) -> Result<CmdResult> {
    let doc = export_document(store);
    let content = serde_json::to_string_pretty(&doc).map_err(MedlogError::Serialization)?;
    fs::write(path, content).map_err(MedlogError::Io)?;

    let mut result = CmdResult::default().with_export_path(path.to_path_buf());
    result.add_message(CmdMessage::success(format!(
        "Exported {} medicines and {} intake records to {}",
        doc.medicines.len(),
        doc.intake_records.len(),
        path.display()
    )));
    Ok(result)
}

/// Replaces both collections with the contents of an export document.
///
/// Fails without writing anything unless the document is an object whose
/// `medicines` and `intakeRecords` are arrays. Existing data is overwritten,
/// never merged.
pub fn import<B: StorageBackend>(store: &MedStore<B>, contents: &str) -> Result<CmdResult> {
    let (medicines_raw, records_raw) = parse_document(contents)?;

    store.save_raw(MEDICINES_KEY, &medicines_raw);
    store.save_raw(INTAKE_RECORDS_KEY, &records_raw);

    let medicines: LoadOutcome<Vec<MedicineItem>> = decode_lenient(medicines_raw, "medicine");
    let records: LoadOutcome<Vec<IntakeRecord>> = decode_lenient(records_raw, "intake record");

    let mut result = CmdResult::default();
    for cause in [medicines.cause(), records.cause()].into_iter().flatten() {
        result.add_message(CmdMessage::warning(format!("Imported with problems: {}", cause)));
    }
    let medicines = medicines.into_value();
    let records = records.into_value();
    result.add_message(CmdMessage::success(format!(
        "Imported {} medicines and {} intake records",
        medicines.len(),
        records.len()
    )));
    Ok(result.with_medicines(medicines).with_intake_records(records))
}

pub fn import_file<B: StorageBackend>(store: &MedStore<B>, path: &Path) -> Result<CmdResult> {
    let contents = fs::read_to_string(path).map_err(MedlogError::Io)?;
    import(store, &contents)
}

/// Removes all persisted data. The next load seeds the default medicines.
pub fn clear<B: StorageBackend>(store: &MedStore<B>) -> CmdResult {
    store.clear_all();
    let mut result = CmdResult::default()
        .with_medicines(store.load_medicines().into_value())
        .with_intake_records(store.load_intake_records().into_value());
    result.add_message(CmdMessage::success("All data cleared."));
    result
}

fn parse_document(contents: &str) -> Result<(Vec<Value>, Vec<Value>)> {
    let value: Value = serde_json::from_str(contents)
        .map_err(|e| MedlogError::Import(format!("not valid JSON: {}", e)))?;
    let Value::Object(mut map) = value else {
        return Err(MedlogError::Import(
            "expected a JSON object at the top level".to_string(),
        ));
    };
    let medicines = take_array(&mut map, "medicines")?;
    let records = take_array(&mut map, "intakeRecords")?;
    Ok((medicines, records))
}

fn take_array(map: &mut serde_json::Map<String, Value>, field: &str) -> Result<Vec<Value>> {
    match map.remove(field) {
        Some(Value::Array(items)) => Ok(items),
        _ => Err(MedlogError::Import(format!("`{}` must be an array", field))),
    }
}
