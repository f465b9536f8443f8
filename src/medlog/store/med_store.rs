use super::backend::StorageBackend;
use super::LoadOutcome;
use crate::error::Result;
use crate::model::{default_medicines, IntakeRecord, MedicineItem};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub const MEDICINES_KEY: &str = "mediLog_medicines";
pub const INTAKE_RECORDS_KEY: &str = "mediLog_intakeRecords";

/// A stored array after typed decoding. `skipped` counts elements that did not
/// match the item shape.
struct Decoded<T> {
    items: Vec<T>,
    skipped: usize,
}

/// The two medlog records on top of any [`StorageBackend`].
///
/// Loads never fail and saves never raise; see the module docs for the policy.
pub struct MedStore<B: StorageBackend> {
    backend: B,
}

impl<B: StorageBackend> MedStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Loads the medicine list.
    ///
    /// A missing record is seeded with the default medicines, which are
    /// persisted. An unreadable record is replaced by the seed as well and the
    /// outcome is `Recovered`.
    pub fn load_medicines(&self) -> LoadOutcome<Vec<MedicineItem>> {
        match self.read_collection::<MedicineItem>(MEDICINES_KEY) {
            Ok(Some(decoded)) => recovered_if_skipped(decoded, "medicine"),
            Ok(None) => {
                let seed = default_medicines();
                tracing::debug!("No medicines stored, seeding {} defaults", seed.len());
                self.save_medicines(&seed);
                LoadOutcome::Ok(seed)
            }
            Err(e) => {
                tracing::warn!("Could not load medicines, falling back to defaults: {}", e);
                let seed = default_medicines();
                self.save_medicines(&seed);
                LoadOutcome::Recovered {
                    value: seed,
                    cause: e.to_string(),
                }
            }
        }
    }

    /// Loads the intake log. Missing or unreadable data yields an empty log;
    /// nothing is written.
    pub fn load_intake_records(&self) -> LoadOutcome<Vec<IntakeRecord>> {
        match self.read_collection::<IntakeRecord>(INTAKE_RECORDS_KEY) {
            Ok(Some(decoded)) => recovered_if_skipped(decoded, "intake record"),
            Ok(None) => LoadOutcome::Ok(Vec::new()),
            Err(e) => {
                tracing::warn!("Could not load intake records, starting empty: {}", e);
                LoadOutcome::Recovered {
                    value: Vec::new(),
                    cause: e.to_string(),
                }
            }
        }
    }

    /// Returns whether the write landed. Failures are logged, never raised.
    ///
    /// Stored elements that are not valid medicines (left there by an import)
    /// are written back after `medicines`, unchanged.
    pub fn save_medicines(&self, medicines: &[MedicineItem]) -> bool {
        self.write_keeping_unreadable(MEDICINES_KEY, medicines)
    }

    /// Returns whether the write landed. Failures are logged, never raised.
    ///
    /// Unreadable stored elements are kept as in [`MedStore::save_medicines`].
    pub fn save_intake_records(&self, records: &[IntakeRecord]) -> bool {
        self.write_keeping_unreadable(INTAKE_RECORDS_KEY, records)
    }

    /// Writes raw JSON elements under `key` exactly as given.
    pub(crate) fn save_raw(&self, key: &str, values: &[Value]) -> bool {
        self.write_values(key, values)
    }

    /// The stored array under `key` as raw JSON, including elements that do
    /// not decode. Missing or unparsable records read as empty.
    pub(crate) fn stored_values(&self, key: &str) -> Vec<Value> {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) if !raw.trim().is_empty() => raw,
            Ok(_) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Could not read {}: {}", key, e);
                return Vec::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!("{} is not a JSON array: {}", key, e);
            Vec::new()
        })
    }

    /// Removes both records, so the next medicine load seeds defaults again.
    pub fn clear_all(&self) -> bool {
        let mut ok = true;
        for key in [MEDICINES_KEY, INTAKE_RECORDS_KEY] {
            if let Err(e) = self.backend.remove(key) {
                tracing::error!("Error removing {}: {}", key, e);
                ok = false;
            }
        }
        ok
    }

    fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Result<Option<Decoded<T>>> {
        let raw = match self.backend.get(key)? {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => return Ok(None),
        };
        let values: Vec<Value> = serde_json::from_str(&raw)?;
        Ok(Some(decode_elements(values)))
    }

    fn write_keeping_unreadable<T: Serialize + DeserializeOwned>(
        &self,
        key: &str,
        items: &[T],
    ) -> bool {
        let mut values = match items
            .iter()
            .map(serde_json::to_value)
            .collect::<serde_json::Result<Vec<Value>>>()
        {
            Ok(values) => values,
            Err(e) => {
                tracing::error!("Error serializing {}: {}", key, e);
                return false;
            }
        };

        let unreadable: Vec<Value> = self
            .stored_values(key)
            .into_iter()
            .filter(|v| serde_json::from_value::<T>(v.clone()).is_err())
            .collect();
        if !unreadable.is_empty() {
            tracing::debug!("Keeping {} unreadable entries in {}", unreadable.len(), key);
            values.extend(unreadable);
        }
        self.write_values(key, &values)
    }

    fn write_values(&self, key: &str, values: &[Value]) -> bool {
        let content = match serde_json::to_string(values) {
            Ok(content) => content,
            Err(e) => {
                tracing::error!("Error serializing {}: {}", key, e);
                return false;
            }
        };
        match self.backend.set(key, &content) {
            Ok(()) => {
                tracing::debug!("Saved {} ({} entries)", key, values.len());
                true
            }
            Err(e) => {
                tracing::error!("Error saving {}: {}", key, e);
                false
            }
        }
    }
}

/// Decodes each element on its own so one malformed entry does not take the
/// rest of the collection with it.
fn decode_elements<T: DeserializeOwned>(values: Vec<Value>) -> Decoded<T> {
    let total = values.len();
    let items: Vec<T> = values
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect();
    Decoded {
        skipped: total - items.len(),
        items,
    }
}

pub(crate) fn decode_lenient<T: DeserializeOwned>(
    values: Vec<Value>,
    what: &str,
) -> LoadOutcome<Vec<T>> {
    recovered_if_skipped(decode_elements(values), what)
}

fn recovered_if_skipped<T>(decoded: Decoded<T>, what: &str) -> LoadOutcome<Vec<T>> {
    if decoded.skipped == 0 {
        return LoadOutcome::Ok(decoded.items);
    }
    tracing::warn!("Skipped {} malformed {} entries", decoded.skipped, what);
    LoadOutcome::Recovered {
        value: decoded.items,
        cause: format!("skipped {} malformed {} entries", decoded.skipped, what),
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::store::mem_backend::MemBackend;

    pub struct StoreFixture {
        pub store: MedStore<MemBackend>,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: MedStore::new(MemBackend::new()),
            }
        }

        pub fn with_medicines(self, names: &[&str]) -> Self {
            let medicines: Vec<MedicineItem> =
                names.iter().map(|n| MedicineItem::new(*n)).collect();
            self.store.save_medicines(&medicines);
            self
        }

        pub fn with_record(self, medicine: &MedicineItem, timestamp: i64) -> Self {
            let mut records = self.store.load_intake_records().into_value();
            records.push(IntakeRecord::new(
                medicine.id.clone(),
                medicine.name.clone(),
                timestamp,
                None,
            ));
            self.store.save_intake_records(&records);
            self
        }

        pub fn medicines(&self) -> Vec<MedicineItem> {
            self.store.load_medicines().into_value()
        }

        pub fn records(&self) -> Vec<IntakeRecord> {
            self.store.load_intake_records().into_value()
        }
    }
}
