use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const ID_SUFFIX_LEN: usize = 7;

/// A medicine or supplement the user may record taking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicineItem {
    pub id: String,
    pub name: String,
}

impl MedicineItem {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
        }
    }

    /// Case-insensitive name comparison, ignoring surrounding whitespace.
    /// Used to look a medicine up by name.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }

    /// Whether adding `candidate` would duplicate this medicine. Only the
    /// candidate is trimmed; the stored name is compared as stored.
    pub fn is_duplicate_of(&self, candidate: &str) -> bool {
        self.name.to_lowercase() == candidate.trim().to_lowercase()
    }
}

/// One logged intake of a medicine.
///
/// `medicine_name` is copied at recording time and never follows later
/// renames or deletions of the medicine it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeRecord {
    pub id: String,
    pub medicine_id: String,
    pub medicine_name: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntakeRecord {
    pub fn new(
        medicine_id: impl Into<String>,
        medicine_name: impl Into<String>,
        timestamp: i64,
        details: Option<&str>,
    ) -> Self {
        Self {
            id: new_id(),
            medicine_id: medicine_id.into(),
            medicine_name: medicine_name.into(),
            timestamp,
            details: normalize_details(details),
        }
    }
}

/// Blank details are dropped, anything else is trimmed.
pub fn normalize_details(details: Option<&str>) -> Option<String> {
    details
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

/// Generates an id from the current epoch milliseconds plus a short random suffix.
///
/// Unique enough for one user on one device; not meant to be globally unique.
pub fn new_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!(
        "{}{}",
        Utc::now().timestamp_millis(),
        &suffix[..ID_SUFFIX_LEN]
    )
}

/// The starter list used whenever no medicines have been persisted yet.
pub fn default_medicines() -> Vec<MedicineItem> {
    vec![
        MedicineItem {
            id: "default-1".to_string(),
            name: "Vitamin C".to_string(),
        },
        MedicineItem {
            id: "default-2".to_string(),
            name: "Vitamin D".to_string(),
        },
    ]
}
