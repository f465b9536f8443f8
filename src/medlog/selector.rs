//! User-facing references to medicines and intake records.
//!
//! The CLI shows both lists with 1-based positions: medicines in their stored
//! order, intake records newest first. A [`Selector`] is either such a
//! position or a free-form key. Keys match an id exactly, or for medicines
//! also a name (ignoring case and surrounding whitespace).

use crate::error::{MedlogError, Result};
use crate::history::sorted_newest_first;
use crate::model::{IntakeRecord, MedicineItem};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Index(usize),
    Key(String),
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Index(i) => write!(f, "{}", i),
            Selector::Key(k) => write!(f, "\"{}\"", k),
        }
    }
}

impl FromStr for Selector {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("Empty selector".to_string());
        }
        match trimmed.parse::<usize>() {
            Ok(0) => Err("Positions start at 1".to_string()),
            Ok(n) => Ok(Selector::Index(n)),
            Err(_) => Ok(Selector::Key(trimmed.to_string())),
        }
    }
}

/// Parses several inputs. If any is not a position, all of them are joined
/// into one key, so `take vitamin c` works without quoting.
pub fn parse_selectors<I: AsRef<str>>(inputs: &[I]) -> Result<Vec<Selector>> {
    let all_indexes: std::result::Result<Vec<usize>, _> = inputs
        .iter()
        .map(|s| s.as_ref().trim().parse::<usize>())
        .collect();

    if let Ok(indexes) = all_indexes {
        return indexes
            .into_iter()
            .map(|n| Selector::from_str(&n.to_string()).map_err(MedlogError::Api))
            .collect();
    }

    let joined = inputs
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<&str>>()
        .join(" ");
    let selector = Selector::from_str(&joined).map_err(MedlogError::Api)?;
    Ok(vec![selector])
}

pub fn resolve_medicine<'a>(
    medicines: &'a [MedicineItem],
    selector: &Selector,
) -> Result<&'a MedicineItem> {
    let found = match selector {
        Selector::Index(n) => n.checked_sub(1).and_then(|i| medicines.get(i)),
        Selector::Key(key) => medicines
            .iter()
            .find(|m| m.id == *key)
            .or_else(|| medicines.iter().find(|m| m.has_name(key))),
    };
    found.ok_or_else(|| MedlogError::NotFound(format!("No medicine matches {}", selector)))
}

/// Resolves against the newest-first ordering shown by `history`.
pub fn resolve_record(records: &[IntakeRecord], selector: &Selector) -> Result<IntakeRecord> {
    let found = match selector {
        Selector::Index(n) => n
            .checked_sub(1)
            .and_then(|i| sorted_newest_first(records).into_iter().nth(i)),
        Selector::Key(key) => records.iter().find(|r| r.id == *key).cloned(),
    };
    found.ok_or_else(|| MedlogError::NotFound(format!("No intake record matches {}", selector)))
}
