//! Domain operations.
//!
//! Every mutating command takes the caller's current collection by reference,
//! builds the next one, writes it through to the store and hands it back in a
//! [`CmdResult`]. Rejected input (blank or duplicate names) is not an error:
//! the input comes back unchanged with a warning message.

use crate::config::MedlogConfig;
use crate::model::{IntakeRecord, MedicineItem};
use std::path::PathBuf;

pub mod config;
pub mod intake;
pub mod medicines;
pub mod transfer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// What a command produced.
///
/// `medicines` / `intake_records` hold the full next collection for whichever
/// collection the command operated on; `affected_*` hold only the items that
/// were added or removed.
#[derive(Debug, Default)]
pub struct CmdResult {
    pub medicines: Vec<MedicineItem>,
    pub intake_records: Vec<IntakeRecord>,
    pub affected_medicines: Vec<MedicineItem>,
    pub affected_records: Vec<IntakeRecord>,
    pub export_path: Option<PathBuf>,
    pub config: Option<MedlogConfig>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_medicines(mut self, medicines: Vec<MedicineItem>) -> Self {
        self.medicines = medicines;
        self
    }

    pub fn with_intake_records(mut self, records: Vec<IntakeRecord>) -> Self {
        self.intake_records = records;
        self
    }

    pub fn with_export_path(mut self, path: PathBuf) -> Self {
        self.export_path = Some(path);
        self
    }

    pub fn with_config(mut self, config: MedlogConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn has_warnings(&self) -> bool {
        self.messages
            .iter()
            .any(|m| matches!(m.level, MessageLevel::Warning | MessageLevel::Error))
    }
}
