use crate::commands::{CmdMessage, CmdResult};
use crate::model::IntakeRecord;
use crate::store::{MedStore, StorageBackend};

/// Logs one intake. Always succeeds.
///
/// `medicine_id` is not checked against the medicine list; the caller resolves
/// the id/name pair. Blank `details` are dropped, others trimmed.
pub fn add<B: StorageBackend>(
    store: &MedStore<B>,
    records: &[IntakeRecord],
    medicine_id: &str,
    medicine_name: &str,
    timestamp: i64,
    details: Option<&str>,
) -> CmdResult {
    let record = IntakeRecord::new(medicine_id, medicine_name, timestamp, details);
    let mut next = records.to_vec();
    next.push(record.clone());
    store.save_intake_records(&next);

    let mut result = CmdResult::default().with_intake_records(next);
    result.add_message(CmdMessage::success(format!(
        "Intake recorded: {}",
        record.medicine_name
    )));
    result.affected_records.push(record);
    result
}

/// Removes the record with `id`. A missing id is a no-op.
pub fn delete<B: StorageBackend>(
    store: &MedStore<B>,
    records: &[IntakeRecord],
    id: &str,
) -> CmdResult {
    let (removed, next): (Vec<IntakeRecord>, Vec<IntakeRecord>) =
        records.iter().cloned().partition(|r| r.id == id);
    store.save_intake_records(&next);

    let mut result = CmdResult::default().with_intake_records(next);
    match removed.first() {
        Some(record) => result.add_message(CmdMessage::success(format!(
            "Intake record removed: {}",
            record.medicine_name
        ))),
        None => result.add_message(CmdMessage::info(format!("No intake record with id {}", id))),
    }
    result.affected_records = removed;
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::med_store::fixtures::StoreFixture;

    #[test]
    fn blank_details_are_omitted() {
        let fixture = StoreFixture::new();

        let result = add(&fixture.store, &[], "m1", "Iron", 100, Some("   "));

        let record = &result.intake_records[0];
        assert_eq!(record.details, None);
        let stored = fixture.store.backend().raw(crate::store::INTAKE_RECORDS_KEY).unwrap();
        assert!(!stored.contains("details"));
    }

    #[test]
    fn details_are_trimmed() {
        let fixture = StoreFixture::new();

        let result = add(&fixture.store, &[], "m1", "Iron", 100, Some(" 65 mg "));

        assert_eq!(result.intake_records[0].details.as_deref(), Some("65 mg"));
        assert_eq!(fixture.records(), result.intake_records);
    }

    #[test]
    fn add_accepts_unknown_medicine() {
        let fixture = StoreFixture::new();

        let result = add(&fixture.store, &[], "gone", "Retired Pill", 1, None);

        assert_eq!(result.intake_records.len(), 1);
        assert_eq!(result.intake_records[0].medicine_id, "gone");
    }

    #[test]
    fn add_keeps_backdated_timestamp() {
        let fixture = StoreFixture::new();
        let first = add(&fixture.store, &[], "m1", "Iron", 2_000, None);
        let second = add(&fixture.store, &first.intake_records, "m1", "Iron", 1_000, None);

        let stamps: Vec<i64> = second.intake_records.iter().map(|r| r.timestamp).collect();
        assert_eq!(stamps, [2_000, 1_000]);
    }

    #[test]
    fn delete_removes_only_matching_record() {
        let fixture = StoreFixture::new();
        let first = add(&fixture.store, &[], "m1", "Iron", 1, None);
        let second = add(&fixture.store, &first.intake_records, "m2", "Zinc", 2, None);
        let target = second.intake_records[0].id.clone();

        let result = delete(&fixture.store, &second.intake_records, &target);

        assert_eq!(result.intake_records.len(), 1);
        assert_eq!(result.intake_records[0].medicine_name, "Zinc");
        assert_eq!(result.affected_records[0].id, target);
        assert_eq!(fixture.records(), result.intake_records);
    }

    #[test]
    fn delete_missing_id_is_noop() {
        let fixture = StoreFixture::new();
        let first = add(&fixture.store, &[], "m1", "Iron", 1, None);

        let result = delete(&fixture.store, &first.intake_records, "nope");

        assert_eq!(result.intake_records, first.intake_records);
        assert!(result.affected_records.is_empty());
    }

    #[test]
    fn write_failure_still_returns_next_collection() {
        let fixture = StoreFixture::new();
        fixture.store.backend().set_simulate_write_error(true);

        let result = add(&fixture.store, &[], "m1", "Iron", 1, None);

        assert_eq!(result.intake_records.len(), 1);
        fixture.store.backend().set_simulate_write_error(false);
        assert!(fixture.records().is_empty());
    }
}
