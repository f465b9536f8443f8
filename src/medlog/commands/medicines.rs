use crate::commands::{CmdMessage, CmdResult};
use crate::model::MedicineItem;
use crate::store::{MedStore, StorageBackend};
use std::collections::HashMap;

pub const EMPTY_NAME: &str = "Medicine name cannot be empty.";
pub const DUPLICATE_NAME: &str = "Medicine with this name already exists.";

/// Appends a medicine named `name` (trimmed).
///
/// Blank names and names already present (ignoring case) are rejected: the
/// input list comes back unchanged, nothing is written.
pub fn add<B: StorageBackend>(
    store: &MedStore<B>,
    medicines: &[MedicineItem],
    name: &str,
) -> CmdResult {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return rejected(medicines, EMPTY_NAME);
    }
    if medicines.iter().any(|m| m.is_duplicate_of(trimmed)) {
        return rejected(medicines, DUPLICATE_NAME);
    }

    let item = MedicineItem::new(trimmed);
    let mut next = medicines.to_vec();
    next.push(item.clone());
    store.save_medicines(&next);

    let mut result = CmdResult::default().with_medicines(next);
    result.add_message(CmdMessage::success(format!("Medicine added: {}", item.name)));
    result.affected_medicines.push(item);
    result
}

/// Removes the medicine with `id`. A missing id is a no-op.
///
/// Intake records are never touched: they carry their own copy of the name.
pub fn delete<B: StorageBackend>(
    store: &MedStore<B>,
    medicines: &[MedicineItem],
    id: &str,
) -> CmdResult {
    let (removed, next): (Vec<MedicineItem>, Vec<MedicineItem>) =
        medicines.iter().cloned().partition(|m| m.id == id);
    store.save_medicines(&next);

    let mut result = CmdResult::default().with_medicines(next);
    match removed.first() {
        Some(item) => result.add_message(CmdMessage::success(format!(
            "Medicine removed: {}",
            item.name
        ))),
        None => result.add_message(CmdMessage::info(format!("No medicine with id {}", id))),
    }
    result.affected_medicines = removed;
    result
}

/// Persists `new_order` verbatim.
///
/// No check is made that `new_order` holds the same medicines as before; see
/// [`is_permutation`] for callers that want to know.
pub fn reorder<B: StorageBackend>(store: &MedStore<B>, new_order: Vec<MedicineItem>) -> CmdResult {
    store.save_medicines(&new_order);
    let mut result = CmdResult::default().with_medicines(new_order);
    result.add_message(CmdMessage::success("Medicine order saved."));
    result
}

/// Moves the element at `from` to `to`, shifting the ones in between.
///
/// An out-of-range `from` returns an unchanged copy; `to` is clamped to the
/// last position.
pub fn move_item<T: Clone>(items: &[T], from: usize, to: usize) -> Vec<T> {
    let mut next = items.to_vec();
    if from >= next.len() {
        return next;
    }
    let item = next.remove(from);
    let to = to.min(next.len());
    next.insert(to, item);
    next
}

/// True when `proposed` holds exactly the ids of `current`, each once.
pub fn is_permutation(current: &[MedicineItem], proposed: &[MedicineItem]) -> bool {
    if current.len() != proposed.len() {
        return false;
    }
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for m in current {
        *counts.entry(m.id.as_str()).or_default() += 1;
    }
    for m in proposed {
        *counts.entry(m.id.as_str()).or_default() -= 1;
    }
    counts.values().all(|c| *c == 0)
}

fn rejected(medicines: &[MedicineItem], reason: &str) -> CmdResult {
    let mut result = CmdResult::default().with_medicines(medicines.to_vec());
    result.add_message(CmdMessage::warning(reason));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{intake, MessageLevel};
    use crate::store::med_store::fixtures::StoreFixture;
    use crate::store::MEDICINES_KEY;

    fn names(items: &[MedicineItem]) -> Vec<&str> {
        items.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn add_appends_trimmed_name() {
        let fixture = StoreFixture::new().with_medicines(&["Vitamin C"]);
        let current = fixture.medicines();

        let result = add(&fixture.store, &current, "  Magnesium  ");

        assert_eq!(result.medicines.len(), current.len() + 1);
        assert_eq!(result.medicines.last().unwrap().name, "Magnesium");
        assert_eq!(result.affected_medicines.len(), 1);
        assert_eq!(fixture.medicines(), result.medicines);
    }

    #[test]
    fn add_generates_distinct_ids() {
        let fixture = StoreFixture::new().with_medicines(&[]);
        let first = add(&fixture.store, &[], "Iron");
        let second = add(&fixture.store, &first.medicines, "Zinc");

        assert_ne!(second.medicines[0].id, second.medicines[1].id);
    }

    #[test]
    fn add_rejects_case_insensitive_duplicate() {
        let fixture = StoreFixture::new().with_medicines(&["Vitamin C"]);
        let current = fixture.medicines();

        let result = add(&fixture.store, &current, " vitamin c ");

        assert_eq!(result.medicines, current);
        assert!(result.affected_medicines.is_empty());
        assert_eq!(result.messages[0].level, MessageLevel::Warning);
        assert_eq!(result.messages[0].content, DUPLICATE_NAME);
    }

    #[test]
    fn add_accepts_name_matching_only_after_trimming_stored_one() {
        let fixture = StoreFixture::new();
        let current = vec![MedicineItem {
            id: "imported".into(),
            name: " Iron ".into(),
        }];

        let result = add(&fixture.store, &current, "Iron");

        assert_eq!(names(&result.medicines), [" Iron ", "Iron"]);
        assert_eq!(result.messages[0].level, MessageLevel::Success);
    }

    #[test]
    fn add_rejects_blank_names_without_writing() {
        let fixture = StoreFixture::new();
        let current = vec![MedicineItem::new("Unsaved")];

        for blank in ["", "   ", "\t\n"] {
            let result = add(&fixture.store, &current, blank);
            assert_eq!(result.medicines, current);
            assert_eq!(result.messages[0].content, EMPTY_NAME);
        }
        assert!(!fixture.store.backend().contains_key(MEDICINES_KEY));
    }

    #[test]
    fn delete_is_idempotent() {
        let fixture = StoreFixture::new().with_medicines(&["A", "B"]);
        let current = fixture.medicines();
        let id = current[0].id.clone();

        let once = delete(&fixture.store, &current, &id);
        let twice = delete(&fixture.store, &once.medicines, &id);

        assert_eq!(names(&once.medicines), ["B"]);
        assert_eq!(once.medicines, twice.medicines);
        assert!(twice.affected_medicines.is_empty());
        assert_eq!(twice.messages[0].level, MessageLevel::Info);
    }

    #[test]
    fn delete_keeps_intake_records() {
        let fixture = StoreFixture::new().with_medicines(&["Iron"]);
        let iron = fixture.medicines()[0].clone();
        let fixture = fixture.with_record(&iron, 1_000).with_record(&iron, 2_000);
        let records_before = fixture.records();

        let result = delete(&fixture.store, &fixture.medicines(), &iron.id);

        assert!(result.medicines.is_empty());
        assert_eq!(fixture.records(), records_before);
        assert!(fixture.records().iter().all(|r| r.medicine_name == "Iron"));
    }

    #[test]
    fn records_outlive_their_medicine() {
        let fixture = StoreFixture::new().with_medicines(&["Iron"]);
        let iron = fixture.medicines()[0].clone();

        let logged = intake::add(&fixture.store, &[], &iron.id, &iron.name, 5, None);
        delete(&fixture.store, &fixture.medicines(), &iron.id);

        assert_eq!(fixture.records(), logged.intake_records);
    }

    #[test]
    fn move_first_to_last_persists_order() {
        let fixture = StoreFixture::new().with_medicines(&["A", "B", "C"]);
        let current = fixture.medicines();

        let moved = move_item(&current, 0, 2);
        let result = reorder(&fixture.store, moved);

        assert_eq!(names(&result.medicines), ["B", "C", "A"]);
        assert_eq!(names(&fixture.medicines()), ["B", "C", "A"]);
    }

    #[test]
    fn move_last_to_first() {
        assert_eq!(move_item(&["A", "B", "C"], 2, 0), ["C", "A", "B"]);
    }

    #[test]
    fn move_out_of_range() {
        assert_eq!(move_item(&["A", "B"], 5, 0), ["A", "B"]);
        assert_eq!(move_item(&["A", "B"], 0, 9), ["B", "A"]);
        assert!(move_item::<&str>(&[], 0, 0).is_empty());
    }

    #[test]
    fn reorder_does_not_validate() {
        let fixture = StoreFixture::new().with_medicines(&["A", "B", "C"]);
        let current = fixture.medicines();
        let dropped = vec![current[2].clone(), current[2].clone()];

        assert!(!is_permutation(&current, &dropped));
        reorder(&fixture.store, dropped);

        assert_eq!(names(&fixture.medicines()), ["C", "C"]);
    }

    #[test]
    fn permutation_check() {
        let a = MedicineItem::new("A");
        let b = MedicineItem::new("B");
        assert!(is_permutation(
            &[a.clone(), b.clone()],
            &[b.clone(), a.clone()]
        ));
        assert!(!is_permutation(&[a.clone(), b.clone()], &[a.clone(), a]));
        assert!(!is_permutation(&[b.clone()], &[]));
    }
}
