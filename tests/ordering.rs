use folio::app::Catalog;
use folio::domain::{ImageInfo, NewProject, ProjectPatch, ProjectRecord};
use folio::storage::{order_for_display, order_for_display_with, shuffle, MemoryStorage};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeSet;

fn record(id: u64, priority: u8) -> ProjectRecord {
    let mut record = NewProject::new(format!("p{id}"), ImageInfo::new("u", 10, 10)).into_record(id, 0);
    record.priority = priority;
    record
}

fn ids(records: &[ProjectRecord]) -> Vec<u64> {
    records.iter().map(|r| r.id).collect()
}

#[test]
fn highest_priority_first_unranked_last() {
    let mut catalog = Catalog::with_storage(MemoryStorage::new());
    for (title, priority) in [("A", 0), ("B", 3), ("C", 5)] {
        catalog
            .upsert(
                ProjectPatch::default()
                    .title(title)
                    .image(ImageInfo::new("u", 10, 10))
                    .priority(priority),
            )
            .unwrap();
    }

    let ordered = catalog.display_order(&mut StdRng::seed_from_u64(1));
    let priorities: Vec<u8> = ordered.iter().map(|r| r.priority).collect();
    assert_eq!(priorities, vec![5, 3, 0]);
}

#[test]
fn prioritized_records_precede_the_rest_and_nothing_is_lost() {
    let input: Vec<ProjectRecord> = [0, 2, 0, 5, 1, 0, 2, 0, 4]
        .iter()
        .enumerate()
        .map(|(i, &p)| record(i as u64 + 1, p))
        .collect();

    for seed in 0..20 {
        let ordered = order_for_display(input.clone(), &mut StdRng::seed_from_u64(seed));
        assert_eq!(ordered.len(), input.len());

        let first_unranked = ordered.iter().position(|r| r.priority == 0).unwrap();
        assert!(ordered[..first_unranked].iter().all(|r| r.priority > 0));
        assert!(ordered[first_unranked..].iter().all(|r| r.priority == 0));
        assert!(ordered[..first_unranked]
            .windows(2)
            .all(|w| w[0].priority >= w[1].priority));

        let expected: BTreeSet<u64> = ids(&input).into_iter().collect();
        let actual: BTreeSet<u64> = ids(&ordered).into_iter().collect();
        assert_eq!(actual, expected);
    }
}

#[test]
fn equal_priorities_keep_input_order() {
    let input = vec![record(1, 2), record(2, 4), record(3, 2), record(4, 4)];
    let ordered = order_for_display_with(input, |_| {});
    assert_eq!(ids(&ordered), vec![2, 4, 1, 3]);
}

#[test]
fn injected_permutation_controls_unranked_order() {
    let input = vec![record(1, 0), record(2, 1), record(3, 0), record(4, 0)];
    let ordered = order_for_display_with(input, <[ProjectRecord]>::reverse);
    assert_eq!(ids(&ordered), vec![2, 4, 3, 1]);
}

#[test]
fn unranked_order_varies_between_seeds() {
    let input: Vec<ProjectRecord> = (1..=8).map(|id| record(id, 0)).collect();

    let orders: BTreeSet<Vec<u64>> = (0..10)
        .map(|seed| ids(&order_for_display(input.clone(), &mut StdRng::seed_from_u64(seed))))
        .collect();
    assert!(orders.len() > 1);
}

#[test]
fn same_seed_gives_same_order() {
    let input: Vec<ProjectRecord> = (1..=8).map(|id| record(id, 0)).collect();

    let a = order_for_display(input.clone(), &mut StdRng::seed_from_u64(42));
    let b = order_for_display(input, &mut StdRng::seed_from_u64(42));
    assert_eq!(a, b);
}

#[test]
fn shuffle_handles_empty_and_single_slices() {
    let mut rng = StdRng::seed_from_u64(3);

    let mut empty: Vec<u8> = Vec::new();
    shuffle(&mut empty, &mut rng);
    assert!(empty.is_empty());

    let mut one = vec![9];
    shuffle(&mut one, &mut rng);
    assert_eq!(one, vec![9]);
}
