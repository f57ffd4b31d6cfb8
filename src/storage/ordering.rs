//! Display ordering for project lists.
//!
//! Records with an explicit priority come first, highest priority first. Records
//! without one follow in a random order, so every unranked project gets its turn
//! near the top of the page.
//!
//! The policy is two composed steps: a stable sort of the prioritized records and a
//! permutation of the rest. [`order_for_display`] draws the permutation from a
//! random source using a Fisher-Yates shuffle; [`order_for_display_with`] accepts
//! any permutation, which keeps the sort step testable without randomness.

use crate::domain::project::ProjectRecord;
use rand::Rng;

/// Sorts records by descending priority.
///
/// The sort is stable: records with equal priority keep their input order.
pub fn sort_by_priority(records: &mut [ProjectRecord]) {
    records.sort_by(|a, b| b.priority.cmp(&a.priority));
}

/// Shuffles `items` in place with the Fisher-Yates algorithm.
///
/// With an unbiased `rng`, each of the `n!` permutations is equally likely.
///
/// # Examples
///
/// ```
/// use folio::storage::shuffle;
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let mut items = vec![1, 2, 3, 4, 5];
/// shuffle(&mut items, &mut StdRng::seed_from_u64(7));
/// items.sort_unstable();
/// assert_eq!(items, vec![1, 2, 3, 4, 5]);
/// ```
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}

/// Splits records into `(prioritized, unprioritized)`, preserving input order.
#[must_use]
pub fn partition_by_priority(records: Vec<ProjectRecord>) -> (Vec<ProjectRecord>, Vec<ProjectRecord>) {
    records.into_iter().partition(ProjectRecord::is_prioritized)
}

/// Orders records for display, permuting the unprioritized part with `permute`.
///
/// Returns the prioritized records sorted by descending priority, followed by the
/// unprioritized records in whatever order `permute` leaves them.
pub fn order_for_display_with<F>(records: Vec<ProjectRecord>, permute: F) -> Vec<ProjectRecord>
where
    F: FnOnce(&mut [ProjectRecord]),
{
    let (mut prioritized, mut unprioritized) = partition_by_priority(records);

    sort_by_priority(&mut prioritized);
    permute(&mut unprioritized);

    tracing::trace!(
        prioritized = prioritized.len(),
        shuffled = unprioritized.len(),
        "ordered projects for display"
    );

    prioritized.extend(unprioritized);
    prioritized
}

/// Orders records for display, shuffling the unprioritized part with `rng`.
///
/// Pure apart from the random source: the input is consumed and nothing is
/// persisted. Two calls on the same input may return different orders for the
/// unprioritized records.
///
/// # Examples
///
/// ```
/// use folio::domain::{ImageInfo, NewProject};
/// use folio::storage::order_for_display;
///
/// let image = ImageInfo::new("https://x/a.png", 10, 10);
/// let mut low = NewProject::new("low", image.clone()).into_record(1, 0);
/// low.priority = 1;
/// let mut high = NewProject::new("high", image.clone()).into_record(2, 0);
/// high.priority = 5;
/// let unranked = NewProject::new("unranked", image).into_record(3, 0);
///
/// let ordered = order_for_display(vec![unranked, low, high], &mut rand::thread_rng());
/// let ids: Vec<u64> = ordered.iter().map(|r| r.id).collect();
/// assert_eq!(ids, vec![2, 1, 3]);
/// ```
pub fn order_for_display<R: Rng + ?Sized>(records: Vec<ProjectRecord>, rng: &mut R) -> Vec<ProjectRecord> {
    order_for_display_with(records, |rest| shuffle(rest, rng))
}
