use std::collections::HashSet;

use chordring::{Id, Table};
use rand::{seq::SliceRandom, thread_rng, Rng};
use tracing_subscriber::{fmt, EnvFilter};

#[allow(dead_code)]
pub fn enable_tracing() {
    fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
}

/// Returns up to `n` distinct random identifiers in `[0, 2^width)`, shuffled.
#[allow(dead_code)]
pub fn random_ids(width: u32, n: usize) -> Vec<Id> {
    let mut rng = thread_rng();
    let size = 1u64 << width;

    let mut ids: Vec<Id> = (0..n)
        .map(|_| rng.gen_range(0..size))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    ids.shuffle(&mut rng);

    ids
}

#[allow(dead_code)]
pub fn build_table(width: u32, ids: &[Id]) -> Table {
    let mut table = Table::new(width);
    for &id in ids {
        assert!(table.insert(id).is_ok());
    }

    table
}

/// The owner of `x` computed from the definition: the first member at or after `x`.
#[allow(dead_code)]
pub fn expected_owner(width: u32, members: &[Id], x: Id) -> Id {
    let size = 1u64 << width;

    *members
        .iter()
        .min_by_key(|&&m| (m + size - x) % size)
        .unwrap()
}
