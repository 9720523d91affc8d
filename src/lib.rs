//! The routing core of a [Chord](https://pdos.csail.mit.edu/papers/chord:sigcomm01/chord_sigcomm.pdf)
//! distributed hash table.
//!
//! Members occupy identifiers on a circular `2^k` space, each owning the arc between its
//! predecessor (exclusive) and itself (inclusive). Every member keeps a finger table of `k`
//! entries, entry `i` pointing at the owner of `id + 2^i`, which bounds lookups to `k` hops.
//!
//! Notable differences with the paper:
//!
//! 1. There is no transport, members are identifiers in a single address space and the whole
//!    ring lives in one [`Table`].
//! 2. Finger tables aren't stabilised periodically. Every insertion repairs exactly the fingers
//!    it invalidates before returning, so lookups are always exact.
//! 3. Members never leave the ring.
//!
//! ```
//! use chordring::Table;
//!
//! let mut table = Table::new(4);
//! for id in [1, 4, 9, 13] {
//!     table.insert(id).unwrap();
//! }
//!
//! assert_eq!(table.search(7), Ok(9));
//! assert_eq!(table.search(14), Ok(1));
//! ```

#![cfg_attr(doc_cfg, feature(doc_cfg))]

mod core;
pub mod ring;
pub mod table;

pub use crate::{
    core::{
        error::{Error, Result},
        id::{Id, IdSpace, MAX_WIDTH},
        member::Member,
    },
    ring::Ring,
    table::{Entries, Entry, Route, Table, DEFAULT_WIDTH},
};
#[cfg(feature = "sync")]
pub use crate::table::SyncTable;
