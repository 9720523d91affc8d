//! Error types returned by ring operations.

use crate::core::id::Id;

/// Errors that can occur when operating on a [`Table`](crate::Table).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The identifier doesn't fit in the table's identifier space.
    #[error("identifier {id} is outside of [0, 2^{width})")]
    OutOfRange {
        /// The rejected identifier.
        id: Id,
        /// The table's identifier width `k`.
        width: u32,
    },

    /// The identifier is already a member of the ring.
    #[error("identifier {0} is already a member of the ring")]
    DuplicateId(Id),

    /// The ring has no members to search.
    #[error("the ring has no members")]
    Empty,

    /// The identifier isn't a member of the ring.
    #[error("identifier {0} is not a member of the ring")]
    UnknownMember(Id),
}

/// A specialised `Result` for ring operations.
pub type Result<T> = std::result::Result<T, Error>;
