//! The table facade over the ring.

use std::fmt;

use bytes::Bytes;
use tracing::debug;

use crate::{
    core::{
        error::{Error, Result},
        id::{Id, IdSpace},
        member::Member,
    },
    ring::Ring,
};

#[cfg(feature = "sync")]
mod sync;
#[cfg(feature = "sync")]
#[cfg_attr(doc_cfg, doc(cfg(feature = "sync")))]
pub use sync::SyncTable;

/// The identifier width used by [`Table::default`].
pub const DEFAULT_WIDTH: u32 = 16;

/// A member's identifier and finger table, as produced by [`Table::entries_from`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
    /// The member's identifier.
    pub id: Id,
    /// The member's finger table, entry 0 is its successor.
    pub fingers: &'a [Id],
}

/// Walks the ring along successors, visiting every member once.
#[derive(Debug, Clone)]
pub struct Entries<'a> {
    ring: &'a Ring,
    next: Id,
    remaining: usize,
}

impl<'a> Iterator for Entries<'a> {
    type Item = Entry<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let ring = self.ring;
        let member = ring.member(self.next)?;
        self.remaining -= 1;
        self.next = member.successor();

        Some(Entry {
            id: member.id(),
            fingers: member.fingers(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}

/// The path a search took through the ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// The member the search started from.
    pub start: Id,
    /// The members moved to, in order; the last one is the owner.
    pub hops: Vec<Id>,
    /// The member owning the target.
    pub owner: Id,
}

/// The ring facade, counting its members.
#[derive(Debug, Clone)]
pub struct Table {
    ring: Ring,
    n: usize,
}

impl Default for Table {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH)
    }
}

impl Table {
    /// Creates an empty table over a `2^width` identifier space.
    ///
    /// # Panics
    ///
    /// Panics if `width` exceeds [`MAX_WIDTH`](crate::MAX_WIDTH).
    pub fn new(width: u32) -> Self {
        debug!(width, "creating table");

        Self {
            ring: Ring::new(width),
            n: 0,
        }
    }

    /// Returns the table's identifier space.
    pub fn space(&self) -> &IdSpace {
        self.ring.space()
    }

    /// Returns the underlying ring.
    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    /// Returns `true` if the table has no members.
    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Returns the entry point for searches, the most recently inserted member.
    pub fn start_id(&self) -> Option<Id> {
        self.ring.start_id()
    }

    /// Returns the member with the identifier, if it exists.
    pub fn member(&self, id: Id) -> Option<&Member> {
        self.ring.member(id)
    }

    /// Inserts a member, failing if it already exists or doesn't fit in the identifier space.
    pub fn insert(&mut self, id: Id) -> Result<()> {
        self.ring.insert(id)?;
        self.n += 1;

        Ok(())
    }

    /// Returns the member owning `target`, using the finger tables.
    pub fn search(&self, target: Id) -> Result<Id> {
        let start = self.start_id().ok_or(Error::Empty)?;
        self.ring.circular_search(target, start)
    }

    /// Returns the member owning `target`, walking successors only.
    pub fn linear_search(&self, target: Id) -> Result<Id> {
        let start = self.start_id().ok_or(Error::Empty)?;
        self.ring.linear_search(target, start)
    }

    /// Returns the path [`search`](Self::search) takes to the owner of `target`.
    pub fn route(&self, target: Id) -> Result<Route> {
        let start = self.start_id().ok_or(Error::Empty)?;
        self.ring.check_search(target, start)?;

        let mut hops = vec![];
        let owner = self.ring.route(target, start, |id| hops.push(id));

        Ok(Route { start, hops, owner })
    }

    /// Attaches application data to a member, returning the previous payload.
    pub fn set_payload(&mut self, id: Id, payload: Bytes) -> Result<Option<Bytes>> {
        let member = self.ring.member_mut(id).ok_or(Error::UnknownMember(id))?;

        Ok(member.payload.replace(payload))
    }

    /// Detaches a member's application data.
    pub fn take_payload(&mut self, id: Id) -> Result<Option<Bytes>> {
        let member = self.ring.member_mut(id).ok_or(Error::UnknownMember(id))?;

        Ok(member.payload.take())
    }

    /// Walks the ring from `start`, yielding every member's finger table once.
    ///
    /// This is for inspection only, the output isn't a stable format.
    pub fn entries_from(&self, start: Id) -> Result<Entries<'_>> {
        if self.ring.member(start).is_none() {
            return Err(Error::UnknownMember(start));
        }

        Ok(Entries {
            ring: &self.ring,
            next: start,
            remaining: self.n,
        })
    }

    /// Walks the ring from the entry point, see [`entries_from`](Self::entries_from).
    pub fn entries(&self) -> Entries<'_> {
        Entries {
            ring: &self.ring,
            next: self.start_id().unwrap_or_default(),
            remaining: self.n,
        }
    }

    #[doc(hidden)]
    /// Audits every ring invariant, panicking on the first violation.
    pub fn assert_invariants(&self) {
        assert_eq!(self.n, self.ring.len());
        self.ring.assert_invariants();
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let space = self.space();
        write!(
            f,
            "Table[k={}, range=[0-{}], n={}, start=",
            space.width(),
            space.size() - 1,
            self.n,
        )?;
        match self.start_id() {
            Some(start) => writeln!(f, "{start}] (")?,
            None => writeln!(f, "None] (")?,
        }

        for entry in self.entries() {
            writeln!(f, "\tMember[{}] {:?}", entry.id, entry.fingers)?;
        }

        write!(f, ")")
    }
}
