//! Per-member ring state.

use bytes::Bytes;

use crate::core::id::{Id, IdSpace};

/// A participant occupying one identifier on the ring.
///
/// Members reference each other by [`Id`] only, the ring owns every member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    // The member's own position, fixed once inserted.
    pub(crate) id: Id,
    // The previous member walking clockwise.
    pub(crate) pred: Id,
    // The width of the owned arc `(pred, id]`, 0 only when the member is alone on the ring.
    pub(crate) arc_width: u64,
    // Entry `i` is the owner of `id + 2^i`, entry 0 is the successor.
    pub(crate) fingers: Vec<Id>,
    // Reserved for application data, never populated by the ring itself.
    pub(crate) payload: Option<Bytes>,
}

impl Member {
    /// Creates a member whose every finger points at `succ`.
    pub(crate) fn new(id: Id, pred: Id, succ: Id, arc_width: u64, width: u32) -> Self {
        Self {
            id,
            pred,
            arc_width,
            // A zero-width space still needs a successor slot.
            fingers: vec![succ; width.max(1) as usize],
            payload: None,
        }
    }

    /// Returns the member's identifier.
    pub fn id(&self) -> Id {
        self.id
    }

    /// Returns the identifier of the previous member on the ring.
    pub fn pred(&self) -> Id {
        self.pred
    }

    /// Returns the identifier of the next member on the ring.
    pub fn successor(&self) -> Id {
        self.fingers[0]
    }

    pub(crate) fn set_successor(&mut self, id: Id) {
        self.fingers[0] = id;
    }

    /// Returns the width of the arc `(pred, id]` this member owns.
    pub fn arc_width(&self) -> u64 {
        self.arc_width
    }

    /// Returns the finger table.
    pub fn fingers(&self) -> &[Id] {
        &self.fingers
    }

    /// Returns finger `i`, if the table has that many entries.
    pub fn finger(&self, i: usize) -> Option<Id> {
        self.fingers.get(i).copied()
    }

    /// Returns the application payload, if one was attached.
    pub fn payload(&self) -> Option<&Bytes> {
        self.payload.as_ref()
    }

    /// Returns `true` if `x` falls in this member's arc `(pred, id]`.
    ///
    /// The sole member of a ring has a zero-width arc and is treated specially by the searches.
    pub fn owns(&self, x: Id, space: &IdSpace) -> bool {
        space.distance(x, self.id) < self.arc_width
    }
}
