//! Core ring implementation.
//!
//! Every member owns the half-open arc `(pred, id]` of the identifier space. Lookups hop along
//! finger tables, choosing a strictly smaller finger index on every hop, so a search never
//! overshoots its target and terminates in at most `k` hops.
//!
//! Insertion carves the new member out of the front of its successor's arc and then repairs the
//! finger tables whose targets now fall in the new arc:
//!
//! 1. the new member's own fingers, each lookup seeded with the previous finger,
//! 2. the predecessor's fingers that span less than the new arc,
//! 3. for each finger index `l`, the band of members `[pred - 2^l + 1, id - 2^l]`, found with a
//!    single lookup and walked along successors.
//!
//! All repairs are planned against the ring as it stood before the insertion (where every
//! finger is still correct) and applied in one batch alongside the structural link.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::core::{
    error::{Error, Result},
    id::{Id, IdSpace},
    member::Member,
};

/// Finger updates for one insertion.
#[derive(Debug)]
struct Repair {
    // The new member's complete finger table.
    fingers: Vec<Id>,
    // `(member, i)` pairs whose finger `i` must point at the new member.
    redirects: Vec<(Id, u32)>,
}

/// A Chord ring over a `2^k` identifier space.
#[derive(Debug, Clone)]
pub struct Ring {
    // The identifier space, fixed for the ring's lifetime.
    space: IdSpace,
    // Every member, keyed by its identifier.
    members: HashMap<Id, Member>,
    // The entry point for searches, the most recently inserted member.
    start_id: Option<Id>,
}

impl Ring {
    /// Creates an empty ring over `[0, 2^width)`.
    ///
    /// # Panics
    ///
    /// Panics if `width` exceeds [`MAX_WIDTH`](crate::MAX_WIDTH).
    pub fn new(width: u32) -> Self {
        Self {
            space: IdSpace::new(width),
            members: HashMap::new(),
            start_id: None,
        }
    }

    /// Returns the ring's identifier space.
    pub fn space(&self) -> &IdSpace {
        &self.space
    }

    /// Returns the entry point used by searches, the most recently inserted member.
    pub fn start_id(&self) -> Option<Id> {
        self.start_id
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the ring has no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns the member with the identifier, if it exists.
    pub fn member(&self, id: Id) -> Option<&Member> {
        self.members.get(&id)
    }

    pub(crate) fn member_mut(&mut self, id: Id) -> Option<&mut Member> {
        self.members.get_mut(&id)
    }

    /// Finds the owner of `target` by walking successors from `from`.
    ///
    /// This is `O(n)` and only meant as a reference for the finger-accelerated search.
    pub fn linear_search(&self, target: Id, from: Id) -> Result<Id> {
        self.check_search(target, from)?;

        let mut node = &self.members[&from];
        if node.arc_width == 0 {
            return Ok(node.id);
        }

        while !node.owns(target, &self.space) {
            node = &self.members[&node.successor()];
        }

        Ok(node.id)
    }

    /// Finds the owner of `target` by hopping along finger tables from `start`.
    pub fn circular_search(&self, target: Id, start: Id) -> Result<Id> {
        self.check_search(target, start)?;

        Ok(self.route(target, start, |_| {}))
    }

    pub(crate) fn check_search(&self, target: Id, start: Id) -> Result<()> {
        if !self.space.contains(target) {
            return Err(Error::OutOfRange {
                id: target,
                width: self.space.width(),
            });
        }

        if self.is_empty() {
            return Err(Error::Empty);
        }

        if !self.members.contains_key(&start) {
            return Err(Error::UnknownMember(start));
        }

        Ok(())
    }

    /// The finger-accelerated search, calling `hop` with every member it moves to.
    ///
    /// `start` must be a member and `target` must be in range.
    pub(crate) fn route(&self, target: Id, start: Id, mut hop: impl FnMut(Id)) -> Id {
        let mut node = &self.members[&start];

        // Sole member, it owns everything.
        if node.arc_width == 0 {
            return node.id;
        }

        // The finger index strictly decreases on every hop. Since the first index is the floor of
        // log2 of the remaining distance, the distance left after hopping along finger `i` is
        // always less than 2^i, so the cap never skips a useful finger.
        let mut i = self.space.width();
        let mut hops = 0u32;

        while !node.owns(target, &self.space) {
            i = IdSpace::log2_capped(self.space.distance(node.id, target), i.saturating_sub(1));
            hops += 1;

            if i == 0 {
                // The target is the point right after the node.
                let succ = node.successor();
                debug_assert!(self.members[&succ].owns(target, &self.space));
                hop(succ);
                trace!(key = target, owner = succ, hops, "search complete");

                return succ;
            }

            let next = node.fingers[i as usize];
            node = &self.members[&next];
            hop(next);
        }

        debug_assert!(hops <= self.space.width());
        trace!(key = target, owner = node.id, hops, "search complete");

        node.id
    }

    /// Inserts a new member and repairs every finger table it affects.
    pub fn insert(&mut self, id: Id) -> Result<()> {
        if !self.space.contains(id) {
            return Err(Error::OutOfRange {
                id,
                width: self.space.width(),
            });
        }

        if self.members.contains_key(&id) {
            return Err(Error::DuplicateId(id));
        }

        let start = match self.start_id {
            Some(start) => start,
            None => {
                self.members
                    .insert(id, Member::new(id, id, id, 0, self.space.width()));
                self.start_id = Some(id);
                debug!(id, "inserted the first member");

                return Ok(());
            }
        };

        // The current owner of the identifier becomes its successor.
        let succ = self.route(id, start, |_| {});
        let pred = self.members[&succ].pred;

        let repair = self.plan_repair(id, pred, succ);
        let redirects = repair.redirects.len();
        self.link(id, pred, succ, repair);

        debug!(id, pred, succ, redirects, "inserted member");

        #[cfg(debug_assertions)]
        self.check_neighbourhood(id);

        Ok(())
    }

    /// Computes the repair for inserting `id` between `pred` and `succ`, without mutating the ring.
    fn plan_repair(&self, id: Id, pred: Id, succ: Id) -> Repair {
        let k = self.space.width();
        let arc = self.space.distance(pred, id);

        // The owner of `x` once `id` is linked in: `id` for its own arc, otherwise unchanged.
        let resolve = |x: Id, hint: Id| {
            if self.space.distance(x, id) < arc {
                id
            } else {
                self.route(x, hint, |_| {})
            }
        };

        // 1. The new member's own fingers. Finger `i`'s target lies at or beyond finger `i - 1`'s
        //    target, so the previous finger is a close starting point.
        let mut fingers = Vec::with_capacity(k.max(1) as usize);
        fingers.push(succ);
        for i in 1..k {
            let prev = fingers[i as usize - 1];
            let hint = if prev == id { succ } else { prev };
            fingers.push(resolve(self.space.finger_target(id, i), hint));
        }

        // 2. The predecessor's fingers whose targets now land in the new arc.
        let mut redirects = vec![];
        for i in 1..k {
            if self.space.pow2(i) > arc {
                break;
            }
            redirects.push((pred, i));
        }

        // 3. Finger `l` of every member in `[pred - 2^l + 1, id - 2^l]` targets a point in
        //    `(pred, id]`.
        let mut origin = self.members[&pred]
            .fingers
            .last()
            .copied()
            .unwrap_or(pred);

        for level in (1..k).rev() {
            let low = self.space.wrap(self.space.rewind(pred, level).wrapping_add(1));
            let high = self.space.rewind(id, level);
            let span = self.space.distance(low, high);

            // The first member at or after `low`.
            let first = self.route(low, origin, |_| {});
            let mut node = first;
            let mut touched = 0usize;

            while self.space.distance(low, node) <= span {
                if node != pred {
                    redirects.push((node, level));
                }
                touched += 1;

                node = self.members[&node].successor();
                if node == first {
                    break;
                }
            }

            trace!(level, low, high, touched, "repaired finger band");
            origin = first;
        }

        Repair { fingers, redirects }
    }

    /// Links the new member in between `pred` and `succ` and applies the repair.
    fn link(&mut self, id: Id, pred: Id, succ: Id, repair: Repair) {
        let mut member = Member::new(id, pred, succ, self.space.distance(pred, id), self.space.width());
        member.fingers = repair.fingers;
        self.members.insert(id, member);

        // `pred` and `succ` are the same member if the ring only had one.
        let arc_width = self.space.distance(id, succ);
        if let Some(succ) = self.members.get_mut(&succ) {
            succ.pred = id;
            succ.arc_width = arc_width;
        }

        if let Some(pred) = self.members.get_mut(&pred) {
            pred.set_successor(id);
        }

        for (member, i) in repair.redirects {
            if let Some(member) = self.members.get_mut(&member) {
                member.fingers[i as usize] = id;
            }
        }

        self.start_id = Some(id);
    }

    #[cfg(debug_assertions)]
    fn check_neighbourhood(&self, id: Id) {
        let member = &self.members[&id];

        debug_assert_eq!(self.members[&member.pred].successor(), id);
        debug_assert_eq!(self.members[&member.successor()].pred, id);
        debug_assert_eq!(member.arc_width, self.space.distance(member.pred, id));
    }

    /// Audits every ring invariant, panicking on the first violation.
    ///
    /// This is `O(k * n^2)` and only meant for tests.
    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        let start = match self.start_id {
            Some(start) => start,
            None => {
                assert!(self.members.is_empty());
                return;
            }
        };

        // Closure: successors visit every member once and come back around.
        let mut seen = HashMap::with_capacity(self.members.len());
        let mut node = start;
        for step in 0..self.members.len() {
            assert!(
                seen.insert(node, step).is_none(),
                "member {node} visited twice"
            );

            let succ = self.members[&node].successor();
            assert_eq!(
                self.members[&succ].pred, node,
                "pred of {succ} isn't {node}"
            );
            node = succ;
        }
        assert_eq!(node, start, "successors don't close the ring");

        // Ownership: the arcs partition the space.
        if self.members.len() > 1 {
            let mut total = 0u64;
            for member in self.members.values() {
                assert_eq!(member.arc_width, self.space.distance(member.pred, member.id));
                assert_ne!(member.arc_width, 0);
                total += member.arc_width;
            }
            assert_eq!(total, self.space.size());
        }

        // Fingers: every entry is the owner of its target.
        for member in self.members.values() {
            for (i, &finger) in member.fingers.iter().enumerate() {
                let target = self.space.finger_target(member.id, i as u32);
                let owner = self.route_linear(target, start);
                assert_eq!(
                    finger, owner,
                    "finger {i} of {} is {finger}, expected {owner}",
                    member.id
                );
            }
        }
    }

    fn route_linear(&self, target: Id, from: Id) -> Id {
        let mut node = &self.members[&from];
        if node.arc_width == 0 {
            return node.id;
        }

        while !node.owns(target, &self.space) {
            node = &self.members[&node.successor()];
        }

        node.id
    }
}
