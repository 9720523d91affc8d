//! Identifier types and circular arithmetic.

/// A position on the ring, always reduced into `[0, 2^width)`.
pub type Id = u64;

/// The widest identifier space representable with an [`Id`].
pub const MAX_WIDTH: u32 = Id::BITS - 1;

/// A circular identifier space of size `2^width` with a clockwise distance metric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSpace {
    width: u32,
    // Precomputed 2^0..=2^width.
    pow2: Vec<u64>,
}

impl IdSpace {
    /// Creates the identifier space `[0, 2^width)`.
    ///
    /// # Panics
    ///
    /// Panics if `width` exceeds [`MAX_WIDTH`].
    pub fn new(width: u32) -> Self {
        assert!(
            width <= MAX_WIDTH,
            "width {width} exceeds the maximum of {MAX_WIDTH}"
        );

        Self {
            width,
            pow2: (0..=width).map(|i| 1u64 << i).collect(),
        }
    }

    /// Returns `k`, the number of bits in an identifier.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the number of identifiers in the space, `2^k`.
    pub fn size(&self) -> u64 {
        self.pow2[self.width as usize]
    }

    /// Returns `2^i`.
    pub fn pow2(&self, i: u32) -> u64 {
        self.pow2[i as usize]
    }

    /// Returns `true` if the identifier lies in `[0, 2^k)`.
    pub fn contains(&self, id: Id) -> bool {
        id < self.size()
    }

    /// Reduces an arbitrary value into the space.
    pub fn wrap(&self, value: u64) -> Id {
        value & self.mask()
    }

    /// The clockwise distance walking from `a` to `b`, i.e. `(b - a) mod 2^k`.
    ///
    /// This is asymmetric: `distance(a, b) + distance(b, a)` is `2^k` unless `a == b`.
    pub fn distance(&self, a: Id, b: Id) -> u64 {
        b.wrapping_sub(a) & self.mask()
    }

    /// Returns the point `2^i` clockwise from `id`, the target of finger `i`.
    pub fn finger_target(&self, id: Id, i: u32) -> Id {
        self.wrap(id.wrapping_add(self.pow2(i)))
    }

    /// Returns the point `2^i` counter-clockwise from `id`.
    pub fn rewind(&self, id: Id, i: u32) -> Id {
        self.wrap(id.wrapping_sub(self.pow2(i)))
    }

    /// Returns the largest `i <= cap` such that `value >= 2^i`, or `0` if there is none.
    pub fn log2_capped(value: u64, cap: u32) -> u32 {
        if value == 0 {
            return 0;
        }

        Self::msb(value).min(cap)
    }

    fn mask(&self) -> u64 {
        // Safety: width is at most 63, so 2^width doesn't overflow.
        self.size() - 1
    }

    // Returns the position of the most-significant bit set (0-indexed).
    fn msb(n: u64) -> u32 {
        debug_assert_ne!(n, 0);
        u64::BITS - n.leading_zeros() - 1
    }
}
