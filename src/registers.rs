//! ## Packed register store
//! HyperLogLog registers are stored using `WIDTH` bits per register inside a `u32` slice.
//!
//! Slice encoding:
//! - data[0..M * WIDTH / 32]  - store register ranks using `WIDTH` bits per each register.
//! - data[last]               - one extra element for branchless register updates
//!   (see `set` for more details).
//!
//! A register may straddle two `u32` elements, in which case its low bits live
//! in the upper bits of the first element and its high bits in the lower bits
//! of the next one.

use std::mem::{size_of, size_of_val};

/// Number of bits used per register. Ranks of a 64-bit hash never exceed `61`.
pub(crate) const WIDTH: usize = 6;

#[derive(Clone, PartialEq)]
pub(crate) struct Registers {
    data: Box<[u32]>,
    len: usize,
}

impl Registers {
    /// Create `len` zeroed registers
    #[inline]
    pub(crate) fn new(len: usize) -> Self {
        Self {
            data: vec![0u32; Self::slice_len(len)].into_boxed_slice(),
            len,
        }
    }

    /// `u32` slice length needed for `len` registers plus the trailing element
    #[inline]
    fn slice_len(len: usize) -> usize {
        (len * WIDTH).div_ceil(32) + 1
    }

    /// Number of registers
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Get `idx` register
    #[inline]
    pub(crate) fn get(&self, idx: usize) -> u32 {
        let bit_idx = idx * WIDTH;
        let u32_idx = bit_idx / 32;
        let bit_pos = bit_idx % 32;
        let bits = &self.data[u32_idx..u32_idx + 2];
        let bits_1 = WIDTH.min(32 - bit_pos);
        let bits_2 = WIDTH - bits_1;
        let mask_1 = (1 << bits_1) - 1;
        let mask_2 = (1 << bits_2) - 1;

        ((bits[0] >> bit_pos) & mask_1) | ((bits[1] & mask_2) << bits_1)
    }

    /// Set `idx` register to `rank`
    #[inline]
    pub(crate) fn set(&mut self, idx: usize, rank: u32) {
        debug_assert!(rank < 1 << WIDTH);
        let bit_idx = idx * WIDTH;
        let u32_idx = bit_idx / 32;
        let bit_pos = bit_idx % 32;
        let bits = &mut self.data[u32_idx..u32_idx + 2];
        let bits_1 = WIDTH.min(32 - bit_pos);
        let bits_2 = WIDTH - bits_1;
        let mask_1 = (1 << bits_1) - 1;
        let mask_2 = (1 << bits_2) - 1;

        // Unconditionally update two `u32` elements based on `rank` bits and masks
        bits[0] &= !(mask_1 << bit_pos);
        bits[0] |= (rank & mask_1) << bit_pos;
        bits[1] &= !mask_2;
        bits[1] |= (rank >> bits_1) & mask_2;
    }

    /// Reset all registers to zero
    #[inline]
    pub(crate) fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Iterate over register values in index order
    pub(crate) fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.len).map(move |idx| self.get(idx))
    }

    /// Return memory size of the register store
    #[inline]
    pub(crate) fn size_of(&self) -> usize {
        size_of::<Self>() + size_of_val(&*self.data)
    }
}
