//! The wire register: a bit-packed simulation word.
//!
//! A single [`Reg`] holds the state of every wire of one circuit
//! simultaneously; wire `i` is bit `i`. `u16` comfortably covers every
//! built-in target function (largest is `NthPrime4`, `l = input_size +
//! output_size = 10`) while staying a single machine word for `apply`.

/// Machine word backing one register state.
pub type Reg = u16;

/// Number of addressable wires `Reg` can hold.
pub const REG_WIDTH: usize = Reg::BITS as usize;

/// Builds the one-bit mask for wire `w`. Panics if `w >= REG_WIDTH`.
#[inline]
pub fn wire_mask(w: usize) -> Reg {
    assert!(w < REG_WIDTH, "wire {w} out of range for a {REG_WIDTH}-bit register");
    1 << w
}

/// Recovers the wire index from a single-bit mask. Panics if `mask` is not
/// a power of two (i.e. not a well-formed single-wire mask).
#[inline]
pub fn mask_wire(mask: Reg) -> usize {
    debug_assert_eq!(mask.count_ones(), 1, "mask {mask:#06x} does not select a single wire");
    mask.trailing_zeros() as usize
}
