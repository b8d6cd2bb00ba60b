use fixed::types::I32F32;

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
///
/// Every position, size, duration and elapsed time in the core is a
/// `Fixed64`, so a run driven by the same frame deltas is bit-for-bit
/// reproducible.
pub type Fixed64 = I32F32;

/// Frames are the atomic unit of driver time: one `tick()` call each.
pub type Frames = u64;

/// Convert an f64 to Fixed64. Use only for initialization, never per frame.
#[inline]
pub fn f64_to_fixed64(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// Convert an f64 to Fixed64, or `None` if it is not finite or does not fit
/// the Q32.32 range. Use for values read from outside the program.
#[inline]
pub fn checked_f64_to_fixed64(v: f64) -> Option<Fixed64> {
    Fixed64::checked_from_num(v)
}

/// Convert Fixed64 to f64. Use only for display and rendering handoff.
#[inline]
pub fn fixed64_to_f64(v: Fixed64) -> f64 {
    v.to_num::<f64>()
}

/// Convert a count (disks on a peg, disk index) into a Fixed64 factor.
#[inline]
pub fn count_to_fixed64(n: usize) -> Fixed64 {
    Fixed64::from_num(n)
}
