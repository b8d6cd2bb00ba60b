//! Disk-count input parsing.

use std::num::IntErrorKind;

use crate::config::DiskCountRange;
use crate::error::InputError;

/// Parse a disk count typed by the user.
///
/// Surrounding whitespace is ignored. Anything that is not an unsigned
/// integer is `NotNumeric`; a number outside `range` is `OutOfRange`,
/// including digit strings too long for a `u64` (reported as `u64::MAX`).
/// `current` is the count that stays in effect on rejection.
pub fn parse_disk_count(
    input: &str,
    range: DiskCountRange,
    current: u32,
) -> Result<u32, InputError> {
    let trimmed = input.trim();
    let requested = match trimmed.parse::<u64>() {
        Ok(n) => n,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => u64::MAX,
        Err(_) => {
            return Err(InputError::NotNumeric {
                input: trimmed.to_string(),
                restored: current,
            });
        }
    };
    check_disk_count(requested, range, current)
}

/// Range-check an already numeric disk count.
pub fn check_disk_count(
    requested: u64,
    range: DiskCountRange,
    current: u32,
) -> Result<u32, InputError> {
    if !range.contains(requested) {
        return Err(InputError::OutOfRange {
            requested,
            min: range.min,
            max: range.max,
            restored: current,
        });
    }
    // In range, so it fits.
    Ok(requested as u32)
}
