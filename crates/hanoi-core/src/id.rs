use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a disk. Index 0 is the largest (bottom) disk; sizes shrink
/// as the index grows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DiskId(pub u32);

impl DiskId {
    /// The disk's position in creation order.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DiskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies one of the three pegs.
///
/// By convention a solve runs from `Left` (0) to `Right` (2) with `Middle`
/// (1) as the spare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PegId {
    Left = 0,
    Middle = 1,
    Right = 2,
}

impl PegId {
    /// All pegs in index order.
    pub const ALL: [PegId; 3] = [PegId::Left, PegId::Middle, PegId::Right];

    /// Array index of this peg.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Look up a peg by index. Returns `None` for anything outside 0..3.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

impl TryFrom<u8> for PegId {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(value as usize).ok_or(value)
    }
}

impl fmt::Display for PegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}
