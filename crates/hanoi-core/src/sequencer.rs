//! Lazy generation of the canonical Tower of Hanoi move order.
//!
//! The recursive decomposition
//!
//! ```text
//! solve(n, s, d, a) = solve(n-1, s, a, d) ++ [s -> d] ++ solve(n-1, a, d, s)
//! ```
//!
//! is unfolded with an explicit work stack. Each expansion replaces one frame
//! with at most three, so pending state stays O(n) and moves are yielded one
//! at a time, in recursive order, without materializing the 2^n - 1 list.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::PegId;

/// A single-disk relocation: take the top disk of `from`, place it on `to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: PegId,
    pub to: PegId,
}

impl Move {
    pub fn new(from: PegId, to: PegId) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peg {} -> peg {}", self.from, self.to)
    }
}

/// Number of moves needed to transfer `n` disks: `2^n - 1`.
/// Saturates at `u64::MAX` for `n >= 64`.
pub fn move_count(n: u32) -> u64 {
    1u64.checked_shl(n).map_or(u64::MAX, |p| p - 1)
}

/// Pending work on the unfold stack.
#[derive(Debug, Clone, Copy)]
enum Frame {
    /// Transfer `n` disks from `source` to `destination` via `auxiliary`.
    Solve {
        n: u32,
        source: PegId,
        destination: PegId,
        auxiliary: PegId,
    },
    /// Yield this move.
    Emit(Move),
}

/// Iterator over the moves that solve one transfer. Create a fresh one per
/// run with [`solve`].
#[derive(Debug, Clone)]
pub struct Solve {
    stack: Vec<Frame>,
    remaining: u64,
}

/// Produce the moves transferring `n` disks from `source` to `destination`,
/// using `auxiliary` as the spare peg.
pub fn solve(n: u32, source: PegId, destination: PegId, auxiliary: PegId) -> Solve {
    let mut stack = Vec::with_capacity(2 * n as usize + 1);
    if n > 0 {
        stack.push(Frame::Solve {
            n,
            source,
            destination,
            auxiliary,
        });
    }
    Solve {
        stack,
        remaining: move_count(n),
    }
}

impl Solve {
    /// Frames currently pending. Bounded by `2n + 1`.
    pub fn pending_frames(&self) -> usize {
        self.stack.len()
    }

    /// Moves not yet yielded.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }
}

impl Iterator for Solve {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        loop {
            match self.stack.pop()? {
                Frame::Emit(mv) => {
                    self.remaining = self.remaining.saturating_sub(1);
                    return Some(mv);
                }
                Frame::Solve { n: 0, .. } => {}
                Frame::Solve {
                    n: 1,
                    source,
                    destination,
                    ..
                } => {
                    self.remaining = self.remaining.saturating_sub(1);
                    return Some(Move::new(source, destination));
                }
                Frame::Solve {
                    n,
                    source,
                    destination,
                    auxiliary,
                } => {
                    // Pushed in reverse so the first half runs first.
                    self.stack.push(Frame::Solve {
                        n: n - 1,
                        source: auxiliary,
                        destination,
                        auxiliary: source,
                    });
                    self.stack.push(Frame::Emit(Move::new(source, destination)));
                    self.stack.push(Frame::Solve {
                        n: n - 1,
                        source,
                        destination: auxiliary,
                        auxiliary: destination,
                    });
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(r) if self.remaining != u64::MAX => (r, Some(r)),
            _ => (usize::MAX, None),
        }
    }
}

impl std::iter::FusedIterator for Solve {}
