//! Disks and the three LIFO peg stacks that hold them.
//!
//! A disk is on at most one peg at a time. While the animator carries a disk
//! it belongs to no peg, and its `peg` field is `None`.

use std::ops::{Index, IndexMut};

use crate::fixed::Fixed64;
use crate::id::{DiskId, PegId};

// ---------------------------------------------------------------------------
// Disk
// ---------------------------------------------------------------------------

/// Logical disk state plus the handle into the rendering layer.
#[derive(Debug)]
pub struct Disk<H> {
    id: DiskId,
    size: Fixed64,
    peg: Option<PegId>,
    handle: H,
}

impl<H> Disk<H> {
    /// Create a disk that is not yet on any peg.
    pub fn new(id: DiskId, size: Fixed64, handle: H) -> Self {
        Self {
            id,
            size,
            peg: None,
            handle,
        }
    }

    pub fn id(&self) -> DiskId {
        self.id
    }

    pub fn size(&self) -> Fixed64 {
        self.size
    }

    /// The peg this disk sits on, or `None` while it is in flight.
    pub fn peg(&self) -> Option<PegId> {
        self.peg
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn handle_mut(&mut self) -> &mut H {
        &mut self.handle
    }

    /// Give up the logical disk and return the rendering handle.
    pub fn into_handle(self) -> H {
        self.handle
    }
}

// ---------------------------------------------------------------------------
// PegStack
// ---------------------------------------------------------------------------

/// Disks on one peg, bottom first. The last element is the topmost disk.
#[derive(Debug)]
pub struct PegStack<H> {
    id: PegId,
    disks: Vec<Disk<H>>,
}

impl<H> PegStack<H> {
    pub fn new(id: PegId) -> Self {
        Self {
            id,
            disks: Vec::new(),
        }
    }

    pub fn id(&self) -> PegId {
        self.id
    }

    /// Place a disk on top and record this peg on it.
    ///
    /// The caller guarantees `disk` is smaller than the current top; the
    /// move order produced by the sequencer upholds this. Checked in debug
    /// builds only.
    pub fn push(&mut self, mut disk: Disk<H>) {
        debug_assert!(
            self.can_accept(disk.size()),
            "disk {} placed on a smaller disk on peg {}",
            disk.id(),
            self.id
        );
        disk.peg = Some(self.id);
        self.disks.push(disk);
    }

    /// Remove and return the top disk, or `None` if the peg is empty.
    pub fn pop(&mut self) -> Option<Disk<H>> {
        let mut disk = self.disks.pop()?;
        disk.peg = None;
        Some(disk)
    }

    /// Number of disks on the peg. Drives stacking-height computation.
    pub fn peek_count(&self) -> usize {
        self.disks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.disks.is_empty()
    }

    /// The topmost disk, if any.
    pub fn top(&self) -> Option<&Disk<H>> {
        self.disks.last()
    }

    /// Whether a disk of `size` may be placed on top without violating the
    /// strictly decreasing order.
    pub fn can_accept(&self, size: Fixed64) -> bool {
        self.top().is_none_or(|top| size < top.size())
    }

    /// Disks bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = &Disk<H>> {
        self.disks.iter()
    }

    /// Mutable access to disks bottom to top, for positioning handles.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Disk<H>> {
        self.disks.iter_mut()
    }

    /// Disk ids bottom to top.
    pub fn disk_ids(&self) -> Vec<DiskId> {
        self.disks.iter().map(Disk::id).collect()
    }

    /// Remove every disk, top first, clearing their peg assignment.
    pub fn drain(&mut self) -> Vec<Disk<H>> {
        let mut out = Vec::with_capacity(self.disks.len());
        while let Some(disk) = self.pop() {
            out.push(disk);
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Pegs
// ---------------------------------------------------------------------------

/// The three peg stacks, indexable by [`PegId`].
#[derive(Debug)]
pub struct Pegs<H> {
    stacks: [PegStack<H>; 3],
}

impl<H> Pegs<H> {
    pub fn new() -> Self {
        Self {
            stacks: PegId::ALL.map(PegStack::new),
        }
    }

    /// Total number of disks resting on any peg.
    pub fn total_disks(&self) -> usize {
        self.stacks.iter().map(PegStack::peek_count).sum()
    }

    /// Disk count of the fullest peg.
    pub fn tallest(&self) -> usize {
        self.stacks
            .iter()
            .map(PegStack::peek_count)
            .max()
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PegStack<H>> {
        self.stacks.iter()
    }

    /// Empty every peg, returning all disks.
    pub fn drain_all(&mut self) -> Vec<Disk<H>> {
        self.stacks.iter_mut().flat_map(PegStack::drain).collect()
    }

    /// Whether every peg holds disks in strictly decreasing size order.
    pub fn is_well_ordered(&self) -> bool {
        self.stacks.iter().all(|stack| {
            stack
                .disks
                .windows(2)
                .all(|pair| pair[1].size() < pair[0].size())
        })
    }
}

impl<H> Default for Pegs<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Index<PegId> for Pegs<H> {
    type Output = PegStack<H>;

    fn index(&self, peg: PegId) -> &PegStack<H> {
        &self.stacks[peg.index()]
    }
}

impl<H> IndexMut<PegId> for Pegs<H> {
    fn index_mut(&mut self, peg: PegId) -> &mut PegStack<H> {
        &mut self.stacks[peg.index()]
    }
}
