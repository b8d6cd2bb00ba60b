//! Progress and completion events with buffered, ordered delivery.
//!
//! The controller emits events while a tick runs; they are held in a
//! fixed-capacity ring buffer and delivered, in emission order, when the tick
//! ends. Observers (status text, celebratory effects) register passive
//! listeners per [`EventKind`]. Having no listeners is valid.
//!
//! # Suppression
//!
//! Event kinds can be suppressed via [`EventBus::suppress`]; suppressed events
//! are dropped at emit time and never buffered.

use std::fmt;

use crate::fixed::{Fixed64, Frames};
use crate::id::DiskId;
use crate::sequencer::Move;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// A simulation event. All events carry the frame at which they occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // -- Run lifecycle --
    RunStarted {
        disk_count: u32,
        total_moves: u64,
        frame: Frames,
    },
    DiskCreated {
        disk: DiskId,
        size: Fixed64,
        frame: Frames,
    },
    Solved {
        disk_count: u32,
        moves: u64,
        frame: Frames,
    },
    SimulationReset {
        /// Disks handed back to the factory, including any in flight.
        discarded: usize,
        frame: Frames,
    },

    // -- Moves --
    MoveStarted {
        /// Zero-based position in the move sequence.
        index: u64,
        total: u64,
        mv: Move,
        disk: DiskId,
        frame: Frames,
    },
    MoveCompleted {
        index: u64,
        total: u64,
        mv: Move,
        disk: DiskId,
        frame: Frames,
    },
    MoveSkipped {
        index: u64,
        mv: Move,
        frame: Frames,
    },

    // -- Input --
    InputRejected {
        reason: String,
        frame: Frames,
    },
}

/// Discriminant tag for event types, used for subscription and suppression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    RunStarted,
    DiskCreated,
    Solved,
    SimulationReset,
    MoveStarted,
    MoveCompleted,
    MoveSkipped,
    InputRejected,
}

/// Total number of event kinds.
const EVENT_KIND_COUNT: usize = 8;

impl Event {
    /// Get the discriminant kind for this event.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::RunStarted { .. } => EventKind::RunStarted,
            Event::DiskCreated { .. } => EventKind::DiskCreated,
            Event::Solved { .. } => EventKind::Solved,
            Event::SimulationReset { .. } => EventKind::SimulationReset,
            Event::MoveStarted { .. } => EventKind::MoveStarted,
            Event::MoveCompleted { .. } => EventKind::MoveCompleted,
            Event::MoveSkipped { .. } => EventKind::MoveSkipped,
            Event::InputRejected { .. } => EventKind::InputRejected,
        }
    }

    /// The frame at which the event occurred.
    pub fn frame(&self) -> Frames {
        match self {
            Event::RunStarted { frame, .. }
            | Event::DiskCreated { frame, .. }
            | Event::Solved { frame, .. }
            | Event::SimulationReset { frame, .. }
            | Event::MoveStarted { frame, .. }
            | Event::MoveCompleted { frame, .. }
            | Event::MoveSkipped { frame, .. }
            | Event::InputRejected { frame, .. } => *frame,
        }
    }
}

/// Human-readable status line, suitable for a UI text field.
impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::RunStarted {
                disk_count,
                total_moves,
                ..
            } => write!(f, "Solving {disk_count} disks in {total_moves} moves"),
            Event::DiskCreated { disk, .. } => write!(f, "Creating disk {disk}"),
            Event::Solved { moves, .. } => write!(f, "Solved in {moves} moves!"),
            Event::SimulationReset { .. } => write!(f, "Simulation reset"),
            Event::MoveStarted {
                index,
                total,
                mv,
                disk,
                ..
            } => write!(
                f,
                "Move {}/{total}: moving disk {disk} from peg {} to peg {}",
                index + 1,
                mv.from,
                mv.to
            ),
            Event::MoveCompleted { mv, disk, .. } => {
                write!(f, "Disk {disk} landed on peg {}", mv.to)
            }
            Event::MoveSkipped { mv, .. } => {
                write!(f, "Skipped move from empty peg {}", mv.from)
            }
            Event::InputRejected { reason, .. } => write!(f, "Input rejected: {reason}"),
        }
    }
}

impl EventKind {
    /// Convert to usize index for array lookups.
    fn index(self) -> usize {
        self as usize
    }
}

// ---------------------------------------------------------------------------
// EventBuffer: pre-allocated ring buffer
// ---------------------------------------------------------------------------

/// A pre-allocated ring buffer for events. Fixed capacity; when full, the
/// oldest events are dropped.
#[derive(Debug)]
pub struct EventBuffer {
    events: Vec<Option<Event>>,
    /// Write position (wraps around).
    head: usize,
    len: usize,
    /// Total events ever written, including dropped ones.
    total_written: u64,
}

impl EventBuffer {
    /// Create a new ring buffer with the given capacity.
    /// A capacity of 0 is clamped to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: (0..capacity).map(|_| None).collect(),
            head: 0,
            len: 0,
            total_written: 0,
        }
    }

    /// Push an event. If full, the oldest event is dropped.
    pub fn push(&mut self, event: Event) {
        self.events[self.head] = Some(event);
        self.head = (self.head + 1) % self.capacity();
        if self.len < self.capacity() {
            self.len += 1;
        }
        self.total_written += 1;
    }

    pub fn capacity(&self) -> usize {
        self.events.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn total_written(&self) -> u64 {
        self.total_written
    }

    /// Number of events that were dropped because the buffer was full.
    pub fn dropped_count(&self) -> u64 {
        self.total_written.saturating_sub(self.capacity() as u64)
    }

    /// Take all events, oldest first, leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<Event> {
        let start = if self.len < self.capacity() {
            0
        } else {
            // head points at the next write position, which is the oldest entry
            self.head
        };
        let capacity = self.capacity();
        let out = (0..self.len)
            .filter_map(|i| self.events[(start + i) % capacity].take())
            .collect();
        self.head = 0;
        self.len = 0;
        out
    }

    /// Iterate over events from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        let start = if self.len < self.capacity() {
            0
        } else {
            self.head
        };
        let capacity = self.capacity();
        (0..self.len).filter_map(move |i| self.events[(start + i) % capacity].as_ref())
    }
}

// ---------------------------------------------------------------------------
// Subscribers
// ---------------------------------------------------------------------------

/// A passive listener receives events read-only.
pub type PassiveListener = Box<dyn FnMut(&Event)>;

/// Optional predicate that filters events for a subscriber.
pub type EventFilter = Box<dyn Fn(&Event) -> bool>;

/// Priority level for listeners. Lower priorities run first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SubscriberPriority {
    Pre = 0,
    Normal = 1,
    Post = 2,
}

struct SubscriberEntry {
    listener: PassiveListener,
    priority: SubscriberPriority,
    filter: Option<EventFilter>,
    insertion_order: u64,
}

impl fmt::Debug for SubscriberEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberEntry")
            .field("priority", &self.priority)
            .field("filtered", &self.filter.is_some())
            .field("insertion_order", &self.insertion_order)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Buffers events during a tick and delivers them to listeners afterwards,
/// or earlier once the buffer is full.
#[derive(Debug)]
pub struct EventBus {
    buffer: EventBuffer,
    suppressed: [bool; EVENT_KIND_COUNT],
    subscribers: [Vec<SubscriberEntry>; EVENT_KIND_COUNT],
    emitted: [u64; EVENT_KIND_COUNT],
    next_insertion_order: u64,
}

impl EventBus {
    /// Create a bus whose buffer holds up to `capacity` undelivered events.
    pub fn new(capacity: usize) -> Self {
        Self {
            buffer: EventBuffer::new(capacity),
            suppressed: [false; EVENT_KIND_COUNT],
            subscribers: Default::default(),
            emitted: [0; EVENT_KIND_COUNT],
            next_insertion_order: 0,
        }
    }

    /// Suppress an event kind. Already-buffered events of that kind are
    /// still delivered.
    pub fn suppress(&mut self, kind: EventKind) {
        self.suppressed[kind.index()] = true;
    }

    pub fn is_suppressed(&self, kind: EventKind) -> bool {
        self.suppressed[kind.index()]
    }

    /// Buffer an event for delivery. No-op if its kind is suppressed.
    ///
    /// A full buffer is delivered before the new event is stored, so a burst
    /// of events larger than the capacity reaches listeners early instead of
    /// overwriting undelivered ones.
    pub fn emit(&mut self, event: Event) {
        let idx = event.kind().index();
        if self.suppressed[idx] {
            return;
        }
        if self.buffer.len() == self.buffer.capacity() {
            self.deliver();
        }
        self.emitted[idx] += 1;
        self.buffer.push(event);
    }

    /// Register a listener with Normal priority and no filter.
    pub fn on_passive(&mut self, kind: EventKind, listener: PassiveListener) {
        self.on_passive_filtered(kind, SubscriberPriority::Normal, None, listener);
    }

    /// Register a listener with explicit priority and optional filter.
    pub fn on_passive_filtered(
        &mut self,
        kind: EventKind,
        priority: SubscriberPriority,
        filter: Option<EventFilter>,
        listener: PassiveListener,
    ) {
        let order = self.next_insertion_order;
        self.next_insertion_order += 1;
        let subscribers = &mut self.subscribers[kind.index()];
        subscribers.push(SubscriberEntry {
            listener,
            priority,
            filter,
            insertion_order: order,
        });
        subscribers.sort_by_key(|s| (s.priority, s.insertion_order));
    }

    /// Deliver every buffered event, oldest first, then clear the buffer.
    ///
    /// For each event, the listeners of its kind run in
    /// `(priority, registration order)`; a listener whose filter rejects the
    /// event is skipped.
    pub fn deliver(&mut self) {
        for event in self.buffer.drain() {
            for entry in &mut self.subscribers[event.kind().index()] {
                if let Some(filter) = &entry.filter {
                    if !filter(&event) {
                        continue;
                    }
                }
                (entry.listener)(&event);
            }
        }
    }

    /// Events waiting for delivery.
    pub fn pending(&self) -> impl Iterator<Item = &Event> {
        self.buffer.iter()
    }

    pub fn pending_count(&self) -> usize {
        self.buffer.len()
    }

    /// Events of `kind` emitted since creation (not counting suppressed ones).
    pub fn total_emitted(&self, kind: EventKind) -> u64 {
        self.emitted[kind.index()]
    }

    /// Events lost to buffer overflow. Always zero for a bus, which delivers
    /// instead of overwriting.
    pub fn dropped_count(&self) -> u64 {
        self.buffer.dropped_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}
