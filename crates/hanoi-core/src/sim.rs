//! Frame clock, countdown timers and the state hash.

use crate::fixed::{Fixed64, Frames};

// ---------------------------------------------------------------------------
// Simulation state
// ---------------------------------------------------------------------------

/// Driver-facing clock, advanced once per `tick()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SimState {
    /// Number of ticks processed.
    pub frame: Frames,
    /// Total simulated seconds.
    pub elapsed: Fixed64,
}

impl SimState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one frame of `dt` seconds. Negative deltas count as zero.
    /// Returns the clamped delta.
    pub fn advance(&mut self, dt: Fixed64) -> Fixed64 {
        let dt = dt.max(Fixed64::ZERO);
        self.frame += 1;
        self.elapsed += dt;
        dt
    }
}

// ---------------------------------------------------------------------------
// Countdown
// ---------------------------------------------------------------------------

/// A one-shot timer that consumes time from a per-tick budget.
///
/// Whatever the timer does not need is left in the budget, so leftover frame
/// time carries into whatever runs next in the same tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    duration: Fixed64,
    elapsed: Fixed64,
}

impl Countdown {
    /// A timer of `duration` seconds. Negative durations are treated as zero.
    pub fn new(duration: Fixed64) -> Self {
        Self {
            duration: duration.max(Fixed64::ZERO),
            elapsed: Fixed64::ZERO,
        }
    }

    /// Spend up to the remaining time from `budget`. Returns `true` once the
    /// timer has run out.
    pub fn consume(&mut self, budget: &mut Fixed64) -> bool {
        let needed = self.remaining();
        if *budget >= needed {
            *budget -= needed;
            self.elapsed = self.duration;
            true
        } else {
            self.elapsed += *budget;
            *budget = Fixed64::ZERO;
            false
        }
    }

    pub fn remaining(&self) -> Fixed64 {
        self.duration - self.elapsed
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Linear progress in [0, 1]. A zero-length timer reports 1.
    pub fn progress(&self) -> Fixed64 {
        if self.duration == Fixed64::ZERO {
            Fixed64::ONE
        } else {
            self.elapsed / self.duration
        }
    }
}

// ---------------------------------------------------------------------------
// State hash
// ---------------------------------------------------------------------------

/// A deterministic hash of simulation state, used to compare runs.
///
/// Uses FNV-1a (64-bit). Not cryptographic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateHash(pub u64);

impl StateHash {
    const FNV_OFFSET: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;

    pub fn new() -> Self {
        Self(Self::FNV_OFFSET)
    }

    pub fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 ^= b as u64;
            self.0 = self.0.wrapping_mul(Self::FNV_PRIME);
        }
    }

    pub fn write_u64(&mut self, v: u64) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.write(&v.to_le_bytes());
    }

    pub fn write_fixed64(&mut self, v: Fixed64) {
        self.write(&v.to_bits().to_le_bytes());
    }

    pub fn finish(self) -> u64 {
        self.0
    }
}

impl Default for StateHash {
    fn default() -> Self {
        Self::new()
    }
}
