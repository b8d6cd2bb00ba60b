//! Headless collaborators and helpers for tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so they are
//! available in unit tests, integration tests, and benchmarks (via the
//! `test-utils` feature).

use crate::config::SimConfig;
use crate::controller::{RunStatus, SimulationController};
use crate::fixed::Fixed64;
use crate::geometry::Vec3;
use crate::handle::{DiskFactory, DiskHandle, DiskSpec};
use crate::id::DiskId;

// ===========================================================================
// Fixed-point helpers
// ===========================================================================

pub fn fixed(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// One 60 Hz frame.
pub fn frame() -> Fixed64 {
    Fixed64::ONE / 60
}

// ===========================================================================
// Headless disk collaborator
// ===========================================================================

/// An in-memory disk body that records every command it receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadlessDisk {
    pub id: DiskId,
    pub position: Vec3,
    pub size: Fixed64,
    pub thickness: Fixed64,
    pub physics_enabled: bool,
    /// Number of times physics was switched off.
    pub physics_suspensions: u32,
    pub velocity_resets: u32,
}

impl DiskHandle for HeadlessDisk {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn set_scale(&mut self, size: Fixed64, thickness: Fixed64) {
        self.size = size;
        self.thickness = thickness;
    }

    fn set_simulate_physics(&mut self, enabled: bool) {
        if self.physics_enabled && !enabled {
            self.physics_suspensions += 1;
        }
        self.physics_enabled = enabled;
    }

    fn reset_velocity(&mut self) {
        self.velocity_resets += 1;
    }
}

/// Factory for [`HeadlessDisk`]s that counts spawns and destroys.
#[derive(Debug, Default)]
pub struct HeadlessFactory {
    pub spawned: Vec<DiskId>,
    pub destroyed: Vec<DiskId>,
}

impl HeadlessFactory {
    /// Disks spawned and not yet destroyed.
    pub fn live(&self) -> usize {
        self.spawned.len() - self.destroyed.len()
    }
}

impl DiskFactory for HeadlessFactory {
    type Handle = HeadlessDisk;

    fn spawn(&mut self, spec: &DiskSpec) -> HeadlessDisk {
        self.spawned.push(spec.id);
        HeadlessDisk {
            id: spec.id,
            position: spec.position,
            size: Fixed64::ONE,
            thickness: Fixed64::ONE,
            physics_enabled: true,
            physics_suspensions: 0,
            velocity_resets: 0,
        }
    }

    fn destroy(&mut self, handle: HeadlessDisk) {
        self.destroyed.push(handle.id);
    }
}

// ===========================================================================
// Controller helpers
// ===========================================================================

/// A controller over a fresh [`HeadlessFactory`].
pub fn headless_controller(config: SimConfig) -> SimulationController<HeadlessFactory> {
    SimulationController::new(HeadlessFactory::default(), config)
        .expect("test config must be valid")
}

/// Config with every delay and phase shortened to `seconds`.
pub fn quick_config(seconds: f64) -> SimConfig {
    let mut config = SimConfig::default();
    let d = fixed(seconds);
    let t = &mut config.timing;
    t.lift = d;
    t.transport = d;
    t.drop = d;
    t.settle = d;
    t.spawn_interval = d;
    t.solve_delay = d;
    config
}

/// Tick with `dt` until the run is solved or `max_ticks` pass. Returns the
/// number of ticks taken, or `None` if the run did not finish.
pub fn run_to_completion<F: DiskFactory>(
    controller: &mut SimulationController<F>,
    dt: Fixed64,
    max_ticks: u64,
) -> Option<u64> {
    for i in 1..=max_ticks {
        if let RunStatus::Solved { .. } = controller.tick(dt) {
            return Some(i);
        }
    }
    None
}
