//! Simulation configuration: disk geometry, phase timing, accepted disk
//! counts and peg anchor positions.
//!
//! All values are fixed-point. Data files use plain floats and are converted
//! at load time (see the `hanoi-data` crate).

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::fixed::{Fixed64, count_to_fixed64, f64_to_fixed64};
use crate::geometry::Vec3;
use crate::id::{DiskId, PegId};

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Disk dimensions and stacking heights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskGeometry {
    /// Horizontal scale of disk 0, the largest.
    pub base_size: Fixed64,
    /// How much each successive disk shrinks.
    pub size_step: Fixed64,
    /// Vertical scale of every disk.
    pub thickness: Fixed64,
    /// Resting height of a disk on an empty peg.
    pub base_offset: Fixed64,
    /// Margin added above the tallest possible stack when lifting.
    pub clearance: Fixed64,
    /// Spawn height of disk 0.
    pub spawn_height: Fixed64,
    /// Extra spawn height per disk index.
    pub spawn_spacing: Fixed64,
}

impl DiskGeometry {
    /// Horizontal size of a disk: `base_size - index * size_step`.
    pub fn disk_size(&self, id: DiskId) -> Fixed64 {
        self.base_size - self.size_step * count_to_fixed64(id.index())
    }

    /// Resting height of a disk placed on a peg holding `count` disks.
    pub fn landing_height(&self, count: usize) -> Fixed64 {
        count_to_fixed64(count) * self.thickness + self.base_offset
    }

    /// Carry height that clears a stack of `disks` disks on any peg.
    pub fn clearance_height(&self, disks: usize) -> Fixed64 {
        count_to_fixed64(disks) * self.thickness + self.clearance
    }

    /// Height at which a freshly created disk appears.
    pub fn spawn_height(&self, id: DiskId) -> Fixed64 {
        self.spawn_height + self.spawn_spacing * count_to_fixed64(id.index())
    }
}

impl Default for DiskGeometry {
    fn default() -> Self {
        Self {
            base_size: f64_to_fixed64(2.0),
            size_step: f64_to_fixed64(0.2),
            thickness: f64_to_fixed64(0.3),
            base_offset: f64_to_fixed64(0.4),
            clearance: f64_to_fixed64(0.3),
            spawn_height: f64_to_fixed64(2.0),
            spawn_spacing: f64_to_fixed64(1.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Timing
// ---------------------------------------------------------------------------

/// Phase durations, in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    pub lift: Fixed64,
    pub transport: Fixed64,
    pub drop: Fixed64,
    /// Pause after a disk lands before the next move starts.
    pub settle: Fixed64,
    /// Pause after each created disk.
    pub spawn_interval: Fixed64,
    /// Extra pause between the last created disk and the first move.
    pub solve_delay: Fixed64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            lift: f64_to_fixed64(1.0),
            transport: f64_to_fixed64(1.0),
            drop: f64_to_fixed64(0.5),
            settle: f64_to_fixed64(0.3),
            spawn_interval: f64_to_fixed64(1.0),
            solve_delay: f64_to_fixed64(1.0),
        }
    }
}

// ---------------------------------------------------------------------------
// Disk count range
// ---------------------------------------------------------------------------

/// Inclusive range of accepted disk counts, plus the count used before any
/// input has been accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskCountRange {
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

impl DiskCountRange {
    pub fn contains(&self, n: u64) -> bool {
        (self.min as u64..=self.max as u64).contains(&n)
    }
}

impl Default for DiskCountRange {
    fn default() -> Self {
        Self {
            min: 2,
            max: 10,
            default: 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Peg anchors
// ---------------------------------------------------------------------------

/// World positions of the three pegs. Read-only inputs to the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PegAnchors(pub [Vec3; 3]);

impl PegAnchors {
    pub fn get(&self, peg: PegId) -> Vec3 {
        self.0[peg.index()]
    }
}

impl Default for PegAnchors {
    fn default() -> Self {
        Self([
            Vec3::from_f64(-4.0, 0.0, 0.0),
            Vec3::from_f64(0.0, 0.0, 0.0),
            Vec3::from_f64(4.0, 0.0, 0.0),
        ])
    }
}

// ---------------------------------------------------------------------------
// SimConfig
// ---------------------------------------------------------------------------

/// Complete configuration for a [`SimulationController`](crate::controller::SimulationController).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SimConfig {
    pub geometry: DiskGeometry,
    pub timing: Timing,
    pub disk_counts: DiskCountRange,
    pub anchors: PegAnchors,
}

impl SimConfig {
    /// Check that the configuration describes a drawable, solvable puzzle.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let g = &self.geometry;
        for (field, value) in [("thickness", g.thickness), ("base_size", g.base_size)] {
            if value <= Fixed64::ZERO {
                return Err(ConfigError::NonPositive { field });
            }
        }
        if g.size_step <= Fixed64::ZERO {
            return Err(ConfigError::NonPositive { field: "size_step" });
        }

        let t = &self.timing;
        for (field, value) in [
            ("lift", t.lift),
            ("transport", t.transport),
            ("drop", t.drop),
            ("settle", t.settle),
            ("spawn_interval", t.spawn_interval),
            ("solve_delay", t.solve_delay),
        ] {
            if value < Fixed64::ZERO {
                return Err(ConfigError::NegativeDuration { field });
            }
        }

        let r = self.disk_counts;
        if r.min == 0 || r.min > r.max || !r.contains(r.default as u64) {
            return Err(ConfigError::InvalidRange {
                min: r.min,
                max: r.max,
                default: r.default,
            });
        }

        let smallest = DiskId(r.max - 1);
        if g.disk_size(smallest) <= Fixed64::ZERO {
            return Err(ConfigError::DegenerateDisk { index: smallest.0 });
        }
        Ok(())
    }
}
