//! On-disk configuration schema.
//!
//! Data files use plain floats; [`ConfigData::into_config`] converts them to
//! the core's fixed-point [`SimConfig`]. Every section and field is optional
//! and falls back to the core defaults.

use hanoi_core::config::{DiskCountRange, DiskGeometry, PegAnchors, SimConfig, Timing};
use hanoi_core::fixed::{Fixed64, checked_f64_to_fixed64, fixed64_to_f64};
use hanoi_core::geometry::Vec3;
use serde::{Deserialize, Serialize};

/// Top-level config file contents.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigData {
    pub geometry: GeometryData,
    pub timing: TimingData,
    pub disks: DiskCountData,
    /// World positions of the left, middle and right pegs as `[x, y, z]`.
    pub pegs: Option<[[f64; 3]; 3]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryData {
    pub base_size: f64,
    pub size_step: f64,
    pub thickness: f64,
    pub base_offset: f64,
    pub clearance: f64,
    pub spawn_height: f64,
    pub spawn_spacing: f64,
}

impl Default for GeometryData {
    fn default() -> Self {
        let g = DiskGeometry::default();
        Self {
            base_size: fixed64_to_f64(g.base_size),
            size_step: fixed64_to_f64(g.size_step),
            thickness: fixed64_to_f64(g.thickness),
            base_offset: fixed64_to_f64(g.base_offset),
            clearance: fixed64_to_f64(g.clearance),
            spawn_height: fixed64_to_f64(g.spawn_height),
            spawn_spacing: fixed64_to_f64(g.spawn_spacing),
        }
    }
}

/// Durations in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingData {
    pub lift: f64,
    pub transport: f64,
    pub drop: f64,
    pub settle: f64,
    pub spawn_interval: f64,
    pub solve_delay: f64,
}

impl Default for TimingData {
    fn default() -> Self {
        let t = Timing::default();
        Self {
            lift: fixed64_to_f64(t.lift),
            transport: fixed64_to_f64(t.transport),
            drop: fixed64_to_f64(t.drop),
            settle: fixed64_to_f64(t.settle),
            spawn_interval: fixed64_to_f64(t.spawn_interval),
            solve_delay: fixed64_to_f64(t.solve_delay),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskCountData {
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

impl Default for DiskCountData {
    fn default() -> Self {
        let r = DiskCountRange::default();
        Self {
            min: r.min,
            max: r.max,
            default: r.default,
        }
    }
}

/// A float in a data file that has no fixed-point equivalent: too large for
/// Q32.32, infinite or NaN.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{field} = {value} is outside the fixed-point range")]
pub struct UnrepresentableValue {
    pub field: &'static str,
    pub value: f64,
}

fn to_fixed(field: &'static str, value: f64) -> Result<Fixed64, UnrepresentableValue> {
    checked_f64_to_fixed64(value).ok_or(UnrepresentableValue { field, value })
}

impl ConfigData {
    /// Convert to the core representation. Does not validate.
    pub fn into_config(self) -> Result<SimConfig, UnrepresentableValue> {
        let g = self.geometry;
        let t = self.timing;
        let anchors = match self.pegs {
            None => PegAnchors::default(),
            Some([left, middle, right]) => {
                let anchor = |[x, y, z]: [f64; 3]| -> Result<Vec3, UnrepresentableValue> {
                    Ok(Vec3::new(
                        to_fixed("pegs", x)?,
                        to_fixed("pegs", y)?,
                        to_fixed("pegs", z)?,
                    ))
                };
                PegAnchors([anchor(left)?, anchor(middle)?, anchor(right)?])
            }
        };
        Ok(SimConfig {
            geometry: DiskGeometry {
                base_size: to_fixed("base_size", g.base_size)?,
                size_step: to_fixed("size_step", g.size_step)?,
                thickness: to_fixed("thickness", g.thickness)?,
                base_offset: to_fixed("base_offset", g.base_offset)?,
                clearance: to_fixed("clearance", g.clearance)?,
                spawn_height: to_fixed("spawn_height", g.spawn_height)?,
                spawn_spacing: to_fixed("spawn_spacing", g.spawn_spacing)?,
            },
            timing: Timing {
                lift: to_fixed("lift", t.lift)?,
                transport: to_fixed("transport", t.transport)?,
                drop: to_fixed("drop", t.drop)?,
                settle: to_fixed("settle", t.settle)?,
                spawn_interval: to_fixed("spawn_interval", t.spawn_interval)?,
                solve_delay: to_fixed("solve_delay", t.solve_delay)?,
            },
            disk_counts: DiskCountRange {
                min: self.disks.min,
                max: self.disks.max,
                default: self.disks.default,
            },
            anchors,
        })
    }
}
