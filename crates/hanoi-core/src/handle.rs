//! The boundary between the core and whatever renders the disks.
//!
//! The core never owns disk visuals. It asks a [`DiskFactory`] for a handle
//! when a disk is created, commands that handle while animating, and hands it
//! back to the factory for destruction on reset.

use crate::fixed::Fixed64;
use crate::geometry::Vec3;
use crate::id::DiskId;

/// Everything a factory needs to instantiate one disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskSpec {
    pub id: DiskId,
    /// Uniform horizontal scale. Strictly decreasing with the disk index.
    pub size: Fixed64,
    /// Vertical scale, shared by all disks.
    pub thickness: Fixed64,
    /// Initial world position.
    pub position: Vec3,
}

/// An addressable disk body owned by the rendering/physics layer.
pub trait DiskHandle {
    /// Current world position.
    fn position(&self) -> Vec3;

    /// Teleport to a world position.
    fn set_position(&mut self, position: Vec3);

    /// Set the uniform horizontal scale and the vertical thickness.
    fn set_scale(&mut self, size: Fixed64, thickness: Fixed64);

    /// Toggle the physics simulation for this body. While disabled the body
    /// ignores gravity and collisions (kinematic).
    fn set_simulate_physics(&mut self, enabled: bool);

    /// Zero linear and angular velocity.
    fn reset_velocity(&mut self);
}

/// Creates and destroys disk bodies on behalf of the core.
pub trait DiskFactory {
    type Handle: DiskHandle;

    /// Instantiate a disk at `spec.position` with physics enabled. The core
    /// applies the scale through [`DiskHandle::set_scale`] right after.
    fn spawn(&mut self, spec: &DiskSpec) -> Self::Handle;

    /// Destroy a disk previously returned by [`spawn`](Self::spawn).
    fn destroy(&mut self, handle: Self::Handle);
}
