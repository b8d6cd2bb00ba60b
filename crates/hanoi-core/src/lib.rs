//! Hanoi Core -- a frame-stepped Tower of Hanoi solver and animator.
//!
//! The crate solves the puzzle with the classical recursive move order and
//! turns each move into a lift, transport and drop animation of a disk body
//! owned by an external rendering/physics layer.
//!
//! # Frame-Stepped Execution
//!
//! Nothing runs on its own. A driver calls
//! [`controller::SimulationController::tick`] once per rendered frame with
//! the elapsed time; the controller spends that time on whatever is pending
//! (creating disks, waiting, animating the current move) and then delivers
//! the events it produced. Moves never overlap.
//!
//! ```rust,ignore
//! let mut sim = SimulationController::new(factory, SimConfig::default())?;
//! sim.run(5)?;
//! loop {
//!     if let RunStatus::Solved { .. } = sim.tick(frame_dt) {
//!         break;
//!     }
//! }
//! ```
//!
//! # Key Types
//!
//! - [`sequencer::solve`] -- Lazy iterator over the `2^n - 1` moves.
//! - [`peg::PegStack`] -- LIFO stack of disks on one peg.
//! - [`animator::MoveAnimator`] -- Four-phase per-move animation.
//! - [`controller::SimulationController`] -- Run orchestration and reset.
//! - [`handle::DiskHandle`] / [`handle::DiskFactory`] -- Rendering boundary.
//! - [`event::EventBus`] -- Buffered progress and completion events.
//! - [`fixed::Fixed64`] -- Q32.32 fixed-point for deterministic motion.

pub mod animator;
pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod fixed;
pub mod geometry;
pub mod handle;
pub mod id;
pub mod peg;
pub mod sequencer;
pub mod sim;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use controller::{RunStatus, SimulationController};
pub use error::{ConfigError, InputError};
