//! Per-move lift → transport → drop animation.
//!
//! [`MoveAnimator::animate`] pops the top disk of the source peg, switches its
//! physics off and plans three waypoints. [`MoveAnimator::advance`] is then
//! called once per frame with the frame's time budget and moves the disk
//! along the current phase. When the drop completes the disk is snapped to
//! its landing spot, physics is switched back on with velocities zeroed, and
//! the disk is pushed onto the destination peg. A short settle pause follows
//! before the animation reports [`AnimationStatus::Finished`].
//!
//! Between `animate` and landing the disk belongs to no peg.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::config::{DiskGeometry, PegAnchors, Timing};
use crate::fixed::Fixed64;
use crate::geometry::{Easing, Vec3};
use crate::handle::DiskHandle;
use crate::id::DiskId;
use crate::peg::{Disk, Pegs};
use crate::sequencer::Move;
use crate::sim::Countdown;

// ---------------------------------------------------------------------------
// Phases and results
// ---------------------------------------------------------------------------

/// Stage of the disk currently being relocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationPhase {
    /// Rising straight up from the source peg to carry height.
    Lifting,
    /// Sliding horizontally at carry height to above the destination peg.
    Transporting,
    /// Descending at constant rate onto the destination stack.
    Dropping,
    /// Landed; waiting out the pause before the next move.
    Settled,
}

impl AnimationPhase {
    /// Lift and transport ease in and out; the drop is linear.
    pub fn easing(self) -> Easing {
        match self {
            AnimationPhase::Dropping => Easing::Linear,
            _ => Easing::SmoothStep,
        }
    }
}

/// Result of [`MoveAnimator::animate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimateOutcome {
    /// The disk left its source peg and is now in flight.
    Started { disk: DiskId },
    /// The source peg was empty. Nothing changed.
    EmptySource,
    /// A previous move is still animating. Nothing changed.
    Busy,
}

/// Result of [`MoveAnimator::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationStatus {
    /// No move is animating.
    Idle,
    /// The budget ran out during this phase.
    InProgress(AnimationPhase),
    /// The move has settled. Leftover budget remains available to the caller.
    Finished { disk: DiskId, mv: Move },
}

// ---------------------------------------------------------------------------
// Flight
// ---------------------------------------------------------------------------

/// State of the one move being animated.
#[derive(Debug)]
struct Flight<H> {
    mv: Move,
    disk_id: DiskId,
    /// `None` once the disk has landed and been pushed onto its peg.
    disk: Option<Disk<H>>,
    phase: AnimationPhase,
    timer: Countdown,
    /// Position at the start of the current phase.
    from: Vec3,
    above_source: Vec3,
    above_destination: Vec3,
    landing: Vec3,
}

impl<H> Flight<H> {
    /// Where the current phase ends.
    fn target(&self) -> Vec3 {
        match self.phase {
            AnimationPhase::Lifting => self.above_source,
            AnimationPhase::Transporting => self.above_destination,
            AnimationPhase::Dropping | AnimationPhase::Settled => self.landing,
        }
    }

    fn enter(&mut self, phase: AnimationPhase, duration: Fixed64) {
        self.from = self.target();
        self.phase = phase;
        self.timer = Countdown::new(duration);
    }
}

// ---------------------------------------------------------------------------
// MoveAnimator
// ---------------------------------------------------------------------------

/// Drives one disk at a time through its move.
#[derive(Debug)]
pub struct MoveAnimator<H> {
    geometry: DiskGeometry,
    timing: Timing,
    anchors: PegAnchors,
    flight: Option<Flight<H>>,
}

impl<H: DiskHandle> MoveAnimator<H> {
    pub fn new(geometry: DiskGeometry, timing: Timing, anchors: PegAnchors) -> Self {
        Self {
            geometry,
            timing,
            anchors,
            flight: None,
        }
    }

    /// Begin relocating the top disk of `mv.from` to `mv.to`.
    ///
    /// The disk leaves the source stack immediately and its physics is
    /// suspended. An empty source peg is tolerated: the call logs a warning
    /// and returns [`AnimateOutcome::EmptySource`] without touching any state.
    pub fn animate(&mut self, mv: Move, pegs: &mut Pegs<H>) -> AnimateOutcome {
        if self.flight.is_some() {
            warn!(%mv, "move requested while another move is animating");
            return AnimateOutcome::Busy;
        }
        let Some(mut disk) = pegs[mv.from].pop() else {
            warn!(%mv, "source peg is empty, skipping move");
            return AnimateOutcome::EmptySource;
        };

        // Every disk in play, this one included, could be stacked on one peg.
        let in_play = pegs.total_disks() + 1;
        let start = disk.handle().position();
        let carry = self.geometry.clearance_height(in_play).max(start.y);

        let destination = self.anchors.get(mv.to);
        let landing_y = self.geometry.landing_height(pegs[mv.to].peek_count());

        disk.handle_mut().set_simulate_physics(false);

        let disk_id = disk.id();
        debug!(disk = %disk_id, %mv, carry = %carry, landing = %landing_y, "move started");

        self.flight = Some(Flight {
            mv,
            disk_id,
            disk: Some(disk),
            phase: AnimationPhase::Lifting,
            timer: Countdown::new(self.timing.lift),
            from: start,
            above_source: start.with_y(carry),
            above_destination: destination.with_y(carry),
            landing: destination.with_y(landing_y),
        });
        AnimateOutcome::Started { disk: disk_id }
    }

    /// Spend up to `budget` seconds on the current move.
    ///
    /// Time left over after a phase ends flows into the next phase; time left
    /// over after the settle pause stays in `budget` for the caller.
    pub fn advance(&mut self, budget: &mut Fixed64, pegs: &mut Pegs<H>) -> AnimationStatus {
        let Some(flight) = self.flight.as_mut() else {
            return AnimationStatus::Idle;
        };
        *budget = (*budget).max(Fixed64::ZERO);

        loop {
            let done = flight.timer.consume(budget);
            let phase = flight.phase;

            if phase == AnimationPhase::Settled {
                if !done {
                    return AnimationStatus::InProgress(phase);
                }
                let (disk, mv) = (flight.disk_id, flight.mv);
                self.flight = None;
                return AnimationStatus::Finished { disk, mv };
            }

            let (from, target) = (flight.from, flight.target());
            let t = phase.easing().apply(flight.timer.progress());
            let Some(disk) = flight.disk.as_mut() else {
                // Only the settle phase runs without a disk in hand.
                return AnimationStatus::InProgress(phase);
            };

            if !done {
                disk.handle_mut().set_position(Vec3::lerp(from, target, t));
                return AnimationStatus::InProgress(phase);
            }

            // Snap: the interpolated position may be off by rounding.
            disk.handle_mut().set_position(target);
            trace!(disk = %flight.disk_id, ?phase, "phase complete");

            match phase {
                AnimationPhase::Lifting => {
                    flight.enter(AnimationPhase::Transporting, self.timing.transport);
                }
                AnimationPhase::Transporting => {
                    flight.enter(AnimationPhase::Dropping, self.timing.drop);
                }
                AnimationPhase::Dropping => {
                    let handle = disk.handle_mut();
                    handle.set_simulate_physics(true);
                    handle.reset_velocity();
                    if let Some(disk) = flight.disk.take() {
                        pegs[flight.mv.to].push(disk);
                    }
                    debug!(disk = %flight.disk_id, mv = %flight.mv, "disk landed");
                    flight.enter(AnimationPhase::Settled, self.timing.settle);
                }
                AnimationPhase::Settled => unreachable!("settle handled above"),
            }
        }
    }

    /// Abort the current move. Returns the disk if it was still in flight;
    /// a disk that already landed stays on its peg.
    pub fn cancel(&mut self) -> Option<Disk<H>> {
        let flight = self.flight.take()?;
        if flight.disk.is_some() {
            debug!(
                disk = %flight.disk_id,
                mv = %flight.mv,
                phase = ?flight.phase,
                "move cancelled mid-flight"
            );
        }
        flight.disk
    }

    /// Whether a move is animating (including the settle pause).
    pub fn is_busy(&self) -> bool {
        self.flight.is_some()
    }

    pub fn phase(&self) -> Option<AnimationPhase> {
        self.flight.as_ref().map(|f| f.phase)
    }

    pub fn current_move(&self) -> Option<Move> {
        self.flight.as_ref().map(|f| f.mv)
    }

    /// The disk currently carried, if any.
    pub fn in_flight(&self) -> Option<&Disk<H>> {
        self.flight.as_ref().and_then(|f| f.disk.as_ref())
    }
}
