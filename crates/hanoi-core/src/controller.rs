//! The simulation controller: owns the pegs, the animator and the event bus,
//! and drives a whole run from disk creation to the solved signal.
//!
//! # Run lifecycle
//!
//! 1. **Spawning** -- disks `0..n` are created on the left peg, one per
//!    `spawn_interval`, largest first.
//! 2. **Preparing** -- a `solve_delay` pause after the last disk.
//! 3. **Solving** -- moves from [`solve`] are animated strictly one after the
//!    other; the next move starts only once the previous one has settled.
//! 4. **Solved** -- terminal; a [`Event::Solved`] is emitted once.
//!
//! The driver calls [`SimulationController::tick`] once per frame. Every
//! suspension point is a tick boundary, so [`SimulationController::reset`]
//! can interrupt a run anywhere, including mid-phase.

use tracing::{debug, info, warn};

use crate::animator::{AnimateOutcome, AnimationPhase, AnimationStatus, MoveAnimator};
use crate::config::SimConfig;
use crate::error::{ConfigError, InputError};
use crate::event::{Event, EventBus};
use crate::fixed::Fixed64;
use crate::handle::{DiskFactory, DiskHandle, DiskSpec};
use crate::id::{DiskId, PegId};
use crate::peg::{Disk, Pegs};
use crate::sequencer::{Solve, move_count, solve};
use crate::sim::{Countdown, SimState, StateHash};
use crate::validation::{check_disk_count, parse_disk_count};

/// Peg roles used for every run.
const SOURCE: PegId = PegId::Left;
const AUXILIARY: PegId = PegId::Middle;
const DESTINATION: PegId = PegId::Right;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Externally visible progress of the current run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// No run in progress (never started, or reset).
    Idle,
    /// Creating disks.
    Spawning { created: u32, total: u32 },
    /// All disks created; waiting before the first move.
    Preparing,
    /// Animating moves. `completed` counts settled and skipped moves.
    Solving { completed: u64, total: u64 },
    /// Every move has settled.
    Solved { moves: u64 },
}

#[derive(Debug)]
enum Stage {
    Idle,
    Spawning { created: u32, timer: Countdown },
    Preparing { timer: Countdown },
    Solving { moves: Solve, started: u64, completed: u64 },
    Solved { moves: u64 },
}

// ---------------------------------------------------------------------------
// SimulationController
// ---------------------------------------------------------------------------

/// Runs Tower of Hanoi simulations against a disk factory.
pub struct SimulationController<F: DiskFactory> {
    config: SimConfig,
    factory: F,
    pegs: Pegs<F::Handle>,
    animator: MoveAnimator<F::Handle>,
    stage: Stage,
    /// Last accepted disk count.
    disk_count: u32,
    sim_state: SimState,
    event_bus: EventBus,
    cancel_requested: bool,
}

impl<F: DiskFactory> SimulationController<F> {
    /// Create an idle controller. Fails if `config` is inconsistent.
    pub fn new(factory: F, config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let animator = MoveAnimator::new(
            config.geometry.clone(),
            config.timing.clone(),
            config.anchors,
        );
        Ok(Self {
            disk_count: config.disk_counts.default,
            config,
            factory,
            pegs: Pegs::new(),
            animator,
            stage: Stage::Idle,
            sim_state: SimState::new(),
            event_bus: EventBus::default(),
            cancel_requested: false,
        })
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Start a run with `n` disks.
    ///
    /// Out-of-range counts are rejected without touching the current run;
    /// the error reports the count still in effect. An accepted count tears
    /// down any previous run first.
    pub fn run(&mut self, n: u32) -> Result<(), InputError> {
        let result = check_disk_count(n as u64, self.config.disk_counts, self.disk_count);
        self.start_checked(result).map(|_| ())
    }

    /// Parse `input` as a disk count and start a run with it.
    pub fn run_from_input(&mut self, input: &str) -> Result<u32, InputError> {
        let result = parse_disk_count(input, self.config.disk_counts, self.disk_count);
        self.start_checked(result)
    }

    fn start_checked(&mut self, result: Result<u32, InputError>) -> Result<u32, InputError> {
        let n = match result {
            Ok(n) => n,
            Err(err) => {
                warn!(%err, "disk count rejected");
                self.event_bus.emit(Event::InputRejected {
                    reason: err.to_string(),
                    frame: self.sim_state.frame,
                });
                self.event_bus.deliver();
                return Err(err);
            }
        };

        self.teardown();
        self.disk_count = n;
        let total_moves = move_count(n);
        info!(disks = n, moves = total_moves, "run started");
        self.event_bus.emit(Event::RunStarted {
            disk_count: n,
            total_moves,
            frame: self.sim_state.frame,
        });
        self.stage = Stage::Spawning {
            created: 0,
            timer: Countdown::new(Fixed64::ZERO),
        };
        self.event_bus.deliver();
        Ok(n)
    }

    /// Tear down the current run: abort any animation, destroy the disk in
    /// flight and every disk on the pegs. Idempotent.
    pub fn reset(&mut self) {
        self.teardown();
        self.event_bus.deliver();
    }

    /// Request cancellation at the next tick. The run is torn down before
    /// that tick does any work.
    pub fn cancel(&mut self) {
        self.cancel_requested = true;
    }

    fn teardown(&mut self) {
        self.cancel_requested = false;
        let was_active = !matches!(self.stage, Stage::Idle);
        self.stage = Stage::Idle;

        let mut discarded = 0;
        if let Some(disk) = self.animator.cancel() {
            self.factory.destroy(disk.into_handle());
            discarded += 1;
        }
        for disk in self.pegs.drain_all() {
            self.factory.destroy(disk.into_handle());
            discarded += 1;
        }

        if was_active || discarded > 0 {
            info!(discarded, "simulation reset");
            self.event_bus.emit(Event::SimulationReset {
                discarded,
                frame: self.sim_state.frame,
            });
        }
    }

    // -----------------------------------------------------------------------
    // Frame step
    // -----------------------------------------------------------------------

    /// Advance the run by one frame of `dt` seconds and deliver the events
    /// it produced.
    pub fn tick(&mut self, dt: Fixed64) -> RunStatus {
        let mut budget = self.sim_state.advance(dt);
        if self.cancel_requested {
            self.teardown();
        } else {
            self.run_stages(&mut budget);
        }
        self.event_bus.deliver();
        self.status()
    }

    fn run_stages(&mut self, budget: &mut Fixed64) {
        loop {
            let frame = self.sim_state.frame;
            match &mut self.stage {
                Stage::Idle | Stage::Solved { .. } => return,

                Stage::Spawning { created, timer } => {
                    if !timer.consume(budget) {
                        return;
                    }
                    if *created < self.disk_count {
                        let id = DiskId(*created);
                        *created += 1;
                        *timer = Countdown::new(self.config.timing.spawn_interval);
                        self.spawn_disk(id, frame);
                    } else {
                        self.stage = Stage::Preparing {
                            timer: Countdown::new(self.config.timing.solve_delay),
                        };
                    }
                }

                Stage::Preparing { timer } => {
                    if !timer.consume(budget) {
                        return;
                    }
                    self.stage = Stage::Solving {
                        moves: solve(self.disk_count, SOURCE, DESTINATION, AUXILIARY),
                        started: 0,
                        completed: 0,
                    };
                }

                Stage::Solving {
                    moves,
                    started,
                    completed,
                } => {
                    let total = move_count(self.disk_count);
                    if self.animator.is_busy() {
                        match self.animator.advance(budget, &mut self.pegs) {
                            AnimationStatus::Finished { disk, mv } => {
                                self.event_bus.emit(Event::MoveCompleted {
                                    index: *completed,
                                    total,
                                    mv,
                                    disk,
                                    frame,
                                });
                                *completed += 1;
                            }
                            AnimationStatus::InProgress(_) => return,
                            AnimationStatus::Idle => {}
                        }
                        continue;
                    }

                    let Some(mv) = moves.next() else {
                        let moves = *completed;
                        info!(disks = self.disk_count, moves, frame, "solved");
                        self.event_bus.emit(Event::Solved {
                            disk_count: self.disk_count,
                            moves,
                            frame,
                        });
                        self.stage = Stage::Solved { moves };
                        return;
                    };

                    let index = *started;
                    *started += 1;
                    match self.animator.animate(mv, &mut self.pegs) {
                        AnimateOutcome::Started { disk } => {
                            debug!(index, %mv, disk = %disk, "moving disk");
                            self.event_bus.emit(Event::MoveStarted {
                                index,
                                total,
                                mv,
                                disk,
                                frame,
                            });
                        }
                        AnimateOutcome::EmptySource | AnimateOutcome::Busy => {
                            self.event_bus.emit(Event::MoveSkipped { index, mv, frame });
                            *completed += 1;
                        }
                    }
                }
            }
        }
    }

    fn spawn_disk(&mut self, id: DiskId, frame: u64) {
        let geometry = &self.config.geometry;
        let size = geometry.disk_size(id);
        let spec = DiskSpec {
            id,
            size,
            thickness: geometry.thickness,
            position: self
                .config
                .anchors
                .get(SOURCE)
                .with_y(geometry.spawn_height(id)),
        };
        let mut handle = self.factory.spawn(&spec);
        handle.set_scale(size, spec.thickness);
        self.pegs[SOURCE].push(Disk::new(id, size, handle));
        debug!(disk = %id, size = %size, "disk created");
        self.event_bus.emit(Event::DiskCreated { disk: id, size, frame });
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn status(&self) -> RunStatus {
        match &self.stage {
            Stage::Idle => RunStatus::Idle,
            Stage::Spawning { created, .. } => RunStatus::Spawning {
                created: *created,
                total: self.disk_count,
            },
            Stage::Preparing { .. } => RunStatus::Preparing,
            Stage::Solving { completed, .. } => RunStatus::Solving {
                completed: *completed,
                total: move_count(self.disk_count),
            },
            Stage::Solved { moves } => RunStatus::Solved { moves: *moves },
        }
    }

    /// Whether a run is in progress and not yet solved.
    pub fn is_running(&self) -> bool {
        !matches!(self.stage, Stage::Idle | Stage::Solved { .. })
    }

    /// Last accepted disk count.
    pub fn disk_count(&self) -> u32 {
        self.disk_count
    }

    pub fn pegs(&self) -> &Pegs<F::Handle> {
        &self.pegs
    }

    /// The disk currently being carried between pegs.
    pub fn in_flight(&self) -> Option<&Disk<F::Handle>> {
        self.animator.in_flight()
    }

    pub fn animation_phase(&self) -> Option<AnimationPhase> {
        self.animator.phase()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn sim_state(&self) -> &SimState {
        &self.sim_state
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }

    /// Register listeners here.
    pub fn event_bus_mut(&mut self) -> &mut EventBus {
        &mut self.event_bus
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Hash of peg contents, the in-flight disk, disk positions and run
    /// progress. Two runs fed identical frame deltas hash identically.
    pub fn state_hash(&self) -> u64 {
        let mut h = StateHash::new();
        for stack in self.pegs.iter() {
            h.write_u64(stack.peek_count() as u64);
            for disk in stack.iter() {
                hash_disk(&mut h, disk);
            }
        }
        if let Some(disk) = self.animator.in_flight() {
            hash_disk(&mut h, disk);
        }
        match self.status() {
            RunStatus::Idle => h.write_u32(0),
            RunStatus::Spawning { created, .. } => {
                h.write_u32(1);
                h.write_u32(created);
            }
            RunStatus::Preparing => h.write_u32(2),
            RunStatus::Solving { completed, .. } => {
                h.write_u32(3);
                h.write_u64(completed);
            }
            RunStatus::Solved { moves } => {
                h.write_u32(4);
                h.write_u64(moves);
            }
        }
        h.finish()
    }
}

fn hash_disk<H: DiskHandle>(h: &mut StateHash, disk: &Disk<H>) {
    h.write_u32(disk.id().0);
    let p = disk.handle().position();
    h.write_fixed64(p.x);
    h.write_fixed64(p.y);
    h.write_fixed64(p.z);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use crate::test_utils::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn record(
        controller: &mut SimulationController<HeadlessFactory>,
        kinds: &[EventKind],
    ) -> Rc<RefCell<Vec<Event>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        for &kind in kinds {
            let sink = Rc::clone(&log);
            controller
                .event_bus_mut()
                .on_passive(kind, Box::new(move |e| sink.borrow_mut().push(e.clone())));
        }
        log
    }

    fn ids_on(controller: &SimulationController<HeadlessFactory>, peg: PegId) -> Vec<u32> {
        controller.pegs()[peg]
            .disk_ids()
            .into_iter()
            .map(|d| d.0)
            .collect()
    }

    #[test]
    fn new_controller_is_idle_with_default_count() {
        let c = headless_controller(SimConfig::default());
        assert_eq!(c.status(), RunStatus::Idle);
        assert_eq!(c.disk_count(), 3);
        assert_eq!(c.pegs().total_disks(), 0);
    }

    #[test]
    fn invalid_config_is_refused() {
        let mut config = SimConfig::default();
        config.geometry.thickness = Fixed64::ZERO;
        assert!(SimulationController::new(HeadlessFactory::default(), config).is_err());
    }

    #[test]
    fn boundary_counts() {
        let mut c = headless_controller(quick_config(0.1));
        assert!(matches!(c.run(1), Err(InputError::OutOfRange { .. })));
        assert!(matches!(c.run(11), Err(InputError::OutOfRange { .. })));
        assert_eq!(c.run(2), Ok(()));
        assert_eq!(c.run(10), Ok(()));
        assert_eq!(c.disk_count(), 10);
    }

    #[test]
    fn rejected_input_leaves_run_untouched() {
        let mut c = headless_controller(quick_config(0.1));
        c.run(4).unwrap();
        for _ in 0..30 {
            c.tick(frame());
        }
        let hash = c.state_hash();
        let status = c.status();

        let err = c.run(42).unwrap_err();
        assert_eq!(err.restored(), 4);
        let err = c.run_from_input("many").unwrap_err();
        assert_eq!(err.restored(), 4);

        assert_eq!(c.disk_count(), 4);
        assert_eq!(c.state_hash(), hash);
        assert_eq!(c.status(), status);
    }

    #[test]
    fn rejection_is_reported_to_observers() {
        let mut c = headless_controller(SimConfig::default());
        let log = record(&mut c, &[EventKind::InputRejected]);
        let _ = c.run_from_input("abc");
        assert_eq!(log.borrow().len(), 1);
        assert!(log.borrow()[0].to_string().contains("abc"));
    }

    #[test]
    fn run_from_input_accepts_padded_number() {
        let mut c = headless_controller(SimConfig::default());
        assert_eq!(c.run_from_input(" 5 "), Ok(5));
        assert_eq!(c.disk_count(), 5);
    }

    #[test]
    fn disks_are_created_one_per_interval() {
        let mut c = headless_controller(SimConfig::default());
        c.run(3).unwrap();
        let interval = c.config().timing.spawn_interval;

        assert_eq!(
            c.tick(Fixed64::ZERO),
            RunStatus::Spawning {
                created: 1,
                total: 3
            }
        );
        assert_eq!(ids_on(&c, PegId::Left), vec![0]);

        c.tick(interval / 2);
        assert_eq!(c.pegs().total_disks(), 1);
        c.tick(interval / 2);
        assert_eq!(ids_on(&c, PegId::Left), vec![0, 1]);
        c.tick(interval);
        assert_eq!(ids_on(&c, PegId::Left), vec![0, 1, 2]);

        c.tick(interval);
        assert_eq!(c.status(), RunStatus::Preparing);
    }

    #[test]
    fn created_disks_are_scaled_and_placed() {
        let mut c = headless_controller(SimConfig::default());
        c.run(2).unwrap();
        c.tick(Fixed64::ZERO);
        let disk = c.pegs()[PegId::Left].top().unwrap();
        let g = &c.config().geometry;
        assert_eq!(disk.size(), g.base_size);
        assert_eq!(disk.handle().size, g.base_size);
        assert_eq!(disk.handle().thickness, g.thickness);
        assert_eq!(
            disk.handle().position,
            c.config().anchors.get(PegId::Left).with_y(g.spawn_height)
        );
        assert!(disk.handle().physics_enabled);
    }

    #[test]
    fn full_run_moves_every_disk_to_destination() {
        let mut c = headless_controller(quick_config(0.05));
        let log = record(
            &mut c,
            &[EventKind::MoveStarted, EventKind::MoveCompleted, EventKind::Solved],
        );
        c.run(3).unwrap();
        assert!(run_to_completion(&mut c, frame(), 10_000).is_some());

        assert_eq!(c.status(), RunStatus::Solved { moves: 7 });
        assert_eq!(ids_on(&c, PegId::Right), vec![0, 1, 2]);
        assert!(c.pegs()[PegId::Left].is_empty());
        assert!(c.pegs()[PegId::Middle].is_empty());
        assert!(c.in_flight().is_none());

        let events = log.borrow();
        let starts = events
            .iter()
            .filter(|e| e.kind() == EventKind::MoveStarted)
            .count();
        assert_eq!(starts, 7);
        assert_eq!(events.last().map(Event::kind), Some(EventKind::Solved));
    }

    #[test]
    fn moves_never_overlap() {
        let mut c = headless_controller(quick_config(0.05));
        let log = record(&mut c, &[EventKind::MoveStarted, EventKind::MoveCompleted]);
        c.run(4).unwrap();
        run_to_completion(&mut c, frame(), 100_000).unwrap();

        let kinds: Vec<_> = log.borrow().iter().map(Event::kind).collect();
        assert_eq!(kinds.len(), 30);
        for pair in kinds.chunks(2) {
            assert_eq!(pair, [EventKind::MoveStarted, EventKind::MoveCompleted]);
        }
    }

    #[test]
    fn solved_is_signalled_once() {
        let mut c = headless_controller(quick_config(0.0));
        let log = record(&mut c, &[EventKind::Solved]);
        c.run(2).unwrap();
        c.tick(Fixed64::ZERO);
        assert_eq!(c.status(), RunStatus::Solved { moves: 3 });
        for _ in 0..10 {
            c.tick(frame());
        }
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn single_tick_run_reports_every_move() {
        let mut c = headless_controller(quick_config(0.0));
        let log = record(&mut c, &[EventKind::MoveStarted, EventKind::MoveCompleted]);
        c.run(10).unwrap();
        assert_eq!(c.tick(Fixed64::ZERO), RunStatus::Solved { moves: 1023 });

        let log = log.borrow();
        let started: Vec<_> = log
            .iter()
            .filter_map(|e| match e {
                Event::MoveStarted { index, .. } => Some(*index),
                _ => None,
            })
            .collect();
        assert_eq!(started, (0..1023).collect::<Vec<_>>());
        assert_eq!(log.len(), 2 * 1023);
        assert_eq!(c.event_bus().dropped_count(), 0);
    }

    #[test]
    fn catch_up_tick_reports_every_move() {
        let mut c = headless_controller(SimConfig::default());
        let log = record(&mut c, &[EventKind::MoveStarted]);
        c.run(10).unwrap();
        assert_eq!(c.tick(fixed(4000.0)), RunStatus::Solved { moves: 1023 });
        assert_eq!(log.borrow().len(), 1023);
    }

    #[test]
    fn physics_is_suspended_once_per_move() {
        let mut c = headless_controller(quick_config(0.0));
        c.run(3).unwrap();
        c.tick(Fixed64::ZERO);
        // Disk 2 (smallest) moves 4 times, disk 1 twice, disk 0 once.
        let suspensions: Vec<_> = c.pegs()[PegId::Right]
            .iter()
            .map(|d| d.handle().physics_suspensions)
            .collect();
        assert_eq!(suspensions, vec![1, 2, 4]);
        assert!(c.pegs()[PegId::Right]
            .iter()
            .all(|d| d.handle().physics_enabled));
    }

    #[test]
    fn reset_is_idempotent() {
        let mut c = headless_controller(quick_config(0.1));
        let log = record(&mut c, &[EventKind::SimulationReset]);
        c.run(5).unwrap();
        for _ in 0..200 {
            c.tick(frame());
        }
        c.reset();
        let after_first = (c.state_hash(), c.factory().live(), log.borrow().len());
        c.reset();
        let after_second = (c.state_hash(), c.factory().live(), log.borrow().len());

        assert_eq!(after_first, after_second);
        assert_eq!(c.factory().live(), 0);
        assert_eq!(c.pegs().total_disks(), 0);
        assert_eq!(c.status(), RunStatus::Idle);
    }

    #[test]
    fn reset_mid_flight_destroys_carried_disk() {
        let mut c = headless_controller(quick_config(0.5));
        c.run(3).unwrap();
        while c.animation_phase() != Some(AnimationPhase::Transporting) {
            c.tick(frame());
        }
        let carried = c.in_flight().map(Disk::id).unwrap();
        assert_eq!(c.pegs().total_disks(), 2);

        c.reset();
        assert!(c.in_flight().is_none());
        assert!(c.factory().destroyed.contains(&carried));
        assert_eq!(c.factory().live(), 0);
    }

    #[test]
    fn cancel_takes_effect_on_next_tick() {
        let mut c = headless_controller(quick_config(0.1));
        c.run(3).unwrap();
        for _ in 0..60 {
            c.tick(frame());
        }
        c.cancel();
        assert!(c.is_running());
        assert_eq!(c.tick(frame()), RunStatus::Idle);
        assert_eq!(c.factory().live(), 0);
    }

    #[test]
    fn rerun_with_different_count_clears_previous_disks() {
        let mut c = headless_controller(quick_config(0.0));
        c.run(6).unwrap();
        c.tick(Fixed64::ZERO);
        assert_eq!(c.pegs().total_disks(), 6);

        c.run(3).unwrap();
        c.tick(Fixed64::ZERO);
        assert_eq!(c.pegs().total_disks(), 3);
        assert_eq!(ids_on(&c, PegId::Right), vec![0, 1, 2]);
        assert_eq!(c.factory().live(), 3);
    }

    #[test]
    fn identical_frame_deltas_give_identical_state() {
        let run = || {
            let mut c = headless_controller(SimConfig::default());
            c.run(4).unwrap();
            let mut hashes = Vec::new();
            for i in 0..600u32 {
                c.tick(frame() + fixed(f64::from(i % 3) / 1000.0));
                hashes.push(c.state_hash());
            }
            hashes
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn negative_delta_does_not_rewind() {
        let mut c = headless_controller(SimConfig::default());
        c.run(2).unwrap();
        c.tick(Fixed64::ZERO);
        let hash = c.state_hash();
        c.tick(fixed(-5.0));
        assert_eq!(c.state_hash(), hash);
    }
}
