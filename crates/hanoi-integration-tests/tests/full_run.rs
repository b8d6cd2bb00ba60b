//! Integration test: whole runs from config text to the solved signal.
//!
//! Loads a config through `hanoi-data`, drives a headless controller at
//! 60 Hz and checks the observable outcome: where disks end up, what the
//! observers saw, and what was handed back to the factory.

use std::cell::RefCell;
use std::rc::Rc;

use hanoi_core::event::{Event, EventKind};
use hanoi_core::id::{DiskId, PegId};
use hanoi_core::test_utils::*;
use hanoi_core::{InputError, RunStatus};
use hanoi_data::ConfigData;
use hanoi_data::loader::{Format, deserialize_str};

const FAST: &str = r#"(
    timing: (
        lift: 0.05,
        transport: 0.05,
        drop: 0.05,
        settle: 0.02,
        spawn_interval: 0.02,
        solve_delay: 0.02,
    ),
)"#;

fn fast_config() -> hanoi_core::config::SimConfig {
    let data: ConfigData = deserialize_str(FAST, Format::Ron).unwrap();
    let config = data.into_config().unwrap();
    config.validate().unwrap();
    config
}

#[test]
fn ten_disks_end_on_destination_in_order() {
    let mut sim = headless_controller(fast_config());
    sim.run(10).unwrap();
    assert!(run_to_completion(&mut sim, frame(), 1_000_000).is_some());

    assert_eq!(sim.status(), RunStatus::Solved { moves: 1023 });
    let expected: Vec<_> = (0..10).map(DiskId).collect();
    assert_eq!(sim.pegs()[PegId::Right].disk_ids(), expected);
    assert!(sim.pegs()[PegId::Left].is_empty());
    assert!(sim.pegs()[PegId::Middle].is_empty());

    // Every landed disk is resting exactly on its stacking height.
    let geometry = &sim.config().geometry;
    for (level, disk) in sim.pegs()[PegId::Right].iter().enumerate() {
        assert_eq!(disk.handle().position.y, geometry.landing_height(level));
        assert!(disk.handle().physics_enabled);
    }
}

#[test]
fn observers_see_every_move_and_the_solve() {
    let mut sim = headless_controller(fast_config());
    let lines = Rc::new(RefCell::new(Vec::new()));
    let confetti = Rc::new(RefCell::new(0));

    {
        let lines = Rc::clone(&lines);
        sim.event_bus_mut().on_passive(
            EventKind::MoveStarted,
            Box::new(move |e| lines.borrow_mut().push(e.to_string())),
        );
    }
    {
        let confetti = Rc::clone(&confetti);
        sim.event_bus_mut().on_passive(
            EventKind::Solved,
            Box::new(move |_| *confetti.borrow_mut() += 1),
        );
    }

    sim.run(3).unwrap();
    run_to_completion(&mut sim, frame(), 100_000).unwrap();

    let lines = lines.borrow();
    assert_eq!(lines.len(), 7);
    assert_eq!(lines[0], "Move 1/7: moving disk 2 from peg 0 to peg 2");
    assert_eq!(lines[6], "Move 7/7: moving disk 2 from peg 0 to peg 2");
    assert_eq!(*confetti.borrow(), 1);
}

#[test]
fn moved_disks_follow_canonical_order() {
    let mut sim = headless_controller(fast_config());
    let moves = Rc::new(RefCell::new(Vec::new()));
    {
        let moves = Rc::clone(&moves);
        sim.event_bus_mut().on_passive(
            EventKind::MoveCompleted,
            Box::new(move |e| {
                if let Event::MoveCompleted { mv, disk, .. } = e {
                    moves.borrow_mut().push((mv.from.index(), mv.to.index(), disk.0));
                }
            }),
        );
    }
    sim.run(3).unwrap();
    run_to_completion(&mut sim, frame(), 100_000).unwrap();

    assert_eq!(
        *moves.borrow(),
        vec![
            (0, 2, 2),
            (0, 1, 1),
            (2, 1, 2),
            (0, 2, 0),
            (1, 0, 2),
            (1, 2, 1),
            (0, 2, 2),
        ]
    );
}

#[test]
fn restart_mid_run_with_new_count() {
    let mut sim = headless_controller(fast_config());
    sim.run(7).unwrap();
    for _ in 0..200 {
        sim.tick(frame());
    }
    assert!(sim.is_running());

    sim.run(4).unwrap();
    run_to_completion(&mut sim, frame(), 100_000).unwrap();

    assert_eq!(sim.pegs().total_disks(), 4);
    assert_eq!(sim.factory().live(), 4);
    assert_eq!(sim.status(), RunStatus::Solved { moves: 15 });
}

#[test]
fn rejected_counts_keep_the_previous_one() {
    let mut sim = headless_controller(fast_config());
    sim.run(5).unwrap();
    assert!(matches!(
        sim.run_from_input("11"),
        Err(InputError::OutOfRange { restored: 5, .. })
    ));
    assert!(matches!(
        sim.run_from_input("five"),
        Err(InputError::NotNumeric { restored: 5, .. })
    ));
    assert_eq!(sim.disk_count(), 5);
    assert!(sim.is_running());
}

#[test]
fn reset_after_solve_returns_every_disk() {
    let mut sim = headless_controller(fast_config());
    sim.run(6).unwrap();
    run_to_completion(&mut sim, frame(), 100_000).unwrap();
    sim.reset();
    sim.reset();

    assert_eq!(sim.status(), RunStatus::Idle);
    assert_eq!(sim.factory().spawned.len(), 6);
    assert_eq!(sim.factory().destroyed.len(), 6);
    assert_eq!(sim.pegs().total_disks(), 0);
}

#[test]
fn large_frames_reach_the_same_end_state() {
    let mut smooth = headless_controller(fast_config());
    let mut choppy = headless_controller(fast_config());
    smooth.run(5).unwrap();
    choppy.run(5).unwrap();

    run_to_completion(&mut smooth, frame(), 100_000).unwrap();
    let choppy_ticks = run_to_completion(&mut choppy, fixed(0.5), 100_000).unwrap();

    assert!(choppy_ticks < 100);
    assert_eq!(smooth.state_hash(), choppy.state_hash());
}
