//! Property test: arbitrary user sessions.
//!
//! Interleaves typed disk counts, resets, cancels and bursts of frames of
//! random length, then checks that the factory, the pegs and the status
//! still agree, and that a fresh run afterwards solves cleanly.

use hanoi_core::fixed::Fixed64;
use hanoi_core::test_utils::*;
use hanoi_core::{RunStatus, SimulationController};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Action {
    Type(String),
    Reset,
    Cancel,
    Frames { count: u32, dt: Fixed64 },
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0u32..=12).prop_map(|n| Action::Type(n.to_string())),
        "[a-z ]{0,4}".prop_map(Action::Type),
        Just(Action::Reset),
        Just(Action::Cancel),
        (1u32..=40, 0u32..=300).prop_map(|(count, ms)| Action::Frames {
            count,
            dt: fixed(f64::from(ms) / 1000.0),
        }),
    ]
}

fn apply(sim: &mut SimulationController<HeadlessFactory>, action: &Action) {
    match action {
        Action::Type(input) => {
            let _ = sim.run_from_input(input);
        }
        Action::Reset => sim.reset(),
        Action::Cancel => sim.cancel(),
        Action::Frames { count, dt } => {
            for _ in 0..*count {
                sim.tick(*dt);
            }
        }
    }
}

fn check_consistent(sim: &SimulationController<HeadlessFactory>) -> Result<(), TestCaseError> {
    let held = sim.pegs().total_disks() + usize::from(sim.in_flight().is_some());
    prop_assert_eq!(sim.factory().live(), held);
    prop_assert!(sim.pegs().is_well_ordered());
    prop_assert!(held <= sim.disk_count() as usize);
    if sim.status() == RunStatus::Idle {
        prop_assert_eq!(held, 0);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn any_session_stays_consistent(
        actions in proptest::collection::vec(arb_action(), 1..24),
    ) {
        let mut sim = headless_controller(quick_config(0.05));
        for action in &actions {
            apply(&mut sim, action);
            check_consistent(&sim)?;
        }

        sim.run(3).unwrap();
        prop_assert!(run_to_completion(&mut sim, frame(), 10_000).is_some());
        prop_assert_eq!(sim.status(), RunStatus::Solved { moves: 7 });
        prop_assert_eq!(sim.factory().live(), 3);
        check_consistent(&sim)?;
    }
}
