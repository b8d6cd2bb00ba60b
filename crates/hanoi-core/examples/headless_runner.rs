//! Solve a tower without a renderer and print progress as it happens.
//!
//! Usage: `cargo run -p hanoi-core --example headless_runner -- [disks]`
//!
//! Set `RUST_LOG=hanoi_core=debug` to see per-move logging.

use hanoi_core::config::SimConfig;
use hanoi_core::event::{Event, EventKind, SubscriberPriority};
use hanoi_core::id::DiskId;
use hanoi_core::test_utils::{HeadlessFactory, frame};
use hanoi_core::{RunStatus, SimulationController};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let input = std::env::args().nth(1).unwrap_or_else(|| "4".to_string());

    let config = SimConfig::default();
    let mut sim = match SimulationController::new(HeadlessFactory::default(), config) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("bad config: {e}");
            std::process::exit(1);
        }
    };

    for kind in [
        EventKind::RunStarted,
        EventKind::MoveStarted,
        EventKind::Solved,
        EventKind::InputRejected,
    ] {
        sim.event_bus_mut().on_passive(
            kind,
            Box::new(|event| println!("[frame {:>6}] {event}", event.frame())),
        );
    }

    // Creation is visible from the run header; don't buffer one event per disk.
    sim.event_bus_mut().suppress(EventKind::DiskCreated);

    // Milestone line once the base disk has landed.
    sim.event_bus_mut().on_passive_filtered(
        EventKind::MoveCompleted,
        SubscriberPriority::Post,
        Some(Box::new(|event| {
            matches!(event, Event::MoveCompleted { disk: DiskId(0), .. })
        })),
        Box::new(|event| println!("[frame {:>6}] base disk placed", event.frame())),
    );

    if let Err(e) = sim.run_from_input(&input) {
        eprintln!("{e}");
        std::process::exit(2);
    }

    let mut ticks = 0u64;
    loop {
        ticks += 1;
        if let RunStatus::Solved { moves } = sim.tick(frame()) {
            println!(
                "done: {moves} moves in {ticks} frames ({:.1} s simulated)",
                sim.sim_state().elapsed.to_num::<f64>()
            );
            break;
        }
    }
}
