//! Shows how a renderer plugs in: a factory that mirrors disk bodies into a
//! shared scene list, and a config with tighter timing and wider pegs.

use std::cell::RefCell;
use std::rc::Rc;

use hanoi_core::config::SimConfig;
use hanoi_core::fixed::{Fixed64, f64_to_fixed64, fixed64_to_f64};
use hanoi_core::geometry::Vec3;
use hanoi_core::handle::{DiskFactory, DiskHandle, DiskSpec};
use hanoi_core::id::DiskId;
use hanoi_core::{RunStatus, SimulationController};

#[derive(Debug, Clone, Default)]
struct Body {
    position: Vec3,
    size: Fixed64,
    kinematic: bool,
}

type Scene = Rc<RefCell<Vec<Option<Body>>>>;

struct SceneDisk {
    slot: usize,
    scene: Scene,
}

impl DiskHandle for SceneDisk {
    fn position(&self) -> Vec3 {
        self.scene.borrow()[self.slot]
            .as_ref()
            .map_or(Vec3::ZERO, |b| b.position)
    }

    fn set_position(&mut self, position: Vec3) {
        if let Some(body) = self.scene.borrow_mut()[self.slot].as_mut() {
            body.position = position;
        }
    }

    fn set_scale(&mut self, size: Fixed64, _thickness: Fixed64) {
        if let Some(body) = self.scene.borrow_mut()[self.slot].as_mut() {
            body.size = size;
        }
    }

    fn set_simulate_physics(&mut self, enabled: bool) {
        if let Some(body) = self.scene.borrow_mut()[self.slot].as_mut() {
            body.kinematic = !enabled;
        }
    }

    fn reset_velocity(&mut self) {}
}

struct SceneFactory {
    scene: Scene,
}

impl DiskFactory for SceneFactory {
    type Handle = SceneDisk;

    fn spawn(&mut self, spec: &DiskSpec) -> SceneDisk {
        let mut scene = self.scene.borrow_mut();
        scene.push(Some(Body {
            position: spec.position,
            ..Body::default()
        }));
        SceneDisk {
            slot: scene.len() - 1,
            scene: Rc::clone(&self.scene),
        }
    }

    fn destroy(&mut self, handle: SceneDisk) {
        self.scene.borrow_mut()[handle.slot] = None;
    }
}

fn main() {
    let scene: Scene = Rc::default();
    let mut config = SimConfig::default();
    config.timing.lift = f64_to_fixed64(0.25);
    config.timing.transport = f64_to_fixed64(0.25);
    config.timing.drop = f64_to_fixed64(0.1);
    config.anchors = hanoi_core::config::PegAnchors([
        Vec3::from_f64(-6.0, 0.0, 1.0),
        Vec3::from_f64(0.0, 0.0, 1.0),
        Vec3::from_f64(6.0, 0.0, 1.0),
    ]);

    let factory = SceneFactory {
        scene: Rc::clone(&scene),
    };
    let Ok(mut sim) = SimulationController::new(factory, config) else {
        eprintln!("invalid config");
        return;
    };
    if let Err(e) = sim.run(5) {
        eprintln!("{e}");
        return;
    }

    let dt = Fixed64::ONE / 30;
    while !matches!(sim.tick(dt), RunStatus::Solved { .. }) {}

    for (slot, body) in scene.borrow().iter().enumerate() {
        if let Some(body) = body {
            println!(
                "disk {} size {:.1} at x={:.1} y={:.2}",
                DiskId(slot as u32),
                fixed64_to_f64(body.size),
                fixed64_to_f64(body.position.x),
                fixed64_to_f64(body.position.y),
            );
        }
    }
}
