/// Headless runs: a simple steering policy driving the simulation with no
/// terminal attached. Used by the `simulate` command and by tests.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::compute::{init_world, tick};
use crate::entities::{GameState, World};
use crate::input::{Action, Controls};

/// Deadband so the ship does not jitter under its target.
const AIM_SLACK: f32 = 4.0;

/// Chase the lowest Bismuth (the most urgent one) and keep firing.
pub fn steer(world: &World) -> Controls {
    let target = world
        .enemies
        .iter()
        .filter(|e| e.is_bismuth())
        .max_by(|a, b| a.y.total_cmp(&b.y));
    let mut controls = Controls {
        shoot: true,
        ..Controls::default()
    };
    if let Some(enemy) = target {
        let dx = enemy.x - world.player.x;
        controls.left = dx < -AIM_SLACK;
        controls.right = dx > AIM_SLACK;
    }
    controls
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub frames: u64,
    pub score: u32,
    pub game_over: bool,
}

/// Start a run and steer it for at most `max_frames` frames or until the
/// player is destroyed. The start press rides on the first frame, so a
/// zero budget plays nothing. Deterministic for a given seed.
pub fn run(seed: u64, max_frames: u64) -> RunSummary {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut world = init_world(&mut rng);
    let mut actions = vec![Action::Start];

    let mut frames = 0;
    while frames < max_frames && world.state != GameState::GameOver {
        let controls = steer(&world);
        world = tick(&world, &controls, &actions, &mut rng);
        actions.clear();
        frames += 1;
    }

    tracing::debug!(seed, frames, score = world.score, "autopilot run finished");
    RunSummary {
        seed,
        frames,
        score: world.score,
        game_over: world.state == GameState::GameOver,
    }
}
