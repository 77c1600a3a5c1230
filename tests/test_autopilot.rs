use bismuth_strike::autopilot::{run, steer};
use bismuth_strike::entities::{Enemy, GameState, World};

#[test]
fn same_seed_same_run() {
    assert_eq!(run(7, 2_000), run(7, 2_000));
}

#[test]
fn run_stops_at_the_frame_budget() {
    let summary = run(3, 10);
    assert_eq!(summary.frames, 10);
    assert!(!summary.game_over);
    assert_eq!(summary.seed, 3);
}

#[test]
fn zero_budget_plays_nothing() {
    let summary = run(5, 0);
    assert_eq!(summary.frames, 0);
    assert_eq!(summary.score, 0);
    assert!(!summary.game_over);
}

#[test]
fn single_frame_budget_runs_one_frame() {
    assert_eq!(run(5, 1).frames, 1);
}

#[test]
fn long_run_scores() {
    let summary = run(11, 5_000);
    assert!(summary.frames <= 5_000);
    assert!(summary.score > 0 || summary.game_over);
}

#[test]
fn steer_chases_the_lowest_bismuth() {
    let mut world = World {
        state: GameState::Playing,
        ..World::empty()
    };
    world.enemies.push(Enemy::bismuth(100.0, 50.0, 0.0, 0.0));
    world.enemies.push(Enemy::bismuth(500.0, 200.0, 0.0, 0.0));
    let controls = steer(&world);
    assert!(controls.right && !controls.left && controls.shoot);
}

#[test]
fn steer_holds_still_under_target() {
    let mut world = World::empty();
    world.enemies.push(Enemy::bismuth(world.player.x + 2.0, 50.0, 0.0, 0.0));
    let controls = steer(&world);
    assert!(!controls.left && !controls.right);
}

#[test]
fn summary_serializes() {
    let json = serde_json::to_value(run(1, 5)).unwrap();
    assert_eq!(json["frames"], 5);
    assert_eq!(json["seed"], 1);
}
