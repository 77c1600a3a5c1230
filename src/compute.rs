/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// [`World`] (and, where needed, an RNG handle) and returns a brand-new
/// `World`. Side effects are limited to the injected RNG; everything else
/// the outside world needs to know is left in `World::events`.

use std::f32::consts::{FRAC_PI_2, TAU};

use rand::Rng;

use crate::constants::*;
use crate::entities::{
    dist, Bullet, ElectricItem, Enemy, EnemyBullet, GameEvent, GameState, Particle, Player, Star,
    World,
};
use crate::input::{Action, Controls};
use crate::ports::Rgb;

// ── Difficulty ───────────────────────────────────────────────────────────────

/// Spawn interval for a score: `SPAWN_STEP` frames faster every
/// `SPAWN_STEP_SCORE` points, never below `MIN_SPAWN_INTERVAL`.
pub fn spawn_interval_for(score: u32) -> u32 {
    let accel = (score / SPAWN_STEP_SCORE).saturating_mul(SPAWN_STEP);
    INITIAL_SPAWN_INTERVAL
        .saturating_sub(accel)
        .max(MIN_SPAWN_INTERVAL)
}

/// Speed of a freshly spawned enemy; grows as the interval shrinks.
pub fn enemy_base_speed(spawn_interval: u32) -> f32 {
    let shrink = INITIAL_SPAWN_INTERVAL.saturating_sub(spawn_interval) as f32;
    ENEMY_BASE_SPEED + shrink * ENEMY_SPEED_GAIN
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the start-screen world with a fresh starfield.
pub fn init_world(rng: &mut impl Rng) -> World {
    World {
        stars: (0..STAR_COUNT).map(|_| Star::random(rng)).collect(),
        ..World::empty()
    }
}

/// Start (or restart) a run: every counter and transient list goes back to
/// its initial value. The starfield and tuning carry over.
pub fn start_game(world: &World) -> World {
    tracing::debug!(previous_score = world.score, "starting run");
    World {
        state: GameState::Playing,
        stars: world.stars.clone(),
        tuning: world.tuning,
        frame: world.frame,
        events: vec![GameEvent::Started],
        ..World::empty()
    }
}

/// Remove every enemy and enemy bullet, with a burst of debris.
pub fn debug_clear(world: &World, rng: &mut impl Rng) -> World {
    if world.state != GameState::Playing {
        return world.clone();
    }
    let mut w = world.clone();
    w.enemies.clear();
    w.enemy_bullets.clear();
    for _ in 0..CLEAR_BURST_COUNT {
        let x = rng.gen_range(0.0..CANVAS_WIDTH);
        let y = rng.gen_range(0.0..CANVAS_HEIGHT);
        w.particles.push(random_particle(rng, x, y, 2.0..8.0, CLEAR_COLOR));
    }
    w.events.push(GameEvent::Cleared);
    w
}

// ── Input-driven transitions (pure) ──────────────────────────────────────────

pub fn move_player_left(world: &World) -> World {
    let mut player = world.player.clone();
    player.move_left();
    World {
        player,
        ..world.clone()
    }
}

pub fn move_player_right(world: &World) -> World {
    let mut player = world.player.clone();
    player.move_right();
    World {
        player,
        ..world.clone()
    }
}

/// Fire from the player's nose if the cooldown allows it: one bullet, or a
/// three-way spread while powered up.
pub fn player_shoot(world: &World) -> World {
    let mut w = world.clone();
    fire(&mut w);
    w
}

fn fire(w: &mut World) {
    if w.state != GameState::Playing || w.shoot_cooldown > 0 {
        return;
    }
    let (x, y) = (w.player.x, w.player.y - PLAYER_RADIUS);
    w.bullets.push(Bullet::new(x, y));
    let mut fired = 1;
    if w.powered_up() {
        w.bullets.push(Bullet::angled(x, y, -SPREAD_ANGLE));
        w.bullets.push(Bullet::angled(x, y, SPREAD_ANGLE));
        fired = 3;
    }
    w.shoot_cooldown = SHOOT_COOLDOWN;
    w.events.push(GameEvent::Shot { bullets: fired });
}

// ── Particles ────────────────────────────────────────────────────────────────

fn random_particle(
    rng: &mut impl Rng,
    x: f32,
    y: f32,
    speed: std::ops::Range<f32>,
    color: Rgb,
) -> Particle {
    let angle = rng.gen_range(0.0..TAU);
    let speed = rng.gen_range(speed);
    let life = PARTICLE_BASE_LIFE + rng.gen_range(0.0..PARTICLE_LIFE_JITTER);
    Particle::new(x, y, angle, speed, life, color)
}

fn burst(
    particles: &mut Vec<Particle>,
    rng: &mut impl Rng,
    (x, y): (f32, f32),
    count: usize,
    speed: std::ops::Range<f32>,
    color: Rgb,
) {
    for _ in 0..count {
        particles.push(random_particle(rng, x, y, speed.clone(), color));
    }
}

fn explosion(particles: &mut Vec<Particle>, rng: &mut impl Rng, player: &Player) {
    for _ in 0..EXPLOSION_COUNT {
        let color = [255, rng.gen_range(180..=220), 40];
        particles.push(random_particle(rng, player.x, player.y, 3.0..7.0, color));
    }
}

// ── Per-frame tick (RNG is injected) ───────────────────────────────────────────

/// Advance the simulation by one frame. `controls` are the flags held this
/// frame; `actions` are the one-shot actions that arrived since the last one.
/// All randomness comes through `rng` so callers control determinism.
pub fn tick(
    world: &World,
    controls: &Controls,
    actions: &[Action],
    rng: &mut impl Rng,
) -> World {
    let mut w = world.clone();
    w.events.clear();
    w.frame += 1;

    // ── 0. Discrete actions ──────────────────────────────────────────────────
    let mut shoot_requested = controls.shoot;
    for action in actions {
        match action {
            Action::Start if w.state != GameState::Playing => {
                w = start_game(&w);
            }
            Action::DebugClear => w = debug_clear(&w, rng),
            Action::Shoot => shoot_requested = true,
            Action::Start => {}
        }
    }

    match w.state {
        GameState::Start => {
            advance_backdrop(&mut w, rng);
            w
        }
        GameState::Playing => {
            play_frame(&mut w, controls, shoot_requested, rng);
            w
        }
        // The loop is paused behind the ranking panel.
        GameState::GameOver => {
            w.frame = world.frame;
            w
        }
    }
}

fn advance_backdrop(w: &mut World, rng: &mut impl Rng) {
    for star in &mut w.stars {
        star.update(rng);
    }
    for p in &mut w.particles {
        p.update();
    }
    w.particles.retain(|p| !p.is_dead());
}

fn play_frame(w: &mut World, controls: &Controls, shoot_requested: bool, rng: &mut impl Rng) {
    for star in &mut w.stars {
        star.update(rng);
    }

    // ── 1. Electric items ────────────────────────────────────────────────────
    if rng.gen_bool(w.tuning.item_chance) {
        let x = rng.gen_range(ENEMY_RADIUS..CANVAS_WIDTH - ENEMY_RADIUS);
        w.electric_items.push(ElectricItem::new(x, ITEM_SPAWN_Y));
    }
    let mut pickups = Vec::new();
    for item in &mut w.electric_items {
        if item.update(&w.player) {
            pickups.push((item.x, item.y));
        }
    }
    for at in pickups {
        w.powerup_timer = POWERUP_DURATION;
        burst(&mut w.particles, rng, at, PICKUP_BURST_COUNT, 3.0..6.0, PICKUP_COLOR);
        w.events.push(GameEvent::PowerUpCollected);
    }
    w.electric_items.retain(|item| !item.to_remove);

    // ── 2. Particles ─────────────────────────────────────────────────────────
    for p in &mut w.particles {
        p.update();
    }
    w.particles.retain(|p| !p.is_dead());

    // ── 3. Movement & shooting ───────────────────────────────────────────────
    if controls.left {
        w.player.move_left();
    }
    if controls.right {
        w.player.move_right();
    }
    if shoot_requested {
        fire(w);
    }
    w.powerup_timer = w.powerup_timer.saturating_sub(1);

    // ── 4. Spawn (a new Bismuth moves on its first frame) ────────────────────
    w.spawn_timer = w.spawn_timer.saturating_sub(1);
    if w.spawn_timer == 0 {
        let base = enemy_base_speed(w.spawn_interval);
        let x = rng.gen_range(ENEMY_RADIUS..CANVAS_WIDTH - ENEMY_RADIUS);
        let vx = rng.gen_range(-1.0..1.0) * base;
        w.enemies.push(Enemy::bismuth(x, -ENEMY_RADIUS, vx, base));
        w.spawn_interval = w.spawn_interval.min(spawn_interval_for(w.score));
        w.spawn_timer = w.spawn_interval;
        tracing::trace!(x, interval = w.spawn_interval, "enemy spawned");
    }

    // ── 5. Enemies move (Nihonium ages) ──────────────────────────────────────
    let (player_x, frame) = (w.player.x, w.frame);
    for enemy in &mut w.enemies {
        enemy.update(player_x, frame);
    }

    // ── 6. Bullets ↔ Bismuth ─────────────────────────────────────────────────
    let mut sparks = Vec::new();
    for bullet in w.bullets.iter_mut().rev() {
        bullet.update();
        // Newest first: the most recently spawned overlapping Bismuth takes
        // the hit and the bullet is spent.
        if let Some(enemy) = w.enemies.iter_mut().rev().find(|e| {
            e.is_bismuth() && dist(bullet.x, bullet.y, e.x, e.y) < BULLET_RADIUS + ENEMY_RADIUS
        }) {
            enemy.transform();
            bullet.consumed = true;
            w.score += 1;
            sparks.push((bullet.x, bullet.y));
            w.events.push(GameEvent::EnemyTransmuted {
                x: enemy.x,
                y: enemy.y,
            });
        }
    }
    for at in sparks {
        burst(&mut w.particles, rng, at, SPARK_COUNT, 2.0..5.0, SPARK_COLOR);
    }
    w.bullets.retain(|b| !b.should_remove());

    // ── 7. Enemy bullets ↔ player ────────────────────────────────────────────
    let mut player_hit = false;
    for eb in &mut w.enemy_bullets {
        eb.update();
        if dist(eb.x, eb.y, w.player.x, w.player.y) < eb.r + PLAYER_RADIUS {
            player_hit = true;
        }
    }
    w.enemy_bullets.retain(|eb| !eb.is_off_screen());

    // ── 8. Enemy fire, removal and contact ───────────────────────────────────
    for enemy in w.enemies.iter().filter(|e| e.is_bismuth()) {
        if rng.gen_bool(w.tuning.enemy_fire_chance) {
            w.enemy_bullets.push(EnemyBullet::new(enemy.x, enemy.y, FRAC_PI_2));
        }
    }
    w.enemies.retain(|e| !e.should_remove());
    if w.enemies.iter().any(|e| {
        e.is_bismuth() && dist(e.x, e.y, w.player.x, w.player.y) < ENEMY_RADIUS + PLAYER_RADIUS
    }) {
        player_hit = true;
    }

    // ── 9. Timers & music ────────────────────────────────────────────────────
    w.shoot_cooldown = w.shoot_cooldown.saturating_sub(1);
    w.music_timer += 1;
    if w.music_timer >= MUSIC_PERIOD {
        w.music_timer = 0;
        let freq = NOTES[w.note_index];
        w.note_index = (w.note_index + 1) % NOTES.len();
        w.events.push(GameEvent::MusicNote { freq });
    }

    // ── 10. Game over ────────────────────────────────────────────────────────
    if player_hit {
        let player = w.player.clone();
        explosion(&mut w.particles, rng, &player);
        w.state = GameState::GameOver;
        w.final_score = Some(w.score);
        w.events.push(GameEvent::PlayerDestroyed {
            final_score: w.score,
        });
        tracing::info!(score = w.score, frame = w.frame, "player destroyed");
    }
}
