/// Tuning numbers for the simulation. All distances are logical pixels on
/// the 600×600 playfield, all durations are frames (≈60 per second).

// ── Playfield ────────────────────────────────────────────────────────────────

pub const CANVAS_WIDTH: f32 = 600.0;
pub const CANVAS_HEIGHT: f32 = 600.0;

/// Height of the bottom strip that hosts the touch buttons.
pub const BUTTON_AREA_HEIGHT: f32 = 80.0;
pub const BUTTON_WIDTH: f32 = 80.0;
pub const BUTTON_HEIGHT: f32 = 60.0;
pub const BUTTON_MARGIN: f32 = 20.0;

pub const FRAMES_PER_SECOND: u32 = 60;

// ── Player ───────────────────────────────────────────────────────────────────

pub const PLAYER_RADIUS: f32 = 20.0;
pub const PLAYER_SPEED: f32 = 5.0;
pub const PLAYER_Y: f32 = CANVAS_HEIGHT - BUTTON_AREA_HEIGHT - 40.0;
pub const SHOOT_COOLDOWN: u32 = 10;

// ── Bullets ──────────────────────────────────────────────────────────────────

pub const BULLET_RADIUS: f32 = 5.0;
pub const BULLET_SPEED: f32 = 7.0;
pub const BULLET_TRAIL_LEN: usize = 8;
/// Side-bullet angle (radians from vertical) during the power-up window.
pub const SPREAD_ANGLE: f32 = 0.25;

pub const ENEMY_BULLET_RADIUS: f32 = 5.0;
pub const ENEMY_BULLET_SPEED: f32 = 4.2;
/// Enemy bullets live until they are this far outside the playfield.
pub const ENEMY_BULLET_MARGIN: f32 = 30.0;

// ── Enemies ──────────────────────────────────────────────────────────────────

pub const ENEMY_RADIUS: f32 = 20.0;
pub const NIHONIUM_DURATION: u32 = 60;
pub const HOMING_PERIOD: u64 = 60;
pub const HOMING_NUDGE: f32 = 0.2;
pub const ENEMY_MAX_VX: f32 = 3.0;
pub const ENEMY_BASE_SPEED: f32 = 2.0;
pub const ENEMY_SPEED_GAIN: f32 = 0.01;
pub const ENEMY_FIRE_CHANCE: f64 = 0.004;

pub const INITIAL_SPAWN_INTERVAL: u32 = 120;
pub const MIN_SPAWN_INTERVAL: u32 = 28;
/// The spawn interval shrinks by `SPAWN_STEP` every `SPAWN_STEP_SCORE` points.
pub const SPAWN_STEP: u32 = 3;
pub const SPAWN_STEP_SCORE: u32 = 5;

// ── Electric items ───────────────────────────────────────────────────────────

pub const ITEM_RADIUS: f32 = 16.0;
pub const ITEM_FALL_SPEED: f32 = 2.2;
pub const ITEM_SPAWN_Y: f32 = -20.0;
pub const ITEM_SPAWN_CHANCE: f64 = 0.0011;
pub const POWERUP_DURATION: u32 = 600;

// ── Particles & background ───────────────────────────────────────────────────

pub const PARTICLE_BASE_LIFE: f32 = 20.0;
pub const PARTICLE_LIFE_JITTER: f32 = 10.0;
/// Life value that maps to a fully opaque particle.
pub const PARTICLE_FULL_LIFE: f32 = 30.0;

pub const SPARK_COUNT: usize = 14;
pub const PICKUP_BURST_COUNT: usize = 18;
pub const EXPLOSION_COUNT: usize = 36;
pub const CLEAR_BURST_COUNT: usize = 50;

pub const SPARK_COLOR: [u8; 3] = [100, 200, 255];
pub const PICKUP_COLOR: [u8; 3] = [255, 255, 100];
pub const CLEAR_COLOR: [u8; 3] = [255, 100, 50];

pub const STAR_COUNT: usize = 100;
pub const STAR_DRIFT: f32 = 0.5;

// ── Music ────────────────────────────────────────────────────────────────────

pub const MUSIC_PERIOD: u32 = 30;
/// Background melody (Hz).
pub const NOTES: [f32; 6] = [261.6, 329.6, 392.0, 523.3, 392.0, 329.6];

// ── Leaderboard ──────────────────────────────────────────────────────────────

pub const DEFAULT_MAX_NAME_LEN: usize = 12;
pub const DEFAULT_RANKING_LIMIT: usize = 10;
