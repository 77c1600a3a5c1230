/// Game entities. Each one advances itself with `update`, draws itself onto a
/// [`Canvas`] with `show`, and knows its own removal predicate.

use std::collections::VecDeque;
use std::f32::consts::TAU;

use rand::Rng;

use crate::constants::*;
use crate::ports::{fade, Canvas, Rgb};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameState {
    Start,
    Playing,
    GameOver,
}

/// Side effects of one tick, consumed by the audio port and the front end.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    Started,
    Shot { bullets: usize },
    EnemyTransmuted { x: f32, y: f32 },
    PowerUpCollected,
    PlayerDestroyed { final_score: u32 },
    MusicNote { freq: f32 },
    Cleared,
}

pub fn dist(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    (ax - bx).hypot(ay - by)
}

// ── Player ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            x: CANVAS_WIDTH / 2.0,
            y: PLAYER_Y,
            speed: PLAYER_SPEED,
        }
    }
}

impl Player {
    pub fn move_left(&mut self) {
        self.x = (self.x - self.speed).max(PLAYER_RADIUS);
    }

    pub fn move_right(&mut self) {
        self.x = (self.x + self.speed).min(CANVAS_WIDTH - PLAYER_RADIUS);
    }

    /// `powered` adds the orbiting glow of the power-up window.
    pub fn show<C: Canvas + ?Sized>(&self, canvas: &mut C, frame: u64, powered: bool) {
        if powered {
            let t = frame as f32;
            for i in 0..8 {
                let a = TAU * i as f32 / 8.0 + t * 0.1;
                let glow = (120.0 + 80.0 * (t * 0.4 + i as f32).sin()) / 255.0;
                canvas.disc(
                    self.x + 22.0 * a.cos(),
                    self.y + 22.0 * a.sin(),
                    5.0,
                    fade([100, 255, 255], glow),
                );
            }
        }
        canvas.disc(self.x, self.y, 15.0, [100, 200, 255]);
        canvas.text(self.x, self.y, "Zn", [0, 0, 0]);
    }
}

// ── Projectiles ──────────────────────────────────────────────────────────────

/// A zinc bullet fired by the player. `angle` is measured from straight up.
#[derive(Clone, Debug)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub trail: VecDeque<(f32, f32)>,
    pub consumed: bool,
}

impl Bullet {
    pub fn new(x: f32, y: f32) -> Self {
        Self::angled(x, y, 0.0)
    }

    pub fn angled(x: f32, y: f32, angle: f32) -> Self {
        Self {
            x,
            y,
            angle,
            trail: VecDeque::with_capacity(BULLET_TRAIL_LEN + 1),
            consumed: false,
        }
    }

    pub fn update(&mut self) {
        self.trail.push_back((self.x, self.y));
        if self.trail.len() > BULLET_TRAIL_LEN {
            self.trail.pop_front();
        }
        self.x += self.angle.sin() * BULLET_SPEED;
        self.y -= self.angle.cos() * BULLET_SPEED;
    }

    pub fn is_off_screen(&self) -> bool {
        self.y < 0.0 || self.x < 0.0 || self.x > CANVAS_WIDTH
    }

    pub fn should_remove(&self) -> bool {
        self.consumed || self.is_off_screen()
    }

    pub fn show<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let points: Vec<(f32, f32)> = self.trail.iter().copied().collect();
        canvas.trail(&points, fade([100, 200, 255], 80.0 / 255.0));
        canvas.disc(self.x, self.y, BULLET_RADIUS, [180, 180, 255]);
    }
}

#[derive(Clone, Debug)]
pub struct EnemyBullet {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub r: f32,
}

impl EnemyBullet {
    /// `angle` follows screen convention: π/2 points straight down.
    pub fn new(x: f32, y: f32, angle: f32) -> Self {
        Self {
            x,
            y,
            vx: angle.cos() * ENEMY_BULLET_SPEED,
            vy: angle.sin() * ENEMY_BULLET_SPEED,
            r: ENEMY_BULLET_RADIUS,
        }
    }

    pub fn update(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
    }

    pub fn is_off_screen(&self) -> bool {
        let m = ENEMY_BULLET_MARGIN;
        self.x < -m || self.x > CANVAS_WIDTH + m || self.y < -m || self.y > CANVAS_HEIGHT + m
    }

    pub fn show<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        canvas.disc(self.x, self.y, self.r, fade([255, 80, 80], 220.0 / 255.0));
    }
}

// ── Particles & background ───────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub life: f32,
    pub color: Rgb,
}

impl Particle {
    pub fn new(x: f32, y: f32, angle: f32, speed: f32, life: f32, color: Rgb) -> Self {
        Self {
            x,
            y,
            vx: angle.cos() * speed,
            vy: angle.sin() * speed,
            life,
            color,
        }
    }

    pub fn update(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
        self.life -= 1.0;
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0
    }

    pub fn show<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        canvas.disc(self.x, self.y, 2.0, fade(self.color, self.life / PARTICLE_FULL_LIFE));
    }
}

#[derive(Clone, Debug)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub brightness: u8,
}

impl Star {
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            x: rng.gen_range(0.0..CANVAS_WIDTH),
            y: rng.gen_range(0.0..CANVAS_HEIGHT),
            size: rng.gen_range(1.0..3.0),
            brightness: rng.gen_range(150..=255),
        }
    }

    /// Drift down and wrap to the top at a fresh column.
    pub fn update(&mut self, rng: &mut impl Rng) {
        self.y += STAR_DRIFT;
        if self.y > CANVAS_HEIGHT {
            self.y = 0.0;
            self.x = rng.gen_range(0.0..CANVAS_WIDTH);
        }
    }

    pub fn show<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let b = self.brightness;
        canvas.disc(self.x, self.y, self.size / 2.0, [b, b, b]);
    }
}

// ── Power-up pickup ──────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct ElectricItem {
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub vy: f32,
    pub to_remove: bool,
}

impl ElectricItem {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            r: ITEM_RADIUS,
            vy: ITEM_FALL_SPEED,
            to_remove: false,
        }
    }

    /// Fall one step. Returns `true` on the frame the player collects it.
    pub fn update(&mut self, player: &Player) -> bool {
        self.y += self.vy;
        let mut collected = false;
        if !self.to_remove && dist(self.x, self.y, player.x, player.y) < self.r + PLAYER_RADIUS {
            self.to_remove = true;
            collected = true;
        }
        if self.y - self.r > CANVAS_HEIGHT {
            self.to_remove = true;
        }
        collected
    }

    pub fn show<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        for i in 0..6 {
            let r = (32.0 - i as f32 * 4.0) / 2.0;
            canvas.disc(self.x, self.y, r, fade([180, 255, 100], 70.0 / 255.0 * (i + 1) as f32));
        }
        canvas.text(self.x, self.y, "⚡", [255, 255, 100]);
    }
}

// ── Enemies ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    /// The active hazard.
    Bismuth,
    /// Post-hit remnant; removed when `lifetime` reaches zero.
    Nihonium { lifetime: u32 },
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub kind: EnemyKind,
}

impl Enemy {
    pub fn bismuth(x: f32, y: f32, vx: f32, vy: f32) -> Self {
        Self {
            x,
            y,
            vx,
            vy,
            kind: EnemyKind::Bismuth,
        }
    }

    pub fn is_bismuth(&self) -> bool {
        self.kind == EnemyKind::Bismuth
    }

    /// Bismuth drifts, bounces off the side walls and leans toward the
    /// player every `HOMING_PERIOD` frames. Nihonium only ages.
    pub fn update(&mut self, player_x: f32, frame: u64) {
        match &mut self.kind {
            EnemyKind::Bismuth => {
                self.x += self.vx;
                self.y += self.vy;
                if self.x < ENEMY_RADIUS || self.x > CANVAS_WIDTH - ENEMY_RADIUS {
                    self.vx = -self.vx;
                }
                if frame % HOMING_PERIOD == 0 {
                    let direction = if player_x > self.x { 1.0 } else { -1.0 };
                    self.vx = (self.vx + HOMING_NUDGE * direction).clamp(-ENEMY_MAX_VX, ENEMY_MAX_VX);
                }
            }
            EnemyKind::Nihonium { lifetime } => {
                *lifetime = lifetime.saturating_sub(1);
            }
        }
    }

    /// Bismuth → Nihonium. Returns `false` (and changes nothing) for an
    /// enemy that has already transformed.
    pub fn transform(&mut self) -> bool {
        if !self.is_bismuth() {
            return false;
        }
        self.kind = EnemyKind::Nihonium {
            lifetime: NIHONIUM_DURATION,
        };
        self.vx = 0.0;
        self.vy = 0.0;
        true
    }

    pub fn should_remove(&self) -> bool {
        match self.kind {
            EnemyKind::Bismuth => self.y - ENEMY_RADIUS > CANVAS_HEIGHT,
            EnemyKind::Nihonium { lifetime } => lifetime == 0,
        }
    }

    pub fn show<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        match self.kind {
            EnemyKind::Bismuth => {
                let side = ENEMY_RADIUS * 2.0;
                canvas.rect(self.x, self.y, side, side, [255, 0, 255]);
                canvas.rect(self.x, self.y, side * 0.75, side * 0.75, [0, 255, 255]);
                canvas.rect(self.x, self.y, side * 0.5, side * 0.5, [255, 255, 0]);
                canvas.text(self.x, self.y, "Bi", [0, 0, 0]);
            }
            EnemyKind::Nihonium { lifetime } => {
                let alpha = lifetime as f32 / NIHONIUM_DURATION as f32;
                canvas.disc(self.x, self.y, ENEMY_RADIUS, fade([100, 255, 100], alpha));
                canvas.text(self.x, self.y, "Nh", [0, 0, 0]);
            }
        }
    }
}

// ── Master simulation state ──────────────────────────────────────────────────

/// Per-run random-event odds. Tests zero these to keep runs quiet.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tuning {
    pub item_chance: f64,
    pub enemy_fire_chance: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            item_chance: ITEM_SPAWN_CHANCE,
            enemy_fire_chance: ENEMY_FIRE_CHANCE,
        }
    }
}

/// The whole simulation. Cloneable so `compute` can hand back a fresh value
/// each frame instead of mutating ambient state.
#[derive(Clone, Debug)]
pub struct World {
    pub state: GameState,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub enemies: Vec<Enemy>,
    pub particles: Vec<Particle>,
    pub electric_items: Vec<ElectricItem>,
    pub stars: Vec<Star>,
    pub score: u32,
    /// Set once, on the frame the player is destroyed.
    pub final_score: Option<u32>,
    pub frame: u64,
    pub shoot_cooldown: u32,
    pub spawn_interval: u32,
    pub spawn_timer: u32,
    pub powerup_timer: u32,
    pub music_timer: u32,
    pub note_index: usize,
    pub tuning: Tuning,
    /// Events produced by the most recent tick.
    pub events: Vec<GameEvent>,
}

impl World {
    /// A world sitting on the start screen, with no stars.
    pub fn empty() -> Self {
        Self {
            state: GameState::Start,
            player: Player::default(),
            bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            enemies: Vec::new(),
            particles: Vec::new(),
            electric_items: Vec::new(),
            stars: Vec::new(),
            score: 0,
            final_score: None,
            frame: 0,
            shoot_cooldown: 0,
            spawn_interval: INITIAL_SPAWN_INTERVAL,
            spawn_timer: INITIAL_SPAWN_INTERVAL,
            powerup_timer: 0,
            music_timer: 0,
            note_index: 0,
            tuning: Tuning::default(),
            events: Vec::new(),
        }
    }

    pub fn powered_up(&self) -> bool {
        self.powerup_timer > 0
    }

    /// Whole seconds left in the power-up window, rounded up.
    pub fn powerup_seconds_left(&self) -> u32 {
        self.powerup_timer.div_ceil(FRAMES_PER_SECOND)
    }
}
