use bismuth_strike::constants::*;
use bismuth_strike::entities::{GameEvent, GameState, World};
use bismuth_strike::input::*;
use bismuth_strike::ports::{cue_for, play_events, AudioSink, Canvas, Cue, Rgb};
use bismuth_strike::scene;

// ── Touch layout ──────────────────────────────────────────────────────────────

#[test]
fn default_layout_positions() {
    let layout = TouchLayout::default();
    let xs: Vec<f32> = layout.buttons.iter().map(|b| b.x).collect();
    assert_eq!(xs, vec![60.0, 300.0, 540.0]);
    assert!(layout.buttons.iter().all(|b| b.y == 560.0));
    assert!(layout.buttons.iter().all(|b| b.w == BUTTON_WIDTH && b.h == BUTTON_HEIGHT));
}

#[test]
fn hit_finds_each_button() {
    let layout = TouchLayout::default();
    assert_eq!(layout.hit(60.0, 560.0), Some(Button::Left));
    assert_eq!(layout.hit(300.0, 560.0), Some(Button::Right));
    assert_eq!(layout.hit(540.0, 560.0), Some(Button::Shoot));
    assert_eq!(layout.hit(180.0, 560.0), None);
    assert_eq!(layout.hit(60.0, 300.0), None);
}

#[test]
fn button_edges_are_outside() {
    let layout = TouchLayout::default();
    // Left button spans 20..100 by 530..590.
    assert_eq!(layout.hit(20.0, 560.0), None);
    assert_eq!(layout.hit(100.0, 560.0), None);
    assert_eq!(layout.hit(60.0, 530.0), None);
    assert_eq!(layout.hit(20.5, 530.5), Some(Button::Left));
}

#[test]
fn simultaneous_touches_combine() {
    let layout = TouchLayout::default();
    let c = layout.controls_for(&[(60.0, 560.0), (540.0, 560.0)]);
    assert_eq!(
        c,
        Controls {
            left: true,
            right: false,
            shoot: true
        }
    );
    assert_eq!(layout.controls_for(&[]), Controls::default());
}

// ── InputState ────────────────────────────────────────────────────────────────

#[test]
fn keys_and_touch_merge() {
    let mut input = InputState::default();
    input.keys.left = true;
    input.set_touch_points(&TouchLayout::default(), &[(540.0, 560.0)]);
    let held = input.held();
    assert!(held.left && held.shoot && !held.right);
}

#[test]
fn touch_shoot_is_one_shot() {
    let mut input = InputState::default();
    input.set_touch_points(&TouchLayout::default(), &[(540.0, 560.0)]);
    input.after_frame(&[GameEvent::MusicNote { freq: 261.6 }]);
    assert!(input.touch.shoot, "no shot yet, keep waiting");
    input.after_frame(&[GameEvent::Shot { bullets: 1 }]);
    assert!(!input.touch.shoot);
}

#[test]
fn held_key_shoot_survives_a_shot() {
    let mut input = InputState::default();
    input.keys.shoot = true;
    input.after_frame(&[GameEvent::Shot { bullets: 1 }]);
    assert!(input.held().shoot);
}

#[test]
fn release_clears_touch() {
    let mut input = InputState::default();
    input.set_touch_points(&TouchLayout::default(), &[(60.0, 560.0)]);
    input.release_touch();
    assert_eq!(input.touch, Controls::default());
}

// ── Audio cues ────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Recorder(Vec<Cue>);

impl AudioSink for Recorder {
    fn play(&mut self, cue: Cue) {
        self.0.push(cue);
    }
}

#[test]
fn events_map_to_cues() {
    assert_eq!(cue_for(&GameEvent::Shot { bullets: 3 }), Some(Cue::Shoot));
    assert_eq!(
        cue_for(&GameEvent::EnemyTransmuted { x: 1.0, y: 2.0 }),
        Some(Cue::Explosion)
    );
    assert_eq!(
        cue_for(&GameEvent::PlayerDestroyed { final_score: 1 }),
        Some(Cue::Explosion)
    );
    assert_eq!(cue_for(&GameEvent::Started), None);
    assert_eq!(cue_for(&GameEvent::PowerUpCollected), None);
}

#[test]
fn play_events_keeps_order() {
    let mut sink = Recorder::default();
    play_events(
        &[
            GameEvent::Shot { bullets: 1 },
            GameEvent::Cleared,
            GameEvent::MusicNote { freq: 392.0 },
        ],
        &mut sink,
    );
    assert_eq!(sink.0, vec![Cue::Shoot, Cue::Note(392.0)]);
}

// ── Scene ─────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Texts(Vec<String>);

impl Canvas for Texts {
    fn disc(&mut self, _x: f32, _y: f32, _r: f32, _color: Rgb) {}
    fn rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32, _color: Rgb) {}
    fn text(&mut self, _x: f32, _y: f32, text: &str, _color: Rgb) {
        self.0.push(text.to_string());
    }
    fn trail(&mut self, _points: &[(f32, f32)], _color: Rgb) {}
}

#[test]
fn start_screen_shows_title_and_prompt() {
    let mut canvas = Texts::default();
    scene::draw(&mut canvas, &World::empty(), &TouchLayout::default(), &Controls::default());
    assert!(canvas.0.iter().any(|t| t == scene::TITLE));
    assert!(canvas.0.iter().any(|t| t == "Press ENTER to Start"));
    assert!(canvas.0.iter().any(|t| t == "SCORE: 0"));
    assert!(canvas.0.iter().any(|t| t == "SHOOT"));
    // Only the backdrop's Zn cell; no ship yet.
    assert_eq!(canvas.0.iter().filter(|t| *t == "Zn").count(), 1);
}

#[test]
fn hud_shows_power_up_countdown() {
    let mut world = World::empty();
    world.state = GameState::Playing;
    world.score = 12;
    world.powerup_timer = 125;
    let mut canvas = Texts::default();
    scene::draw(&mut canvas, &world, &TouchLayout::default(), &Controls::default());
    assert!(canvas.0.iter().any(|t| t == "SCORE: 12"));
    assert!(canvas.0.iter().any(|t| t == "Power-up Time Left: 3s"));
    assert_eq!(canvas.0.iter().filter(|t| *t == "Zn").count(), 2);
}

/// Records rectangles and labels with their positions.
#[derive(Default)]
struct Shapes {
    rects: Vec<(f32, f32, Rgb)>,
    labels: Vec<(f32, f32, String)>,
}

impl Canvas for Shapes {
    fn disc(&mut self, _x: f32, _y: f32, _r: f32, _color: Rgb) {}
    fn rect(&mut self, x: f32, y: f32, _w: f32, _h: f32, color: Rgb) {
        self.rects.push((x, y, color));
    }
    fn text(&mut self, x: f32, y: f32, text: &str, _color: Rgb) {
        self.labels.push((x, y, text.to_string()));
    }
    fn trail(&mut self, _points: &[(f32, f32)], _color: Rgb) {}
}

impl Shapes {
    fn rects_at(&self, (x, y): (f32, f32)) -> Vec<Rgb> {
        self.rects
            .iter()
            .filter(|r| r.0 == x && r.1 == y)
            .map(|r| r.2)
            .collect()
    }

    fn label_at(&self, (x, y): (f32, f32)) -> Option<&str> {
        self.labels
            .iter()
            .find(|l| l.0 == x && l.1 == y)
            .map(|l| l.2.as_str())
    }
}

#[test]
fn periodic_table_outlines_the_game_elements() {
    let mut canvas = Shapes::default();
    scene::draw_periodic_table(&mut canvas);

    let zn = scene::table_cell_center(3, 11);
    let bi = scene::table_cell_center(5, 14);
    let nh = scene::table_cell_center(6, 12);
    for (cell, symbol) in [(zn, "Zn"), (bi, "Bi"), (nh, "Nh")] {
        assert_eq!(canvas.label_at(cell), Some(symbol));
        let rects = canvas.rects_at(cell);
        assert_eq!(rects.len(), 2, "{symbol} has an outline and a fill");
        assert_eq!(rects[0], [255, 255, 255]);
    }

    let fe = scene::table_cell_center(3, 7);
    assert_eq!(canvas.label_at(fe), Some("Fe"));
    assert_eq!(canvas.rects_at(fe).len(), 1);
}

#[test]
fn periodic_table_covers_every_element() {
    let mut canvas = Shapes::default();
    scene::draw_periodic_table(&mut canvas);
    assert_eq!(canvas.labels.len(), 118);
    assert_eq!(canvas.label_at(scene::table_cell_center(8, 2)), Some("Ce"));
    assert_eq!(canvas.label_at(scene::table_cell_center(9, 15)), Some("Lr"));
    // Gaps in the top periods stay empty.
    assert_eq!(canvas.label_at(scene::table_cell_center(0, 5)), None);
}

#[test]
fn periodic_table_is_drawn_first() {
    let mut canvas = Shapes::default();
    scene::draw(&mut canvas, &World::empty(), &TouchLayout::default(), &Controls::default());
    assert_eq!(canvas.labels.first().map(|l| l.2.as_str()), Some("H"));
}
