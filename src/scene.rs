/// Frame composition: turns a [`World`] into canvas calls, back to front.

use crate::constants::*;
use crate::entities::{GameState, World};
use crate::input::{Controls, TouchButton, TouchLayout};
use crate::ports::{fade, Canvas, Rgb};

const C_TEXT: [u8; 3] = [255, 255, 255];
const C_TITLE: [u8; 3] = [200, 200, 200];
const C_VERSION: [u8; 3] = [180, 180, 180];
const C_BUTTON: [u8; 3] = [80, 160, 255];
const C_BUTTON_PRESSED: [u8; 3] = [255, 80, 80];
const C_STRIP: [u8; 3] = [20, 30, 40];

pub const TITLE: &str = "Nh113: The Bismuth Strike";

// ── Periodic table backdrop ──────────────────────────────────────────────────

const TABLE_COLS: usize = 18;
const TABLE_TOP: f32 = 50.0;
const TABLE_ROW_HEIGHT: f32 = 35.0;
/// Cell fill alpha, out of 255.
const TABLE_OPACITY: f32 = 50.0 / 255.0;

/// The game's three elements get an outline.
pub const HIGHLIGHTED_ELEMENTS: [&str; 3] = ["Zn", "Bi", "Nh"];

const PERIODS: [[&str; TABLE_COLS]; 7] = [
    ["H", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "", "He"],
    ["Li", "Be", "", "", "", "", "", "", "", "", "", "", "B", "C", "N", "O", "F", "Ne"],
    ["Na", "Mg", "", "", "", "", "", "", "", "", "", "", "Al", "Si", "P", "S", "Cl", "Ar"],
    [
        "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
        "Se", "Br", "Kr",
    ],
    [
        "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn", "Sb",
        "Te", "I", "Xe",
    ],
    [
        "Cs", "Ba", "La", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi",
        "Po", "At", "Rn",
    ],
    [
        "Fr", "Ra", "Ac", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh", "Fl", "Mc",
        "Lv", "Ts", "Og",
    ],
];

const LANTHANIDES: [&str; TABLE_COLS] = [
    "", "", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "",
    "",
];

const ACTINIDES: [&str; TABLE_COLS] = [
    "", "", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", "Md", "No", "Lr", "",
    "",
];

/// Row tints for the main block, cycled by period.
const PASTELS: [Rgb; 6] = [
    [100, 150, 255],
    [150, 255, 150],
    [255, 150, 200],
    [255, 255, 180],
    [200, 150, 255],
    [255, 220, 150],
];

const C_SYMBOL: Rgb = [220, 220, 220];
const C_OUTLINE: Rgb = [255, 255, 255];
const C_LANTHANIDE: (Rgb, Rgb) = ([200, 200, 255], [120, 120, 255]);
const C_ACTINIDE: (Rgb, Rgb) = ([255, 200, 200], [255, 120, 120]);

/// Centre of the table cell at `(row, col)`; the f-block sits one row below
/// period 7.
pub fn table_cell_center(row: usize, col: usize) -> (f32, f32) {
    let spacing = CANVAS_WIDTH / TABLE_COLS as f32;
    (
        col as f32 * spacing + spacing / 2.0,
        row as f32 * TABLE_ROW_HEIGHT + TABLE_TOP,
    )
}

fn table_cell<C: Canvas + ?Sized>(
    canvas: &mut C,
    (row, col): (usize, usize),
    symbol: &str,
    fill: Rgb,
    ink: Rgb,
) {
    let (x, y) = table_cell_center(row, col);
    let w = CANVAS_WIDTH / TABLE_COLS as f32 - 4.0;
    let h = TABLE_ROW_HEIGHT - 4.0;
    if HIGHLIGHTED_ELEMENTS.iter().any(|h| *h == symbol) {
        canvas.rect(x, y, w, h, C_OUTLINE);
        canvas.rect(x, y, w - 2.4, h - 2.4, fade(fill, TABLE_OPACITY));
    } else {
        canvas.rect(x, y, w, h, fade(fill, TABLE_OPACITY));
    }
    canvas.text(x, y, symbol, ink);
}

/// Faint periodic table behind the playfield.
pub fn draw_periodic_table<C: Canvas + ?Sized>(canvas: &mut C) {
    for (row, period) in PERIODS.iter().enumerate() {
        let fill = PASTELS[row % PASTELS.len()];
        for (col, symbol) in period.iter().enumerate().filter(|(_, s)| !s.is_empty()) {
            table_cell(canvas, (row, col), symbol, fill, fade(C_SYMBOL, 0.5));
        }
    }
    let f_block = [(8, LANTHANIDES, C_LANTHANIDE), (9, ACTINIDES, C_ACTINIDE)];
    for (row, series, (fill, ink)) in f_block {
        for (col, symbol) in series.iter().enumerate().filter(|(_, s)| !s.is_empty()) {
            table_cell(canvas, (row, col), symbol, fill, fade(ink, 0.7));
        }
    }
}

/// Render one complete frame. `held` highlights pressed touch buttons.
pub fn draw<C: Canvas + ?Sized>(canvas: &mut C, world: &World, layout: &TouchLayout, held: &Controls) {
    draw_periodic_table(canvas);
    for star in &world.stars {
        star.show(canvas);
    }
    for item in &world.electric_items {
        item.show(canvas);
    }
    for p in &world.particles {
        p.show(canvas);
    }

    draw_hud(canvas, world);

    match world.state {
        GameState::Start => draw_start_screen(canvas),
        GameState::Playing => {
            world.player.show(canvas, world.frame, world.powered_up());
            for bullet in &world.bullets {
                bullet.show(canvas);
            }
            for eb in &world.enemy_bullets {
                eb.show(canvas);
            }
            for enemy in &world.enemies {
                enemy.show(canvas);
            }
        }
        // The ranking panel owns the screen.
        GameState::GameOver => {}
    }

    draw_touch_buttons(canvas, layout, held);
}

fn draw_hud<C: Canvas + ?Sized>(canvas: &mut C, world: &World) {
    let score = format!("SCORE: {}", world.score);
    canvas.text(10.0 + score.len() as f32 * 4.5, 18.0, &score, C_TEXT);
    if world.powered_up() {
        let left = format!("Power-up Time Left: {}s", world.powerup_seconds_left());
        canvas.text(10.0 + left.len() as f32 * 4.0, 42.0, &left, C_TEXT);
    }
}

fn draw_start_screen<C: Canvas + ?Sized>(canvas: &mut C) {
    let cx = CANVAS_WIDTH / 2.0;
    let cy = CANVAS_HEIGHT / 2.0;
    canvas.text(cx, cy - 50.0, TITLE, C_TITLE);
    canvas.text(cx, cy - 20.0, "Controls: ←/→ to move, Space to shoot", C_TITLE);
    canvas.text(
        cx,
        cy + 5.0,
        "Shoot Bismuth (Bi) with Zinc (Zn) bullets to create Nihonium (Nh)!",
        C_TITLE,
    );
    canvas.text(cx, cy + 50.0, "Press ENTER to Start", C_TITLE);
    canvas.text(cx, cy + 70.0, concat!("v", env!("CARGO_PKG_VERSION")), C_VERSION);
}

fn draw_touch_buttons<C: Canvas + ?Sized>(canvas: &mut C, layout: &TouchLayout, held: &Controls) {
    canvas.rect(
        CANVAS_WIDTH / 2.0,
        CANVAS_HEIGHT - BUTTON_AREA_HEIGHT / 2.0,
        CANVAS_WIDTH,
        BUTTON_AREA_HEIGHT,
        C_STRIP,
    );
    for button in &layout.buttons {
        draw_button(canvas, button, pressed(button, held));
    }
}

fn pressed(button: &TouchButton, held: &Controls) -> bool {
    use crate::input::Button;
    match button.button {
        Button::Left => held.left,
        Button::Right => held.right,
        Button::Shoot => held.shoot,
    }
}

fn draw_button<C: Canvas + ?Sized>(canvas: &mut C, button: &TouchButton, pressed: bool) {
    let fill = if pressed { C_BUTTON_PRESSED } else { C_BUTTON };
    canvas.rect(button.x, button.y, button.w, button.h, fill);
    if button.label == "SHOOT" {
        canvas.text(button.x, button.y - 10.0, "SHOOT", C_TEXT);
        canvas.text(button.x, button.y + 14.0, "(SPACE)", C_TEXT);
    } else {
        canvas.text(button.x, button.y, button.label, C_TEXT);
    }
}
