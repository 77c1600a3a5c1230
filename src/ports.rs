/// Capability interfaces the simulation draws and plays sounds through.
///
/// Nothing in here knows about a terminal; the binary supplies concrete
/// implementations, tests supply recording ones.

use crate::entities::GameEvent;

pub type Rgb = [u8; 3];

/// Scale a colour toward black by `alpha` in `[0, 1]`.
pub fn fade(color: Rgb, alpha: f32) -> Rgb {
    let a = alpha.clamp(0.0, 1.0);
    [
        (color[0] as f32 * a) as u8,
        (color[1] as f32 * a) as u8,
        (color[2] as f32 * a) as u8,
    ]
}

/// Drawing primitives in logical playfield coordinates. Shapes are centred
/// on `(x, y)`.
pub trait Canvas {
    fn disc(&mut self, x: f32, y: f32, r: f32, color: Rgb);
    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb);
    fn text(&mut self, x: f32, y: f32, text: &str, color: Rgb);
    fn trail(&mut self, points: &[(f32, f32)], color: Rgb);
}

// ── Audio ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Cue {
    Shoot,
    Explosion,
    Note(f32),
}

/// Fire-and-forget sound output.
pub trait AudioSink {
    fn play(&mut self, cue: Cue);
}

/// Discards every cue. Used headless.
pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, _cue: Cue) {}
}

pub fn cue_for(event: &GameEvent) -> Option<Cue> {
    match event {
        GameEvent::Shot { .. } => Some(Cue::Shoot),
        GameEvent::EnemyTransmuted { .. } | GameEvent::PlayerDestroyed { .. } => {
            Some(Cue::Explosion)
        }
        GameEvent::MusicNote { freq } => Some(Cue::Note(*freq)),
        GameEvent::Started | GameEvent::PowerUpCollected | GameEvent::Cleared => None,
    }
}

/// Forward the cues for one frame's events to `sink`, in order.
pub fn play_events<A: AudioSink + ?Sized>(events: &[GameEvent], sink: &mut A) {
    for cue in events.iter().filter_map(cue_for) {
        sink.play(cue);
    }
}
