use std::io::Write;

use bismuth_strike::ports::{AudioSink, Cue};

/// Rings the terminal bell on explosions. Shots and music are too frequent
/// for a bell and are dropped.
pub struct TerminalBell;

impl AudioSink for TerminalBell {
    fn play(&mut self, cue: Cue) {
        if cue != Cue::Explosion {
            return;
        }
        let mut out = std::io::stdout();
        // Fire and forget.
        let _ = out.write_all(b"\x07").and_then(|_| out.flush());
    }
}
