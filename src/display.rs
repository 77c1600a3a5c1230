/// Rendering layer: all terminal I/O lives here.
///
/// [`TermCanvas`] rasterises the logical 600×600 playfield into a grid of
/// terminal cells; the ranking panel is drawn as plain text lines. No game
/// logic is performed.

use std::io::Write;

use bismuth_strike::constants::{CANVAS_HEIGHT, CANVAS_WIDTH};
use bismuth_strike::ports::{Canvas, Rgb};
use bismuth_strike::ranking::{
    Focus, RankingPanel, RankingView, MSG_EMPTY, MSG_FETCH_ERROR, MSG_LOADING,
};
use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal, QueueableCommand,
};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BACKGROUND: Rgb = [0, 0, 0];
const C_TITLE: Color = Color::Red;
const C_SCORE: Color = Color::Yellow;
const C_PODIUM: Color = Color::White;
const C_ROW: Color = Color::Grey;
const C_ROW_SCORE: Color = Color::Rgb { r: 57, g: 243, b: 255 };
const C_ERROR: Color = Color::Rgb { r: 230, g: 57, b: 70 };
const C_FOCUS: Color = Color::Rgb { r: 57, g: 243, b: 255 };
const C_HINT: Color = Color::DarkGrey;

fn color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb[0],
        g: rgb[1],
        b: rgb[2],
    }
}

// ── Playfield surface ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
struct Cell {
    ch: char,
    fg: Rgb,
    bg: Rgb,
}

const BLANK: Cell = Cell {
    ch: ' ',
    fg: [255, 255, 255],
    bg: C_BACKGROUND,
};

/// The render surface for one run. Dropped on game over, rebuilt on restart.
pub struct TermCanvas {
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl TermCanvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            cols,
            rows,
            cells: vec![BLANK; cols as usize * rows as usize],
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    fn cell_w(&self) -> f32 {
        CANVAS_WIDTH / self.cols as f32
    }

    fn cell_h(&self) -> f32 {
        CANVAS_HEIGHT / self.rows as f32
    }

    fn cell_at(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if x < 0.0 || y < 0.0 || x >= CANVAS_WIDTH || y >= CANVAS_HEIGHT {
            return None;
        }
        Some(((x / self.cell_w()) as u16, (y / self.cell_h()) as u16))
    }

    /// Logical coordinates of a cell's centre, for mouse hit testing.
    pub fn to_logical(&self, col: u16, row: u16) -> (f32, f32) {
        (
            (col as f32 + 0.5) * self.cell_w(),
            (row as f32 + 0.5) * self.cell_h(),
        )
    }

    fn cell_mut(&mut self, col: u16, row: u16) -> Option<&mut Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        let i = row as usize * self.cols as usize + col as usize;
        self.cells.get_mut(i)
    }

    fn paint(&mut self, col: u16, row: u16, bg: Rgb) {
        if let Some(cell) = self.cell_mut(col, row) {
            cell.ch = ' ';
            cell.bg = bg;
        }
    }

    /// Paint every cell whose centre passes `inside`; shapes smaller than a
    /// cell still cover the cell they sit in.
    fn fill(
        &mut self,
        (x, y): (f32, f32),
        (half_w, half_h): (f32, f32),
        bg: Rgb,
        inside: impl Fn(f32, f32) -> bool,
    ) {
        let (cw, ch) = (self.cell_w(), self.cell_h());
        let c0 = ((x - half_w) / cw).floor().max(0.0) as u16;
        let c1 = ((x + half_w) / cw).ceil().min(self.cols as f32) as u16;
        let r0 = ((y - half_h) / ch).floor().max(0.0) as u16;
        let r1 = ((y + half_h) / ch).ceil().min(self.rows as f32) as u16;
        let mut painted = false;
        for row in r0..r1 {
            for col in c0..c1 {
                let (cx, cy) = self.to_logical(col, row);
                if inside(cx, cy) {
                    self.paint(col, row, bg);
                    painted = true;
                }
            }
        }
        if !painted {
            if let Some((col, row)) = self.cell_at(x, y) {
                self.paint(col, row, bg);
            }
        }
    }

    /// Queue the whole grid and flush.
    pub fn flush<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        out.queue(terminal::Clear(terminal::ClearType::All))?;
        let mut last: Option<(Rgb, Rgb)> = None;
        for row in 0..self.rows {
            for col in 0..self.cols {
                let cell = self.cells[row as usize * self.cols as usize + col as usize];
                if cell == BLANK {
                    continue;
                }
                if last != Some((cell.fg, cell.bg)) {
                    out.queue(style::SetForegroundColor(color(cell.fg)))?;
                    out.queue(style::SetBackgroundColor(color(cell.bg)))?;
                    last = Some((cell.fg, cell.bg));
                }
                out.queue(cursor::MoveTo(col, row))?;
                out.queue(Print(cell.ch))?;
            }
        }
        out.queue(style::ResetColor)?;
        out.queue(cursor::MoveTo(0, self.rows.saturating_sub(1)))?;
        out.flush()
    }
}

impl Canvas for TermCanvas {
    fn disc(&mut self, x: f32, y: f32, r: f32, color: Rgb) {
        self.fill((x, y), (r, r), color, |cx, cy| (cx - x).hypot(cy - y) <= r);
    }

    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        let (hw, hh) = (w / 2.0, h / 2.0);
        self.fill((x, y), (hw, hh), color, |cx, cy| {
            (cx - x).abs() <= hw && (cy - y).abs() <= hh
        });
    }

    fn text(&mut self, x: f32, y: f32, text: &str, color: Rgb) {
        let Some((col, row)) = self.cell_at(x.clamp(0.0, CANVAS_WIDTH - 1.0), y) else {
            return;
        };
        let len = text.chars().count() as u16;
        let start = col.saturating_sub(len / 2);
        for (i, ch) in text.chars().enumerate() {
            if let Some(cell) = self.cell_mut(start + i as u16, row) {
                cell.ch = ch;
                cell.fg = color;
            }
        }
    }

    fn trail(&mut self, points: &[(f32, f32)], color: Rgb) {
        for &(x, y) in points {
            if let Some((col, row)) = self.cell_at(x, y) {
                if let Some(cell) = self.cell_mut(col, row) {
                    cell.ch = '·';
                    cell.fg = color;
                }
            }
        }
    }
}

// ── Ranking panel ─────────────────────────────────────────────────────────────

fn centered<W: Write>(
    out: &mut W,
    cols: u16,
    row: u16,
    text: &str,
    fg: Color,
) -> std::io::Result<()> {
    let col = (cols / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(fg))?;
    out.queue(Print(text))?;
    Ok(())
}

fn button_label(label: &str, focused: bool) -> String {
    if focused {
        format!("▶ [ {label} ] ◀")
    } else {
        format!("  [ {label} ]  ")
    }
}

/// Draw the full-screen game-over ranking panel on a `cols` × `rows` screen.
pub fn render_ranking<W: Write>(
    out: &mut W,
    panel: &RankingPanel,
    (cols, rows): (u16, u16),
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let mut row = rows.saturating_sub(24) / 2;
    centered(out, cols, row, "╔════════════════════╗", C_TITLE)?;
    centered(out, cols, row + 1, "║     GAME  OVER     ║", C_TITLE)?;
    centered(out, cols, row + 2, "╚════════════════════╝", C_TITLE)?;
    row += 4;
    centered(out, cols, row, &format!("Score: {}", panel.final_score()), C_SCORE)?;
    row += 2;

    if panel.is_enabled() {
        let name_focused = panel.focus() == Focus::Name;
        let cursor_mark = if name_focused && !panel.is_submitting() { "_" } else { " " };
        let field = format!("Name: [{:<12}]", format!("{}{}", panel.name(), cursor_mark));
        let field_color = if name_focused { C_FOCUS } else { C_ROW };
        centered(out, cols, row, &field, field_color)?;
        row += 1;
        let submit = if panel.is_submitting() {
            "Submitting..."
        } else {
            "Enter: submit"
        };
        centered(out, cols, row, submit, C_HINT)?;
        row += 1;
        if let Some(status) = panel.status() {
            centered(out, cols, row, status, C_ERROR)?;
        }
        row += 2;

        match panel.view() {
            RankingView::Loading => centered(out, cols, row, MSG_LOADING, C_FOCUS)?,
            RankingView::Error => centered(out, cols, row, MSG_FETCH_ERROR, C_ERROR)?,
            RankingView::Empty => centered(out, cols, row, MSG_EMPTY, C_HINT)?,
            RankingView::Rows(entries) => {
                let start = (cols / 2).saturating_sub(15);
                for (i, entry) in entries.iter().enumerate() {
                    let left = format!("{} {}", entry.badge, entry.username);
                    let fg = if entry.podium { C_PODIUM } else { C_ROW };
                    out.queue(cursor::MoveTo(start, row + i as u16))?;
                    out.queue(style::SetForegroundColor(fg))?;
                    out.queue(Print(format!("{left:<20}")))?;
                    out.queue(style::SetForegroundColor(C_ROW_SCORE))?;
                    out.queue(Print(format!("{:>10}", entry.score)))?;
                }
                row += entries.len() as u16;
            }
        }
        row += 2;
    }

    let restart_focused = panel.focus() == Focus::Restart;
    let restart_color = if restart_focused { C_FOCUS } else { C_ROW };
    centered(out, cols, row, &button_label("Restart", restart_focused), restart_color)?;
    centered(
        out,
        cols,
        row + 2,
        "Tab: switch   Enter: select   Esc: quit",
        C_HINT,
    )?;

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, rows.saturating_sub(1)))?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bismuth_strike::leaderboard::ScoreEntry;

    #[test]
    fn small_disc_covers_its_own_cell() {
        let mut canvas = TermCanvas::new(60, 30);
        canvas.disc(305.0, 305.0, 2.0, [255, 0, 0]);
        let painted: Vec<_> = canvas.cells.iter().filter(|c| c.bg == [255, 0, 0]).collect();
        assert_eq!(painted.len(), 1);
    }

    #[test]
    fn text_is_centred_on_its_cell() {
        let mut canvas = TermCanvas::new(60, 30);
        canvas.text(300.0, 10.0, "Bi", [0, 0, 0]);
        let row: String = canvas.cells[..60].iter().map(|c| c.ch).collect();
        assert_eq!(row.find("Bi"), Some(29));
    }

    #[test]
    fn logical_round_trip_lands_in_same_cell() {
        let canvas = TermCanvas::new(80, 24);
        let (x, y) = canvas.to_logical(10, 20);
        assert_eq!(canvas.cell_at(x, y), Some((10, 20)));
    }

    #[test]
    fn off_surface_shapes_are_ignored() {
        let mut canvas = TermCanvas::new(10, 10);
        canvas.disc(-50.0, -50.0, 5.0, [1, 2, 3]);
        canvas.trail(&[(700.0, 10.0)], [1, 2, 3]);
        assert!(canvas.cells.iter().all(|c| *c == BLANK));
    }

    fn ranking_output(panel: &RankingPanel) -> String {
        let mut out = Vec::new();
        render_ranking(&mut out, panel, (80, 30)).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn ranking_scores_use_their_own_colour() {
        let mut panel = RankingPanel::new(12, 10);
        panel.open(40);
        panel.show_ranking(Ok(vec![
            ScoreEntry { username: "ada".to_string(), score: 1234 },
            ScoreEntry { username: "bo".to_string(), score: 7 },
        ]));
        let text = ranking_output(&panel);
        assert!(text.contains(&format!("\x1b[38;2;57;243;255m{:>10}", "1,234")));
        assert!(text.contains(&format!("\x1b[38;2;57;243;255m{:>10}", "7")));
        assert!(text.contains("🥇 ada"));
    }

    #[test]
    fn empty_ranking_shows_the_empty_message() {
        let mut panel = RankingPanel::new(12, 10);
        panel.open(0);
        panel.show_ranking(Ok(Vec::new()));
        let text = ranking_output(&panel);
        assert!(text.contains(MSG_EMPTY));
        assert!(!text.contains("🥇"));
    }
}
