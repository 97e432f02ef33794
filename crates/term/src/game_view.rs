//! GameView: maps a `GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! | State | Screen |
//! |-------|--------|
//! | Scores, Quit | ranked score list |
//! | Play | board with status line |
//! | GameOver | board with a "GAME OVER" banner |
//! | InputName | name-entry prompt |

use crate::core::{GameConfig, GameSnapshot, Score};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Direction, GameState, Position, MAX_NAME_LEN};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Colors used by the view. Snake and fruit colors come from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub fruit: Rgb,
    pub snake_head: Rgb,
    pub snake_body: Rgb,
    pub tile_light: Rgb,
    pub tile_dark: Rgb,
    pub frame: Rgb,
    pub text: Rgb,
    pub screen: Rgb,
    pub warning: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

impl Palette {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            fruit: config.fruit_color,
            snake_head: config.snake_head_color,
            snake_body: config.snake_body_color,
            tile_light: Rgb::new(44, 48, 58),
            tile_dark: Rgb::new(34, 37, 46),
            frame: Rgb::new(200, 200, 200),
            text: Rgb::new(220, 220, 220),
            screen: Rgb::new(0, 0, 0),
            warning: Rgb::new(240, 120, 60),
        }
    }

    fn text_style(&self) -> CellStyle {
        CellStyle::new(self.text, self.screen)
    }

    fn frame_style(&self) -> CellStyle {
        CellStyle::new(self.frame, self.screen)
    }
}

/// A lightweight terminal renderer for the Snake game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameView {
    /// Tile width in terminal columns.
    tile_w: u16,
    /// Tile height in terminal rows.
    tile_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 roughly squares up the usual terminal glyph.
        Self::new(2, 1)
    }
}

/// Width of the score and name-entry panels
const PANEL_W: u16 = 28;

impl GameView {
    pub fn new(tile_w: u16, tile_h: u16) -> Self {
        Self {
            tile_w: tile_w.max(1),
            tile_h: tile_h.max(1),
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.tile_size, 1)
    }

    /// Terminal columns and rows the board screen needs, frame and status line included.
    pub fn board_extent(&self, nb_lines: u16, nb_cols: u16) -> (u16, u16) {
        let w = nb_cols.saturating_mul(self.tile_w).saturating_add(2);
        let h = nb_lines.saturating_mul(self.tile_h).saturating_add(3);
        (w, h)
    }

    /// Render the snapshot into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames; it is only resized when
    /// the viewport changes.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        palette: &Palette,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(palette.text_style().cell(' '));

        match snap.state {
            GameState::Play => {
                self.draw_board(fb, snap, palette, viewport);
            }
            GameState::GameOver => {
                let (x, y, w, h) = self.draw_board(fb, snap, palette, viewport);
                let banner = CellStyle::new(Rgb::new(255, 255, 255), palette.screen).bold();
                let mid_y = y.saturating_add(h / 2);
                fb.fill_rect(x + 1, mid_y, w.saturating_sub(2), 1, ' ', banner);
                fb.put_str_centered(x, mid_y, w, "GAME OVER", banner);
            }
            GameState::InputName => self.draw_name_entry(fb, snap, palette, viewport),
            GameState::Scores | GameState::Quit => self.draw_scores(fb, snap, palette, viewport),
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, palette: &Palette, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, palette, viewport, &mut fb);
        fb
    }

    /// Draws the framed board and returns the frame rectangle.
    fn draw_board(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        palette: &Palette,
        viewport: Viewport,
    ) -> (u16, u16, u16, u16) {
        let (frame_w, total_h) = self.board_extent(snap.nb_lines, snap.nb_cols);
        let frame_h = total_h - 1;
        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = viewport.height.saturating_sub(total_h) / 2;

        fb.draw_box(start_x, start_y, frame_w, frame_h, palette.frame_style());

        for row in 0..snap.nb_lines {
            for col in 0..snap.nb_cols {
                let bg = if (row + col) % 2 == 0 {
                    palette.tile_light
                } else {
                    palette.tile_dark
                };
                self.fill_tile(fb, start_x, start_y, row, col, ' ', CellStyle::new(bg, bg));
            }
        }

        if let Some(fruit) = snap.fruit {
            let bg = self.tile_bg(palette, fruit);
            self.fill_position(fb, start_x, start_y, fruit, '●', CellStyle::new(palette.fruit, bg));
        }

        let body = CellStyle::new(palette.snake_body, palette.snake_body);
        for &seg in snap.snake.iter().skip(1) {
            self.fill_position(fb, start_x, start_y, seg, '█', body);
        }
        if let Some(head) = snap.head() {
            let style = CellStyle::new(palette.screen, palette.snake_head).bold();
            self.fill_position(fb, start_x, start_y, head, head_glyph(snap.heading), style);
        }

        let status_y = start_y.saturating_add(frame_h);
        let text = palette.text_style();
        let x = fb.put_str(start_x, status_y, "Score ", text.bold());
        fb.put_u32(x, status_y, snap.points, text);

        (start_x, start_y, frame_w, frame_h)
    }

    fn draw_scores(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        palette: &Palette,
        viewport: Viewport,
    ) {
        let rows = snap.scores.len().max(1) as u16;
        let h = rows + 6;
        let (x, y) = panel_origin(viewport, h);
        let text = palette.text_style();

        fb.draw_box(x, y, PANEL_W, h, palette.frame_style());
        fb.put_str_centered(x, y + 1, PANEL_W, "HIGH SCORES", text.bold());

        if snap.scores.is_empty() {
            fb.put_str_centered(x, y + 3, PANEL_W, "no scores yet", text);
        }
        for (i, score) in snap.scores.iter().enumerate() {
            self.draw_score_line(fb, x, y + 3 + i as u16, i as u32 + 1, score, text);
        }

        fb.put_str_centered(x, y + h - 2, PANEL_W, "SPACE play  Q quit", text);

        if snap.save_failed {
            let warn = CellStyle::new(palette.warning, palette.screen);
            fb.put_str_centered(x, y + h, PANEL_W, "scores could not be saved", warn);
        }
    }

    fn draw_score_line(
        &self,
        fb: &mut FrameBuffer,
        x: u16,
        y: u16,
        rank: u32,
        score: &Score,
        style: CellStyle,
    ) {
        let rank_x = x + 3 - digit_count(rank).min(2);
        let after = fb.put_u32(rank_x, y, rank, style);
        fb.put_char(after, y, '.', style);
        fb.put_str(x + 5, y, score.name(), style);

        let right = x + PANEL_W - 3;
        fb.put_u32(right - digit_count(score.score()), y, score.score(), style);
    }

    fn draw_name_entry(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        palette: &Palette,
        viewport: Viewport,
    ) {
        let h = 9;
        let (x, y) = panel_origin(viewport, h);
        let text = palette.text_style();
        let entry = snap.name_entry.unwrap_or_else(|| Score::new("", snap.points));

        fb.draw_box(x, y, PANEL_W, h, palette.frame_style());
        fb.put_str_centered(x, y + 1, PANEL_W, "NEW HIGH SCORE", text.bold());

        let after = fb.put_str(x + 3, y + 3, "Score ", text);
        fb.put_u32(after, y + 3, entry.score(), text.bold());

        let after = fb.put_str(x + 3, y + 5, "Name  ", text);
        let end = fb.put_str(after, y + 5, entry.name(), text.bold());
        if entry.name().chars().count() < MAX_NAME_LEN {
            fb.put_char(end, y + 5, '_', text);
        }

        fb.put_str_centered(x, y + h - 2, PANEL_W, "ENTER confirm", text);
    }

    fn tile_bg(&self, palette: &Palette, pos: Position) -> Rgb {
        if (pos.row + pos.col) % 2 == 0 {
            palette.tile_light
        } else {
            palette.tile_dark
        }
    }

    fn fill_position(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        pos: Position,
        ch: char,
        style: CellStyle,
    ) {
        if pos.row < 0 || pos.col < 0 {
            return;
        }
        self.fill_tile(fb, start_x, start_y, pos.row as u16, pos.col as u16, ch, style);
    }

    #[allow(clippy::too_many_arguments)]
    fn fill_tile(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        row: u16,
        col: u16,
        ch: char,
        style: CellStyle,
    ) {
        let px = start_x
            .saturating_add(1)
            .saturating_add(col.saturating_mul(self.tile_w));
        let py = start_y
            .saturating_add(1)
            .saturating_add(row.saturating_mul(self.tile_h));
        fb.fill_rect(px, py, self.tile_w, self.tile_h, ch, style);
    }
}

fn panel_origin(viewport: Viewport, h: u16) -> (u16, u16) {
    (
        viewport.width.saturating_sub(PANEL_W) / 2,
        viewport.height.saturating_sub(h) / 2,
    )
}

fn head_glyph(heading: Direction) -> char {
    match heading {
        Direction::Up => '▲',
        Direction::Down => '▼',
        Direction::Left => '◀',
        Direction::Right => '▶',
    }
}

fn digit_count(mut n: u32) -> u16 {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}
