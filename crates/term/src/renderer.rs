//! TerminalRenderer: flushes a framebuffer to a real terminal.
//!
//! The first frame (and any frame after a resize or [`TerminalRenderer::invalidate`])
//! is a full redraw. Later frames only emit the runs of cells that changed.

use std::io::{self, Write};
use std::mem;

use anyhow::{Context, Result};

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{Cell, CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer<W: Write = io::Stdout> {
    out: W,
    /// Last frame written to the terminal
    front: FrameBuffer,
    /// Whether `front` matches what the terminal shows
    synced: bool,
    buf: Vec<u8>,
}

impl TerminalRenderer<io::Stdout> {
    pub fn new() -> Self {
        Self::with_writer(io::stdout())
    }
}

impl Default for TerminalRenderer<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn with_writer(out: W) -> Self {
        Self {
            out,
            front: FrameBuffer::new(0, 0),
            synced: false,
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    /// Raw mode, alternate screen, hidden cursor.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        self.synced = false;
        Ok(())
    }

    /// Undo [`TerminalRenderer::enter`]. Raw mode is disabled even if writing fails.
    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        let flushed = self.flush_buf();
        terminal::disable_raw_mode().context("failed to disable raw mode")?;
        flushed
    }

    /// Force the next draw to be a full redraw, e.g. after a resize event.
    pub fn invalidate(&mut self) {
        self.synced = false;
    }

    /// Draw `fb`, then swap it with the previous frame.
    ///
    /// Callers keep one framebuffer and pass it in every frame; after the call
    /// it holds stale contents that the next render overwrites.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        self.buf.clear();
        let same_size = self.front.width() == fb.width() && self.front.height() == fb.height();
        if self.synced && same_size {
            encode_diff_into(&self.front, fb, &mut self.buf)?;
        } else {
            encode_full_into(fb, &mut self.buf)?;
        }
        self.flush_buf()?;

        mem::swap(&mut self.front, fb);
        self.synced = true;
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.out
            .write_all(&self.buf)
            .and_then(|()| self.out.flush())
            .context("failed to write to terminal")
    }

    #[cfg(test)]
    fn into_writer(self) -> W {
        self.out
    }
}

/// Encode a full-frame redraw into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let mut pen = None;
    for y in 0..fb.height() {
        out.queue(cursor::MoveTo(0, y))?;
        for cell in fb.row(y) {
            print_cell(out, *cell, &mut pen)?;
        }
    }

    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

/// Encode only the changed runs of `next` relative to `prev` (same size) into `out`.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut pen = None;
    for y in 0..next.height() {
        let row = next.row(y);
        for (start, end) in changed_runs(prev.row(y), row) {
            out.queue(cursor::MoveTo(start as u16, y))?;
            for cell in &row[start..end] {
                print_cell(out, *cell, &mut pen)?;
            }
        }
    }

    if pen.is_some() {
        out.queue(ResetColor)?;
        out.queue(SetAttribute(Attribute::Reset))?;
    }
    Ok(())
}

/// Print one cell, switching style only when it differs from the pen.
fn print_cell(out: &mut Vec<u8>, cell: Cell, pen: &mut Option<CellStyle>) -> Result<()> {
    if *pen != Some(cell.style) {
        out.queue(SetAttribute(Attribute::Reset))?;
        out.queue(SetForegroundColor(to_color(cell.style.fg)))?;
        out.queue(SetBackgroundColor(to_color(cell.style.bg)))?;
        if cell.style.bold {
            out.queue(SetAttribute(Attribute::Bold))?;
        }
        *pen = Some(cell.style);
    }
    out.queue(Print(cell.ch))?;
    Ok(())
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Half-open column ranges where `prev` and `next` differ.
fn changed_runs<'a>(prev: &'a [Cell], next: &'a [Cell]) -> impl Iterator<Item = (usize, usize)> + 'a {
    let len = next.len();
    let differs = move |x: usize| prev.get(x) != next.get(x);

    let mut x = 0;
    std::iter::from_fn(move || {
        while x < len && !differs(x) {
            x += 1;
        }
        if x >= len {
            return None;
        }
        let start = x;
        while x < len && differs(x) {
            x += 1;
        }
        Some((start, x))
    })
}
