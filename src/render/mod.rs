mod halfblock;

pub use halfblock::HalfBlockRenderer;

use std::io::Write;

/// One terminal frame: an RGBA pixel grid for the visual area plus status rows.
pub struct Frame<'a> {
    pub term_cols: u16,
    pub term_rows: u16,
    pub visual_rows: u16,
    pub pixel_width: usize,
    pub pixel_height: usize,
    pub pixels_rgba: &'a [u8],
    pub hud: &'a str,
    pub hud_rows: u16,
    pub sync_updates: bool,
}

pub trait Renderer {
    /// Terminal pixels per cell, (horizontal, vertical).
    fn cell_pixels(&self) -> (usize, usize);
    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()>;
}

pub(crate) fn write_hud(out: &mut dyn Write, frame: &Frame<'_>) -> anyhow::Result<()> {
    let cols = frame.term_cols as usize;
    let mut lines = frame.hud.lines();
    for i in 0..(frame.hud_rows as usize) {
        write!(
            out,
            "\x1b[{};1H\x1b[0m\x1b[2K",
            frame.visual_rows as usize + i + 1
        )?;
        if let Some(line) = lines.next() {
            let line: String = line.chars().take(cols).collect();
            write!(out, "{line}")?;
        }
    }
    Ok(())
}
