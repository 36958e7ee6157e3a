use crate::color::Rgb;
use crate::error::{Error, Result};
use crate::platform::Surface;
use crate::render::{Frame, HalfBlockRenderer, Renderer};
use std::io::{BufWriter, Stdout, Write};

/// Off-screen RGBA canvas of a fixed logical size.
pub struct PixelSurface {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
    presented: u64,
}

impl PixelSurface {
    pub fn new(width: u32, height: u32) -> Self {
        let mut rgba = vec![0u8; width as usize * height as usize * 4];
        for px in rgba.chunks_exact_mut(4) {
            px[3] = 255;
        }
        Self {
            width,
            height,
            rgba,
            presented: 0,
        }
    }

    pub fn pixels_rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some(Rgb::new(self.rgba[i], self.rgba[i + 1], self.rgba[i + 2]))
    }

    pub fn frames_presented(&self) -> u64 {
        self.presented
    }

    fn put(&mut self, x: usize, y: usize, c: Rgb) {
        let i = (y * self.width as usize + x) * 4;
        self.rgba[i] = c.r;
        self.rgba[i + 1] = c.g;
        self.rgba[i + 2] = c.b;
        self.rgba[i + 3] = 255;
    }
}

impl Surface for PixelSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self, color: Rgb) {
        for px in self.rgba.chunks_exact_mut(4) {
            px[0] = color.r;
            px[1] = color.g;
            px[2] = color.b;
            px[3] = 255;
        }
    }

    /// Fills every pixel with `dx*dx + dy*dy <= r*r`, clipped to the canvas.
    fn fill_circle(&mut self, x: i32, y: i32, radius: i32, color: Rgb) {
        if radius <= 0 {
            return;
        }
        let (w, h) = (self.width as i64, self.height as i64);
        let (cx, cy, r) = (x as i64, y as i64, radius as i64);
        let y0 = (cy - r).max(0);
        let y1 = (cy + r).min(h - 1);
        for py in y0..=y1 {
            let dy = py - cy;
            let rem = r * r - dy * dy;
            // Widest dx with dx*dx <= rem.
            let mut half = (rem as f64).sqrt() as i64;
            while half * half > rem {
                half -= 1;
            }
            while (half + 1) * (half + 1) <= rem {
                half += 1;
            }
            let x0 = (cx - half).max(0);
            let x1 = (cx + half).min(w - 1);
            for px in x0..=x1 {
                self.put(px as usize, py as usize, color);
            }
        }
    }

    fn present(&mut self) -> Result<()> {
        self.presented += 1;
        Ok(())
    }
}

/// Shrinks an RGBA image by taking the per-channel maximum of each source box,
/// so features smaller than a destination pixel stay visible.
pub fn downscale_max(src: &[u8], sw: usize, sh: usize, dst: &mut [u8], dw: usize, dh: usize) {
    if sw == 0 || sh == 0 || dw == 0 || dh == 0 {
        return;
    }
    for dy in 0..dh {
        let y0 = dy * sh / dh;
        let y1 = ((dy + 1) * sh / dh).max(y0 + 1).min(sh);
        for dx in 0..dw {
            let x0 = dx * sw / dw;
            let x1 = ((dx + 1) * sw / dw).max(x0 + 1).min(sw);
            let mut acc = [0u8; 3];
            for sy in y0..y1 {
                let row = sy * sw;
                for sx in x0..x1 {
                    let i = (row + sx) * 4;
                    acc[0] = acc[0].max(src[i]);
                    acc[1] = acc[1].max(src[i + 1]);
                    acc[2] = acc[2].max(src[i + 2]);
                }
            }
            let o = (dy * dw + dx) * 4;
            dst[o..o + 3].copy_from_slice(&acc);
            dst[o + 3] = 255;
        }
    }
}

/// The drawable "window": a logical canvas presented to the terminal with the
/// half-block renderer, scaled to whatever grid the terminal currently has.
pub struct TerminalSurface {
    canvas: PixelSurface,
    title: String,
    status: String,
    show_hud: bool,
    sync_updates: bool,
    renderer: HalfBlockRenderer,
    scaled: Vec<u8>,
    out: BufWriter<Stdout>,
}

impl TerminalSurface {
    pub fn new(width: u32, height: u32, title: &str, show_hud: bool, sync_updates: bool) -> Self {
        Self {
            canvas: PixelSurface::new(width, height),
            title: title.to_string(),
            status: String::new(),
            show_hud,
            sync_updates,
            renderer: HalfBlockRenderer::new(),
            scaled: Vec::new(),
            out: BufWriter::new(crate::terminal::TerminalGuard::stdout()),
        }
    }

    /// Text shown after the title on the status row.
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    fn hud_line(&self) -> String {
        if self.status.is_empty() {
            format!("{} | q/esc quit", self.title)
        } else {
            format!("{} | {} | q/esc quit", self.title, self.status)
        }
    }
}

impl Surface for TerminalSurface {
    fn width(&self) -> u32 {
        self.canvas.width()
    }

    fn height(&self) -> u32 {
        self.canvas.height()
    }

    fn clear(&mut self, color: Rgb) {
        self.canvas.clear(color);
    }

    fn fill_circle(&mut self, x: i32, y: i32, radius: i32, color: Rgb) {
        self.canvas.fill_circle(x, y, radius, color);
    }

    fn present(&mut self) -> Result<()> {
        let (term_cols, term_rows) =
            crossterm::terminal::size().map_err(|e| Error::platform("get terminal size", e))?;
        let hud_rows: u16 = if self.show_hud && term_rows > 2 { 1 } else { 0 };
        let visual_rows = term_rows.saturating_sub(hud_rows).max(1);

        let (mx, my) = self.renderer.cell_pixels();
        let pw = term_cols as usize * mx;
        let ph = visual_rows as usize * my;
        self.scaled.resize(pw * ph * 4, 0);
        downscale_max(
            self.canvas.pixels_rgba(),
            self.canvas.width() as usize,
            self.canvas.height() as usize,
            &mut self.scaled,
            pw,
            ph,
        );

        let hud = if hud_rows > 0 { self.hud_line() } else { String::new() };
        let frame = Frame {
            term_cols,
            term_rows,
            visual_rows,
            pixel_width: pw,
            pixel_height: ph,
            pixels_rgba: &self.scaled,
            hud: &hud,
            hud_rows,
            sync_updates: self.sync_updates,
        };
        self.renderer
            .render(&frame, &mut self.out)
            .map_err(|e| Error::platform("present frame", e))?;
        self.canvas.present()
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        let _ = self.out.flush();
    }
}
