use sonic_spectrum::color::Rgb;
use sonic_spectrum::platform::Surface;
use sonic_spectrum::render::{Frame, HalfBlockRenderer, Renderer};
use sonic_spectrum::surface::{downscale_max, PixelSurface};

/// Build a solid-color RGBA pixel buffer.
fn solid_pixels(w: usize, h: usize, r: u8, g: u8, b: u8) -> Vec<u8> {
    let mut buf = vec![0u8; w * h * 4];
    for px in buf.chunks_exact_mut(4) {
        px[0] = r;
        px[1] = g;
        px[2] = b;
        px[3] = 255;
    }
    buf
}

fn make_frame<'a>(
    cols: u16,
    visual_rows: u16,
    pw: usize,
    ph: usize,
    pixels: &'a [u8],
    sync: bool,
) -> Frame<'a> {
    Frame {
        term_cols: cols,
        term_rows: visual_rows + 1,
        visual_rows,
        pixel_width: pw,
        pixel_height: ph,
        pixels_rgba: pixels,
        hud: "Sonic Spectrum Visualizer | tick 12",
        hud_rows: 1,
        sync_updates: sync,
    }
}

fn lit_pixels(s: &PixelSurface) -> usize {
    s.pixels_rgba()
        .chunks_exact(4)
        .filter(|px| px[0] != 0 || px[1] != 0 || px[2] != 0)
        .count()
}

// ── HalfBlock renderer ─────────────────────────────────────────────────────

#[test]
fn halfblock_paints_top_and_bottom_pixels() {
    let (cols, rows) = (4u16, 2u16);
    let (pw, ph) = (4usize, 4usize);
    let mut pixels = solid_pixels(pw, ph, 0, 0, 0);
    // Top-left pixel red, the one below it blue.
    pixels[0] = 255;
    pixels[pw * 4 + 2] = 255;
    let frame = make_frame(cols, rows, pw, ph, &pixels, true);
    let mut out = Vec::new();
    HalfBlockRenderer::new().render(&frame, &mut out).unwrap();
    let s = String::from_utf8_lossy(&out);
    assert!(s.starts_with("\x1b[?2026h"), "missing sync-begin");
    assert!(s.contains("\x1b[?2026l"), "missing sync-end");
    assert!(s.contains("38;2;255;0;0"), "missing red FG");
    assert!(s.contains("48;2;0;0;255"), "missing blue BG");
    assert_eq!(s.matches('\u{2580}').count(), 8);
    assert!(s.contains("tick 12"), "HUD text missing");
}

#[test]
fn halfblock_without_sync_updates() {
    let pixels = solid_pixels(2, 2, 9, 9, 9);
    let frame = make_frame(2, 1, 2, 2, &pixels, false);
    let mut out = Vec::new();
    HalfBlockRenderer::new().render(&frame, &mut out).unwrap();
    let s = String::from_utf8_lossy(&out);
    assert!(!s.contains("\x1b[?2026h"));
    assert!(s.contains("\x1b[?7l") && s.contains("\x1b[?7h"));
}

#[test]
fn halfblock_skips_dimension_mismatch() {
    let pixels = solid_pixels(4, 4, 100, 100, 100);
    let frame = make_frame(4, 4, 4, 4, &pixels, false);
    let mut out = Vec::new();
    HalfBlockRenderer::new().render(&frame, &mut out).unwrap();
    assert!(out.is_empty(), "expected empty output for dimension mismatch");
}

#[test]
fn halfblock_rejects_short_buffer() {
    let pixels = vec![0u8; 4];
    let frame = make_frame(2, 1, 2, 2, &pixels, false);
    let mut out = Vec::new();
    assert!(HalfBlockRenderer::new().render(&frame, &mut out).is_err());
}

#[test]
fn halfblock_truncates_hud_to_width() {
    let pixels = solid_pixels(4, 2, 0, 0, 0);
    let frame = make_frame(4, 1, 4, 2, &pixels, false);
    let mut out = Vec::new();
    HalfBlockRenderer::new().render(&frame, &mut out).unwrap();
    let s = String::from_utf8_lossy(&out);
    assert!(s.contains("Soni"));
    assert!(!s.contains("Sonic"));
}

#[test]
fn halfblock_resets_color_cache_each_frame() {
    let mut renderer = HalfBlockRenderer::new();
    for (r, b) in [(255u8, 0u8), (0, 255)] {
        let pixels = solid_pixels(4, 4, r, 0, b);
        let frame = make_frame(4, 2, 4, 4, &pixels, false);
        let mut out = Vec::new();
        renderer.render(&frame, &mut out).unwrap();
        let s = String::from_utf8_lossy(&out);
        assert!(s.contains(&format!("38;2;{r};0;{b}")));
    }
}

// ── Pixel surface ──────────────────────────────────────────────────────────

#[test]
fn circle_covers_expected_pixels() {
    let mut s = PixelSurface::new(32, 32);
    let c = Rgb::new(10, 20, 30);
    s.fill_circle(16, 16, 3, c);
    // r=3: 29 lattice points with dx²+dy² <= 9.
    assert_eq!(lit_pixels(&s), 29);
    assert_eq!(s.pixel(16, 16), Some(c));
    assert_eq!(s.pixel(19, 16), Some(c));
    assert_eq!(s.pixel(19, 17), Some(Rgb::BLACK));
}

#[test]
fn circle_clips_at_edges() {
    let mut s = PixelSurface::new(16, 16);
    s.fill_circle(0, 0, 2, Rgb::new(1, 1, 1));
    // Quarter disc: (0..=2)x(0..=2) minus (2,1),(1,2),(2,2).
    assert_eq!(lit_pixels(&s), 6);
    s.fill_circle(-50, 300, 4, Rgb::new(1, 1, 1));
    assert_eq!(lit_pixels(&s), 6);
}

#[test]
fn zero_radius_draws_nothing() {
    let mut s = PixelSurface::new(8, 8);
    s.fill_circle(4, 4, 0, Rgb::new(255, 0, 0));
    s.fill_circle(4, 4, -3, Rgb::new(255, 0, 0));
    assert_eq!(lit_pixels(&s), 0);
}

#[test]
fn clear_fills_whole_canvas() {
    let mut s = PixelSurface::new(8, 4);
    s.fill_circle(4, 2, 2, Rgb::new(200, 0, 0));
    s.clear(Rgb::BLACK);
    assert_eq!(lit_pixels(&s), 0);
    s.clear(Rgb::new(3, 4, 5));
    assert_eq!(s.pixel(7, 3), Some(Rgb::new(3, 4, 5)));
    assert_eq!(s.pixel(8, 0), None);
}

#[test]
fn downscale_to_terminal_grid_keeps_particles_visible() {
    let mut s = PixelSurface::new(800, 600);
    s.fill_circle(400, 300, 1, Rgb::new(0, 255, 0));
    let (dw, dh) = (80usize, 48usize);
    let mut dst = vec![0u8; dw * dh * 4];
    downscale_max(s.pixels_rgba(), 800, 600, &mut dst, dw, dh);
    let lit = dst.chunks_exact(4).filter(|px| px[1] == 255).count();
    assert!(lit >= 1);
    assert!(dst.chunks_exact(4).all(|px| px[3] == 255));
}
