#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Position of `freq` within `[min_freq, max_freq]`, clamped to `[0, 1]`.
pub fn normalize(freq: f64, min_freq: f64, max_freq: f64) -> f64 {
    let span = max_freq - min_freq;
    if span <= 0.0 || !span.is_finite() {
        return if freq >= max_freq { 1.0 } else { 0.0 };
    }
    let n = (freq - min_freq) / span;
    if n.is_nan() { 0.0 } else { n.clamp(0.0, 1.0) }
}

pub fn color_for(freq: f64, min_freq: f64, max_freq: f64) -> Rgb {
    color_for_normalized(normalize(freq, min_freq, max_freq))
}

/// Five-band gradient: purple, blue, green, yellow, orange, red.
/// Bands are `[0,0.2) [0.2,0.4) [0.4,0.6) [0.6,0.8) [0.8,1]`.
pub fn color_for_normalized(n: f64) -> Rgb {
    let n = if n.is_nan() { 0.0 } else { n.clamp(0.0, 1.0) };
    if n < 0.2 {
        Rgb::new(channel(128.0 + 127.0 * n / 0.2), 0, 255)
    } else if n < 0.4 {
        let g = channel(255.0 * (n - 0.2) / 0.2);
        Rgb::new(0, g, 255 - g)
    } else if n < 0.6 {
        Rgb::new(255, 255, channel(255.0 * (0.6 - n) / 0.2))
    } else if n < 0.8 {
        Rgb::new(255, channel(255.0 * (0.8 - n) / 0.2), 0)
    } else {
        Rgb::new(255, 0, channel(255.0 * (1.0 - n) / 0.2))
    }
}

fn channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
