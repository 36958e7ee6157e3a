//! Particle population with per-tick motion and geometric radius decay.
//!
//! All randomness (spawn radius, velocity, and the render loop's horizontal
//! placement) is drawn from the one `fastrand::Rng` owned here, so a seeded
//! system replays exactly.

use crate::color::Rgb;
use crate::config::{DECAY_PER_TICK, TICK_HZ};

/// Below this the rounded drawing radius is zero and the particle can never
/// become visible again.
pub const EXTINCTION_RADIUS: f64 = 0.5;

pub const SPAWN_RADIUS: std::ops::Range<f64> = 3.0..7.0;
pub const SPAWN_VX: std::ops::Range<f64> = -1.0..1.0;
pub const SPAWN_VY: std::ops::Range<f64> = -1.0..-0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(pub u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub id: ParticleId,
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub color: Rgb,
    pub vx: f64,
    pub vy: f64,
}

impl Particle {
    pub fn is_alive(&self) -> bool {
        self.radius >= EXTINCTION_RADIUS
    }

    /// Integer center and radius used for drawing.
    pub fn raster(&self) -> (i32, i32, i32) {
        (
            self.x.round() as i32,
            self.y.round() as i32,
            self.radius.round() as i32,
        )
    }
}

pub struct ParticleSystem {
    particles: Vec<Particle>,
    rng: fastrand::Rng,
    next_id: u64,
    decay_per_tick: f64,
    tick_hz: f64,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::with_rng(fastrand::Rng::new())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(fastrand::Rng::with_seed(seed))
    }

    pub fn with_rng(rng: fastrand::Rng) -> Self {
        Self {
            particles: Vec::new(),
            rng,
            next_id: 0,
            decay_per_tick: DECAY_PER_TICK,
            tick_hz: TICK_HZ as f64,
        }
    }

    pub fn spawn(&mut self, x: f64, y: f64, color: Rgb) -> ParticleId {
        let radius = self.uniform(SPAWN_RADIUS);
        let vx = self.uniform(SPAWN_VX);
        let vy = self.uniform(SPAWN_VY);
        self.insert(Particle {
            id: ParticleId(0),
            x,
            y,
            radius,
            color,
            vx,
            vy,
        })
    }

    /// Adds a fully specified particle; the id is assigned here.
    pub fn insert(&mut self, mut particle: Particle) -> ParticleId {
        let id = ParticleId(self.next_id);
        self.next_id += 1;
        particle.id = id;
        self.particles.push(particle);
        id
    }

    /// One fixed step: move by velocity, shrink by the per-tick factor, drop
    /// extinct particles.
    pub fn tick(&mut self) {
        let decay = self.decay_per_tick;
        self.particles.retain_mut(|p| {
            p.x += p.vx;
            p.y += p.vy;
            p.radius *= decay;
            p.is_alive()
        });
    }

    /// Variable-step form of [`tick`](Self::tick): `dt_secs` of simulated time,
    /// with decay applied as a per-second rate.
    pub fn advance(&mut self, dt_secs: f64) {
        let steps = (dt_secs * self.tick_hz).max(0.0);
        let decay = self.decay_per_second().powf(dt_secs.max(0.0));
        self.particles.retain_mut(|p| {
            p.x += p.vx * steps;
            p.y += p.vy * steps;
            p.radius *= decay;
            p.is_alive()
        });
    }

    pub fn decay_per_second(&self) -> f64 {
        self.decay_per_tick.powf(self.tick_hz)
    }

    /// Ticks until a particle of radius `r0` has been removed by [`tick`](Self::tick).
    pub fn lifetime_ticks(&self, r0: f64) -> u32 {
        if r0 < EXTINCTION_RADIUS {
            return 0;
        }
        ((EXTINCTION_RADIUS / r0).ln() / self.decay_per_tick.ln()).floor() as u32 + 1
    }

    /// Uniform horizontal position in `[0, width)`.
    pub fn random_x(&mut self, width: f64) -> f64 {
        self.rng.f64() * width
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    fn uniform(&mut self, range: std::ops::Range<f64>) -> f64 {
        range.start + self.rng.f64() * (range.end - range.start)
    }
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new()
    }
}
