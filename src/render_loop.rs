//! Fixed-tick driver: poll shutdown, advance particles, spawn one particle per
//! palette entry, redraw, present.

use crate::color::{color_for, normalize, Rgb};
use crate::config::{MAX_FREQ, MIN_FREQ};
use crate::error::Result;
use crate::palette::FrequencySet;
use crate::particles::ParticleSystem;
use crate::platform::{ShutdownSignal, Surface, TickGate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopStats {
    pub ticks: u64,
    pub spawned: u64,
    pub live: usize,
}

pub struct RenderLoop {
    palette: FrequencySet,
    particles: ParticleSystem,
    state: LoopState,
    stats: LoopStats,
    min_freq: f64,
    max_freq: f64,
}

impl RenderLoop {
    pub fn new(palette: FrequencySet, particles: ParticleSystem) -> Self {
        Self {
            palette,
            particles,
            state: LoopState::Running,
            stats: LoopStats::default(),
            min_freq: MIN_FREQ,
            max_freq: MAX_FREQ,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stats(&self) -> LoopStats {
        LoopStats {
            live: self.particles.len(),
            ..self.stats
        }
    }

    pub fn palette(&self) -> &FrequencySet {
        &self.palette
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    /// Spawn row and color for a palette entry on a surface `height` pixels tall.
    pub fn placement(&self, hz: u32, height: f64) -> (f64, Rgb) {
        let n = normalize(hz as f64, self.min_freq, self.max_freq);
        (height - n * height, color_for(hz as f64, self.min_freq, self.max_freq))
    }

    /// Runs one tick. A shutdown observed at the start ends the loop before any
    /// other work; `Stopped` is terminal.
    pub fn step(
        &mut self,
        surface: &mut dyn Surface,
        shutdown: &mut dyn ShutdownSignal,
    ) -> Result<LoopState> {
        if self.state == LoopState::Stopped {
            return Ok(self.state);
        }
        if shutdown.shutdown_requested()? {
            self.state = LoopState::Stopped;
            return Ok(self.state);
        }

        self.particles.tick();

        let width = surface.width() as f64;
        let height = surface.height() as f64;
        for hz in self.palette.iter() {
            let (y, color) = self.placement(hz, height);
            let x = self.particles.random_x(width);
            self.particles.spawn(x, y, color);
            self.stats.spawned += 1;
        }

        surface.clear(Rgb::BLACK);
        for p in self.particles.particles() {
            let (x, y, r) = p.raster();
            if r > 0 {
                surface.fill_circle(x, y, r, p.color);
            }
        }
        surface.present()?;

        self.stats.ticks += 1;
        Ok(self.state)
    }

    /// Ticks at the gate's pace until shutdown. `on_tick` sees each completed tick.
    pub fn run<S: Surface>(
        &mut self,
        surface: &mut S,
        shutdown: &mut dyn ShutdownSignal,
        gate: &mut dyn TickGate,
        mut on_tick: impl FnMut(&mut S, LoopStats),
    ) -> Result<LoopStats> {
        loop {
            gate.wait();
            if self.step(surface, shutdown)? == LoopState::Stopped {
                return Ok(self.stats());
            }
            on_tick(surface, self.stats());
        }
    }
}
