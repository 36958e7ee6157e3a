use crate::audio::AudioOutput;
use crate::config::{
    Config, BIT_DEPTH, CEILING, DURATION_SECS, HEIGHT, REQUESTED_SAMPLE_RATE, ROOT_FREQ, TICK_HZ,
    WIDTH, WINDOW_TITLE,
};
use crate::palette::{FrequencySet, IntervalPattern};
use crate::particles::ParticleSystem;
use crate::platform::{FrameLimiter, ShutdownSignal, TickBudget};
use crate::render_loop::{LoopStats, RenderLoop};
use crate::surface::TerminalSurface;
use crate::synth::{synthesize, SynthParams};
use crate::terminal::{TerminalEvents, TerminalGuard};
use anyhow::Context;
use std::time::Instant;

pub fn run(cfg: Config) -> anyhow::Result<()> {
    let palette = FrequencySet::generate(ROOT_FREQ, CEILING, &IntervalPattern::minor_triad())
        .context("generate frequency palette")?;
    tracing::info!(count = palette.len(), "palette: {palette}");

    let audio = if cfg.mute {
        None
    } else {
        Some(start_playback(&cfg, &palette)?)
    };

    let _term = TerminalGuard::new()?;
    let mut surface = TerminalSurface::new(WIDTH, HEIGHT, WINDOW_TITLE, cfg.hud, cfg.sync_updates);

    let particles = match cfg.seed {
        Some(seed) => ParticleSystem::with_seed(seed),
        None => ParticleSystem::new(),
    };
    let mut render_loop = RenderLoop::new(palette, particles);

    let mut shutdown: Box<dyn ShutdownSignal> = match cfg.max_ticks {
        Some(n) => Box::new(TickBudget::new(TerminalEvents, n)),
        None => Box::new(TerminalEvents),
    };
    let mut gate = FrameLimiter::new(TICK_HZ);

    tracing::info!(hz = TICK_HZ, width = WIDTH, height = HEIGHT, "render loop starting");
    let tones = render_loop.palette().len();
    let started = Instant::now();
    let stats = render_loop
        .run(&mut surface, &mut *shutdown, &mut gate, |surface, stats| {
            surface.set_status(status_line(stats, tones, audio.as_ref()));
        })
        .context("render loop")?;

    let secs = started.elapsed().as_secs_f64().max(1e-6);
    tracing::info!(
        ticks = stats.ticks,
        spawned = stats.spawned,
        live = stats.live,
        tick_rate = stats.ticks as f64 / secs,
        "render loop stopped"
    );
    Ok(())
}

/// Opens the output device, synthesizes at the negotiated format and starts
/// playback.
fn start_playback(cfg: &Config, palette: &FrequencySet) -> anyhow::Result<AudioOutput> {
    let mut audio = AudioOutput::open(REQUESTED_SAMPLE_RATE, BIT_DEPTH, cfg.device.as_deref())
        .context("open audio output")?;
    let format = audio.format();

    let params = SynthParams {
        sample_rate: format.sample_rate,
        duration_secs: DURATION_SECS,
        channels: format.channels,
    };
    let t0 = Instant::now();
    let pcm = synthesize(palette, &params).context("synthesize drone")?;
    tracing::info!(
        frames = pcm.frames(),
        channels = pcm.channels(),
        duration_secs = pcm.duration_secs(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "drone synthesized"
    );

    audio.play(pcm).context("start playback")?;
    Ok(audio)
}

fn status_line(stats: LoopStats, tones: usize, audio: Option<&AudioOutput>) -> String {
    let audio = match audio {
        Some(a) if a.finished() => "audio done".to_string(),
        Some(a) => format!("audio {:.0}s/{:.0}s", a.position_secs(), DURATION_SECS),
        None => "muted".to_string(),
    };
    format!(
        "tick {} | particles {} | {} tones | {}",
        stats.ticks, stats.live, tones, audio
    )
}
