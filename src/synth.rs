use crate::error::{Error, Result};
use crate::palette::FrequencySet;
use std::f64::consts::TAU;

/// Peak magnitude of a quantized sample. The negative side is kept symmetric.
pub const FULL_SCALE: f64 = i16::MAX as f64;

/// Largest interleaved buffer `synthesize` will allocate.
pub const MAX_SAMPLES: usize = 1 << 30;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthParams {
    pub sample_rate: u32,
    pub duration_secs: f64,
    pub channels: u16,
}

impl SynthParams {
    /// Number of frames on the time axis: `round(sample_rate * duration)`.
    pub fn frame_count(&self) -> usize {
        (self.sample_rate as f64 * self.duration_secs).round() as usize
    }

    fn validate(&self) -> Result<usize> {
        if self.sample_rate == 0 {
            return Err(Error::invalid("sample rate must be > 0"));
        }
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(Error::invalid(format!(
                "duration must be > 0 seconds (got {})",
                self.duration_secs
            )));
        }
        if self.channels == 0 {
            return Err(Error::invalid("channel count must be >= 1"));
        }
        let frames = (self.sample_rate as f64 * self.duration_secs).round();
        let too_long = || {
            Error::invalid(format!(
                "{} Hz x {} s x {} channels exceeds {MAX_SAMPLES} samples",
                self.sample_rate, self.duration_secs, self.channels
            ))
        };
        if frames > MAX_SAMPLES as f64 {
            return Err(too_long());
        }
        let n = frames as usize;
        match n.checked_mul(self.channels as usize) {
            Some(total) if total <= MAX_SAMPLES => {}
            _ => return Err(too_long()),
        }
        if n == 0 {
            return Err(Error::invalid(format!(
                "{} Hz x {} s yields no samples",
                self.sample_rate, self.duration_secs
            )));
        }
        Ok(n)
    }
}

/// Interleaved signed 16-bit PCM.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PcmBuffer {
    samples: Vec<i16>,
    channels: u16,
    sample_rate: u32,
}

impl PcmBuffer {
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    pub fn frame(&self, index: usize) -> Option<&[i16]> {
        let ch = self.channels as usize;
        self.samples.get(index * ch..(index + 1) * ch)
    }
}

/// Sums one unit sine per palette entry, scales by `1 / |freqs|`, quantizes to
/// i16 and copies the mono signal onto every channel.
pub fn synthesize(freqs: &FrequencySet, params: &SynthParams) -> Result<PcmBuffer> {
    if freqs.is_empty() {
        return Err(Error::invalid("cannot synthesize an empty frequency set"));
    }
    let n = params.validate()?;

    // Half-open time axis over [0, duration): t_i = i * duration / n.
    let step = params.duration_secs / n as f64;
    let mut acc = vec![0.0f64; n];
    for hz in freqs.iter() {
        let w = TAU * hz as f64;
        for (i, s) in acc.iter_mut().enumerate() {
            *s += (w * (i as f64 * step)).sin();
        }
    }

    let gain = FULL_SCALE / freqs.len() as f64;
    let channels = params.channels as usize;
    let mut samples = Vec::with_capacity(n * channels);
    for s in acc {
        let q = quantize(s * gain);
        samples.extend(std::iter::repeat_n(q, channels));
    }

    Ok(PcmBuffer {
        samples,
        channels: params.channels,
        sample_rate: params.sample_rate,
    })
}

fn quantize(v: f64) -> i16 {
    v.round().clamp(-FULL_SCALE, FULL_SCALE) as i16
}
