use crate::error::{Error, Result};
use crate::synth::PcmBuffer;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SampleFormat, SizedSample, SupportedStreamConfigRange};
use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// What the device actually agreed to. Synthesis must use these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegotiatedFormat {
    pub sample_rate: u32,
    pub sample_format: SampleFormat,
    pub channels: u16,
}

pub fn list_output_devices() -> anyhow::Result<()> {
    let host = cpal::default_host();
    let devices = host
        .output_devices()
        .map_err(|e| Error::platform("enumerate output devices", e))?;

    let mut out = io::stdout();
    writeln!(out, "Output devices:")?;
    for dev in devices {
        let name = dev.name().unwrap_or_else(|_| "<unknown>".to_string());
        writeln!(out, "  - {}", name)?;
    }
    Ok(())
}

/// An opened output device. Playback starts with [`AudioOutput::play`]; the
/// stream lives as long as this value.
pub struct AudioOutput {
    device: cpal::Device,
    config: cpal::SupportedStreamConfig,
    format: NegotiatedFormat,
    stream: Option<cpal::Stream>,
    cursor: Arc<AtomicUsize>,
    total_frames: usize,
}

impl AudioOutput {
    /// Picks a stream config close to `requested_rate` at `bit_depth` bits,
    /// falling back to the device default.
    pub fn open(requested_rate: u32, bit_depth: u16, device_query: Option<&str>) -> Result<Self> {
        let host = cpal::default_host();
        let device = select_output_device(&host, device_query)?;
        let config = negotiate_config(&device, requested_rate, bit_depth)?;
        let format = NegotiatedFormat {
            sample_rate: config.sample_rate().0,
            sample_format: config.sample_format(),
            channels: config.channels(),
        };
        tracing::info!(
            device = %device.name().unwrap_or_else(|_| "<unknown>".to_string()),
            sample_rate = format.sample_rate,
            channels = format.channels,
            sample_format = ?format.sample_format,
            "audio output negotiated"
        );

        Ok(Self {
            device,
            config,
            format,
            stream: None,
            cursor: Arc::new(AtomicUsize::new(0)),
            total_frames: 0,
        })
    }

    pub fn format(&self) -> NegotiatedFormat {
        self.format
    }

    /// Starts one-shot playback of `pcm` and returns immediately. Once the
    /// buffer is exhausted the stream outputs silence.
    pub fn play(&mut self, pcm: PcmBuffer) -> Result<()> {
        if pcm.channels() != self.format.channels {
            return Err(Error::invalid(format!(
                "buffer has {} channels, device expects {}",
                pcm.channels(),
                self.format.channels
            )));
        }

        let config: cpal::StreamConfig = self.config.clone().into();
        self.cursor.store(0, Ordering::Relaxed);
        self.total_frames = pcm.frames();
        let pcm = Arc::new(pcm);

        let stream = match self.format.sample_format {
            SampleFormat::F32 => self.build_stream::<f32>(&config, pcm)?,
            SampleFormat::I16 => self.build_stream::<i16>(&config, pcm)?,
            SampleFormat::U16 => self.build_stream::<u16>(&config, pcm)?,
            fmt => {
                return Err(Error::PlatformFailure(format!(
                    "unsupported sample format: {fmt:?}"
                )));
            }
        };
        stream
            .play()
            .map_err(|e| Error::platform("start output stream", e))?;
        self.stream = Some(stream);
        Ok(())
    }

    /// Seconds of the buffer handed to the device so far.
    pub fn position_secs(&self) -> f64 {
        let frames = self.cursor.load(Ordering::Relaxed).min(self.total_frames);
        frames as f64 / self.format.sample_rate.max(1) as f64
    }

    pub fn finished(&self) -> bool {
        self.stream.is_some() && self.cursor.load(Ordering::Relaxed) >= self.total_frames
    }

    fn build_stream<T>(
        &self,
        config: &cpal::StreamConfig,
        pcm: Arc<PcmBuffer>,
    ) -> Result<cpal::Stream>
    where
        T: SizedSample + FromSample<i16>,
    {
        let cursor = Arc::clone(&self.cursor);
        let err_fn = |err: cpal::StreamError| tracing::warn!("audio stream error: {err}");
        self.device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    write_frames(data, &pcm, &cursor)
                },
                err_fn,
                None,
            )
            .map_err(|e| Error::platform("build output stream", e))
    }
}

/// Copies the next frames of `pcm` into `data`, converting to the device
/// sample type, and pads with silence past the end.
pub fn write_frames<T>(data: &mut [T], pcm: &PcmBuffer, cursor: &AtomicUsize)
where
    T: SizedSample + FromSample<i16>,
{
    let ch = pcm.channels() as usize;
    let start = cursor.load(Ordering::Relaxed);
    let mut frame = start;
    for out in data.chunks_mut(ch) {
        match pcm.frame(frame) {
            Some(src) => {
                for (dst, s) in out.iter_mut().zip(src) {
                    *dst = Sample::from_sample(*s);
                }
                frame += 1;
            }
            None => out.fill(T::EQUILIBRIUM),
        }
    }
    cursor.store(frame, Ordering::Relaxed);
}

fn select_output_device(host: &cpal::Host, device_query: Option<&str>) -> Result<cpal::Device> {
    let want = device_query.map(|s| s.to_lowercase());
    if let Some(want) = want.as_deref() {
        let devices = host
            .output_devices()
            .map_err(|e| Error::platform("enumerate output devices", e))?;
        for dev in devices {
            let hit = dev
                .name()
                .map(|n| n.to_lowercase().contains(want))
                .unwrap_or(false);
            if hit {
                return Ok(dev);
            }
        }
        return Err(Error::PlatformFailure(format!(
            "no output device matching: {want}"
        )));
    }

    host.default_output_device()
        .ok_or_else(|| Error::PlatformFailure("no default output device found".to_string()))
}

fn negotiate_config(
    device: &cpal::Device,
    requested_rate: u32,
    bit_depth: u16,
) -> Result<cpal::SupportedStreamConfig> {
    let ranges = device
        .supported_output_configs()
        .map_err(|e| Error::platform("query output configs", e))?
        .collect::<Vec<_>>();
    if let Some(config) = choose_config(&ranges, requested_rate, bit_depth) {
        return Ok(config);
    }

    tracing::debug!(requested_rate, "requested rate unsupported, using device default");
    device
        .default_output_config()
        .map_err(|e| Error::platform("get default output config", e))
}

/// Picks a playable config at exactly `requested_rate`: an integer format of
/// `bit_depth` bits first, then any of f32/i16/u16. `None` means the caller
/// should fall back to the device default.
pub fn choose_config(
    ranges: &[SupportedStreamConfigRange],
    requested_rate: u32,
    bit_depth: u16,
) -> Option<cpal::SupportedStreamConfig> {
    let wanted = cpal::SampleRate(requested_rate);
    let playable = |r: &&SupportedStreamConfigRange| {
        r.min_sample_rate() <= wanted
            && wanted <= r.max_sample_rate()
            && matches!(
                r.sample_format(),
                SampleFormat::F32 | SampleFormat::I16 | SampleFormat::U16
            )
    };
    let exact_depth = ranges.iter().filter(playable).find(|r| {
        let fmt = r.sample_format();
        fmt.is_int() && fmt.sample_size() * 8 == bit_depth as usize
    });
    let any = ranges.iter().find(playable);
    exact_depth
        .or(any)
        .map(|range| range.clone().with_sample_rate(wanted))
}
