use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use sonic_spectrum::config::{CEILING, ROOT_FREQ};
use sonic_spectrum::palette::{FrequencySet, IntervalPattern};
use sonic_spectrum::synth::{synthesize, SynthParams, MAX_SAMPLES};
use sonic_spectrum::Error;

fn params(sample_rate: u32, duration_secs: f64, channels: u16) -> SynthParams {
    SynthParams {
        sample_rate,
        duration_secs,
        channels,
    }
}

fn minor_palette() -> FrequencySet {
    FrequencySet::generate(ROOT_FREQ, CEILING, &IntervalPattern::minor_triad()).unwrap()
}

#[test]
fn samples_stay_within_symmetric_full_scale() {
    let pcm = synthesize(&minor_palette(), &params(8_000, 0.5, 2)).unwrap();
    assert!(pcm.samples().iter().all(|&s| (-32767..=32767).contains(&s)));
    assert!(pcm.samples().iter().any(|&s| s != 0), "drone should not be silent");
}

#[test]
fn frame_count_is_rounded_rate_times_duration() {
    let pcm = synthesize(&minor_palette(), &params(44_100, 0.01, 1)).unwrap();
    assert_eq!(pcm.frames(), 441);
    assert_eq!(pcm.samples().len(), 441);

    let pcm = synthesize(&minor_palette(), &params(1_000, 0.0024, 2)).unwrap();
    assert_eq!(pcm.frames(), 2);
    assert_eq!(pcm.samples().len(), 4);
    assert_eq!(pcm.sample_rate(), 1_000);
}

#[test]
fn channels_carry_identical_samples() {
    let pcm = synthesize(&minor_palette(), &params(8_000, 0.25, 3)).unwrap();
    assert_eq!(pcm.channels(), 3);
    for frame in pcm.samples().chunks_exact(3) {
        assert!(frame.iter().all(|&s| s == frame[0]));
    }
    assert_eq!(pcm.frame(1).map(|f| f.len()), Some(3));
    assert_eq!(pcm.frame(pcm.frames()), None);
}

#[test]
fn time_axis_starts_at_zero() {
    let pcm = synthesize(&minor_palette(), &params(8_000, 0.1, 1)).unwrap();
    assert_eq!(pcm.samples()[0], 0);
}

#[test]
fn single_tone_hits_full_scale_at_quarter_period() {
    let tone = FrequencySet::from_hz([1_000]);
    let pcm = synthesize(&tone, &params(8_000, 0.01, 1)).unwrap();
    assert_eq!(&pcm.samples()[..5], &[0, 23170, 32767, 23170, 0]);
}

#[test]
fn empty_palette_is_rejected() {
    let empty = FrequencySet::from_hz(Vec::<u32>::new());
    let err = synthesize(&empty, &params(44_100, 1.0, 2)).expect_err("empty set must fail");
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn degenerate_parameters_are_rejected() {
    let p = minor_palette();
    for bad in [
        params(0, 1.0, 2),
        params(44_100, 0.0, 2),
        params(44_100, -1.0, 2),
        params(44_100, f64::NAN, 2),
        params(44_100, 1.0, 0),
        // 0.1 samples rounds to none.
        params(10, 0.01, 1),
    ] {
        assert!(
            matches!(synthesize(&p, &bad), Err(Error::InvalidInput(_))),
            "expected InvalidInput for {bad:?}"
        );
    }
}

#[test]
fn spectrum_peaks_at_palette_frequencies() {
    // One second at 8 kHz: FFT bin k is exactly k Hz.
    let tones = FrequencySet::from_hz([110, 440, 880]);
    let sr = 8_000u32;
    let pcm = synthesize(&tones, &params(sr, 1.0, 1)).unwrap();
    let n = pcm.frames();

    let mut buf: Vec<Complex<f64>> = pcm
        .samples()
        .iter()
        .map(|&s| Complex { re: s as f64, im: 0.0 })
        .collect();
    let mut planner = FftPlanner::<f64>::new();
    planner.plan_fft_forward(n).process(&mut buf);

    let mut mags: Vec<(usize, f64)> = buf[..n / 2]
        .iter()
        .enumerate()
        .map(|(k, c)| (k, c.norm()))
        .collect();
    mags.sort_by(|a, b| b.1.total_cmp(&a.1));
    let mut top: Vec<usize> = mags[..3].iter().map(|(k, _)| *k).collect();
    top.sort_unstable();
    assert_eq!(top, vec![110, 440, 880]);

    // Everything else is quantization noise.
    assert!(mags[3].1 < mags[2].1 * 0.01);
}

#[test]
fn oversized_buffers_are_rejected_before_allocating() {
    let p = FrequencySet::from_hz([440]);
    for bad in [
        params(44_100, 1e12, 1),
        params(44_100, f64::MAX, 2),
        // Fits as frames, overflows once multiplied by the channel count.
        params(48_000, (MAX_SAMPLES / 48_000) as f64, 2),
    ] {
        assert!(
            matches!(synthesize(&p, &bad), Err(Error::InvalidInput(_))),
            "expected InvalidInput for {bad:?}"
        );
    }
}

#[test]
fn buffer_reports_its_duration() {
    let pcm = synthesize(&FrequencySet::from_hz([440]), &params(8_000, 0.25, 2)).unwrap();
    assert_eq!(pcm.frames(), 2_000);
    assert!((pcm.duration_secs() - 0.25).abs() < 1e-12);
}
