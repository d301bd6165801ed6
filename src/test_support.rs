//! Fixtures shared by the unit tests.

use std::f32::consts::PI;
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::dsp::resample::{Resample, output_len};
use crate::error::AugmentError;
use crate::waveform::Waveform;

/// Nearest-neighbour resampler: deterministic, honours the length contract
/// and counts how often it was called.
#[derive(Debug, Default)]
pub struct NearestResampler {
    pub calls: AtomicUsize,
}

impl NearestResampler {
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Resample for NearestResampler {
    fn resample(
        &self,
        signal: &Waveform,
        src_rate: u32,
        dst_rate: u32,
    ) -> Result<Waveform, AugmentError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if src_rate == dst_rate {
            return Ok(signal.clone());
        }
        let len = signal.num_samples();
        let out_len = output_len(len, src_rate, dst_rate);
        Ok(signal.map_channels(|samples| {
            (0..out_len)
                .map(|i| {
                    let src = (i as u64 * src_rate as u64 / dst_rate as u64) as usize;
                    samples[src.min(len - 1)]
                })
                .collect()
        }))
    }
}

/// Uniform white noise scaled to an exact RMS of `rms`.
pub fn white_noise(seed: u64, len: usize, rms: f64) -> Waveform {
    let mut rng = StdRng::seed_from_u64(seed);
    let raw = Waveform::mono((0..len).map(|_| rng.gen_range(-1.0_f32..1.0)).collect());
    let current = raw.rms();
    raw.scaled(rms / current)
}

/// A unit-amplitude sine tone.
pub fn tone(freq: f32, sample_rate: u32, len: usize) -> Waveform {
    Waveform::mono(
        (0..len)
            .map(|i| (2.0 * PI * freq * i as f32 / sample_rate as f32).sin())
            .collect(),
    )
}

/// RMS of `a - b` over all samples.
pub fn residual_rms(a: &Waveform, b: &Waveform) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for (ca, cb) in a.channels().iter().zip(b.channels()) {
        for (&x, &y) in ca.iter().zip(cb) {
            let d = x as f64 - y as f64;
            sum += d * d;
            count += 1;
        }
    }
    (sum / count as f64).sqrt()
}
