//! Sample-rate conversion.
//!
//! Transforms that change speed or stretch time depend on the [`Resample`]
//! capability rather than on a concrete backend, so tests can inject a
//! deterministic resampler. [`SincResampler`] is the production backend,
//! built on rubato's windowed-sinc interpolator.

use rubato::{
    Resampler as RubatoResampler, SincFixedIn, SincInterpolationParameters,
    SincInterpolationType, WindowFunction,
};

use crate::error::AugmentError;
use crate::waveform::Waveform;

/// Input frames fed to the sinc interpolator per call.
const CHUNK_SIZE: usize = 1024;

/// Converts a waveform between sample rates.
///
/// Implementations must return an unchanged copy when `src_rate == dst_rate`
/// and otherwise produce [`output_len`] samples per channel.
pub trait Resample: Send + Sync {
    fn resample(
        &self,
        signal: &Waveform,
        src_rate: u32,
        dst_rate: u32,
    ) -> Result<Waveform, AugmentError>;
}

/// Number of output samples for `len` input samples: `ceil(len * dst / src)`.
pub fn output_len(len: usize, src_rate: u32, dst_rate: u32) -> usize {
    let num = len as u64 * dst_rate as u64;
    num.div_ceil(src_rate as u64) as usize
}

/// Resampling quality preset
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ResampleQuality {
    /// Short kernel, lower quality
    Fast,
    /// Balanced speed and quality
    #[default]
    Normal,
    /// Long kernel, slower
    High,
}

/// Band-limited resampler backed by `rubato::SincFixedIn`.
#[derive(Debug, Clone, Default)]
pub struct SincResampler {
    quality: ResampleQuality,
}

impl SincResampler {
    pub fn new(quality: ResampleQuality) -> Self {
        Self { quality }
    }

    fn params(&self) -> SincInterpolationParameters {
        let (sinc_len, oversampling_factor) = match self.quality {
            ResampleQuality::Fast => (64, 64),
            ResampleQuality::Normal => (128, 128),
            ResampleQuality::High => (256, 256),
        };
        SincInterpolationParameters {
            sinc_len,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor,
            window: WindowFunction::BlackmanHarris2,
        }
    }

    /// Feed every channel through the interpolator and trim to the expected
    /// length.
    ///
    /// `SincFixedIn` output already lines up with its input (an impulse at
    /// input sample `n` lands on output sample `n * dst / src`), so nothing is
    /// dropped from the front.
    fn process_channels(
        &self,
        channels: &[Vec<f32>],
        src_rate: u32,
        dst_rate: u32,
    ) -> Result<Vec<Vec<f32>>, AugmentError> {
        let len = channels[0].len();
        let expected = output_len(len, src_rate, dst_rate);
        let ratio = dst_rate as f64 / src_rate as f64;

        let mut resampler =
            SincFixedIn::<f32>::new(ratio, 1.0, self.params(), CHUNK_SIZE, channels.len())
                .map_err(|e| AugmentError::Resample(e.to_string()))?;
        let mut output: Vec<Vec<f32>> = vec![Vec::with_capacity(expected); channels.len()];

        let mut pos = 0;
        while pos + CHUNK_SIZE <= len {
            let chunk: Vec<&[f32]> = channels.iter().map(|c| &c[pos..pos + CHUNK_SIZE]).collect();
            let produced = resampler
                .process(&chunk, None)
                .map_err(|e| AugmentError::Resample(e.to_string()))?;
            append_frames(&mut output, produced);
            pos += CHUNK_SIZE;
        }

        if pos < len {
            let tail: Vec<&[f32]> = channels.iter().map(|c| &c[pos..]).collect();
            let produced = resampler
                .process_partial(Some(tail.as_slice()), None)
                .map_err(|e| AugmentError::Resample(e.to_string()))?;
            append_frames(&mut output, produced);
        }

        // Flush the interpolator with silence until the tail is out.
        while output[0].len() < expected {
            let produced = resampler
                .process_partial::<Vec<f32>>(None, None)
                .map_err(|e| AugmentError::Resample(e.to_string()))?;
            if produced.first().is_none_or(|c| c.is_empty()) {
                break;
            }
            append_frames(&mut output, produced);
        }

        for channel in &mut output {
            channel.resize(expected, 0.0);
        }
        Ok(output)
    }
}

fn append_frames(output: &mut [Vec<f32>], produced: Vec<Vec<f32>>) {
    for (out, frames) in output.iter_mut().zip(produced) {
        out.extend_from_slice(&frames);
    }
}

impl Resample for SincResampler {
    fn resample(
        &self,
        signal: &Waveform,
        src_rate: u32,
        dst_rate: u32,
    ) -> Result<Waveform, AugmentError> {
        if src_rate == 0 {
            return Err(crate::error::invalid("resample", "src_rate", 0.0, "> 0"));
        }
        if dst_rate == 0 {
            return Err(crate::error::invalid("resample", "dst_rate", 0.0, "> 0"));
        }
        if src_rate == dst_rate {
            return Ok(signal.clone());
        }
        if signal.is_empty() {
            return Ok(Waveform::silence(signal.num_channels(), 0));
        }

        log::trace!(
            "Resampling {} channel(s) x {} samples: {} Hz -> {} Hz",
            signal.num_channels(),
            signal.num_samples(),
            src_rate,
            dst_rate
        );
        let channels = self.process_channels(signal.channels(), src_rate, dst_rate)?;
        Waveform::from_channels(channels)
    }
}
