//! Waveform buffers — `channels × samples` audio with an optional sample rate.

use serde::{Deserialize, Serialize};

use crate::error::AugmentError;

/// Convert a gain in dB to a linear amplitude ratio.
#[inline]
pub fn db_to_amplitude(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Convert a linear amplitude ratio to dB.
#[inline]
pub fn amplitude_to_db(ratio: f64) -> f64 {
    20.0 * ratio.log10()
}

/// A multi-channel sample buffer.
///
/// All channels have the same length and there is always at least one
/// channel. Samples are `f32`; energy computations accumulate in `f64`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f32>>", into = "Vec<Vec<f32>>")]
pub struct Waveform {
    channels: Vec<Vec<f32>>,
}

impl Waveform {
    /// Build a waveform from per-channel sample vectors.
    pub fn from_channels(channels: Vec<Vec<f32>>) -> Result<Self, AugmentError> {
        let Some(first) = channels.first() else {
            return Err(AugmentError::EmptySignal {
                transform: "Waveform::from_channels",
                signal: "channel list",
            });
        };
        let expected = first.len();
        for (channel, samples) in channels.iter().enumerate() {
            if samples.len() != expected {
                return Err(AugmentError::RaggedChannels {
                    channel,
                    expected,
                    found: samples.len(),
                });
            }
        }
        Ok(Waveform { channels })
    }

    /// A single-channel waveform.
    pub fn mono(samples: Vec<f32>) -> Self {
        Waveform {
            channels: vec![samples],
        }
    }

    /// `num_channels` channels of `num_samples` zeros.
    pub fn silence(num_channels: usize, num_samples: usize) -> Self {
        Waveform {
            channels: vec![vec![0.0; num_samples]; num_channels.max(1)],
        }
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel.
    pub fn num_samples(&self) -> usize {
        self.channels[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_samples() == 0
    }

    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    pub fn into_channels(self) -> Vec<Vec<f32>> {
        self.channels
    }

    /// Root-mean-square over every sample of every channel.
    ///
    /// An empty waveform has an RMS of 0.
    pub fn rms(&self) -> f64 {
        let count = self.num_channels() * self.num_samples();
        if count == 0 {
            return 0.0;
        }
        let sum_sq: f64 = self
            .channels
            .iter()
            .flat_map(|c| c.iter())
            .map(|&s| (s as f64) * (s as f64))
            .sum();
        (sum_sq / count as f64).sqrt()
    }

    /// A new waveform with every sample multiplied by `gain`.
    pub fn scaled(&self, gain: f64) -> Waveform {
        self.map_channels(|samples| {
            samples.iter().map(|&s| (s as f64 * gain) as f32).collect()
        })
    }

    /// A new waveform built by transforming each channel independently.
    pub fn map_channels<F>(&self, f: F) -> Waveform
    where
        F: FnMut(&[f32]) -> Vec<f32>,
    {
        Waveform {
            channels: self.channels.iter().map(|c| c.as_slice()).map(f).collect(),
        }
    }

    /// Elementwise sum with broadcasting of a mono operand.
    ///
    /// Both waveforms must have the same number of samples; channel counts
    /// must match or one side must be mono.
    pub(crate) fn sum(&self, other: &Waveform, transform: &'static str) -> Result<Waveform, AugmentError> {
        if self.num_samples() != other.num_samples() {
            return Err(AugmentError::LengthMismatch {
                transform,
                left: self.num_samples(),
                right: other.num_samples(),
            });
        }
        let (left, right) = (self.num_channels(), other.num_channels());
        let out_channels = if left == right || right == 1 {
            left
        } else if left == 1 {
            right
        } else {
            return Err(AugmentError::ChannelMismatch {
                transform,
                left,
                right,
            });
        };

        let channels = (0..out_channels)
            .map(|ch| {
                let a = &self.channels[if left == 1 { 0 } else { ch }];
                let b = &other.channels[if right == 1 { 0 } else { ch }];
                a.iter().zip(b.iter()).map(|(&x, &y)| x + y).collect()
            })
            .collect();
        Ok(Waveform { channels })
    }
}

impl TryFrom<Vec<Vec<f32>>> for Waveform {
    type Error = AugmentError;

    fn try_from(channels: Vec<Vec<f32>>) -> Result<Self, Self::Error> {
        Waveform::from_channels(channels)
    }
}

impl From<Waveform> for Vec<Vec<f32>> {
    fn from(w: Waveform) -> Self {
        w.channels
    }
}

/// A waveform together with the rate it was sampled at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioClip {
    pub waveform: Waveform,
    pub sample_rate: u32,
}

impl AudioClip {
    pub fn new(waveform: Waveform, sample_rate: u32) -> Self {
        AudioClip {
            waveform,
            sample_rate,
        }
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.waveform.num_samples() as f64 / self.sample_rate as f64
    }
}
