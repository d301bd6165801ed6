//! Augmentation recipes — a serializable description of how one noisy
//! training example is built from a clean clip and a noise clip.
//!
//! A recipe is an ordered list of noise steps followed by a mix mode:
//!
//! ```json
//! {
//!   "noise_steps": [
//!     { "type": "volume", "adjustment_db": -3.0 },
//!     { "type": "bandpass", "low_freq": 200.0, "high_freq": 4000.0 },
//!     { "type": "echo", "delay_ms": 120.0, "decay": 0.4 }
//!   ],
//!   "mix": { "type": "snr", "snr_db": 10.0 }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::augment;
use crate::dsp::resample::Resample;
use crate::error::AugmentError;
use crate::waveform::AudioClip;

// ── Recipe ──────────────────────────────────────────────────

/// A full augmentation recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentationRecipe {
    /// Transforms applied to the noise clip, in order.
    #[serde(default)]
    pub noise_steps: Vec<NoiseStep>,
    /// How the processed noise is combined with the clean clip.
    pub mix: MixMode,
}

impl AugmentationRecipe {
    pub fn from_json(json: &str) -> Result<Self, AugmentError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, AugmentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One transform applied to the noise signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NoiseStep {
    Volume {
        adjustment_db: f64,
    },
    Bandpass {
        low_freq: f64,
        high_freq: f64,
    },
    /// Resample by `speed_factor` and keep playing at the original rate.
    SpeedAndPitch {
        speed_factor: f64,
    },
    TimeStretch {
        stretch_factor: f64,
    },
    Echo {
        delay_ms: f64,
        decay: f64,
    },
    /// Mix in the caller-supplied environmental clip at `gain_db`.
    Environmental {
        #[serde(default)]
        gain_db: f64,
    },
}

/// How processed noise meets the clean signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MixMode {
    /// Scale the noise to sit `snr_db` below the clean RMS.
    Snr { snr_db: f64 },
    /// Attenuate the noise as if heard from `distance_m`.
    Distance {
        distance_m: f64,
        #[serde(default = "default_initial_distance")]
        initial_distance_m: f64,
    },
}

fn default_initial_distance() -> f64 {
    augment::DEFAULT_INITIAL_DISTANCE_M
}

/// A clean clip and its synthesized noisy counterpart, at the same rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingPair {
    pub clean: AudioClip,
    pub noisy: AudioClip,
}

// ── Execution ───────────────────────────────────────────────

impl NoiseStep {
    fn name(&self) -> &'static str {
        match self {
            NoiseStep::Volume { .. } => "volume",
            NoiseStep::Bandpass { .. } => "bandpass",
            NoiseStep::SpeedAndPitch { .. } => "speed_and_pitch",
            NoiseStep::TimeStretch { .. } => "time_stretch",
            NoiseStep::Echo { .. } => "echo",
            NoiseStep::Environmental { .. } => "environmental",
        }
    }

    /// Apply this step to `clip`, returning a clip at the same rate.
    pub fn apply(
        &self,
        clip: &AudioClip,
        environmental: Option<&AudioClip>,
        resampler: &dyn Resample,
    ) -> Result<AudioClip, AugmentError> {
        let rate = clip.sample_rate;
        let waveform = match *self {
            NoiseStep::Volume { adjustment_db } => augment::adjust_volume(&clip.waveform, adjustment_db)?,
            NoiseStep::Bandpass {
                low_freq,
                high_freq,
            } => augment::apply_bandpass_filter(&clip.waveform, rate, low_freq, high_freq)?,
            NoiseStep::SpeedAndPitch { speed_factor } => {
                // Reinterpreting the resampled buffer at the original rate is
                // what makes it sound faster/higher.
                augment::apply_speed_and_pitch_change(&clip.waveform, rate, speed_factor, resampler)?
                    .waveform
            }
            NoiseStep::TimeStretch { stretch_factor } => {
                augment::time_stretch(&clip.waveform, rate, stretch_factor, resampler)?
            }
            NoiseStep::Echo { delay_ms, decay } => augment::apply_echo(&clip.waveform, rate, delay_ms, decay)?,
            NoiseStep::Environmental { gain_db } => {
                let env = environmental.ok_or(AugmentError::MissingInput {
                    transform: "synthesize_pair",
                    signal: "environmental",
                })?;
                let env = resampler.resample(&env.waveform, env.sample_rate, rate)?;
                let env = augment::adjust_volume(&env, gain_db)?;
                augment::apply_environmental_sounds(&clip.waveform, &env)?
            }
        };
        Ok(AudioClip::new(waveform, rate))
    }
}

/// Run `steps` over `noise` in order. The result keeps the noise clip's rate.
pub fn apply_noise_steps(
    noise: &AudioClip,
    environmental: Option<&AudioClip>,
    steps: &[NoiseStep],
    resampler: &dyn Resample,
) -> Result<AudioClip, AugmentError> {
    let mut current = noise.clone();
    for (index, step) in steps.iter().enumerate() {
        current = step.apply(&current, environmental, resampler)?;
        log::debug!(
            "step {index} ({}): {} samples, rms {:.5}",
            step.name(),
            current.waveform.num_samples(),
            current.waveform.rms()
        );
    }
    Ok(current)
}

/// Build one training pair: run `recipe.noise_steps` over `noise`, bring the
/// result to the clean clip's rate and mix it in per `recipe.mix`.
///
/// The clean clip is the primary signal: the noisy output always has its
/// length, channel layout and rate.
pub fn synthesize_pair(
    clean: &AudioClip,
    noise: &AudioClip,
    environmental: Option<&AudioClip>,
    recipe: &AugmentationRecipe,
    resampler: &dyn Resample,
) -> Result<TrainingPair, AugmentError> {
    let current = apply_noise_steps(noise, environmental, &recipe.noise_steps, resampler)?;
    let noise_waveform = resampler.resample(&current.waveform, current.sample_rate, clean.sample_rate)?;
    let mixed = match recipe.mix {
        MixMode::Snr { snr_db } => augment::mix_clean_and_noise(&clean.waveform, &noise_waveform, snr_db)?,
        MixMode::Distance {
            distance_m,
            initial_distance_m,
        } => augment::simulate_noise_at_distance(
            &clean.waveform,
            &noise_waveform,
            distance_m,
            initial_distance_m,
        )?,
    };

    Ok(TrainingPair {
        clean: clean.clone(),
        noisy: AudioClip::new(mixed, clean.sample_rate),
    })
}
