//! Noise augmentation core for speech-denoising datasets.
//!
//! Turns a clean speech clip and a noise clip into a noisy/clean training
//! pair: the noise is reshaped by the transforms in [`augment`] and then
//! mixed in at a target SNR or simulated distance. [`recipe`] describes a
//! whole chain as JSON.

pub mod augment;
pub mod dsp;
pub mod error;
pub mod recipe;
pub mod waveform;
#[cfg(feature = "wav")]
pub mod wav;

#[cfg(test)]
mod test_support;

pub use dsp::resample::{Resample, ResampleQuality, SincResampler};
pub use error::AugmentError;
pub use recipe::{AugmentationRecipe, MixMode, NoiseStep, TrainingPair, synthesize_pair};
pub use waveform::{AudioClip, Waveform};

use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

fn js_error(e: AugmentError) -> JsValue {
    JsValue::from_str(&format!("{e}"))
}

/// WASM-exposed: return the noisewalker-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// WASM-exposed: scale mono samples by `adjustment_db`.
#[wasm_bindgen]
pub fn adjust_volume_samples(samples: Vec<f32>, adjustment_db: f64) -> Result<Vec<f32>, JsValue> {
    let out = augment::adjust_volume(&Waveform::mono(samples), adjustment_db).map_err(js_error)?;
    Ok(out.into_channels().remove(0))
}

/// WASM-exposed: mix mono `noise` into mono `clean` at `snr_db`.
/// The result has the clean buffer's length.
#[wasm_bindgen]
pub fn mix_at_snr(clean: Vec<f32>, noise: Vec<f32>, snr_db: f64) -> Result<Vec<f32>, JsValue> {
    let out = augment::mix_clean_and_noise(&Waveform::mono(clean), &Waveform::mono(noise), snr_db)
        .map_err(js_error)?;
    Ok(out.into_channels().remove(0))
}

/// Mono samples handed back across the WASM boundary with their rate.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MonoSamples {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

fn run_noise_steps(samples: Vec<f32>, sample_rate: u32, recipe_json: &str) -> Result<MonoSamples, AugmentError> {
    let recipe = AugmentationRecipe::from_json(recipe_json)?;
    let noise = AudioClip::new(Waveform::mono(samples), sample_rate);
    let out = recipe::apply_noise_steps(&noise, None, &recipe.noise_steps, &SincResampler::default())?;
    Ok(MonoSamples {
        sample_rate: out.sample_rate,
        samples: out.waveform.into_channels().remove(0),
    })
}

/// WASM-exposed: run the noise steps of a JSON recipe over mono samples.
/// Returns `{ samples: [...], sample_rate }`.
#[wasm_bindgen]
pub fn augment_noise(samples: Vec<f32>, sample_rate: u32, recipe_json: &str) -> Result<JsValue, JsValue> {
    let out = run_noise_steps(samples, sample_rate, recipe_json).map_err(js_error)?;
    serde_wasm_bindgen::to_value(&out).map_err(|e| JsValue::from_str(&format!("{e}")))
}

/// WASM-exposed: build the noisy half of a training pair from mono buffers
/// sharing one sample rate.
#[wasm_bindgen]
pub fn synthesize_noisy(
    clean: Vec<f32>,
    noise: Vec<f32>,
    sample_rate: u32,
    recipe_json: &str,
) -> Result<Vec<f32>, JsValue> {
    let recipe = AugmentationRecipe::from_json(recipe_json).map_err(js_error)?;
    let clean = AudioClip::new(Waveform::mono(clean), sample_rate);
    let noise = AudioClip::new(Waveform::mono(noise), sample_rate);
    let pair = synthesize_pair(&clean, &noise, None, &recipe, &SincResampler::default()).map_err(js_error)?;
    Ok(pair.noisy.waveform.into_channels().remove(0))
}
