//! Amplitude and spectral transforms.

use crate::dsp::filter::Biquad;
use crate::error::{AugmentError, invalid};
use crate::waveform::{Waveform, db_to_amplitude};

/// Scale every sample by `10^(adjustment_db / 20)`.
///
/// Positive values amplify and may push samples past ±1.0; re-normalizing
/// is up to the caller.
pub fn adjust_volume(signal: &Waveform, adjustment_db: f64) -> Result<Waveform, AugmentError> {
    if !adjustment_db.is_finite() {
        return Err(invalid(
            "adjust_volume",
            "adjustment_db",
            adjustment_db,
            "a finite gain in dB",
        ));
    }
    if adjustment_db == 0.0 {
        return Ok(signal.clone());
    }
    Ok(signal.scaled(db_to_amplitude(adjustment_db)))
}

/// Run each channel through a biquad bandpass spanning `low_freq..high_freq`.
///
/// Requires `0 < low_freq < high_freq < sample_rate / 2`.
pub fn apply_bandpass_filter(
    signal: &Waveform,
    sample_rate: u32,
    low_freq: f64,
    high_freq: f64,
) -> Result<Waveform, AugmentError> {
    let design_error = |reason| AugmentError::FilterDesign {
        low_freq,
        high_freq,
        sample_rate,
        reason,
    };
    let nyquist = sample_rate as f64 / 2.0;

    if !(low_freq.is_finite() && high_freq.is_finite()) {
        return Err(design_error("corner frequencies must be finite"));
    }
    if low_freq <= 0.0 {
        return Err(design_error("low_freq must be positive"));
    }
    if low_freq >= high_freq {
        return Err(design_error("low_freq must be below high_freq"));
    }
    if high_freq >= nyquist {
        return Err(design_error("high_freq must be below the Nyquist frequency"));
    }

    let mut filter = Biquad::bandpass_between(sample_rate as f64, low_freq, high_freq);
    Ok(signal.map_channels(|samples| filter.process_block(samples)))
}
