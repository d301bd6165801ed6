//! Two-signal combinators and the shared length reconciliation policy.
//!
//! Whenever two signals of different duration are summed, the *secondary*
//! operand is forced to the *primary* operand's length by
//! [`reconcile_length`]: longer signals are truncated, shorter ones are
//! tiled from their first sample and then truncated. Mismatched lengths are
//! never an error.

use crate::error::{AugmentError, invalid};
use crate::waveform::{Waveform, db_to_amplitude};

/// Reference distance used when none is given.
pub const DEFAULT_INITIAL_DISTANCE_M: f64 = 1.0;

/// Force `secondary` to exactly `target_len` samples per channel.
///
/// - longer: keep the first `target_len` samples
/// - shorter: repeat `ceil(target_len / len)` times, then truncate
/// - equal: unchanged copy
///
/// Tiling an empty signal is impossible and reported as `EmptySignal`.
pub fn reconcile_length(secondary: &Waveform, target_len: usize) -> Result<Waveform, AugmentError> {
    let len = secondary.num_samples();
    if len == target_len {
        return Ok(secondary.clone());
    }
    if len > target_len {
        return Ok(secondary.map_channels(|samples| samples[..target_len].to_vec()));
    }
    if len == 0 {
        return Err(AugmentError::EmptySignal {
            transform: "reconcile_length",
            signal: "secondary",
        });
    }

    let repeats = target_len.div_ceil(len);
    Ok(secondary.map_channels(|samples| {
        let mut tiled = samples.repeat(repeats);
        tiled.truncate(target_len);
        tiled
    }))
}

/// Sum `environmental` onto `noise`, looping or truncating the
/// environmental sound to the noise length.
pub fn apply_environmental_sounds(
    noise: &Waveform,
    environmental: &Waveform,
) -> Result<Waveform, AugmentError> {
    let environmental = reconcile(environmental, noise.num_samples(), "apply_environmental_sounds", "environmental")?;
    noise.sum(&environmental, "apply_environmental_sounds")
}

/// Add `noise` to `clean` so that the noise sits `snr_db` below the clean
/// signal's RMS.
///
/// The noise is first reconciled to the clean length, then scaled by
/// `(clean_rms / 10^(snr_db / 20)) / noise_rms`. No cross-term correction is
/// applied, so the realized SNR of the mixture matches `snr_db` only for
/// uncorrelated inputs; the RMS of `output - clean` always matches.
pub fn mix_clean_and_noise(
    clean: &Waveform,
    noise: &Waveform,
    snr_db: f64,
) -> Result<Waveform, AugmentError> {
    const NAME: &str = "mix_clean_and_noise";
    if !snr_db.is_finite() {
        return Err(invalid(NAME, "snr_db", snr_db, "a finite SNR in dB"));
    }

    let noise = reconcile(noise, clean.num_samples(), NAME, "noise")?;
    let clean_rms = clean.rms();
    let noise_rms = noise.rms();
    if noise_rms == 0.0 || !noise_rms.is_finite() {
        return Err(AugmentError::SilentInput {
            transform: NAME,
            signal: "noise",
        });
    }

    let desired_noise_rms = clean_rms / db_to_amplitude(snr_db);
    let gain = desired_noise_rms / noise_rms;
    log::trace!("{NAME}: clean_rms={clean_rms:.6} noise_rms={noise_rms:.6} gain={gain:.6}");

    clean.sum(&noise.scaled(gain), NAME)
}

/// Free-field spreading loss of a source moved from `initial_distance_m` to
/// `distance_m`: 6 dB per doubling of distance.
pub fn attenuation_db(distance_m: f64, initial_distance_m: f64) -> Result<f64, AugmentError> {
    const NAME: &str = "simulate_noise_at_distance";
    if !distance_m.is_finite() || distance_m <= 0.0 {
        return Err(invalid(NAME, "distance_m", distance_m, "a finite distance > 0"));
    }
    if !initial_distance_m.is_finite() || initial_distance_m <= 0.0 {
        return Err(invalid(
            NAME,
            "initial_distance_m",
            initial_distance_m,
            "a finite distance > 0",
        ));
    }
    Ok(-6.0 * (distance_m / initial_distance_m).log2())
}

/// Add `noise` to `audio` as if the noise source were `distance_m` away
/// instead of `initial_distance_m`.
///
/// The noise is attenuated by [`attenuation_db`] and reconciled to the
/// audio length before summing.
pub fn simulate_noise_at_distance(
    audio: &Waveform,
    noise: &Waveform,
    distance_m: f64,
    initial_distance_m: f64,
) -> Result<Waveform, AugmentError> {
    const NAME: &str = "simulate_noise_at_distance";
    let attenuation = attenuation_db(distance_m, initial_distance_m)?;
    let attenuated = noise.scaled(db_to_amplitude(attenuation));
    let attenuated = reconcile(&attenuated, audio.num_samples(), NAME, "noise")?;
    audio.sum(&attenuated, NAME)
}

/// `reconcile_length` with the caller's name in any error.
fn reconcile(
    secondary: &Waveform,
    target_len: usize,
    transform: &'static str,
    signal: &'static str,
) -> Result<Waveform, AugmentError> {
    reconcile_length(secondary, target_len).map_err(|e| match e {
        AugmentError::EmptySignal { .. } => AugmentError::EmptySignal { transform, signal },
        other => other,
    })
}
