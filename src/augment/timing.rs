//! Transforms that move samples in time: speed/pitch change, time stretch
//! and echo.

use crate::dsp::delay::EchoLine;
use crate::dsp::resample::Resample;
use crate::error::{AugmentError, invalid};
use crate::waveform::{AudioClip, Waveform};

fn check_rate(transform: &'static str, sample_rate: u32) -> Result<(), AugmentError> {
    if sample_rate == 0 {
        return Err(invalid(transform, "sample_rate", 0.0, "> 0"));
    }
    Ok(())
}

fn check_factor(transform: &'static str, parameter: &'static str, factor: f64) -> Result<(), AugmentError> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(invalid(transform, parameter, factor, "a finite value > 0"));
    }
    Ok(())
}

/// Resample from `sample_rate` to `round(sample_rate / speed_factor)`.
///
/// The returned clip carries that new rate: at the new rate the buffer still
/// sounds like the input. Playing its samples back at the original
/// `sample_rate` is what changes speed and pitch together (faster and higher
/// for `speed_factor > 1`, slower and lower below 1). No pitch correction.
pub fn apply_speed_and_pitch_change(
    signal: &Waveform,
    sample_rate: u32,
    speed_factor: f64,
    resampler: &dyn Resample,
) -> Result<AudioClip, AugmentError> {
    const NAME: &str = "apply_speed_and_pitch_change";
    check_rate(NAME, sample_rate)?;
    check_factor(NAME, "speed_factor", speed_factor)?;

    let target = (sample_rate as f64 / speed_factor).round();
    if target < 1.0 || target > u32::MAX as f64 {
        return Err(invalid(
            NAME,
            "speed_factor",
            speed_factor,
            "a factor giving a target rate within 1..=u32::MAX Hz",
        ));
    }
    let new_rate = target as u32;

    log::debug!("{NAME}: {sample_rate} Hz -> {new_rate} Hz (x{speed_factor})");
    let waveform = resampler.resample(signal, sample_rate, new_rate)?;
    Ok(AudioClip::new(waveform, new_rate))
}

/// Resample up to `sample_rate * stretch_factor` and back to `sample_rate`.
///
/// This is a band-limited round trip, not a phase-vocoder time stretch: the
/// output keeps the input's rate and (up to rounding) its length, and the
/// only lasting effect is the low-pass imposed by the intermediate rate when
/// `stretch_factor < 1`. It trades fidelity to a true stretch for simplicity.
pub fn time_stretch(
    signal: &Waveform,
    sample_rate: u32,
    stretch_factor: f64,
    resampler: &dyn Resample,
) -> Result<Waveform, AugmentError> {
    const NAME: &str = "time_stretch";
    check_rate(NAME, sample_rate)?;
    check_factor(NAME, "stretch_factor", stretch_factor)?;

    let target = (sample_rate as f64 * stretch_factor).round();
    if target < 1.0 || target > u32::MAX as f64 {
        return Err(invalid(
            NAME,
            "stretch_factor",
            stretch_factor,
            "a factor giving an intermediate rate within 1..=u32::MAX Hz",
        ));
    }
    let stretched_rate = target as u32;

    let stretched = resampler.resample(signal, sample_rate, stretched_rate)?;
    resampler.resample(&stretched, stretched_rate, sample_rate)
}

/// Add decaying repeats of the signal onto itself every `delay_ms`.
///
/// Implements `y[n] = x[n] + decay * y[n - D]` with
/// `D = round(delay_ms * sample_rate / 1000)`; the k-th repeat has gain
/// `decay^k`. The output has the input's length, so repeats past the end are
/// cut off.
pub fn apply_echo(
    signal: &Waveform,
    sample_rate: u32,
    delay_ms: f64,
    decay: f64,
) -> Result<Waveform, AugmentError> {
    const NAME: &str = "apply_echo";
    check_rate(NAME, sample_rate)?;
    if !delay_ms.is_finite() || delay_ms <= 0.0 {
        return Err(invalid(NAME, "delay_ms", delay_ms, "a finite value > 0"));
    }
    if !(0.0..1.0).contains(&decay) {
        return Err(invalid(NAME, "decay", decay, "0 <= decay < 1"));
    }

    let delay_samples = (delay_ms * sample_rate as f64 / 1000.0).round();
    if delay_samples < 1.0 {
        return Err(invalid(
            NAME,
            "delay_ms",
            delay_ms,
            "a delay of at least one sample at this rate",
        ));
    }

    let mut line = EchoLine::new(delay_samples as usize, decay);
    Ok(signal.map_channels(|samples| line.process_block(samples)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::resample::output_len;
    use crate::test_support::{NearestResampler, tone};

    #[test]
    fn speed_change_reports_new_rate() {
        let resampler = NearestResampler::default();
        let x = tone(440.0, 16000, 16000);

        let fast = apply_speed_and_pitch_change(&x, 16000, 2.0, &resampler).unwrap();
        assert_eq!(fast.sample_rate, 8000);
        assert_eq!(fast.waveform.num_samples(), 8000);

        let slow = apply_speed_and_pitch_change(&x, 16000, 0.5, &resampler).unwrap();
        assert_eq!(slow.sample_rate, 32000);
        assert_eq!(slow.waveform.num_samples(), 32000);
    }

    #[test]
    fn speed_change_rounds_target_rate() {
        let resampler = NearestResampler::default();
        let x = tone(440.0, 16000, 1600);
        let clip = apply_speed_and_pitch_change(&x, 16000, 1.1, &resampler).unwrap();
        assert_eq!(clip.sample_rate, 14545);
        assert_eq!(clip.waveform.num_samples(), output_len(1600, 16000, 14545));
    }

    #[test]
    fn speed_change_rejects_non_positive_factor() {
        let resampler = NearestResampler::default();
        let x = tone(440.0, 16000, 100);
        for factor in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = apply_speed_and_pitch_change(&x, 16000, factor, &resampler).unwrap_err();
            assert!(
                matches!(err, AugmentError::InvalidParameter { parameter: "speed_factor", .. }),
                "{factor}: {err:?}"
            );
        }
        assert_eq!(resampler.call_count(), 0);
    }

    #[test]
    fn time_stretch_round_trips_rate_and_length() {
        let resampler = NearestResampler::default();
        let x = tone(440.0, 16000, 4000);
        let y = time_stretch(&x, 16000, 1.25, &resampler).unwrap();
        assert_eq!(y.num_samples(), 4000);
        assert_eq!(resampler.call_count(), 2);

        // Integer nearest-neighbour upsampling followed by decimation is lossless.
        let z = time_stretch(&x, 16000, 2.0, &resampler).unwrap();
        assert_eq!(z, x);
    }

    #[test]
    fn time_stretch_keeps_impulses_in_place() {
        let resampler = crate::dsp::resample::SincResampler::default();
        for at in [40_usize, 4000] {
            let mut samples = vec![0.0_f32; 8000];
            samples[at] = 1.0;
            let y = time_stretch(&Waveform::mono(samples), 16000, 2.0, &resampler).unwrap();
            let out = y.channel(0);
            let peak = (0..out.len())
                .max_by(|&i, &j| out[i].abs().total_cmp(&out[j].abs()))
                .unwrap();
            assert!((peak as i64 - at as i64).abs() <= 1, "impulse at {at} peaked at {peak}");
            assert!(out[peak].abs() > 0.5, "impulse at {at} lost energy: {}", out[peak]);
        }
    }

    #[test]
    fn time_stretch_rejects_bad_factor() {
        let resampler = NearestResampler::default();
        let x = tone(440.0, 16000, 100);
        assert!(time_stretch(&x, 16000, 0.0, &resampler).is_err());
        assert!(time_stretch(&x, 16000, -2.0, &resampler).is_err());
    }

    #[test]
    fn echo_repeats_impulse() {
        let mut samples = vec![0.0_f32; 1000];
        samples[0] = 1.0;
        let x = Waveform::mono(samples);
        // 25 ms at 8 kHz = 200 samples
        let y = apply_echo(&x, 8000, 25.0, 0.5).unwrap();

        assert_eq!(y.num_samples(), 1000);
        assert!((y.channel(0)[200] - 0.5).abs() < 1e-6);
        assert!((y.channel(0)[400] - 0.25).abs() < 1e-6);
        assert!((y.channel(0)[800] - 0.0625).abs() < 1e-6);
        assert!(y.channel(0)[100].abs() < 1e-6);
    }

    #[test]
    fn echo_with_zero_decay_is_identity() {
        let x = tone(440.0, 16000, 500);
        assert_eq!(apply_echo(&x, 16000, 10.0, 0.0).unwrap(), x);
    }

    #[test]
    fn echo_validates_parameters() {
        let x = tone(440.0, 16000, 100);
        assert!(apply_echo(&x, 16000, 0.0, 0.5).is_err());
        assert!(apply_echo(&x, 16000, -3.0, 0.5).is_err());
        assert!(apply_echo(&x, 16000, 10.0, 1.0).is_err());
        assert!(apply_echo(&x, 16000, 10.0, -0.1).is_err());
        // 0.01 ms at 16 kHz rounds to zero samples.
        assert!(apply_echo(&x, 16000, 0.01, 0.5).is_err());
    }
}
