//! Biquad bandpass section — RBJ cookbook, constant 0 dB peak gain.

use std::f64::consts::PI;

/// A second-order IIR section.
///
/// Implements the Direct Form II Transposed structure with coefficients
/// normalized by `a0`. Coefficient formulas from the Audio EQ Cookbook
/// (Robert Bristow-Johnson).
#[derive(Debug, Clone)]
pub struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,

    // State (Direct Form II Transposed)
    z1: f64,
    z2: f64,
}

impl Biquad {
    /// Bandpass with unity gain at `centre_freq`.
    pub fn bandpass(sample_rate: f64, centre_freq: f64, q: f64) -> Self {
        let w0 = 2.0 * PI * centre_freq / sample_rate;
        let cos_w0 = w0.cos();
        let alpha = w0.sin() / (2.0 * q);

        let a0 = 1.0 + alpha;
        Biquad {
            b0: alpha / a0,
            b1: 0.0,
            b2: -alpha / a0,
            a1: -2.0 * cos_w0 / a0,
            a2: (1.0 - alpha) / a0,
            z1: 0.0,
            z2: 0.0,
        }
    }

    /// Bandpass spanning `low_freq..high_freq`: centred on their geometric
    /// mean with `Q = centre / bandwidth`.
    ///
    /// Callers validate `0 < low_freq < high_freq < sample_rate / 2`.
    pub fn bandpass_between(sample_rate: f64, low_freq: f64, high_freq: f64) -> Self {
        let centre = (low_freq * high_freq).sqrt();
        let q = centre / (high_freq - low_freq);
        Self::bandpass(sample_rate, centre, q)
    }

    /// Process a single sample through the filter.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let output = self.b0 * input + self.z1;
        self.z1 = self.b1 * input - self.a1 * output + self.z2;
        self.z2 = self.b2 * input - self.a2 * output;
        output
    }

    /// Filter a whole block from a zero state.
    pub fn process_block(&mut self, input: &[f32]) -> Vec<f32> {
        self.reset();
        input
            .iter()
            .map(|&s| self.process(s as f64) as f32)
            .collect()
    }

    /// Reset filter state.
    pub fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }
}
