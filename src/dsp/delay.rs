//! Echo line — mono feedback delay producing decaying repeats.

/// A feedback comb: `y[n] = x[n] + decay * y[n - delay]`.
///
/// Each pass through the buffer attenuates the repeat by `decay`, so an
/// impulse yields echoes of amplitude `decay^k` every `delay_samples`.
#[derive(Debug, Clone)]
pub struct EchoLine {
    buffer: Vec<f32>,
    write_pos: usize,
    decay: f32,
}

impl EchoLine {
    /// Create an echo line. `delay_samples` must be at least 1.
    pub fn new(delay_samples: usize, decay: f64) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)],
            write_pos: 0,
            decay: decay as f32,
        }
    }

    /// Process one sample, returning the input plus the decayed repeat.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        // The slot about to be overwritten holds y[n - delay].
        let delayed = self.buffer[self.write_pos];
        let output = input + delayed * self.decay;
        self.buffer[self.write_pos] = output;
        self.write_pos = (self.write_pos + 1) % self.buffer.len();
        output
    }

    /// Run a whole channel from a silent buffer.
    pub fn process_block(&mut self, input: &[f32]) -> Vec<f32> {
        self.clear();
        input.iter().map(|&s| self.process(s)).collect()
    }

    /// Clear the delay buffer.
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.write_pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_decay_is_passthrough() {
        let mut echo = EchoLine::new(3, 0.0);
        let input = [0.5, -0.25, 1.0, 0.0, 0.75];
        assert_eq!(echo.process_block(&input), input.to_vec());
    }

    #[test]
    fn impulse_repeats_with_decay() {
        let mut echo = EchoLine::new(10, 0.5);
        let mut input = vec![0.0_f32; 35];
        input[0] = 1.0;
        let out = echo.process_block(&input);

        assert!((out[0] - 1.0).abs() < 1e-6);
        assert!((out[10] - 0.5).abs() < 1e-6);
        assert!((out[20] - 0.25).abs() < 1e-6);
        assert!((out[30] - 0.125).abs() < 1e-6);
        for (i, &s) in out.iter().enumerate() {
            if i % 10 != 0 {
                assert!(s.abs() < 1e-6, "Unexpected energy at sample {i}: {s}");
            }
        }
    }

    #[test]
    fn block_processing_resets_state() {
        let mut echo = EchoLine::new(2, 0.9);
        let input = [1.0_f32, 0.0, 0.0, 0.0];
        let first = echo.process_block(&input);
        let second = echo.process_block(&input);
        assert_eq!(first, second);
    }
}
