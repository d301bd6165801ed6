use std::fmt;

/// Errors raised by the augmentation transforms.
///
/// Every variant carries the name of the transform that failed so a batch
/// driver can log and skip the offending sample.
#[derive(Debug, Clone, PartialEq)]
pub enum AugmentError {
    /// A scalar parameter is outside its valid domain.
    InvalidParameter {
        transform: &'static str,
        parameter: &'static str,
        value: f64,
        expected: &'static str,
    },
    /// Bandpass corner frequencies cannot form a valid filter at this rate.
    FilterDesign {
        low_freq: f64,
        high_freq: f64,
        sample_rate: u32,
        reason: &'static str,
    },
    /// The noise signal carries no energy, so no gain can reach the target SNR.
    SilentInput {
        transform: &'static str,
        signal: &'static str,
    },
    /// A signal has no samples (or no channels) where some are required.
    EmptySignal {
        transform: &'static str,
        signal: &'static str,
    },
    /// A step needs an input the caller did not supply.
    MissingInput {
        transform: &'static str,
        signal: &'static str,
    },
    /// Channel counts cannot be combined (neither equal nor mono).
    ChannelMismatch {
        transform: &'static str,
        left: usize,
        right: usize,
    },
    /// Two signals being summed differ in length.
    LengthMismatch {
        transform: &'static str,
        left: usize,
        right: usize,
    },
    /// Channels of a waveform differ in length.
    RaggedChannels {
        channel: usize,
        expected: usize,
        found: usize,
    },
    /// The resampling backend failed.
    Resample(String),
    /// A recipe could not be parsed.
    Config(String),
    /// WAV decoding or encoding failed.
    #[cfg(feature = "wav")]
    Wav(String),
}

impl fmt::Display for AugmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AugmentError::InvalidParameter {
                transform,
                parameter,
                value,
                expected,
            } => write!(
                f,
                "{transform}: invalid {parameter} = {value} (expected {expected})"
            ),
            AugmentError::FilterDesign {
                low_freq,
                high_freq,
                sample_rate,
                reason,
            } => write!(
                f,
                "apply_bandpass_filter: cannot design band {low_freq}..{high_freq} Hz at {sample_rate} Hz: {reason}"
            ),
            AugmentError::SilentInput { transform, signal } => {
                write!(f, "{transform}: {signal} signal is silent (zero RMS)")
            }
            AugmentError::EmptySignal { transform, signal } => {
                write!(f, "{transform}: {signal} signal is empty")
            }
            AugmentError::MissingInput { transform, signal } => {
                write!(f, "{transform}: no {signal} signal was supplied")
            }
            AugmentError::ChannelMismatch {
                transform,
                left,
                right,
            } => write!(
                f,
                "{transform}: cannot combine {left}-channel and {right}-channel signals"
            ),
            AugmentError::LengthMismatch {
                transform,
                left,
                right,
            } => write!(
                f,
                "{transform}: cannot sum signals of {left} and {right} samples"
            ),
            AugmentError::RaggedChannels {
                channel,
                expected,
                found,
            } => write!(
                f,
                "Channel {channel} has {found} samples, expected {expected}"
            ),
            AugmentError::Resample(msg) => write!(f, "Resampling error: {msg}"),
            AugmentError::Config(msg) => write!(f, "Recipe error: {msg}"),
            #[cfg(feature = "wav")]
            AugmentError::Wav(msg) => write!(f, "WAV error: {msg}"),
        }
    }
}

impl std::error::Error for AugmentError {}

impl From<serde_json::Error> for AugmentError {
    fn from(e: serde_json::Error) -> Self {
        AugmentError::Config(e.to_string())
    }
}

#[cfg(feature = "wav")]
impl From<hound::Error> for AugmentError {
    fn from(e: hound::Error) -> Self {
        AugmentError::Wav(e.to_string())
    }
}

/// Shorthand for an `InvalidParameter` error.
pub(crate) fn invalid(
    transform: &'static str,
    parameter: &'static str,
    value: f64,
    expected: &'static str,
) -> AugmentError {
    AugmentError::InvalidParameter {
        transform,
        parameter,
        value,
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_transform_and_parameter() {
        let e = invalid("apply_echo", "decay", 1.5, "0 <= decay < 1");
        let msg = e.to_string();
        assert!(msg.contains("apply_echo"), "{msg}");
        assert!(msg.contains("decay"), "{msg}");
        assert!(msg.contains("1.5"), "{msg}");
    }

    #[test]
    fn json_errors_become_config_errors() {
        let err = serde_json::from_str::<f64>("not json").unwrap_err();
        assert!(matches!(AugmentError::from(err), AugmentError::Config(_)));
    }
}
