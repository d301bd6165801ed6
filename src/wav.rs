//! WAV decode/encode for waveform buffers.

use std::io::{Read, Seek, Write};

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::error::AugmentError;
use crate::waveform::{AudioClip, Waveform};

/// Decode a WAV stream into a clip, de-interleaving channels.
///
/// Integer PCM is scaled to [-1.0, 1.0); float PCM is taken as is.
pub fn read_wav<R: Read>(reader: R) -> Result<AudioClip, AugmentError> {
    let mut reader = WavReader::new(reader)?;
    let spec = reader.spec();
    let num_channels = spec.channels as usize;
    if num_channels == 0 {
        return Err(AugmentError::EmptySignal {
            transform: "read_wav",
            signal: "channel list",
        });
    }

    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = 1.0 / (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<_, _>>()?
        }
    };

    let frames = interleaved.len() / num_channels;
    let mut channels = vec![Vec::with_capacity(frames); num_channels];
    for frame in interleaved.chunks_exact(num_channels) {
        for (channel, &sample) in channels.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }

    log::debug!(
        "Decoded WAV: {} channel(s), {} frames at {} Hz",
        num_channels,
        frames,
        spec.sample_rate
    );
    Ok(AudioClip::new(Waveform::from_channels(channels)?, spec.sample_rate))
}

/// Encode a clip as 32-bit float WAV.
pub fn write_wav<W: Write + Seek>(clip: &AudioClip, writer: W) -> Result<(), AugmentError> {
    let spec = WavSpec {
        channels: clip.waveform.num_channels() as u16,
        sample_rate: clip.sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::new(writer, spec)?;
    for i in 0..clip.waveform.num_samples() {
        for channel in clip.waveform.channels() {
            writer.write_sample(channel[i])?;
        }
    }
    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn float_wav_preserves_samples() {
        let clip = AudioClip::new(
            Waveform::from_channels(vec![vec![0.0, 0.5, -0.25], vec![1.0, -1.0, 0.125]]).unwrap(),
            22050,
        );
        let mut buf = Cursor::new(Vec::new());
        write_wav(&clip, &mut buf).unwrap();

        buf.set_position(0);
        let decoded = read_wav(buf).unwrap();
        assert_eq!(decoded, clip);
    }

    #[test]
    fn int_wav_is_scaled() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut buf = Cursor::new(Vec::new());
        {
            let mut writer = WavWriter::new(&mut buf, spec).unwrap();
            for s in [0_i16, 16384, -32768] {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }

        buf.set_position(0);
        let clip = read_wav(buf).unwrap();
        assert_eq!(clip.sample_rate, 8000);
        assert_eq!(clip.waveform.channel(0), &[0.0, 0.5, -1.0]);
    }

    #[test]
    fn garbage_is_wav_error() {
        let err = read_wav(Cursor::new(b"not a wav file".to_vec())).unwrap_err();
        assert!(matches!(err, AugmentError::Wav(_)));
    }
}
