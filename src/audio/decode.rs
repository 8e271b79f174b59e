use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use uuid::Uuid;

use crate::error::ProcessError;

/// A fully decoded mono signal.
#[derive(Debug)]
pub struct MonoAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl MonoAudio {
    pub fn duration(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Decode an audio file to mono f32 samples. Multi-channel input is averaged
/// down to one channel.
pub fn decode_audio(path: &Path) -> Result<MonoAudio, ProcessError> {
    let file = std::fs::File::open(path)
        .map_err(|e| ProcessError::Input(format!("cannot open {}: {}", path.display(), e)))?;

    let len = file
        .metadata()
        .map_err(|e| ProcessError::Input(e.to_string()))?
        .len();
    if len == 0 {
        return Err(ProcessError::Input(format!(
            "empty audio file: {}",
            path.display()
        )));
    }

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| ProcessError::Input(format!("unrecognized audio format: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .ok_or_else(|| ProcessError::Input("no audio tracks found".into()))?;

    let track_id = track.id;
    let channels = track.codec_params.channels.map_or(1, |c| c.count());
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| ProcessError::Input("unknown sample rate".into()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| ProcessError::Input(format!("cannot create decoder: {}", e)))?;

    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(ProcessError::Input(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            // Skip over damaged packets; the probe already vouched for the stream
            Err(symphonia::core::errors::Error::DecodeError(_)) => continue,
            Err(e) => return Err(ProcessError::Input(e.to_string())),
        };

        let spec = *decoded.spec();
        let mut buf = SampleBuffer::<f32>::new(decoded.frames() as u64, spec);
        buf.copy_interleaved_ref(decoded);

        if channels == 1 {
            samples.extend_from_slice(buf.samples());
        } else {
            for frame in buf.samples().chunks(channels) {
                samples.push(frame.iter().sum::<f32>() / channels as f32);
            }
        }
    }

    if samples.is_empty() {
        return Err(ProcessError::Input(format!(
            "no audio samples decoded from {}",
            path.display()
        )));
    }

    log::info!(
        "Decoded audio: {} samples, {}Hz, {:.1}s",
        samples.len(),
        sample_rate,
        samples.len() as f32 / sample_rate as f32
    );

    Ok(MonoAudio { samples, sample_rate })
}

/// Streamed input spooled to a temporary file. The file is removed when the
/// guard drops, on every exit path.
#[derive(Debug)]
pub struct SpooledInput {
    path: PathBuf,
}

impl SpooledInput {
    pub fn from_reader(reader: &mut impl Read) -> Result<Self, ProcessError> {
        let path = std::env::temp_dir().join(format!("beatmark-{}.audio", Uuid::new_v4()));
        let spool = Self { path };

        let mut file = std::fs::File::create(&spool.path)
            .map_err(|e| ProcessError::Input(format!("cannot create spool file: {}", e)))?;
        let written = std::io::copy(reader, &mut file)
            .map_err(|e| ProcessError::Input(format!("cannot spool input: {}", e)))?;
        file.flush()
            .map_err(|e| ProcessError::Input(e.to_string()))?;

        if written == 0 {
            return Err(ProcessError::Input("empty input stream".into()));
        }
        log::info!("Spooled {} bytes to {}", written, spool.path.display());
        Ok(spool)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SpooledInput {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal PCM16 mono RIFF/WAVE writer for fixtures.
    fn write_wav(path: &Path, samples: &[i16], sample_rate: u32) {
        let data_len = (samples.len() * 2) as u32;
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVEfmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
        bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
        bytes.extend_from_slice(&sample_rate.to_le_bytes());
        bytes.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        bytes.extend_from_slice(&2u16.to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        for s in samples {
            bytes.extend_from_slice(&s.to_le_bytes());
        }
        std::fs::write(path, bytes).unwrap();
    }

    #[test]
    fn decodes_pcm_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tone.wav");
        let sr = 8000;
        let samples: Vec<i16> = (0..sr)
            .map(|i| {
                let t = i as f32 / sr as f32;
                ((2.0 * std::f32::consts::PI * 440.0 * t).sin() * 16000.0) as i16
            })
            .collect();
        write_wav(&path, &samples, sr as u32);

        let audio = decode_audio(&path).unwrap();
        assert_eq!(audio.sample_rate, 8000);
        assert_eq!(audio.samples.len(), 8000);
        assert!((audio.duration() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let err = decode_audio(Path::new("/nonexistent/beat.wav")).unwrap_err();
        assert!(matches!(err, ProcessError::Input(_)));
    }

    #[test]
    fn empty_file_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.wav");
        std::fs::write(&path, b"").unwrap();
        let err = decode_audio(&path).unwrap_err();
        assert!(matches!(err, ProcessError::Input(_)));
    }

    #[test]
    fn spool_is_deleted_on_drop() {
        let mut bytes: &[u8] = b"not really audio";
        let spool = SpooledInput::from_reader(&mut bytes).unwrap();
        let path = spool.path().to_path_buf();
        assert!(path.exists());
        drop(spool);
        assert!(!path.exists());
    }

    #[test]
    fn empty_stream_is_rejected_and_cleaned_up() {
        let mut bytes: &[u8] = b"";
        let err = SpooledInput::from_reader(&mut bytes).unwrap_err();
        assert!(matches!(err, ProcessError::Input(_)));
    }
}
