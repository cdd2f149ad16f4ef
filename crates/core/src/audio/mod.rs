//! Audio decoding front end. Every supported container is reduced to one flat
//! list of interleaved integer samples plus the metadata the timing planner
//! needs.

mod decode;
mod ffmpeg;
mod pcm;

use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{config::RawFormat, Result, VisualizerError};

pub use ffmpeg::find_ffmpeg;

/// Container formats accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    #[default]
    Mp3,
    Wav,
    Flv,
    Ogg,
    Raw,
}

impl FileType {
    pub const ALL: [FileType; 5] = [
        FileType::Mp3,
        FileType::Wav,
        FileType::Flv,
        FileType::Ogg,
        FileType::Raw,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FileType::Mp3 => "mp3",
            FileType::Wav => "wav",
            FileType::Flv => "flv",
            FileType::Ogg => "ogg",
            FileType::Raw => "raw",
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = VisualizerError;

    fn from_str(value: &str) -> Result<Self> {
        let lowered = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lowered)
            .ok_or_else(|| VisualizerError::UnsupportedFileType(value.to_string()))
    }
}

/// Decoded audio: interleaved signed samples and their layout.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSegment {
    samples: Vec<i32>,
    frame_rate: u32,
    channels: u16,
    sample_width: u8,
}

impl AudioSegment {
    pub fn new(samples: Vec<i32>, frame_rate: u32, channels: u16, sample_width: u8) -> Self {
        Self {
            samples,
            frame_rate,
            channels,
            sample_width,
        }
    }

    pub fn samples(&self) -> &[i32] {
        &self.samples
    }

    /// Sample frames per second.
    pub fn frame_rate(&self) -> u32 {
        self.frame_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Bytes per sample.
    pub fn sample_width(&self) -> u8 {
        self.sample_width
    }

    /// Largest magnitude a sample of this width can hold, e.g. 32768 for
    /// 16-bit audio.
    pub fn max_possible_amplitude(&self) -> f64 {
        let bits = u32::from(self.sample_width) * 8;
        2f64.powi(bits.saturating_sub(1) as i32)
    }

    pub fn duration_seconds(&self) -> f64 {
        if self.frame_rate == 0 || self.channels == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.channels) / f64::from(self.frame_rate)
    }

    /// Every other sample, starting with the first. For interleaved stereo
    /// this is the left channel.
    pub fn stride_samples(&self) -> Vec<i32> {
        self.samples.iter().step_by(2).copied().collect()
    }
}

/// Decodes `path` as `file_type`. `raw` describes the layout of headerless PCM
/// and is ignored for other formats.
pub fn open_file(path: impl AsRef<Path>, file_type: FileType, raw: &RawFormat) -> Result<AudioSegment> {
    let path = path.as_ref();
    let segment = match file_type {
        FileType::Mp3 | FileType::Wav | FileType::Ogg => decode::decode_file(path, file_type)?,
        FileType::Flv => ffmpeg::decode_with_ffmpeg(path)?,
        FileType::Raw => {
            raw.validate()?;
            let bytes = std::fs::read(path)?;
            let samples = pcm::samples_from_le_bytes(&bytes, raw.sample_width)?;
            AudioSegment::new(samples, raw.sample_rate, raw.channels, raw.sample_width)
        }
    };

    tracing::debug!(
        path = %path.display(),
        %file_type,
        samples = segment.samples.len(),
        frame_rate = segment.frame_rate,
        channels = segment.channels,
        duration = segment.duration_seconds(),
        "decoded audio"
    );
    Ok(segment)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("terminal-visualiser-{}-{name}", std::process::id()))
    }

    fn wav_bytes(samples: &[i16], channels: u16, rate: u32) -> Vec<u8> {
        let data_len = (samples.len() * 2) as u32;
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes());
        bytes.extend_from_slice(&channels.to_le_bytes());
        bytes.extend_from_slice(&rate.to_le_bytes());
        bytes.extend_from_slice(&(rate * u32::from(channels) * 2).to_le_bytes());
        bytes.extend_from_slice(&(channels * 2).to_le_bytes());
        bytes.extend_from_slice(&16u16.to_le_bytes());
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        for sample in samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn parses_file_types_case_insensitively() {
        assert_eq!("mp3".parse::<FileType>().unwrap(), FileType::Mp3);
        assert_eq!("OGG".parse::<FileType>().unwrap(), FileType::Ogg);
        assert_eq!(FileType::Flv.to_string(), "flv");

        let err = "aiff".parse::<FileType>().unwrap_err();
        assert!(matches!(err, VisualizerError::UnsupportedFileType(ref kind) if kind == "aiff"));
    }

    #[test]
    fn segment_reports_amplitude_and_duration() {
        let segment = AudioSegment::new(vec![0; 8_000], 2_000, 2, 2);
        assert_eq!(segment.max_possible_amplitude(), 32_768.0);
        assert_eq!(segment.duration_seconds(), 2.0);

        let narrow = AudioSegment::new(Vec::new(), 8_000, 1, 1);
        assert_eq!(narrow.max_possible_amplitude(), 128.0);
    }

    #[test]
    fn stride_keeps_every_other_sample() {
        let segment = AudioSegment::new(vec![1, -1, 2, -2, 3], 4, 2, 2);
        assert_eq!(segment.stride_samples(), vec![1, 2, 3]);
    }

    #[test]
    fn opens_raw_pcm_with_configured_layout() {
        let path = temp_path("raw.pcm");
        let samples: [i16; 4] = [100, -100, i16::MAX, i16::MIN];
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        std::fs::write(&path, bytes).unwrap();

        let raw = RawFormat {
            sample_rate: 8_000,
            ..Default::default()
        };
        let segment = open_file(&path, FileType::Raw, &raw).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(segment.samples(), &[100, -100, 32_767, -32_768]);
        assert_eq!(segment.frame_rate(), 8_000);
        assert_eq!(segment.channels(), 2);
    }

    #[test]
    fn raw_layout_is_validated_before_reading() {
        let raw = RawFormat {
            sample_width: 3,
            ..Default::default()
        };
        let err = open_file(temp_path("missing.pcm"), FileType::Raw, &raw).unwrap_err();
        assert!(matches!(err, VisualizerError::InvalidConfig(_)));
    }

    #[test]
    fn decodes_wav_through_symphonia() {
        let path = temp_path("tone.wav");
        let samples: Vec<i16> = vec![0, 0, 1_000, -1_000, 2_000, -2_000, 3_000, -3_000];
        std::fs::write(&path, wav_bytes(&samples, 2, 8_000)).unwrap();

        let segment = open_file(&path, FileType::Wav, &RawFormat::default()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(segment.frame_rate(), 8_000);
        assert_eq!(segment.channels(), 2);
        assert_eq!(segment.max_possible_amplitude(), 32_768.0);
        assert_eq!(segment.stride_samples(), vec![0, 1_000, 2_000, 3_000]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = open_file(temp_path("absent.mp3"), FileType::Mp3, &RawFormat::default())
            .unwrap_err();
        assert!(matches!(err, VisualizerError::Io(_)));
    }
}
