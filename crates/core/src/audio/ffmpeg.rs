//! FFmpeg-backed decoding for containers Symphonia does not read (flv).
//!
//! The binary is looked up in the usual install locations first, then on
//! `PATH`. Its output is requested as 16-bit little-endian stereo PCM.

use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
    process::Command,
};

use super::{pcm, AudioSegment};
use crate::{Result, VisualizerError};

const OUTPUT_RATE: u32 = 44_100;
const OUTPUT_CHANNELS: u16 = 2;

const INSTALL_HINT: &str = "ffmpeg not found. Please install ffmpeg:\n\
     macOS: brew install ffmpeg\n\
     Linux: apt install ffmpeg (Debian/Ubuntu) or dnf install ffmpeg (Fedora)\n\
     Windows: Download from https://ffmpeg.org/download.html";

/// Locates the ffmpeg binary, or reports it as a missing decoder.
pub fn find_ffmpeg() -> Result<PathBuf> {
    let candidates: &[&str] = if cfg!(target_os = "macos") {
        &[
            "/opt/homebrew/bin/ffmpeg",
            "/usr/local/bin/ffmpeg",
            "/usr/bin/ffmpeg",
        ]
    } else if cfg!(target_os = "linux") {
        &["/usr/bin/ffmpeg", "/usr/local/bin/ffmpeg", "/snap/bin/ffmpeg"]
    } else if cfg!(target_os = "windows") {
        &[
            "C:\\ffmpeg\\bin\\ffmpeg.exe",
            "C:\\Program Files\\ffmpeg\\bin\\ffmpeg.exe",
        ]
    } else {
        &[]
    };

    let candidates: Vec<PathBuf> = candidates.iter().map(PathBuf::from).collect();
    find_ffmpeg_in(&candidates, env::var_os("PATH"))
}

/// Looks for ffmpeg among `candidates`, then in each directory of `path_var`.
pub(crate) fn find_ffmpeg_in(candidates: &[PathBuf], path_var: Option<OsString>) -> Result<PathBuf> {
    if let Some(path) = candidates.iter().find(|p| p.is_file()).cloned() {
        tracing::debug!("Found ffmpeg at: {}", path.display());
        return Ok(path);
    }

    let binary = if cfg!(target_os = "windows") {
        "ffmpeg.exe"
    } else {
        "ffmpeg"
    };
    path_var
        .and_then(|paths| {
            env::split_paths(&paths)
                .map(|dir| dir.join(binary))
                .find(|p| p.is_file())
        })
        .inspect(|path| tracing::debug!("Found ffmpeg in PATH at: {}", path.display()))
        .ok_or_else(|| VisualizerError::DecoderUnavailable {
            format: "flv".to_string(),
            remediation: INSTALL_HINT.to_string(),
        })
}

pub(crate) fn decode_with_ffmpeg(path: &Path) -> Result<AudioSegment> {
    decode_with_located_ffmpeg(path, find_ffmpeg)
}

fn decode_with_located_ffmpeg(
    path: &Path,
    locate: impl FnOnce() -> Result<PathBuf>,
) -> Result<AudioSegment> {
    if !path.is_file() {
        return Err(VisualizerError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }

    let ffmpeg = locate()?;
    let output = Command::new(&ffmpeg)
        .args(["-v", "error", "-i"])
        .arg(path)
        .args(["-f", "s16le", "-acodec", "pcm_s16le"])
        .arg("-ac")
        .arg(OUTPUT_CHANNELS.to_string())
        .arg("-ar")
        .arg(OUTPUT_RATE.to_string())
        .arg("-")
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(VisualizerError::decode(format!(
            "ffmpeg exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    let samples = pcm::samples_from_le_bytes(&output.stdout, 2)?;
    Ok(AudioSegment::new(samples, OUTPUT_RATE, OUTPUT_CHANNELS, 2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("terminal-visualiser-{}-{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_ffmpeg_is_reported_with_install_hint() {
        let dir = empty_dir("no-ffmpeg");
        let path_var = env::join_paths([&dir]).unwrap();

        let err = find_ffmpeg_in(&[], Some(path_var)).unwrap_err();
        std::fs::remove_dir_all(&dir).ok();

        assert!(matches!(
            err,
            VisualizerError::DecoderUnavailable { ref format, .. } if format == "flv"
        ));
        assert!(err.to_string().contains("install ffmpeg"));
    }

    #[test]
    fn missing_path_variable_is_reported_as_unavailable() {
        let err = find_ffmpeg_in(&[], None).unwrap_err();
        assert!(matches!(err, VisualizerError::DecoderUnavailable { .. }));
    }

    #[test]
    fn finds_ffmpeg_on_path_after_candidates() {
        let dir = empty_dir("with-ffmpeg");
        let binary = dir.join(if cfg!(target_os = "windows") {
            "ffmpeg.exe"
        } else {
            "ffmpeg"
        });
        std::fs::write(&binary, b"").unwrap();
        let path_var = env::join_paths([&dir]).unwrap();

        let found = find_ffmpeg_in(&[dir.join("absent")], Some(path_var)).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(found, binary);
    }

    #[test]
    fn flv_without_ffmpeg_fails_with_missing_decoder() {
        let dir = empty_dir("flv-input");
        let input = dir.join("clip.flv");
        std::fs::write(&input, b"FLV").unwrap();

        let err = decode_with_located_ffmpeg(&input, || find_ffmpeg_in(&[], None)).unwrap_err();
        std::fs::remove_dir_all(&dir).ok();

        assert!(matches!(
            err,
            VisualizerError::DecoderUnavailable { ref format, .. } if format == "flv"
        ));
        assert!(err.to_string().starts_with("cannot decode flv files"));
    }

    #[test]
    fn missing_input_fails_before_spawning() {
        let err = decode_with_ffmpeg(Path::new("/definitely/not/here.flv")).unwrap_err();
        assert!(matches!(err, VisualizerError::Io(_)));
    }
}
