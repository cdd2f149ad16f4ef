use crate::{Result, VisualizerError};

/// Unpacks signed little-endian PCM of `sample_width` bytes per sample.
/// A trailing partial sample is dropped.
pub(crate) fn samples_from_le_bytes(bytes: &[u8], sample_width: u8) -> Result<Vec<i32>> {
    let width = usize::from(sample_width);
    let chunks = match width {
        1 | 2 | 4 => bytes.chunks_exact(width),
        other => {
            return Err(VisualizerError::config(format!(
                "unsupported PCM sample width of {other} bytes"
            )))
        }
    };

    if !chunks.remainder().is_empty() {
        tracing::warn!(
            dropped = chunks.remainder().len(),
            "PCM data ends with a partial sample"
        );
    }

    let samples = chunks
        .map(|chunk| match *chunk {
            [a] => i32::from(a as i8),
            [a, b] => i32::from(i16::from_le_bytes([a, b])),
            [a, b, c, d] => i32::from_le_bytes([a, b, c, d]),
            _ => 0,
        })
        .collect();
    Ok(samples)
}
