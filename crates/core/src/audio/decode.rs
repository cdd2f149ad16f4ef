//! Container decoding through Symphonia.
//!
//! Probes the file, picks the default track and decodes every packet into
//! interleaved 16-bit samples.

use std::{fs::File, io, path::Path};

use symphonia::core::{
    audio::SampleBuffer,
    codecs::DecoderOptions,
    errors::Error as SymphoniaError,
    formats::FormatOptions,
    io::MediaSourceStream,
    meta::MetadataOptions,
    probe::Hint,
};

use super::{AudioSegment, FileType};
use crate::{Result, VisualizerError};

pub(crate) fn decode_file(path: &Path, file_type: FileType) -> Result<AudioSegment> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    hint.with_extension(file_type.as_str());

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;

    let mut format = probed.format;
    let track = format
        .default_track()
        .ok_or_else(|| VisualizerError::decode("no default audio track"))?;
    let track_id = track.id;
    let frame_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| VisualizerError::decode("unknown sample rate"))?;
    let mut channels = track.codec_params.channels.map(|c| c.count() as u16);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())?;

    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err)) if err.kind() == io::ErrorKind::UnexpectedEof => {
                break
            }
            Err(err) => return Err(err.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(reason)) => {
                tracing::warn!(reason, "skipping undecodable packet");
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        let spec = *decoded.spec();
        if channels.is_none() {
            channels = Some(spec.channels.count() as u16);
        }
        let mut buffer = SampleBuffer::<i16>::new(decoded.capacity() as u64, spec);
        buffer.copy_interleaved_ref(decoded);
        samples.extend(buffer.samples().iter().map(|&s| i32::from(s)));
    }

    Ok(AudioSegment::new(samples, frame_rate, channels.unwrap_or(2), 2))
}
