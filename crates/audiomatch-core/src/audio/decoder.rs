//! Audio decoding for multiple formats

use super::AudioFormat;
use crate::error::{AudioMatchError, Result};
use crate::frame::SampleStream;
use std::path::Path;

/// Decoded PCM payload and the stream parameters needed for its duration
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    /// Interleaved little-endian PCM bytes
    pub pcm: Vec<u8>,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    /// Samples per channel
    pub frame_count: u64,
}

impl DecodedAudio {
    /// Duration in seconds, `frame_count / sample_rate`
    pub fn duration_secs(&self) -> f64 {
        self.frame_count as f64 / self.sample_rate as f64
    }

    /// One sample per payload byte
    pub fn sample_stream(&self) -> SampleStream {
        SampleStream::from_pcm_bytes(&self.pcm)
    }
}

/// Decode an audio file synchronously. Returns once the whole payload is
/// available.
pub fn decode_audio(path: &Path) -> Result<DecodedAudio> {
    if !path.is_file() {
        return Err(AudioMatchError::NotFound(path.to_path_buf()));
    }

    let audio = match AudioFormat::from_path(path) {
        AudioFormat::Wav => decode_wav(path)?,
        AudioFormat::Mp3 => decode_mp3(path)?,
        AudioFormat::Flac => decode_flac(path)?,
        AudioFormat::Ogg => decode_ogg(path)?,
        AudioFormat::Unknown => {
            return Err(AudioMatchError::UnsupportedFormat(path.to_path_buf()));
        }
    };

    if audio.sample_rate == 0 || audio.channels == 0 {
        return Err(AudioMatchError::decode(path, "stream reports zero sample rate or channels"));
    }

    log::debug!(
        "Decoded {}: {} frames @ {}Hz, {} ch, {} bit, {} PCM bytes",
        path.display(),
        audio.frame_count,
        audio.sample_rate,
        audio.channels,
        audio.bits_per_sample,
        audio.pcm.len()
    );

    Ok(audio)
}

/// Append one integer sample as little-endian bytes of its container width.
/// 8-bit PCM is stored unsigned (offset binary).
fn push_int_sample(pcm: &mut Vec<u8>, sample: i32, bits_per_sample: u16) {
    if bits_per_sample <= 8 {
        pcm.push((sample + 128) as u8);
    } else {
        let width = ((bits_per_sample as usize + 7) / 8).min(4);
        pcm.extend_from_slice(&sample.to_le_bytes()[..width]);
    }
}

fn open_error(path: &Path, source: std::io::Error) -> AudioMatchError {
    AudioMatchError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// A file that ends inside its stream header
fn is_truncated(err: &std::io::Error) -> bool {
    err.kind() == std::io::ErrorKind::UnexpectedEof
}

/// Decode WAV file, keeping its own sample width
fn decode_wav(path: &Path) -> Result<DecodedAudio> {
    let mut reader = hound::WavReader::open(path).map_err(|e| match e {
        hound::Error::IoError(source) if !is_truncated(&source) => open_error(path, source),
        _ => AudioMatchError::UnsupportedFormat(path.to_path_buf()),
    })?;

    let spec = reader.spec();
    let frame_count = reader.duration() as u64;
    let mut pcm = Vec::with_capacity(reader.len() as usize * 2);

    match spec.sample_format {
        hound::SampleFormat::Float => {
            for sample in reader.samples::<f32>() {
                let sample = sample.map_err(|e| AudioMatchError::decode(path, e))?;
                pcm.extend_from_slice(&sample.to_le_bytes());
            }
        }
        hound::SampleFormat::Int => {
            for sample in reader.samples::<i32>() {
                let sample = sample.map_err(|e| AudioMatchError::decode(path, e))?;
                push_int_sample(&mut pcm, sample, spec.bits_per_sample);
            }
        }
    }

    Ok(DecodedAudio {
        pcm,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        bits_per_sample: spec.bits_per_sample,
        frame_count,
    })
}

/// Decode MP3 file to 16-bit PCM
fn decode_mp3(path: &Path) -> Result<DecodedAudio> {
    let file = std::fs::File::open(path).map_err(|e| open_error(path, e))?;

    let mut decoder = minimp3::Decoder::new(file);
    let mut pcm = Vec::new();
    let mut sample_rate = 0;
    let mut channels = 0;
    let mut samples = 0u64;

    loop {
        match decoder.next_frame() {
            Ok(frame) => {
                if sample_rate == 0 {
                    sample_rate = frame.sample_rate as u32;
                    channels = frame.channels as u16;
                }
                samples += frame.data.len() as u64;
                for sample in frame.data {
                    pcm.extend_from_slice(&sample.to_le_bytes());
                }
            }
            Err(minimp3::Error::Eof) => break,
            Err(minimp3::Error::SkippedData) => continue,
            Err(e) => return Err(AudioMatchError::decode(path, format!("MP3 decode error: {}", e))),
        }
    }

    if channels == 0 {
        return Err(AudioMatchError::UnsupportedFormat(path.to_path_buf()));
    }

    Ok(DecodedAudio {
        pcm,
        sample_rate,
        channels,
        bits_per_sample: 16,
        frame_count: samples / channels as u64,
    })
}

/// Decode FLAC file at its stream bit depth
fn decode_flac(path: &Path) -> Result<DecodedAudio> {
    let mut reader = claxon::FlacReader::open(path).map_err(|e| match e {
        claxon::Error::IoError(source) if !is_truncated(&source) => open_error(path, source),
        _ => AudioMatchError::UnsupportedFormat(path.to_path_buf()),
    })?;

    let info = reader.streaminfo();
    let bits_per_sample = info.bits_per_sample as u16;
    let channels = info.channels as u16;

    let mut pcm = Vec::new();
    let mut samples = 0u64;
    for sample in reader.samples() {
        let sample = sample.map_err(|e| AudioMatchError::decode(path, e))?;
        push_int_sample(&mut pcm, sample, bits_per_sample);
        samples += 1;
    }

    Ok(DecodedAudio {
        pcm,
        sample_rate: info.sample_rate,
        channels,
        bits_per_sample,
        frame_count: samples / channels.max(1) as u64,
    })
}

/// Decode OGG Vorbis file to 16-bit PCM
fn decode_ogg(path: &Path) -> Result<DecodedAudio> {
    let file = std::fs::File::open(path).map_err(|e| open_error(path, e))?;

    let mut reader = lewton::inside_ogg::OggStreamReader::new(file)
        .map_err(|_| AudioMatchError::UnsupportedFormat(path.to_path_buf()))?;

    let sample_rate = reader.ident_hdr.audio_sample_rate;
    let channels = reader.ident_hdr.audio_channels as u16;

    let mut pcm = Vec::new();
    let mut samples = 0u64;
    while let Some(packet) = reader
        .read_dec_packet_itl()
        .map_err(|e| AudioMatchError::decode(path, e))?
    {
        samples += packet.len() as u64;
        for sample in packet {
            pcm.extend_from_slice(&sample.to_le_bytes());
        }
    }

    Ok(DecodedAudio {
        pcm,
        sample_rate,
        channels,
        bits_per_sample: 16,
        frame_count: samples / channels.max(1) as u64,
    })
}
