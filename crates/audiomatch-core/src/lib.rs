//! audiomatch core - acoustic fingerprinting and matching
//!
//! Decoded PCM bytes are cut into fixed frames, each frame is transformed
//! with a radix-2 FFT, running per-band spectral peaks are hashed into one
//! token per frame, and two token sequences are scored against a
//! self-calibrated baseline.

pub mod audio;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod frame;
pub mod matching;
pub mod store;
pub mod transform;

pub use config::MatchConfig;
pub use error::{AudioMatchError, Result};
pub use fingerprint::{Fingerprint, FingerprintGenerator, PeakTracker};
pub use frame::SampleStream;
pub use matching::{score, MatchOutcome, MatchReport, Matcher};
pub use store::{FingerprintStore, SourceEntry};

use std::path::Path;

/// Build the fingerprint of one sample stream with the default band
/// boundaries. `frame_length` must be a power of two no larger than the
/// default frame length.
pub fn build_fingerprint(stream: &SampleStream, frame_length: usize) -> Result<Fingerprint> {
    let config = MatchConfig {
        frame_length,
        ..MatchConfig::default()
    };
    Ok(FingerprintGenerator::new(&config)?.generate(stream))
}

/// Match two sources with the default configuration
pub fn is_match(
    fingerprint_a: &Fingerprint,
    duration_secs_a: f64,
    fingerprint_b: &Fingerprint,
    duration_secs_b: f64,
) -> bool {
    Matcher::default().is_match(fingerprint_a, duration_secs_a, fingerprint_b, duration_secs_b)
}

/// Decode an audio file and fingerprint it.
///
/// Returns the fingerprint with the source duration in seconds.
pub fn fingerprint_file(path: &Path, config: &MatchConfig) -> Result<(Fingerprint, f64)> {
    let audio = audio::decode_audio(path)?;
    let fingerprint = FingerprintGenerator::new(config)?.generate(&audio.sample_stream());
    Ok((fingerprint, audio.duration_secs()))
}
