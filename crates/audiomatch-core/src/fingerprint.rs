//! Fingerprint generation and hashing
//!
//! Each frame's spectrum is scanned band by band for the strongest
//! log-magnitude seen so far in the whole source. After every frame the four
//! running peak indices are hashed into one token, so the fingerprint records
//! how the running peaks move (or stay put) over time.

use crate::config::{MatchConfig, NUM_BANDS};
use crate::error::Result;
use crate::frame::SampleStream;
use crate::transform::{SpectralTransformer, Spectrum};
use serde::{Deserialize, Serialize};

/// Ordered hash tokens, one per frame of the source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint {
    tokens: Vec<String>,
}

impl Fingerprint {
    pub fn from_tokens(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Fingerprint {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            tokens: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Running per-band maxima for one source.
///
/// Starts at zero and is never reset between frames.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeakTracker {
    max_magnitudes: [f64; NUM_BANDS],
    peak_indices: [usize; NUM_BANDS],
}

impl PeakTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `magnitude` at `index` if it beats the band's running maximum.
    /// NaN never wins.
    pub fn observe(&mut self, band: usize, index: usize, magnitude: f64) {
        if band >= NUM_BANDS {
            return;
        }
        if magnitude > self.max_magnitudes[band] {
            self.max_magnitudes[band] = magnitude;
            self.peak_indices[band] = index;
        }
    }

    pub fn peak_indices(&self) -> &[usize; NUM_BANDS] {
        &self.peak_indices
    }

    pub fn max_magnitudes(&self) -> &[f64; NUM_BANDS] {
        &self.max_magnitudes
    }

    /// Decimal peak indices concatenated in band order
    pub fn key(&self) -> String {
        self.peak_indices.iter().map(|i| i.to_string()).collect()
    }

    /// Hash token for the current peak positions
    pub fn token(&self) -> String {
        string_hash(&self.key()).to_string()
    }
}

/// Deterministic 32-bit string hash (`s[0]*31^(n-1) + ... + s[n-1]`,
/// wrapping), computed over UTF-16 code units.
pub fn string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as i32))
}

/// Index of the band whose boundary is the smallest one strictly greater
/// than `index`
pub fn band_of(boundaries: &[usize; NUM_BANDS], index: usize) -> Option<usize> {
    boundaries.iter().position(|&b| b > index)
}

/// Fingerprint generator
#[derive(Debug, Clone)]
pub struct FingerprintGenerator {
    transformer: SpectralTransformer,
    band_boundaries: [usize; NUM_BANDS],
}

impl FingerprintGenerator {
    pub fn new(config: &MatchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            transformer: SpectralTransformer::new(config.frame_length)?,
            band_boundaries: config.band_boundaries,
        })
    }

    pub fn frame_length(&self) -> usize {
        self.transformer.frame_length()
    }

    /// Fold one spectrum into the tracker. The last bin is not scanned.
    pub fn accumulate(&self, tracker: &mut PeakTracker, spectrum: &Spectrum) {
        let scanned = spectrum.len().saturating_sub(1);
        for (index, &value) in spectrum.as_slice()[..scanned].iter().enumerate() {
            let magnitude = (value + 1.0).ln();
            if let Some(band) = band_of(&self.band_boundaries, index) {
                tracker.observe(band, index, magnitude);
            }
        }
    }

    /// Generate the fingerprint of one source
    pub fn generate(&self, stream: &SampleStream) -> Fingerprint {
        let frame_length = self.frame_length();
        let mut tracker = PeakTracker::new();
        let mut tokens = Vec::with_capacity(stream.frame_count(frame_length));

        for spectrum in self.transformer.spectra(stream.frames(frame_length)) {
            self.accumulate(&mut tracker, &spectrum);
            tokens.push(tracker.token());
        }

        log::debug!(
            "Fingerprinted {} samples into {} tokens (peaks {:?})",
            stream.len(),
            tokens.len(),
            tracker.peak_indices()
        );

        Fingerprint { tokens }
    }
}
