//! Sample ingestion and framing
//!
//! Every byte of a decoded PCM payload becomes one signed scalar sample.
//! Sample width and channel interleaving are deliberately not interpreted:
//! the scoring thresholds were tuned against this byte-wise view, so
//! changing it changes every fingerprint.

/// Immutable sequence of scalar samples for one audio source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleStream {
    samples: Vec<f64>,
}

impl SampleStream {
    /// Interpret each PCM payload byte as a signed 8-bit sample
    pub fn from_pcm_bytes(bytes: &[u8]) -> Self {
        Self {
            samples: bytes.iter().map(|&b| b as i8 as f64).collect(),
        }
    }

    pub fn from_samples(samples: Vec<f64>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }

    /// Number of whole frames of `frame_length` samples
    pub fn frame_count(&self, frame_length: usize) -> usize {
        if frame_length == 0 {
            return 0;
        }
        self.samples.len() / frame_length
    }

    /// Non-overlapping frames of exactly `frame_length` samples.
    ///
    /// A trailing partial frame is dropped. Calling this again restarts
    /// from the first frame.
    pub fn frames(&self, frame_length: usize) -> Frames<'_> {
        Frames {
            inner: self.samples.chunks_exact(frame_length.max(1)),
            empty: frame_length == 0,
        }
    }
}

impl From<Vec<f64>> for SampleStream {
    fn from(samples: Vec<f64>) -> Self {
        Self::from_samples(samples)
    }
}

/// Iterator over the whole frames of a [`SampleStream`]
#[derive(Debug, Clone)]
pub struct Frames<'a> {
    inner: std::slice::ChunksExact<'a, f64>,
    empty: bool,
}

impl<'a> Iterator for Frames<'a> {
    type Item = &'a [f64];

    fn next(&mut self) -> Option<Self::Item> {
        if self.empty {
            return None;
        }
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.empty {
            (0, Some(0))
        } else {
            self.inner.size_hint()
        }
    }
}

impl ExactSizeIterator for Frames<'_> {}
