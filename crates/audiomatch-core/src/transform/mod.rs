//! Spectral transform
//!
//! Iterative in-place radix-2 FFT over one frame at a time. Only the real
//! component of the output is kept and used downstream as the magnitude
//! proxy; the imaginary component is dropped.

use crate::error::{AudioMatchError, Result};
use crate::frame::Frames;
use rustfft::num_complex::Complex;
use std::f64::consts::PI;

/// Real part of the transform of one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    values: Vec<f64>,
}

impl Spectrum {
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Radix-2 FFT with a precomputed twiddle table
#[derive(Debug, Clone)]
pub struct Radix2Fft {
    size: usize,
    log2_size: u32,
    /// e^(-2*pi*i*k/size) for k in 0..size/2
    twiddles: Vec<Complex<f64>>,
}

impl Radix2Fft {
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 || !size.is_power_of_two() {
            return Err(AudioMatchError::Config(format!(
                "FFT size must be a power of two, got {}",
                size
            )));
        }

        let twiddles = (0..size / 2)
            .map(|k| {
                let angle = -2.0 * PI * k as f64 / size as f64;
                Complex::new(angle.cos(), angle.sin())
            })
            .collect();

        Ok(Self {
            size,
            log2_size: size.trailing_zeros(),
            twiddles,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Forward transform in place. `buffer.len()` must equal `self.size()`.
    fn process(&self, buffer: &mut [Complex<f64>]) {
        let n = self.size;
        if n < 2 {
            return;
        }

        // Bit-reversal permutation
        let shift = usize::BITS - self.log2_size;
        for i in 0..n {
            let j = i.reverse_bits() >> shift;
            if i < j {
                buffer.swap(i, j);
            }
        }

        // Butterflies
        let mut len = 2;
        while len <= n {
            let half = len / 2;
            let stride = n / len;
            for start in (0..n).step_by(len) {
                for k in 0..half {
                    let tw = self.twiddles[k * stride];
                    let u = buffer[start + k];
                    let v = buffer[start + k + half] * tw;
                    buffer[start + k] = u + v;
                    buffer[start + k + half] = u - v;
                }
            }
            len <<= 1;
        }
    }

    /// Transform a real-valued frame and keep the real part of the result.
    ///
    /// Frames shorter than the FFT size are zero-padded, longer ones are
    /// truncated.
    pub fn real_spectrum(&self, frame: &[f64]) -> Spectrum {
        let mut buffer: Vec<Complex<f64>> = frame
            .iter()
            .take(self.size)
            .map(|&s| Complex::new(s, 0.0))
            .collect();
        buffer.resize(self.size, Complex::new(0.0, 0.0));

        self.process(&mut buffer);

        Spectrum {
            values: buffer.into_iter().map(|c| c.re).collect(),
        }
    }
}

/// Per-frame spectral transformer
#[derive(Debug, Clone)]
pub struct SpectralTransformer {
    fft: Radix2Fft,
}

impl SpectralTransformer {
    pub fn new(frame_length: usize) -> Result<Self> {
        Ok(Self {
            fft: Radix2Fft::new(frame_length)?,
        })
    }

    pub fn frame_length(&self) -> usize {
        self.fft.size()
    }

    pub fn transform(&self, frame: &[f64]) -> Spectrum {
        self.fft.real_spectrum(frame)
    }

    /// Lazily transform a frame sequence, one spectrum per frame
    pub fn spectra<'a>(&'a self, frames: Frames<'a>) -> impl Iterator<Item = Spectrum> + 'a {
        frames.map(move |frame| self.transform(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rustfft::FftPlanner;

    #[test]
    fn test_rejects_non_power_of_two() {
        assert!(Radix2Fft::new(0).is_err());
        assert!(Radix2Fft::new(1000).is_err());
        assert!(Radix2Fft::new(1024).is_ok());
    }

    #[test]
    fn test_dc_frame() {
        let fft = Radix2Fft::new(8).unwrap();
        let spectrum = fft.real_spectrum(&[1.0; 8]);
        assert_abs_diff_eq!(spectrum.as_slice()[0], 8.0, epsilon = 1e-12);
        for &v in &spectrum.as_slice()[1..] {
            assert_abs_diff_eq!(v, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_cosine_lands_in_its_bin() {
        let n = 64;
        let bin = 5;
        let frame: Vec<f64> = (0..n)
            .map(|i| (2.0 * PI * bin as f64 * i as f64 / n as f64).cos())
            .collect();

        let spectrum = Radix2Fft::new(n).unwrap().real_spectrum(&frame);
        assert_abs_diff_eq!(spectrum.as_slice()[bin], n as f64 / 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(spectrum.as_slice()[n - bin], n as f64 / 2.0, epsilon = 1e-9);
        assert_abs_diff_eq!(spectrum.as_slice()[bin + 1], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_matches_reference_fft() {
        let n = 1024;
        let frame: Vec<f64> = (0..n)
            .map(|i| ((i * 37 + 11) % 256) as f64 - 128.0)
            .collect();

        let ours = Radix2Fft::new(n).unwrap().real_spectrum(&frame);

        let mut reference: Vec<Complex<f64>> =
            frame.iter().map(|&s| Complex::new(s, 0.0)).collect();
        FftPlanner::<f64>::new().plan_fft_forward(n).process(&mut reference);

        for (a, b) in ours.as_slice().iter().zip(reference.iter()) {
            assert_abs_diff_eq!(*a, b.re, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_real_part_can_be_negative() {
        // An inverted cosine puts negative energy in the real part.
        let n = 16;
        let frame: Vec<f64> = (0..n)
            .map(|i| -(2.0 * PI * 3.0 * i as f64 / n as f64).cos())
            .collect();
        let spectrum = Radix2Fft::new(n).unwrap().real_spectrum(&frame);
        assert!(spectrum.as_slice()[3] < -1.0);
    }

    #[test]
    fn test_short_frame_is_zero_padded() {
        let fft = Radix2Fft::new(4).unwrap();
        let padded = fft.real_spectrum(&[1.0, 1.0]);
        let explicit = fft.real_spectrum(&[1.0, 1.0, 0.0, 0.0]);
        assert_eq!(padded, explicit);
        assert_eq!(padded.len(), 4);
    }

    #[test]
    fn test_spectra_per_frame() {
        let stream = crate::frame::SampleStream::from_samples(vec![0.0; 2048 + 10]);
        let transformer = SpectralTransformer::new(1024).unwrap();
        let spectra: Vec<_> = transformer.spectra(stream.frames(1024)).collect();
        assert_eq!(spectra.len(), 2);
        assert!(spectra.iter().all(|s| s.len() == 1024));
    }
}
