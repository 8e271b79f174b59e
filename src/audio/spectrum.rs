use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Fixed-size, fixed-hop magnitude spectrum scanner over a mono signal.
/// Frames start at sample 0 and only complete frames are analyzed.
pub struct SpectrumScanner {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    frame_size: usize,
    hop_size: usize,
}

impl SpectrumScanner {
    pub fn new(frame_size: usize, hop_size: usize) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        Self {
            fft: planner.plan_fft_forward(frame_size),
            window: hann_window(frame_size),
            frame_size,
            hop_size,
        }
    }

    /// Call `visit(frame_index, magnitudes)` for every complete frame, where
    /// `magnitudes` holds the first `frame_size / 2` bins of the Hann-windowed
    /// FFT.
    pub fn scan(&self, samples: &[f32], mut visit: impl FnMut(usize, &[f32])) {
        let half = self.frame_size / 2;
        let mut buffer: Vec<Complex<f32>> = vec![Complex::new(0.0, 0.0); self.frame_size];
        let mut magnitudes = vec![0.0f32; half];

        let mut pos = 0;
        let mut index = 0;
        while pos + self.frame_size <= samples.len() {
            for (i, &s) in samples[pos..pos + self.frame_size].iter().enumerate() {
                buffer[i] = Complex::new(s * self.window[i], 0.0);
            }
            self.fft.process(&mut buffer);
            for (m, c) in magnitudes.iter_mut().zip(buffer[..half].iter()) {
                *m = c.norm();
            }

            visit(index, &magnitudes);
            pos += self.hop_size;
            index += 1;
        }
    }
}

pub fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32).cos())
        })
        .collect()
}
