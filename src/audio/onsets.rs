use crate::audio::spectrum::SpectrumScanner;
use crate::config::Sensitivity;

const FRAME_SIZE: usize = 2048;
const HOP_SIZE: usize = 512;

/// Detect transient onsets independent of rhythmic periodicity.
///
/// A high-frequency-content detection function is computed per frame, the
/// curve is normalized by its maximum, values below the sensitivity cutoff
/// are zeroed, and strict local maxima of what remains become onset times.
pub fn detect_onsets(samples: &[f32], sample_rate: u32, sensitivity: Sensitivity) -> Vec<f32> {
    let scanner = SpectrumScanner::new(FRAME_SIZE, HOP_SIZE);

    let mut odf: Vec<f32> = Vec::new();
    scanner.scan(samples, |_, magnitudes| {
        let hfc: f32 = magnitudes
            .iter()
            .enumerate()
            .map(|(k, &m)| k as f32 * m * m)
            .sum();
        odf.push(hfc);
    });

    let max = odf.iter().copied().fold(0.0f32, f32::max);
    if max > 0.0 {
        let cutoff = sensitivity.cutoff();
        for v in odf.iter_mut() {
            *v /= max;
            if *v < cutoff {
                *v = 0.0;
            }
        }
    }

    let onsets = pick_peaks(&odf, sample_rate);
    log::debug!(
        "Onset detection: {} frames, {} onsets at sensitivity {:?}",
        odf.len(),
        onsets.len(),
        sensitivity
    );
    onsets
}

/// Strict local maxima of the thresholded detection function. The first and
/// last frames have no two neighbors and are never picked.
fn pick_peaks(odf: &[f32], sample_rate: u32) -> Vec<f32> {
    let mut times = Vec::new();
    for i in 1..odf.len().saturating_sub(1) {
        if odf[i] > 0.0 && odf[i] > odf[i - 1] && odf[i] > odf[i + 1] {
            times.push((i * HOP_SIZE) as f32 / sample_rate as f32);
        }
    }
    times
}
