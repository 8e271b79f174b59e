use crate::audio::spectrum::SpectrumScanner;
use crate::error::ProcessError;

const FRAME_SIZE: usize = 2048;
const HOP_SIZE: usize = 1024;

/// Minimum spacing enforced between raw beat candidates (seconds).
const MIN_BEAT_GAP: f32 = 0.1;

#[derive(Debug)]
pub struct BeatAnalysis {
    pub beat_times: Vec<f32>,
    /// Inter-beat interval regularity in [0, 1]. Logged, not otherwise used.
    pub confidence: f32,
    pub tempo_bpm: f32,
}

/// Track beats via positive spectral flux with an adaptive local-mean
/// threshold.
pub fn detect_beats(samples: &[f32], sample_rate: u32) -> Result<BeatAnalysis, ProcessError> {
    if samples.len() < FRAME_SIZE {
        return Err(ProcessError::Detection(format!(
            "signal too short for beat analysis: {} samples",
            samples.len()
        )));
    }

    let scanner = SpectrumScanner::new(FRAME_SIZE, HOP_SIZE);
    let mut prev_magnitudes = vec![0.0f32; FRAME_SIZE / 2];
    let mut flux_values: Vec<(f32, f32)> = Vec::new(); // (time, flux)

    scanner.scan(samples, |index, magnitudes| {
        let flux: f32 = magnitudes
            .iter()
            .zip(prev_magnitudes.iter())
            .map(|(cur, prev)| (cur - prev).max(0.0))
            .sum();
        let time = (index * HOP_SIZE) as f32 / sample_rate as f32;
        flux_values.push((time, flux));
        prev_magnitudes.copy_from_slice(magnitudes);
    });

    let beat_times = pick_beats(&flux_values);
    let tempo_bpm = estimate_tempo(&beat_times);
    let confidence = interval_regularity(&beat_times);

    Ok(BeatAnalysis {
        beat_times,
        confidence,
        tempo_bpm,
    })
}

fn pick_beats(flux_values: &[(f32, f32)]) -> Vec<f32> {
    if flux_values.is_empty() {
        return Vec::new();
    }

    let window = 20; // ~200ms of context at this hop rate
    let mut beat_times = Vec::new();

    for i in 0..flux_values.len() {
        let start = i.saturating_sub(window);
        let end = (i + window + 1).min(flux_values.len());
        let local_mean: f32 =
            flux_values[start..end].iter().map(|(_, f)| f).sum::<f32>() / (end - start) as f32;

        let threshold = local_mean * 1.5 + 0.01;
        if flux_values[i].1 <= threshold {
            continue;
        }

        let is_peak = (i == 0 || flux_values[i].1 >= flux_values[i - 1].1)
            && (i == flux_values.len() - 1 || flux_values[i].1 >= flux_values[i + 1].1);

        let far_enough = beat_times
            .last()
            .map_or(true, |&last: &f32| flux_values[i].0 - last > MIN_BEAT_GAP);

        if is_peak && far_enough {
            beat_times.push(flux_values[i].0);
        }
    }

    beat_times
}

fn estimate_tempo(beat_times: &[f32]) -> f32 {
    if beat_times.len() < 2 {
        return 120.0; // default
    }

    let intervals: Vec<f32> = beat_times.windows(2).map(|w| w[1] - w[0]).collect();

    // 60-200 BPM -> 0.3-1.0s intervals
    let mut reasonable: Vec<f32> = intervals
        .iter()
        .copied()
        .filter(|&i| (0.3..=1.0).contains(&i))
        .collect();

    if reasonable.is_empty() {
        return 120.0;
    }

    reasonable.sort_by(|a, b| a.partial_cmp(b).unwrap());
    60.0 / reasonable[reasonable.len() / 2]
}

/// 1 minus the normalized variance of inter-beat intervals, clamped to [0, 1].
fn interval_regularity(beat_times: &[f32]) -> f32 {
    if beat_times.len() < 3 {
        return 0.0;
    }
    let intervals: Vec<f32> = beat_times.windows(2).map(|w| w[1] - w[0]).collect();
    let mean = intervals.iter().sum::<f32>() / intervals.len() as f32;
    if mean <= 0.0 {
        return 0.0;
    }
    let variance =
        intervals.iter().map(|&i| (i - mean) * (i - mean)).sum::<f32>() / intervals.len() as f32;
    (1.0 - variance.sqrt() / mean).clamp(0.0, 1.0)
}
