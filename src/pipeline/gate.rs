use crate::audio::loudness::LoudnessCurve;

/// Drop candidates that fall in perceptually quiet frames.
///
/// The threshold is the requested percentile of the frame loudness curve.
/// Each candidate maps to the frame with the nearest timestamp (the earliest
/// frame wins exact ties) and survives iff that frame's loudness >= threshold.
/// The comparison is inclusive, so when every frame has the same loudness all
/// candidates survive at any percentile, including 100.
pub fn filter_by_loudness(times: &[f32], curve: &LoudnessCurve, percentile: u8) -> Vec<f32> {
    if curve.values.is_empty() {
        log::warn!(
            "Loudness curve is empty (signal shorter than one frame); keeping all {} candidates",
            times.len()
        );
        return times.to_vec();
    }

    let threshold = percentile_of(&curve.values, percentile as f32);
    log::debug!("Loudness gate threshold (p{}): {:.4}", percentile, threshold);

    times
        .iter()
        .copied()
        .filter(|&t| curve.values[nearest_frame(&curve.timestamps, t)] >= threshold)
        .collect()
}

fn nearest_frame(timestamps: &[f32], t: f32) -> usize {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (i, &ts) in timestamps.iter().enumerate() {
        let dist = (ts - t).abs();
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}

/// Percentile with linear interpolation between closest ranks.
pub(crate) fn percentile_of(values: &[f32], p: f32) -> f32 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());

    let rank = p.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f32;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f32)
    }
}
