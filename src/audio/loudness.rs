/// Analysis frame size for the loudness curve. Distinct from the onset frame
/// size; frames overlap 50%.
pub const FRAME_SIZE: usize = 4096;
pub const HOP_SIZE: usize = 2048;

/// Per-frame perceptual loudness over the whole signal, with parallel frame
/// timestamps. Computed fresh per run and discarded after the gate.
pub struct LoudnessCurve {
    pub timestamps: Vec<f32>,
    pub values: Vec<f32>,
}

/// Stevens' power law loudness (`energy^0.67`) per fixed-size frame starting
/// at sample 0. Only complete frames contribute.
pub fn loudness_curve(samples: &[f32], sample_rate: u32) -> LoudnessCurve {
    let mut timestamps = Vec::new();
    let mut values = Vec::new();

    let mut pos = 0;
    let mut index = 0usize;
    while pos + FRAME_SIZE <= samples.len() {
        let energy: f32 = samples[pos..pos + FRAME_SIZE].iter().map(|s| s * s).sum();
        values.push(energy.powf(0.67));
        timestamps.push((index * HOP_SIZE) as f32 / sample_rate as f32);
        pos += HOP_SIZE;
        index += 1;
    }

    log::debug!("Loudness curve: {} frames", values.len());
    LoudnessCurve { timestamps, values }
}
