/// Combine beat and onset candidates into one ascending sequence.
///
/// Onsets within `snap_threshold` of their nearest beat are absorbed by that
/// beat (the beat is already present, so the onset simply disappears); onsets
/// farther away are kept as independent markers. Exact duplicates collapse.
/// When several beats are exactly equidistant from an onset the first beat in
/// input order wins.
pub fn snap_onsets_to_beats(beats: &[f32], onsets: &[f32], snap_threshold: f32) -> Vec<f32> {
    let mut merged: Vec<f32> = beats.to_vec();

    for &onset in onsets {
        let nearest = beats
            .iter()
            .copied()
            .min_by(|a, b| (a - onset).abs().partial_cmp(&(b - onset).abs()).unwrap());
        match nearest {
            Some(beat) if (beat - onset).abs() <= snap_threshold => {
                // absorbed into the existing beat
            }
            _ => merged.push(onset),
        }
    }

    merged.sort_by(|a, b| a.partial_cmp(b).unwrap());
    merged.dedup();
    merged
}
