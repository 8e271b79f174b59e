/// Enforce a minimum gap between consecutive times with a greedy
/// left-to-right scan: the first time is always kept, every later time only
/// when it lands at least `min_gap` after the last kept one. Order-sensitive,
/// so callers wanting earliest-wins behavior must pass an ascending sequence.
pub fn smart_spacing(times: &[f32], min_gap: f32) -> Vec<f32> {
    let mut spaced: Vec<f32> = Vec::with_capacity(times.len());
    for &t in times {
        match spaced.last() {
            Some(&last) if t - last < min_gap => {}
            _ => spaced.push(t),
        }
    }
    spaced
}
