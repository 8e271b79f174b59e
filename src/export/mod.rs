pub mod edl;
pub mod timecode;

use self::timecode::format_timestamp;

/// Plain-text beats file content: one `MM:SS:mmm` timestamp per line.
pub fn beats_text(times: &[f32]) -> String {
    times
        .iter()
        .map(|&t| format_timestamp(t))
        .collect::<Vec<_>>()
        .join("\n")
}
