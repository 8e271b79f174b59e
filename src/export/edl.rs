use crate::config::ProcessConfig;

use super::timecode::{format_timestamp, seconds_to_timecode};

/// Render the final time sequence as a CMX-style EDL marker document.
///
/// Three header lines, then four lines per marker: the event line (in/out and
/// record in/out all equal for a zero-duration point marker), the clip name
/// comment, the `|M:` marker line, and a blank separator.
pub fn render(times: &[f32], cfg: &ProcessConfig) -> String {
    let mut lines = vec![
        "TITLE: Timeline Markers".to_string(),
        "FCM: NON-DROP FRAME".to_string(),
        String::new(),
    ];

    let code = cfg.marker_color.code();
    for (i, &t) in times.iter().enumerate() {
        let index = i + 1;
        let tc = seconds_to_timecode(t, cfg.fps);
        let name = marker_name(&cfg.marker_name, index, t, cfg.include_timestamps);

        lines.push(format!(
            "{:03}  {}      V     C        {} {} {} {}",
            index, code, tc, tc, tc, tc
        ));
        lines.push(format!("* FROM CLIP NAME: {}", name));
        lines.push(format!("|M:{}|{}", tc, name));
        lines.push(String::new());
    }

    lines.join("\n")
}

fn marker_name(prefix: &str, index: usize, t: f32, include_timestamp: bool) -> String {
    if include_timestamp {
        format!("{} {} [{}]", prefix, index, format_timestamp(t))
    } else {
        format!("{} {}", prefix, index)
    }
}
