/// `MM:SS:mmm` for the beats text file. Milliseconds are truncated, never
/// rounded up into the next second, and minutes grow without an hour wrap.
pub fn format_timestamp(seconds: f32) -> String {
    let minutes = (seconds / 60.0).floor() as u32;
    let secs = (seconds % 60.0).floor() as u32;
    let millis = ((seconds - seconds.floor()) * 1000.0).floor() as u32;
    format!("{:02}:{:02}:{:03}", minutes, secs, millis)
}

/// SMPTE `HH:MM:SS:FF` timecode, non-drop-frame. `fps` must be positive;
/// hours grow without wrapping.
pub fn seconds_to_timecode(seconds: f32, fps: u32) -> String {
    let hours = (seconds / 3600.0).floor() as u32;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as u32;
    let secs = (seconds % 60.0).floor() as u32;
    let frames = ((seconds % 1.0) * fps as f32).floor() as u32;
    format!("{:02}:{:02}:{:02}:{:02}", hours, minutes, secs, frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn milliseconds_truncate_without_carry() {
        assert_eq!(format_timestamp(0.9995), "00:00:999");
        assert_eq!(format_timestamp(0.0), "00:00:000");
        assert_eq!(format_timestamp(1.5), "00:01:500");
    }

    #[test]
    fn minutes_do_not_wrap_into_hours() {
        assert_eq!(format_timestamp(3725.25), "62:05:250");
    }

    #[test]
    fn timecode_splits_into_fields() {
        assert_eq!(seconds_to_timecode(65.5, 30), "00:01:05:15");
        assert_eq!(seconds_to_timecode(0.0, 30), "00:00:00:00");
        assert_eq!(seconds_to_timecode(3661.0, 30), "01:01:01:00");
    }

    #[test]
    fn frame_number_truncates() {
        // 0.999 * 24 = 23.976 -> frame 23, never 24
        assert_eq!(seconds_to_timecode(0.999, 24), "00:00:00:23");
    }

    #[test]
    fn frame_rate_scales_the_frame_field() {
        assert_eq!(seconds_to_timecode(2.5, 24), "00:00:02:12");
        assert_eq!(seconds_to_timecode(2.5, 60), "00:00:02:30");
    }
}
