use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "beatmark", about = "Beat/onset marker generator for video editing")]
pub struct Cli {
    /// Input audio file (WAV, MP3, FLAC, OGG), or "-" to read from stdin
    pub input: Option<PathBuf>,

    /// EDL frame rate (non-drop-frame)
    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    /// Onset sensitivity (very_low, low, medium, high)
    #[arg(short, long, default_value = "low")]
    pub sensitivity: String,

    /// Loudness percentile below which markers are dropped (0-100)
    #[arg(short, long, default_value_t = 70)]
    pub loudness: u8,

    /// Minimum gap between markers in seconds
    #[arg(long, default_value_t = 0.5)]
    pub min_gap: f32,

    /// Use beat-tracker output only, skipping onset detection
    #[arg(long)]
    pub beats_only: bool,

    /// Window in seconds for absorbing onsets into nearby beats
    #[arg(long, default_value_t = 0.08)]
    pub snap: f32,

    /// Marker color (red, blue, green, yellow, purple, cyan, magenta, orange)
    #[arg(long, default_value = "red")]
    pub marker_color: String,

    /// Marker name prefix
    #[arg(long, default_value = "Beat")]
    pub marker_name: String,

    /// Omit [MM:SS:mmm] timestamps from marker names
    #[arg(long)]
    pub no_timestamps: bool,

    /// User id under which runs are filed in the store
    #[arg(short, long, default_value = "local")]
    pub user: String,

    /// Store root directory (artifacts and history)
    #[arg(long)]
    pub store_dir: Option<PathBuf>,

    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// List processing history and exit
    #[arg(long)]
    pub history: bool,

    /// Delete a history entry and its files by id
    #[arg(long, value_name = "ID")]
    pub delete: Option<String>,
}
