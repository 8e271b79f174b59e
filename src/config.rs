use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Onset detection sensitivity. Controls the cutoff applied to the normalized
/// detection function: lower sensitivity keeps only the strongest transients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sensitivity {
    VeryLow,
    Low,
    Medium,
    High,
}

impl Sensitivity {
    /// Parse a sensitivity name. Unknown names fall back to `low` (the
    /// processing default) with a warning rather than failing.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "very_low" => Sensitivity::VeryLow,
            "low" => Sensitivity::Low,
            "medium" => Sensitivity::Medium,
            "high" => Sensitivity::High,
            other => {
                log::warn!("Unknown sensitivity {:?}, falling back to \"low\"", other);
                Sensitivity::Low
            }
        }
    }

    /// Cutoff applied to the max-normalized onset detection function.
    pub fn cutoff(self) -> f32 {
        match self {
            Sensitivity::VeryLow => 0.6,
            Sensitivity::Low => 0.4,
            Sensitivity::Medium => 0.2,
            Sensitivity::High => 0.1,
        }
    }
}

/// Marker colors understood by EDL-consuming editors, with their 3-digit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerColor {
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Cyan,
    Magenta,
    Orange,
}

impl MarkerColor {
    /// Case-insensitive lookup. Unknown names fall back to red (`001`).
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "red" => MarkerColor::Red,
            "blue" => MarkerColor::Blue,
            "green" => MarkerColor::Green,
            "yellow" => MarkerColor::Yellow,
            "purple" => MarkerColor::Purple,
            "cyan" => MarkerColor::Cyan,
            "magenta" => MarkerColor::Magenta,
            "orange" => MarkerColor::Orange,
            other => {
                log::warn!("Unknown marker color {:?}, falling back to \"red\"", other);
                MarkerColor::Red
            }
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            MarkerColor::Red => "001",
            MarkerColor::Blue => "002",
            MarkerColor::Green => "003",
            MarkerColor::Yellow => "004",
            MarkerColor::Purple => "005",
            MarkerColor::Cyan => "006",
            MarkerColor::Magenta => "007",
            MarkerColor::Orange => "008",
        }
    }
}

/// The full set of processing options for one run. Immutable once sanitized;
/// a copy is embedded in the history record of every run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessConfig {
    pub fps: u32,
    pub sensitivity: Sensitivity,
    #[serde(rename = "loudness")]
    pub loudness_percentile: u8,
    pub min_gap: f32,
    pub beats_only: bool,
    pub snap_threshold: f32,
    pub marker_color: MarkerColor,
    pub marker_name: String,
    pub include_timestamps: bool,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            sensitivity: Sensitivity::Low,
            loudness_percentile: default_loudness(),
            min_gap: default_min_gap(),
            beats_only: false,
            snap_threshold: default_snap(),
            marker_color: MarkerColor::Red,
            marker_name: default_marker_name(),
            include_timestamps: true,
        }
    }
}

impl ProcessConfig {
    /// Clamp out-of-range values instead of erroring: the percentile lives in
    /// 0..=100, the gap and snap window must be non-negative, and the frame
    /// rate must be positive for timecode arithmetic.
    pub fn sanitized(mut self) -> Self {
        if self.fps == 0 {
            log::warn!("fps must be positive, using {}", default_fps());
            self.fps = default_fps();
        }
        if self.loudness_percentile > 100 {
            log::warn!("Loudness percentile {} clamped to 100", self.loudness_percentile);
            self.loudness_percentile = 100;
        }
        if self.min_gap < 0.0 {
            log::warn!("Negative min gap {} clamped to 0", self.min_gap);
            self.min_gap = 0.0;
        }
        if self.snap_threshold < 0.0 {
            log::warn!("Negative snap threshold {} clamped to 0", self.snap_threshold);
            self.snap_threshold = 0.0;
        }
        self
    }
}

/// On-disk TOML configuration, merged with the CLI in `main`.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub markers: MarkerFileConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize)]
pub struct DetectionConfig {
    #[serde(default = "default_sensitivity_name")]
    pub sensitivity: String,
    #[serde(default = "default_loudness")]
    pub loudness: u8,
    #[serde(default = "default_min_gap")]
    pub min_gap: f32,
    #[serde(default)]
    pub beats_only: bool,
    #[serde(default = "default_snap")]
    pub snap_threshold: f32,
}

#[derive(Debug, Deserialize)]
pub struct MarkerFileConfig {
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_color_name")]
    pub color: String,
    #[serde(default = "default_marker_name")]
    pub name: String,
    #[serde(default = "default_true")]
    pub include_timestamps: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct StoreConfig {
    pub dir: Option<PathBuf>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            sensitivity: default_sensitivity_name(),
            loudness: default_loudness(),
            min_gap: default_min_gap(),
            beats_only: false,
            snap_threshold: default_snap(),
        }
    }
}

impl Default for MarkerFileConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            color: default_color_name(),
            name: default_marker_name(),
            include_timestamps: true,
        }
    }
}

fn default_fps() -> u32 { 30 }
fn default_loudness() -> u8 { 70 }
fn default_min_gap() -> f32 { 0.5 }
fn default_snap() -> f32 { 0.08 }
fn default_sensitivity_name() -> String { "low".into() }
fn default_color_name() -> String { "red".into() }
fn default_marker_name() -> String { "Beat".into() }
fn default_true() -> bool { true }

pub fn load_config(path: &Path) -> Option<FileConfig> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}
