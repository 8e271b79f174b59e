pub mod beats;
pub mod decode;
pub mod loudness;
pub mod onsets;
pub mod spectrum;
