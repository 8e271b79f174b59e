use thiserror::Error;

/// Failures surfaced by the processing pipeline.
///
/// An empty final marker sequence is not an error; it produces near-empty
/// artifacts and zeroed statistics.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Missing, empty, or undecodable input. No processing is attempted.
    #[error("invalid input: {0}")]
    Input(String),

    /// An analysis stage failed. Deterministic on the same bytes, so a retry
    /// would fail identically and none is attempted.
    #[error("detection failed: {0}")]
    Detection(String),
}
