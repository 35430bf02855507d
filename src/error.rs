//! Error types shared by the clock library.

use thiserror::Error;

/// Failure to read a bare "HH:MM" clock-time string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("expected HH:MM, got {0:?}")]
    MissingField(String),

    #[error("invalid number {field:?} in {input:?}")]
    InvalidNumber { input: String, field: String },

    #[error("hour {0} out of range 0-23")]
    HourOutOfRange(u32),

    #[error("minute {0} out of range 0-59")]
    MinuteOutOfRange(u32),
}

/// Failure to hand an utterance to the speech engine.
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("speech synthesis is not available: {0}")]
    Unavailable(String),

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}
