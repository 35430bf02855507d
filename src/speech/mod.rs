//! Speech output: Korean narration of clock readings.
//!
//! Components:
//! - `Narrator`: capability interface over a platform voice engine
//! - `command`: narrator backed by an external speech program (espeak-ng, spd-say)
//! - `speaker`: single-utterance adapter with preemption and the shared
//!   "speaking" state the clock ticker follows

pub mod command;
pub mod speaker;

use std::sync::Arc;

use tracing::info;

use crate::config::SpeechConfig;
use crate::error::SpeechError;

pub use command::{CommandNarrator, SpeechBackend};
pub use speaker::Speaker;

/// Text plus the voice parameters it should be spoken with.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    /// BCP 47 tag, e.g. "ko-KR"
    pub locale: String,
    /// 1.0 is the engine's normal speed.
    pub rate: f32,
    /// 1.0 is the engine's normal pitch.
    pub pitch: f32,
    /// 0.0 silent to 1.0 full.
    pub volume: f32,
}

impl Utterance {
    pub fn new(text: impl Into<String>, config: &SpeechConfig) -> Self {
        Self {
            text: text.into(),
            locale: config.locale.clone(),
            rate: config.rate,
            pitch: config.pitch,
            volume: config.volume,
        }
    }

    /// Language subtag, "ko" for "ko-KR".
    pub fn language(&self) -> String {
        self.locale
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }
}

/// How an utterance ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechOutcome {
    Finished,
    Cancelled,
    Failed(String),
}

/// Called exactly once when a submitted utterance ends, however it ends.
pub type OnDone = Box<dyn FnOnce(SpeechOutcome) + Send + 'static>;

/// A platform voice engine.
pub trait Narrator: Send + Sync {
    fn is_available(&self) -> bool;

    /// Start speaking. Returns once playback has started; `on_done` fires
    /// later from whatever thread the engine completes on.
    fn submit(&self, utterance: Utterance, on_done: OnDone) -> Result<(), SpeechError>;

    /// Stop the current utterance, if any.
    fn cancel(&self);
}

/// Narrator for hosts without speech output.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSpeech;

impl Narrator for NoSpeech {
    fn is_available(&self) -> bool {
        false
    }

    fn submit(&self, _utterance: Utterance, _on_done: OnDone) -> Result<(), SpeechError> {
        Err(SpeechError::Unavailable("speech disabled".into()))
    }

    fn cancel(&self) {}
}

/// Build the narrator selected by configuration.
pub fn narrator_from_config(
    config: &SpeechConfig,
    runtime: tokio::runtime::Handle,
) -> Arc<dyn Narrator> {
    if !config.enabled {
        info!("Speech disabled in config");
        return Arc::new(NoSpeech);
    }

    match SpeechBackend::from_name(&config.backend) {
        Some(backend) => Arc::new(CommandNarrator::new(backend, runtime)),
        None => {
            info!("Speech backend '{}' selected no engine", config.backend);
            Arc::new(NoSpeech)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn language_subtag() {
        let u = Utterance::new("안녕", &SpeechConfig::default());
        assert_eq!(u.language(), "ko");
        assert_eq!(u.rate, 0.8);

        let u = Utterance {
            locale: "KO_kr".into(),
            ..u
        };
        assert_eq!(u.language(), "ko");
    }

    #[tokio::test]
    async fn disabled_config_has_no_speech() {
        let config = SpeechConfig {
            enabled: false,
            ..SpeechConfig::default()
        };
        let narrator = narrator_from_config(&config, tokio::runtime::Handle::current());
        assert!(!narrator.is_available());

        let config = SpeechConfig {
            backend: "none".into(),
            ..SpeechConfig::default()
        };
        let narrator = narrator_from_config(&config, tokio::runtime::Handle::current());
        assert!(!narrator.is_available());
    }
}
