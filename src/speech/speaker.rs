//! One-at-a-time narration on top of a [`Narrator`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{Narrator, OnDone, SpeechOutcome, Utterance};
use crate::config::SpeechConfig;
use crate::error::SpeechError;
use crate::notifier::Notifier;

const SPEECH_SUMMARY: &str = "음성 안내";

/// Shown when the host has no usable speech engine.
pub const UNAVAILABLE_NOTICE: &str = "음성 기능을 지원하지 않는 환경입니다.";

/// Speaks one utterance at a time. A new `speak` preempts the current one;
/// nothing is queued.
///
/// The "speaking" state is the id of the utterance in flight (0 when idle),
/// so a late completion from a preempted utterance cannot clear the state of
/// the one that replaced it.
pub struct Speaker {
    narrator: Arc<dyn Narrator>,
    voice: SpeechConfig,
    notifier: Notifier,
    active: Arc<AtomicU64>,
    next_id: AtomicU64,
}

impl Speaker {
    pub fn new(narrator: Arc<dyn Narrator>, voice: SpeechConfig, notifier: Notifier) -> Self {
        Self {
            narrator,
            voice,
            notifier,
            active: Arc::new(AtomicU64::new(0)),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn is_available(&self) -> bool {
        self.narrator.is_available()
    }

    pub fn is_speaking(&self) -> bool {
        self.active.load(Ordering::Acquire) != 0
    }

    /// Speak `text`, cutting off anything already playing.
    ///
    /// Without a speech engine the user is told so right away and nothing
    /// is spoken.
    pub fn speak(&self, text: &str) -> Result<(), SpeechError> {
        if !self.narrator.is_available() {
            warn!("Speech requested but no engine is available");
            self.notifier.notify(SPEECH_SUMMARY, &format!("{UNAVAILABLE_NOTICE}\n{text}"));
            return Err(SpeechError::Unavailable(UNAVAILABLE_NOTICE.into()));
        }

        self.narrator.cancel();

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.active.store(id, Ordering::Release);
        info!("Speaking: {text}");

        let active = self.active.clone();
        let on_done: OnDone = Box::new(move |outcome: SpeechOutcome| {
            let cleared = active
                .compare_exchange(id, 0, Ordering::AcqRel, Ordering::Acquire)
                .is_ok();
            debug!("Utterance {id} ended: {outcome:?} (cleared: {cleared})");
        });

        let utterance = Utterance::new(text, &self.voice);
        if let Err(e) = self.narrator.submit(utterance, on_done) {
            let _ = self
                .active
                .compare_exchange(id, 0, Ordering::AcqRel, Ordering::Acquire);
            warn!("Failed to start speech: {e}");
            return Err(e);
        }
        Ok(())
    }

    /// Stop immediately and clear the speaking state.
    pub fn stop(&self) {
        self.active.store(0, Ordering::Release);
        self.narrator.cancel();
    }
}
