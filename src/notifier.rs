//! Desktop notifications via notify-rust (D-Bus).
//!
//! Used for messages the user should see even when the clock window is not
//! in front, such as narration that could not be played.

use notify_rust::Notification;
use tracing::{debug, warn};

const APP_NAME: &str = "시계 배우기";
const ICON: &str = "preferences-system-time";
const TIMEOUT_MS: i32 = 3000;

#[derive(Debug, Clone)]
pub struct Notifier {
    enabled: bool,
}

impl Notifier {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// `summary` names the feature ("음성 안내"); `body` carries the details.
    pub fn notify(&self, summary: &str, body: &str) {
        if !self.enabled {
            return;
        }

        debug!("Notification: {summary}: {body}");

        if let Err(e) = message(summary, body).show() {
            warn!("Failed to show notification: {e}");
        }
    }
}

fn message(summary: &str, body: &str) -> Notification {
    let mut n = Notification::new();
    n.appname(APP_NAME)
        .summary(summary)
        .body(body)
        .icon(ICON)
        .timeout(TIMEOUT_MS);
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_carries_app_and_context() {
        let n = message("음성 안내", "음성 기능을 지원하지 않는 환경입니다.\n세 시");
        assert_eq!(n.appname, APP_NAME);
        assert_eq!(n.summary, "음성 안내");
        assert!(n.body.ends_with("\n세 시"));
        assert_eq!(n.icon, ICON);
    }

    #[test]
    fn disabled_notifier_stays_quiet() {
        // returns before touching D-Bus
        Notifier::new(false).notify("음성 안내", "없음");
    }
}
