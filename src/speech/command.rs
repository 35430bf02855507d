//! Narration through an external speech program.
//!
//! Each utterance is one child process supervised by a tokio task. Cancel
//! drops the task's cancel sender, which kills the child; the task then
//! reports `Cancelled` through the completion callback. Backends that hand
//! the text to a daemon also get an explicit stop command, since killing
//! the client leaves the daemon talking.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Mutex;

use tokio::process::Command;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use super::{Narrator, OnDone, SpeechOutcome, Utterance};
use crate::error::SpeechError;

/// Supported speech programs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechBackend {
    EspeakNg,
    SpdSay,
}

impl SpeechBackend {
    /// Parse the `speech.backend` config value. "none" selects no engine.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "espeak-ng" | "espeak" => Some(Self::EspeakNg),
            "spd-say" | "speech-dispatcher" => Some(Self::SpdSay),
            "none" | "" => None,
            other => {
                warn!("Unknown speech backend '{other}', falling back to espeak-ng");
                Some(Self::EspeakNg)
            }
        }
    }

    pub fn program(self) -> &'static str {
        match self {
            Self::EspeakNg => "espeak-ng",
            Self::SpdSay => "spd-say",
        }
    }

    /// Arguments that silence the engine after the speaking process is
    /// killed, for engines that keep playing on their own.
    pub fn stop_args(self) -> Option<&'static [&'static str]> {
        match self {
            Self::EspeakNg => None,
            Self::SpdSay => Some(SPD_CANCEL_ALL),
        }
    }

    /// Command-line arguments speaking `u`, text last.
    pub fn args(self, u: &Utterance) -> Vec<String> {
        let language = u.language();
        let mut args = match self {
            // words per minute (default 175), pitch 0-99 (default 50),
            // amplitude 0-200 (default 100)
            Self::EspeakNg => vec![
                "-v".to_string(),
                language,
                "-s".to_string(),
                scale(u.rate, 175.0, 80.0, 500.0).to_string(),
                "-p".to_string(),
                scale(u.pitch, 50.0, 0.0, 99.0).to_string(),
                "-a".to_string(),
                scale(u.volume, 100.0, 0.0, 200.0).to_string(),
            ],
            // -w blocks until spoken so the child's exit marks the end;
            // rate/pitch/volume are offsets in -100..100 around 0
            Self::SpdSay => vec![
                "-w".to_string(),
                "-l".to_string(),
                language,
                "-r".to_string(),
                offset(u.rate).to_string(),
                "-p".to_string(),
                offset(u.pitch).to_string(),
                "-i".to_string(),
                offset(u.volume).to_string(),
            ],
        };
        args.push(u.text.clone());
        args
    }
}

/// Cancel everything queued in speech-dispatcher, not just the current
/// message (-S).
const SPD_CANCEL_ALL: &[&str] = &["-C"];

fn scale(factor: f32, normal: f32, min: f32, max: f32) -> i32 {
    (factor * normal).clamp(min, max).round() as i32
}

fn offset(factor: f32) -> i32 {
    ((factor - 1.0) * 100.0).clamp(-100.0, 100.0).round() as i32
}

/// Find `program` in `PATH` the way a shell would.
fn find_on_path(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }
    std::env::var_os("PATH").and_then(|paths| {
        std::env::split_paths(&paths)
            .map(|dir| dir.join(program))
            .find(|p| p.is_file())
    })
}

pub struct CommandNarrator {
    backend: SpeechBackend,
    program: Option<PathBuf>,
    runtime: Handle,
    // Dropping the sender cancels the running utterance.
    active: Mutex<Option<oneshot::Sender<()>>>,
}

impl CommandNarrator {
    pub fn new(backend: SpeechBackend, runtime: Handle) -> Self {
        Self::with_program(backend, backend.program(), runtime)
    }

    /// Use `program` (name or path) in place of the backend's default binary.
    pub fn with_program(backend: SpeechBackend, program: &str, runtime: Handle) -> Self {
        let resolved = find_on_path(program);
        match &resolved {
            Some(path) => info!("Speech backend {backend:?} using {}", path.display()),
            None => warn!("Speech program '{program}' not found in PATH"),
        }

        Self {
            backend,
            program: resolved,
            runtime,
            active: Mutex::new(None),
        }
    }

    /// Cut off the utterance in flight. Returns false when nothing was
    /// playing.
    fn interrupt(&self, program: &Path) -> bool {
        let Some(sender) = self.active.lock().unwrap().take() else {
            return false;
        };
        // a closed sender means the supervising task already finished
        if sender.is_closed() {
            return false;
        }
        drop(sender);

        if let Some(args) = self.backend.stop_args() {
            // blocking so the daemon is quiet before a new utterance is queued
            match std::process::Command::new(program)
                .args(args)
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
            {
                Ok(status) if status.success() => {}
                Ok(status) => warn!("{} {args:?} exited with {status}", program.display()),
                Err(e) => warn!("Failed to run {} {args:?}: {e}", program.display()),
            }
        }
        true
    }
}

impl Narrator for CommandNarrator {
    fn is_available(&self) -> bool {
        self.program.is_some()
    }

    fn submit(&self, utterance: Utterance, on_done: OnDone) -> Result<(), SpeechError> {
        let Some(program) = &self.program else {
            return Err(SpeechError::Unavailable(format!(
                "{} not installed",
                self.backend.program()
            )));
        };

        // a new utterance preempts the old one
        self.interrupt(program);

        // Child processes must be spawned inside the runtime's context.
        let _guard = self.runtime.enter();
        let mut child = Command::new(program)
            .args(self.backend.args(&utterance))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SpeechError::Spawn {
                program: program.display().to_string(),
                source,
            })?;

        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();
        *self.active.lock().unwrap() = Some(cancel_tx);

        debug!("Speaking {} chars via {:?}", utterance.text.chars().count(), self.backend);

        self.runtime.spawn(async move {
            let outcome = tokio::select! {
                status = child.wait() => match status {
                    Ok(status) if status.success() => SpeechOutcome::Finished,
                    Ok(status) => SpeechOutcome::Failed(format!("exited with {status}")),
                    Err(e) => SpeechOutcome::Failed(e.to_string()),
                },
                _ = &mut cancel_rx => {
                    if let Err(e) = child.kill().await {
                        debug!("Speech process already gone: {e}");
                    }
                    SpeechOutcome::Cancelled
                }
            };
            if let SpeechOutcome::Failed(reason) = &outcome {
                warn!("Speech failed: {reason}");
            }
            on_done(outcome);
        });

        Ok(())
    }

    fn cancel(&self) {
        if let Some(program) = &self.program {
            if self.interrupt(program) {
                debug!("Speech cancelled");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SpeechConfig;
    use std::time::Duration;

    fn utterance(text: &str) -> Utterance {
        Utterance::new(text, &SpeechConfig::default())
    }

    fn reporter() -> (OnDone, oneshot::Receiver<SpeechOutcome>) {
        let (tx, rx) = oneshot::channel();
        let on_done: OnDone = Box::new(move |outcome| {
            let _ = tx.send(outcome);
        });
        (on_done, rx)
    }

    async fn outcome(rx: oneshot::Receiver<SpeechOutcome>) -> SpeechOutcome {
        tokio::time::timeout(Duration::from_secs(5), rx)
            .await
            .expect("utterance did not end in time")
            .unwrap()
    }

    /// Shell script standing in for a speech program. Every invocation is
    /// appended to `calls`; runs whose first argument is `speak_flag`
    /// record their pid in `pids` and then hang like a long sentence.
    #[cfg(target_os = "linux")]
    fn stub_program(dir: &Path, name: &str, speak_flag: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        let script = format!(
            "#!/bin/sh\nprintf '%s\\n' \"$*\" >> '{calls}'\ncase \"$1\" in\n  {speak_flag}) echo $$ >> '{pids}'; exec sleep 30 ;;\nesac\n",
            calls = dir.join("calls").display(),
            pids = dir.join("pids").display(),
        );
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.display().to_string()
    }

    #[cfg(target_os = "linux")]
    fn lines(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Wait until `n` speaking processes have started; returns their pids.
    #[cfg(target_os = "linux")]
    async fn started(dir: &Path, n: usize) -> Vec<u32> {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let pids = lines(&dir.join("pids"));
                if pids.len() >= n {
                    return pids.iter().map(|p| p.trim().parse().unwrap()).collect();
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("speech program never started")
    }

    #[cfg(target_os = "linux")]
    fn running(pid: u32) -> bool {
        Path::new(&format!("/proc/{pid}")).exists()
    }

    #[test]
    fn backend_names() {
        assert_eq!(SpeechBackend::from_name("espeak-ng"), Some(SpeechBackend::EspeakNg));
        assert_eq!(SpeechBackend::from_name(" SPD-SAY "), Some(SpeechBackend::SpdSay));
        assert_eq!(SpeechBackend::from_name("none"), None);
        assert_eq!(SpeechBackend::from_name("festival"), Some(SpeechBackend::EspeakNg));
    }

    #[test]
    fn espeak_arguments() {
        let args = SpeechBackend::EspeakNg.args(&utterance("세 시"));
        assert_eq!(args, ["-v", "ko", "-s", "140", "-p", "60", "-a", "100", "세 시"]);
    }

    #[test]
    fn spd_say_arguments() {
        let args = SpeechBackend::SpdSay.args(&utterance("세 시"));
        assert_eq!(args, ["-w", "-l", "ko", "-r", "-20", "-p", "20", "-i", "0", "세 시"]);
    }

    #[tokio::test]
    async fn missing_program_is_unavailable() {
        let narrator = CommandNarrator::with_program(
            SpeechBackend::EspeakNg,
            "sigye-definitely-not-installed",
            Handle::current(),
        );
        assert!(!narrator.is_available());
        let err = narrator
            .submit(utterance("영"), Box::new(|_| {}))
            .unwrap_err();
        assert!(matches!(err, SpeechError::Unavailable(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn exit_status_maps_to_outcome() {
        for (program, expected) in [
            ("true", SpeechOutcome::Finished),
            ("false", SpeechOutcome::Failed(String::new())),
        ] {
            let narrator = CommandNarrator::with_program(SpeechBackend::EspeakNg, program, Handle::current());
            assert!(narrator.is_available(), "{program} should be on PATH");

            let (on_done, rx) = reporter();
            narrator.submit(utterance("일"), on_done).unwrap();
            let ended = outcome(rx).await;
            match expected {
                SpeechOutcome::Failed(_) => assert!(matches!(ended, SpeechOutcome::Failed(_))),
                other => assert_eq!(ended, other),
            }
        }
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn cancel_kills_the_speaking_process() {
        let dir = tempfile::tempdir().unwrap();
        let program = stub_program(dir.path(), "espeak-ng", "-v");
        let narrator = CommandNarrator::with_program(SpeechBackend::EspeakNg, &program, Handle::current());

        let (on_done, rx) = reporter();
        narrator.submit(utterance("세 시"), on_done).unwrap();
        let pids = started(dir.path(), 1).await;

        narrator.cancel();
        assert_eq!(outcome(rx).await, SpeechOutcome::Cancelled);
        assert!(!running(pids[0]), "speech process {} still alive", pids[0]);
        // espeak-ng plays by itself; no separate stop command
        assert_eq!(lines(&dir.path().join("calls")).len(), 1);
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn second_submit_preempts_the_first() {
        let dir = tempfile::tempdir().unwrap();
        let program = stub_program(dir.path(), "espeak-ng", "-v");
        let narrator = CommandNarrator::with_program(SpeechBackend::EspeakNg, &program, Handle::current());

        let (first_done, first_rx) = reporter();
        narrator.submit(utterance("한 시"), first_done).unwrap();
        let first = started(dir.path(), 1).await[0];

        let (second_done, second_rx) = reporter();
        narrator.submit(utterance("두 시"), second_done).unwrap();
        assert_eq!(outcome(first_rx).await, SpeechOutcome::Cancelled);
        assert!(!running(first));

        let second = started(dir.path(), 2).await[1];
        assert!(running(second));
        narrator.cancel();
        assert_eq!(outcome(second_rx).await, SpeechOutcome::Cancelled);
        assert!(!running(second));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn spd_say_cancel_also_silences_the_daemon() {
        let dir = tempfile::tempdir().unwrap();
        let program = stub_program(dir.path(), "spd-say", "-w");
        let narrator = CommandNarrator::with_program(SpeechBackend::SpdSay, &program, Handle::current());

        // nothing playing: nothing to stop
        narrator.cancel();
        assert!(lines(&dir.path().join("calls")).is_empty());

        let (on_done, rx) = reporter();
        narrator.submit(utterance("세 시"), on_done).unwrap();
        started(dir.path(), 1).await;

        narrator.cancel();
        assert_eq!(outcome(rx).await, SpeechOutcome::Cancelled);
        assert_eq!(
            lines(&dir.path().join("calls")),
            ["-w -l ko -r -20 -p 20 -i 0 세 시", "-C"]
        );
    }
}
