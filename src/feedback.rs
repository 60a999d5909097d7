//! Audio playback and haptic feedback.
//!
//! The quiz engine only knows the [`AudioPlayer`] and [`Haptics`] traits.
//! A terminal has no vibration motor and no media stack, so the
//! implementations here shell out to configured commands and ring the
//! terminal bell.

use std::io::{self, Write};
use std::process::Stdio;

use tokio::process::Command;

/// Plays a word's pronunciation.
pub trait AudioPlayer: Send + Sync {
    /// Play `url`, or speak `fallback_text` if the URL cannot be played.
    /// Must not block the caller.
    fn play(&self, url: &str, fallback_text: &str);
}

/// Kind of pulse to give after an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// Short pulse.
    Correct,
    /// Long pulse.
    Incorrect,
}

pub trait Haptics: Send + Sync {
    fn pulse(&self, feedback: Feedback);
}

/// Ignores every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioPlayer for SilentAudio {
    fn play(&self, _url: &str, _fallback_text: &str) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoHaptics;

impl Haptics for NoHaptics {
    fn pulse(&self, _feedback: Feedback) {}
}

/// Rings the terminal bell: once when correct, twice when not.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl Haptics for TerminalBell {
    fn pulse(&self, feedback: Feedback) {
        let bells: &[u8] = match feedback {
            Feedback::Correct => b"\x07",
            Feedback::Incorrect => b"\x07\x07",
        };
        let mut stdout = io::stdout();
        if let Err(e) = stdout.write_all(bells).and_then(|_| stdout.flush()) {
            tracing::debug!("Terminal bell failed: {}", e);
        }
    }
}

/// Runs external commands: `player <url>`, falling back to `speech <text>`.
///
/// Commands are split on whitespace, so `"mpv --no-video"` works.
#[derive(Debug, Clone, Default)]
pub struct CommandAudioPlayer {
    player: Option<String>,
    speech: Option<String>,
}

impl CommandAudioPlayer {
    pub fn new(player: Option<String>, speech: Option<String>) -> Self {
        Self { player, speech }
    }
}

impl AudioPlayer for CommandAudioPlayer {
    fn play(&self, url: &str, fallback_text: &str) {
        let player = if url.is_empty() { None } else { self.player.clone() };
        let speech = self.speech.clone();
        let url = url.to_string();
        let text = fallback_text.to_string();

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(play_with_fallback(player, url, speech, text));
            }
            Err(_) => tracing::warn!("Audio requested outside the runtime; skipping '{}'", text),
        }
    }
}

/// Returns which command ended up playing, if any.
pub(crate) async fn play_with_fallback(
    player: Option<String>,
    url: String,
    speech: Option<String>,
    text: String,
) -> Option<String> {
    if let Some(player) = player {
        match run_command(&player, &url).await {
            Ok(true) => return Some(player),
            Ok(false) => tracing::warn!("{} could not play {}; falling back to speech", player, url),
            Err(e) => tracing::warn!("Failed to run {}: {}; falling back to speech", player, e),
        }
    }

    let speech = speech?;
    if text.is_empty() {
        return None;
    }
    match run_command(&speech, &text).await {
        Ok(true) => Some(speech),
        Ok(false) => {
            tracing::warn!("{} exited unsuccessfully", speech);
            None
        }
        Err(e) => {
            tracing::warn!("Failed to run {}: {}", speech, e);
            None
        }
    }
}

async fn run_command(command: &str, arg: &str) -> io::Result<bool> {
    let mut parts = command.split_whitespace();
    let Some(program) = parts.next() else {
        return Ok(false);
    };

    let status = Command::new(program)
        .args(parts)
        .arg(arg)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await?;
    Ok(status.success())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_player_success_skips_speech() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("spoken");

        let used = play_with_fallback(
            Some("true".to_string()),
            "https://example.org/a.mp3".to_string(),
            Some("touch".to_string()),
            marker.display().to_string(),
        )
        .await;

        assert_eq!(used.as_deref(), Some("true"));
        assert!(!marker.exists());
    }

    #[tokio::test]
    async fn test_failed_player_falls_back_to_speech() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("spoken");

        let used = play_with_fallback(
            Some("false".to_string()),
            "https://example.org/a.mp3".to_string(),
            Some("touch".to_string()),
            marker.display().to_string(),
        )
        .await;

        assert_eq!(used.as_deref(), Some("touch"));
        assert!(marker.exists());
    }

    #[tokio::test]
    async fn test_missing_player_falls_back_to_speech() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("spoken");

        let used = play_with_fallback(
            Some("definitely-not-a-real-player-binary".to_string()),
            "https://example.org/a.mp3".to_string(),
            Some("touch".to_string()),
            marker.display().to_string(),
        )
        .await;

        assert_eq!(used.as_deref(), Some("touch"));
    }

    #[tokio::test]
    async fn test_nothing_configured_plays_nothing() {
        let used = play_with_fallback(None, String::new(), None, "apple".to_string()).await;
        assert_eq!(used, None);
    }
}
