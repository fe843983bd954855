//! Sound notifier.

use tracing::debug;

use super::{Completion, CompletionNotifier, NotifyError};
use crate::sound::{SoundPlayer, SoundSource};

/// Plays a sound when the countdown completes.
#[derive(Debug)]
pub struct SoundNotifier<P: SoundPlayer> {
    player: P,
    source: SoundSource,
}

impl<P: SoundPlayer> SoundNotifier<P> {
    /// Creates a notifier playing `source` through `player`.
    pub fn new(player: P, source: SoundSource) -> Self {
        Self { player, source }
    }

    /// Returns the player.
    pub fn player(&self) -> &P {
        &self.player
    }

    /// Returns the configured sound source.
    pub fn source(&self) -> &SoundSource {
        &self.source
    }
}

impl<P: SoundPlayer> CompletionNotifier for SoundNotifier<P> {
    fn name(&self) -> &str {
        "sound"
    }

    fn notify(&self, _completion: &Completion) -> Result<(), NotifyError> {
        if !self.player.is_available() {
            return Err(NotifyError::Unavailable("audio output".to_string()));
        }
        debug!(sound = %self.source.name(), "playing completion sound");
        self.player.play(&self.source)?;
        Ok(())
    }

    fn flush(&self) {
        self.player.wait_until_done();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::{MockSoundPlayer, SoundError};
    use chrono::Utc;

    fn completion() -> Completion {
        Completion::new(Some("Launch".to_string()), Utc::now())
    }

    #[test]
    fn test_plays_configured_source() {
        let notifier = SoundNotifier::new(MockSoundPlayer::new(), SoundSource::file("/tmp/a.wav"));
        notifier.notify(&completion()).unwrap();

        assert_eq!(
            notifier.player().get_play_calls(),
            vec![SoundSource::file("/tmp/a.wav")]
        );
    }

    #[test]
    fn test_playback_failure_is_reported() {
        let player = MockSoundPlayer::new();
        player.set_should_fail(true);
        let notifier = SoundNotifier::new(player, SoundSource::beep());

        let result = notifier.notify(&completion());
        assert!(matches!(
            result,
            Err(NotifyError::Sound(SoundError::PlaybackError(_)))
        ));
    }

    #[test]
    fn test_unavailable_player_is_reported() {
        let player = MockSoundPlayer::new();
        player.set_available(false);
        let notifier = SoundNotifier::new(player, SoundSource::beep());

        assert!(matches!(
            notifier.notify(&completion()),
            Err(NotifyError::Unavailable(_))
        ));
        assert_eq!(notifier.player().play_count(), 0);
    }

    #[test]
    fn test_flush_waits_for_player() {
        let notifier = SoundNotifier::new(MockSoundPlayer::new(), SoundSource::beep());
        notifier.flush();
        assert_eq!(notifier.player().wait_count(), 1);
        assert!(notifier.source().is_beep());
    }
}
