//! Sound system error types.
//!
//! Sound errors never reach the countdown engine. The completion notifier logs
//! them and moves on, so the messages aim at the person reading the log.

use thiserror::Error;

/// Errors that can occur in the sound playback system.
#[derive(Debug, Error)]
pub enum SoundError {
    /// Audio device is not available (e.g., no speakers connected).
    #[error("audio device not available: {0}")]
    DeviceNotAvailable(String),

    /// Sound file was not found at the specified path.
    #[error("sound file not found: {0}")]
    FileNotFound(String),

    /// Sound file extension is not one rodio can decode.
    #[error("unsupported sound format: {0}")]
    UnsupportedFormat(String),

    /// Failed to decode the audio file.
    #[error("failed to decode sound file: {0}")]
    DecodeError(String),

    /// Failed to create the audio output stream.
    #[error("failed to create audio stream: {0}")]
    StreamError(String),

    /// Generic sound playback error.
    #[error("sound playback error: {0}")]
    PlaybackError(String),
}

impl SoundError {
    /// Returns true if this error is related to the audio file.
    #[must_use]
    pub fn is_file_error(&self) -> bool {
        matches!(
            self,
            Self::FileNotFound(_) | Self::UnsupportedFormat(_) | Self::DecodeError(_)
        )
    }

    /// Returns true if playback should fall back to the synthesized beep.
    #[must_use]
    pub fn should_fallback_to_beep(&self) -> bool {
        self.is_file_error()
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::DeviceNotAvailable(_) => "connect an audio device or pass --no-sound",
            Self::FileNotFound(_) => "check the --sound-file path",
            Self::UnsupportedFormat(_) => "use a wav, mp3, flac or ogg file",
            Self::DecodeError(_) => "the sound file may be corrupted",
            Self::StreamError(_) => "check the system audio settings",
            Self::PlaybackError(_) => "pass --no-sound to silence the timer",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SoundError::DeviceNotAvailable("no device".to_string());
        assert!(err.to_string().contains("no device"));
        assert!(err.to_string().contains("audio device not available"));

        let err = SoundError::FileNotFound("/path/to/sound.wav".to_string());
        assert!(err.to_string().contains("/path/to/sound.wav"));

        let err = SoundError::UnsupportedFormat("sound.txt".to_string());
        assert!(err.to_string().contains("sound.txt"));

        let err = SoundError::DecodeError("invalid format".to_string());
        assert!(err.to_string().contains("invalid format"));

        let err = SoundError::StreamError("stream failed".to_string());
        assert!(err.to_string().contains("stream failed"));

        let err = SoundError::PlaybackError("unknown error".to_string());
        assert!(err.to_string().contains("unknown error"));
    }

    #[test]
    fn test_is_file_error() {
        assert!(SoundError::FileNotFound("x".into()).is_file_error());
        assert!(SoundError::UnsupportedFormat("x".into()).is_file_error());
        assert!(SoundError::DecodeError("x".into()).is_file_error());
        assert!(!SoundError::DeviceNotAvailable("x".into()).is_file_error());
        assert!(!SoundError::StreamError("x".into()).is_file_error());
        assert!(!SoundError::PlaybackError("x".into()).is_file_error());
    }

    #[test]
    fn test_should_fallback_to_beep() {
        assert!(SoundError::FileNotFound("x".into()).should_fallback_to_beep());
        assert!(SoundError::DecodeError("x".into()).should_fallback_to_beep());
        assert!(!SoundError::DeviceNotAvailable("x".into()).should_fallback_to_beep());
    }

    #[test]
    fn test_suggestion() {
        let err = SoundError::DeviceNotAvailable("x".into());
        assert!(err.suggestion().contains("--no-sound"));

        let err = SoundError::FileNotFound("x".into());
        assert!(err.suggestion().contains("--sound-file"));

        let err = SoundError::UnsupportedFormat("x".into());
        assert!(err.suggestion().contains("wav"));

        let err = SoundError::DecodeError("x".into());
        assert!(err.suggestion().contains("corrupted"));

        let err = SoundError::StreamError("x".into());
        assert!(err.suggestion().contains("audio settings"));
    }
}
