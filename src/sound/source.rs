//! Sound source management.
//!
//! A completion sound is either a synthesized beep or an audio file chosen
//! by the user.

use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::SoundError;

/// Frequency of the default completion beep.
pub const DEFAULT_BEEP_FREQUENCY_HZ: u32 = 800;

/// Length of the default completion beep.
pub const DEFAULT_BEEP_DURATION: Duration = Duration::from_millis(500);

/// Supported audio file extensions.
const SUPPORTED_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "ogg"];

/// Represents the source of a sound to be played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSource {
    /// A sine tone generated at playback time.
    Beep {
        /// Tone frequency in hertz
        frequency_hz: u32,
        /// Tone length
        duration: Duration,
    },
    /// An audio file on disk.
    File {
        /// The full path to the sound file.
        path: PathBuf,
    },
}

impl Default for SoundSource {
    fn default() -> Self {
        Self::beep()
    }
}

impl SoundSource {
    /// The default 800 Hz, half-second beep.
    #[must_use]
    pub fn beep() -> Self {
        Self::Beep {
            frequency_hz: DEFAULT_BEEP_FREQUENCY_HZ,
            duration: DEFAULT_BEEP_DURATION,
        }
    }

    /// Creates a new file sound source.
    ///
    /// # Note
    ///
    /// This constructor does not validate the path. Use `file_validated` to
    /// check existence and extension up front.
    #[must_use]
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    /// Creates a new file sound source after checking the file.
    ///
    /// # Errors
    ///
    /// - `SoundError::FileNotFound` if the path is not an existing file
    /// - `SoundError::UnsupportedFormat` if the extension is not supported
    pub fn file_validated(path: impl Into<PathBuf>) -> Result<Self, SoundError> {
        let path = path.into();
        validate_sound_file(&path)?;
        Ok(Self::File { path })
    }

    /// Returns a short name for logging.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Beep { frequency_hz, .. } => format!("beep {frequency_hz}Hz"),
            Self::File { path } => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }

    /// Returns true if this is a file sound.
    #[must_use]
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File { .. })
    }

    /// Returns true if this is a synthesized beep.
    #[must_use]
    pub fn is_beep(&self) -> bool {
        matches!(self, Self::Beep { .. })
    }

    /// Returns the file path if this is a file sound.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File { path } => Some(path),
            Self::Beep { .. } => None,
        }
    }
}

fn validate_sound_file(path: &Path) -> Result<(), SoundError> {
    if !path.is_file() {
        return Err(SoundError::FileNotFound(path.display().to_string()));
    }

    let supported = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()));
    if !supported {
        return Err(SoundError::UnsupportedFormat(path.display().to_string()));
    }

    Ok(())
}
