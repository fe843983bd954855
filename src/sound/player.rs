//! Sound player implementation using rodio.
//!
//! This module provides the `RodioSoundPlayer` which uses the rodio v0.20
//! audio library for cross-platform sound playback.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use rodio::source::{SineWave, Source};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use tracing::{debug, warn};

use super::error::SoundError;
use super::source::{SoundSource, DEFAULT_BEEP_DURATION, DEFAULT_BEEP_FREQUENCY_HZ};

/// Volume of the synthesized beep.
const BEEP_VOLUME: f32 = 0.2;

/// A sound player that uses rodio for audio playback.
///
/// Playback is non-blocking. Sinks are kept until `wait_until_done` so a
/// sound is not cut off when the caller is about to exit.
pub struct RodioSoundPlayer {
    /// The audio output stream (must be kept alive for playback).
    _stream: OutputStream,
    /// Handle to the output stream for creating sinks.
    stream_handle: OutputStreamHandle,
    /// Sinks still playing.
    sinks: Mutex<Vec<Sink>>,
}

impl RodioSoundPlayer {
    /// Creates a new sound player on the default output device.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::DeviceNotAvailable` if no audio output device
    /// is available.
    pub fn new() -> Result<Self, SoundError> {
        let (stream, stream_handle) = OutputStream::try_default()
            .map_err(|e| SoundError::DeviceNotAvailable(e.to_string()))?;

        debug!("Audio output stream initialized");

        Ok(Self {
            _stream: stream,
            stream_handle,
            sinks: Mutex::new(Vec::new()),
        })
    }

    /// Plays a sound from the given source.
    ///
    /// A file that cannot be opened or decoded falls back to the default
    /// beep.
    ///
    /// # Errors
    ///
    /// Returns an error if the output sink cannot be created.
    pub fn play(&self, source: &SoundSource) -> Result<(), SoundError> {
        match source {
            SoundSource::File { path } => {
                debug!("Playing sound file: {}", path.display());
                match self.play_file(path) {
                    Ok(()) => Ok(()),
                    Err(e) if e.should_fallback_to_beep() => {
                        warn!(
                            "Failed to play sound file '{}': {}, falling back to beep",
                            path.display(),
                            e
                        );
                        self.play_default_beep()
                    }
                    Err(e) => Err(e),
                }
            }
            SoundSource::Beep {
                frequency_hz,
                duration,
            } => {
                debug!("Playing beep: {}Hz", frequency_hz);
                self.play_beep(*frequency_hz, *duration)
            }
        }
    }

    /// Plays a sound file from the filesystem.
    fn play_file(&self, path: &Path) -> Result<(), SoundError> {
        let file = File::open(path)
            .map_err(|e| SoundError::FileNotFound(format!("{}: {}", path.display(), e)))?;

        let decoder =
            Decoder::new(BufReader::new(file)).map_err(|e| SoundError::DecodeError(e.to_string()))?;

        let sink = self.new_sink()?;
        sink.append(decoder);
        self.keep(sink);
        Ok(())
    }

    fn play_default_beep(&self) -> Result<(), SoundError> {
        self.play_beep(DEFAULT_BEEP_FREQUENCY_HZ, DEFAULT_BEEP_DURATION)
    }

    /// Plays a sine tone.
    fn play_beep(&self, frequency_hz: u32, duration: Duration) -> Result<(), SoundError> {
        let tone = SineWave::new(frequency_hz as f32)
            .take_duration(duration)
            .amplify(BEEP_VOLUME);

        let sink = self.new_sink()?;
        sink.append(tone);
        self.keep(sink);
        Ok(())
    }

    fn new_sink(&self) -> Result<Sink, SoundError> {
        Sink::try_new(&self.stream_handle).map_err(|e| SoundError::StreamError(e.to_string()))
    }

    fn keep(&self, sink: Sink) {
        match self.sinks.lock() {
            Ok(mut sinks) => {
                sinks.retain(|s| !s.empty());
                sinks.push(sink);
            }
            // Poisoned: let the sound play out on its own
            Err(_) => sink.detach(),
        }
        debug!("Sound playback started");
    }

    /// Blocks until every sound started by this player has finished.
    pub fn wait_until_done(&self) {
        let sinks = match self.sinks.lock() {
            Ok(mut sinks) => std::mem::take(&mut *sinks),
            Err(_) => return,
        };
        for sink in sinks {
            sink.sleep_until_end();
        }
    }

    /// Returns true if the audio system is available.
    ///
    /// Always true once the player exists, since the stream is opened in
    /// `new`.
    #[must_use]
    pub fn is_available(&self) -> bool {
        true
    }
}

impl std::fmt::Debug for RodioSoundPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RodioSoundPlayer")
            .field("pending", &self.sinks.lock().map(|s| s.len()).unwrap_or(0))
            .finish_non_exhaustive()
    }
}

/// Creates a sound player, returning None if audio is unavailable.
///
/// If audio initialization fails, a warning is logged and None is returned.
#[must_use]
pub fn try_create_player() -> Option<RodioSoundPlayer> {
    match RodioSoundPlayer::new() {
        Ok(player) => Some(player),
        Err(e) => {
            warn!("Audio not available, sound disabled: {} ({})", e, e.suggestion());
            None
        }
    }
}
