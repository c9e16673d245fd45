use std::path::{Path, PathBuf};

use onair_decode::AudioCache;
use onair_engine::{VoiceError, VoiceHandle};
use onair_transport::Token;
use tracing::warn;

#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("nothing loaded")]
    NotLoaded,

    #[error("audio engine busy: {0}")]
    EngineBusy(String),

    #[error("no audio output device")]
    NoDevice,

    #[error("failed to decode '{path}': {source}")]
    Decode {
        path: PathBuf,
        source: anyhow::Error,
    },

    #[error("playback rejected: {0}")]
    Rejected(String),
}

impl From<VoiceError> for PlaybackError {
    fn from(err: VoiceError) -> Self {
        match err {
            VoiceError::NotLoaded(_) => PlaybackError::NotLoaded,
            VoiceError::Busy(_) => PlaybackError::EngineBusy(err.to_string()),
        }
    }
}

/// One playable audio resource.
///
/// `play` reports rejection synchronously; natural completion arrives later
/// through whatever event source the backend has, tagged with the token
/// passed to `subscribe_completion`.
pub trait AudioPlayback {
    fn load(&mut self, clip: &Path) -> Result<(), PlaybackError>;
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    fn seek_to_start(&mut self);
    fn subscribe_completion(&mut self, token: Token);
    fn unsubscribe_completion(&mut self);
}

impl<P: AudioPlayback + ?Sized> AudioPlayback for Box<P> {
    fn load(&mut self, clip: &Path) -> Result<(), PlaybackError> {
        (**self).load(clip)
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    fn seek_to_start(&mut self) {
        (**self).seek_to_start()
    }

    fn subscribe_completion(&mut self, token: Token) {
        (**self).subscribe_completion(token)
    }

    fn unsubscribe_completion(&mut self) {
        (**self).unsubscribe_completion()
    }
}

/// An engine voice plus the decode cache for the clips it plays.
pub struct EngineVoice {
    voice: VoiceHandle,
    cache: AudioCache,
    current: Option<PathBuf>,
}

impl EngineVoice {
    pub fn new(voice: VoiceHandle, cache: AudioCache) -> Self {
        Self {
            voice,
            cache,
            current: None,
        }
    }
}

impl AudioPlayback for EngineVoice {
    fn load(&mut self, clip: &Path) -> Result<(), PlaybackError> {
        if self.current.as_deref() == Some(clip) {
            return Ok(());
        }

        let audio = self
            .cache
            .get_or_decode(clip)
            .map_err(|source| PlaybackError::Decode {
                path: clip.to_path_buf(),
                source,
            })?;
        self.voice.load(audio)?;
        self.current = Some(clip.to_path_buf());
        Ok(())
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        Ok(self.voice.play()?)
    }

    fn pause(&mut self) {
        if let Err(e) = self.voice.pause() {
            warn!("pause dropped: {e}");
        }
    }

    fn seek_to_start(&mut self) {
        if let Err(e) = self.voice.rewind() {
            warn!("rewind dropped: {e}");
        }
    }

    fn subscribe_completion(&mut self, token: Token) {
        if let Err(e) = self.voice.subscribe(token) {
            warn!("completion subscription dropped: {e}");
        }
    }

    fn unsubscribe_completion(&mut self) {
        if let Err(e) = self.voice.unsubscribe() {
            warn!("completion unsubscribe dropped: {e}");
        }
    }
}

/// Stand-in used when no output device could be opened. Every `play` is rejected.
#[derive(Debug, Default)]
pub struct SilentPlayback {
    loaded: Option<PathBuf>,
}

impl AudioPlayback for SilentPlayback {
    fn load(&mut self, clip: &Path) -> Result<(), PlaybackError> {
        self.loaded = Some(clip.to_path_buf());
        Ok(())
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        Err(PlaybackError::NoDevice)
    }

    fn pause(&mut self) {}

    fn seek_to_start(&mut self) {}

    fn subscribe_completion(&mut self, _token: Token) {}

    fn unsubscribe_completion(&mut self) {}
}
