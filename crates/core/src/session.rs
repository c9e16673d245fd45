use std::path::{Path, PathBuf};
use std::time::Instant;

use onair_decode::AudioCache;
use onair_engine::AudioEngineHandle;
use onair_page::{Page, RadioConfig};
use onair_transport::{Status, Voice};
use tracing::{debug, info, trace, warn};

use crate::clock::SystemClock;
use crate::controller::{
    Continuation, ControllerConfig, ControllerFailure, Phase, SequencedAudioController,
};
use crate::playback::{AudioPlayback, EngineVoice, SilentPlayback};
use crate::ui::OnAirState;

type RadioController = SequencedAudioController<Box<dyn AudioPlayback>, OnAirState, SystemClock>;

impl From<&RadioConfig> for ControllerConfig {
    fn from(radio: &RadioConfig) -> Self {
        ControllerConfig::new(radio.lead_in.clone(), radio.tracks.clone())
            .with_fallback_delay(radio.fallback_delay())
    }
}

/// Decode caches for both voices, filled with every clip the radio can play.
/// Decoding on activation would stall the frame loop, so it all happens here.
fn preloaded_caches(
    config: &ControllerConfig,
    assets_root: &Path,
    sample_rate: u32,
) -> (AudioCache, AudioCache) {
    let started = Instant::now();
    let mut lead_in = AudioCache::new(assets_root, Some(sample_rate));
    let mut track = AudioCache::new(assets_root, Some(sample_rate));

    let failed = lead_in
        .preload([config.lead_in.as_path()])
        .into_iter()
        .chain(track.preload(config.tracks.iter().map(PathBuf::as_path)));
    for (path, e) in failed {
        warn!("could not preload {}: {e:#}", path.display());
    }

    info!(
        clips = lead_in.len() + track.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "radio clips decoded"
    );
    (lead_in, track)
}

/// The radio widget's controller wired to the audio engine.
///
/// Everything runs on the host's event loop: the host forwards activations
/// and calls [`RadioSession::poll`] once per frame.
pub struct RadioSession {
    engine: Option<AudioEngineHandle>,
    controller: RadioController,
}

impl RadioSession {
    /// Open the default output device. Without one the session still works,
    /// but every playback attempt is rejected.
    pub fn new(config: ControllerConfig, assets_root: impl Into<PathBuf>) -> Self {
        let assets_root = assets_root.into();

        match onair_engine::start() {
            Ok(engine) => {
                let sample_rate = engine.handle.sample_rate();
                info!(
                    sample_rate,
                    channels = engine.handle.channels(),
                    "audio engine started"
                );
                let (lead_in_cache, track_cache) =
                    preloaded_caches(&config, &assets_root, sample_rate);
                let lead_in = EngineVoice::new(engine.lead_in, lead_in_cache);
                let track = EngineVoice::new(engine.track, track_cache);
                Self::with_backend(
                    config,
                    Box::new(lead_in),
                    Box::new(track),
                    Some(engine.handle),
                )
            }
            Err(e) => {
                warn!("no audio output, radio will stay silent: {e:#}");
                Self::silent(config)
            }
        }
    }

    pub fn silent(config: ControllerConfig) -> Self {
        Self::with_backend(
            config,
            Box::new(SilentPlayback::default()),
            Box::new(SilentPlayback::default()),
            None,
        )
    }

    pub fn with_backend(
        config: ControllerConfig,
        lead_in: Box<dyn AudioPlayback>,
        track: Box<dyn AudioPlayback>,
        engine: Option<AudioEngineHandle>,
    ) -> Self {
        let controller =
            SequencedAudioController::new(config, lead_in, track, OnAirState::idle(), SystemClock);
        Self { engine, controller }
    }

    /// `None` when the page has no radio.
    pub fn from_page(page: &Page, assets_root: &Path) -> Option<Self> {
        let radio = page.radio.as_ref()?;
        Some(Self::new(ControllerConfig::from(radio), assets_root))
    }

    pub fn has_output(&self) -> bool {
        self.engine.is_some()
    }

    pub fn activate(&mut self) {
        self.controller.activate();
    }

    pub fn stop(&mut self) {
        self.controller.stop();
    }

    /// Route engine notifications to the controller and fire the fallback
    /// timer if it is due. Returns whether anything changed.
    pub fn poll(&mut self) -> bool {
        let statuses = match self.engine.as_mut() {
            Some(engine) => engine.drain(),
            None => Vec::new(),
        };

        let mut changed = false;
        for status in statuses {
            if let Some(continuation) = self.handle_status(status) {
                changed |= continuation != Continuation::Stale;
            }
        }

        if let Some(continuation) = self.controller.poll() {
            changed |= continuation != Continuation::Stale;
        }
        changed
    }

    /// Apply one engine notification.
    pub fn handle_status(&mut self, status: Status) -> Option<Continuation> {
        match status {
            Status::Completed {
                voice: Voice::LeadIn,
                token: Some(token),
            } => Some(self.controller.lead_in_completed(token)),
            Status::Completed { voice, token } => {
                debug!(voice = voice.name(), ?token, "voice finished");
                None
            }
            Status::Position { voice, frame } => {
                trace!(voice = voice.name(), frame, "position");
                None
            }
        }
    }

    pub fn ui(&self) -> &OnAirState {
        self.controller.ui()
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    pub fn position(&self) -> usize {
        self.controller.position()
    }

    pub fn last_failure(&self) -> Option<&ControllerFailure> {
        self.controller.last_failure()
    }

    /// When the host should wake up next, if a fallback timer is pending.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.controller.next_deadline()
    }

    pub fn config(&self) -> &ControllerConfig {
        self.controller.config()
    }
}
