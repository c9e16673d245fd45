//! The radio widget's playback cycle.
//!
//! Each activation advances `idle -> track 1 -> track 2 -> track 3 -> idle`,
//! and every track is preceded by the shared lead-in clip. Lead-in completion
//! and the fallback timer are deferred continuations; both carry the token
//! that was current when they were scheduled and do nothing once a newer
//! activation or a stop has bumped it.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use onair_transport::Token;
use tracing::{debug, trace, warn};

use crate::clock::Clock;
use crate::playback::{AudioPlayback, PlaybackError};
use crate::ui::{OnAirState, UiReflection};

pub const DEFAULT_FALLBACK_DELAY: Duration = Duration::from_millis(1200);

#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    pub lead_in: PathBuf,
    pub tracks: Vec<PathBuf>,
    /// Upper bound on how long the track waits for the lead-in to report completion.
    pub fallback_delay: Duration,
}

impl ControllerConfig {
    pub fn new(lead_in: impl Into<PathBuf>, tracks: Vec<PathBuf>) -> Self {
        Self {
            lead_in: lead_in.into(),
            tracks,
            fallback_delay: DEFAULT_FALLBACK_DELAY,
        }
    }

    pub fn with_fallback_delay(mut self, delay: Duration) -> Self {
        self.fallback_delay = delay;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AwaitingLeadIn(usize),
    Playing(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum ControllerFailure {
    #[error("lead-in playback rejected: {0}")]
    LeadInPlaybackRejected(#[source] PlaybackError),

    #[error("track {} playback rejected: {source}", .track + 1)]
    TrackPlaybackRejected {
        track: usize,
        #[source]
        source: PlaybackError,
    },
}

/// What a deferred continuation ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    TrackStarted,
    TrackRejected,
    /// Scheduled by a superseded activation; discarded.
    Stale,
    /// The track for this token is already playing.
    AlreadyStarted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    token: Token,
    track_index: usize,
}

#[derive(Debug, Clone, Copy)]
struct Fallback {
    pending: Pending,
    deadline: Instant,
}

pub struct SequencedAudioController<P, U, C> {
    config: ControllerConfig,
    lead_in: P,
    track: P,
    ui: U,
    clock: C,
    position: usize,
    token: Token,
    phase: Phase,
    lead_in_subscription: Option<Pending>,
    fallback: Option<Fallback>,
    track_started: bool,
    last_failure: Option<ControllerFailure>,
}

impl<P, U, C> SequencedAudioController<P, U, C>
where
    P: AudioPlayback,
    U: UiReflection,
    C: Clock,
{
    /// `lead_in` and `track` are owned exclusively from here on.
    pub fn new(config: ControllerConfig, lead_in: P, track: P, mut ui: U, clock: C) -> Self {
        ui.reflect(&OnAirState::idle());
        Self {
            config,
            lead_in,
            track,
            ui,
            clock,
            position: 0,
            token: Token::default(),
            phase: Phase::Idle,
            lead_in_subscription: None,
            fallback: None,
            track_started: false,
            last_failure: None,
        }
    }

    /// Number of steps in one full cycle: one per track plus the stop step.
    pub fn cycle_len(&self) -> usize {
        self.config.tracks.len() + 1
    }

    /// Advance the cycle by one step. Supersedes anything still in flight.
    pub fn activate(&mut self) {
        self.position = (self.position + 1) % self.cycle_len();
        debug!(position = self.position, "radio activated");
        if self.position == 0 {
            self.stop();
        } else {
            self.play_sequence(self.position - 1);
        }
    }

    /// Play the lead-in clip, then track `track_index`.
    pub fn play_sequence(&mut self, track_index: usize) {
        if track_index >= self.config.tracks.len() {
            warn!(track_index, "no such track, ignoring");
            return;
        }

        let token = self.bump_token();
        self.silence();

        // Optimistic: the widget reacts to the click before any audio starts
        self.ui.reflect(&OnAirState::on_air(track_index));
        self.phase = Phase::AwaitingLeadIn(track_index);

        let lead_in = self.config.lead_in.clone();
        let started = self.lead_in.load(&lead_in).and_then(|_| self.lead_in.play());

        match started {
            Ok(()) => {
                let pending = Pending { token, track_index };
                self.lead_in.subscribe_completion(token);
                self.lead_in_subscription = Some(pending);
                self.fallback = Some(Fallback {
                    pending,
                    deadline: self.clock.now() + self.config.fallback_delay,
                });
                debug!(%token, track = track_index + 1, "lead-in started");
            }
            Err(e) => {
                let failure = ControllerFailure::LeadInPlaybackRejected(e);
                warn!(%token, "{failure}, starting track directly");
                self.start_track(Pending { token, track_index });
            }
        }
    }

    /// Silence both resources and return to idle.
    pub fn stop(&mut self) {
        let token = self.bump_token();
        self.silence();
        self.position = 0;
        self.phase = Phase::Idle;
        self.ui.reflect(&OnAirState::idle());
        debug!(%token, "radio stopped");
    }

    /// Natural completion of the lead-in clip, tagged with its subscription token.
    pub fn lead_in_completed(&mut self, token: Token) -> Continuation {
        match self.lead_in_subscription {
            Some(pending) if pending.token == token => {
                self.lead_in_subscription = None;
                self.start_track(pending)
            }
            _ => {
                trace!(%token, current = %self.token, "stale lead-in completion");
                Continuation::Stale
            }
        }
    }

    /// Fire the fallback timer if its deadline has passed.
    pub fn poll(&mut self) -> Option<Continuation> {
        let fallback = self.fallback?;
        if self.clock.now() < fallback.deadline {
            return None;
        }
        self.fallback = None;
        debug!(token = %fallback.pending.token, "lead-in fallback elapsed");
        Some(self.start_track(fallback.pending))
    }

    /// When `poll` next has work to do, if ever.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.fallback.map(|f| f.deadline)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn token(&self) -> Token {
        self.token
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn last_failure(&self) -> Option<&ControllerFailure> {
        self.last_failure.as_ref()
    }

    fn bump_token(&mut self) -> Token {
        self.token = self.token.next();
        self.token
    }

    fn silence(&mut self) {
        if self.lead_in_subscription.take().is_some() {
            self.lead_in.unsubscribe_completion();
        }
        self.fallback = None;
        self.track_started = false;

        self.lead_in.pause();
        self.lead_in.seek_to_start();
        self.track.pause();
        self.track.seek_to_start();
    }

    fn start_track(&mut self, pending: Pending) -> Continuation {
        if pending.token != self.token {
            trace!(token = %pending.token, current = %self.token, "stale continuation");
            return Continuation::Stale;
        }
        if self.track_started {
            return Continuation::AlreadyStarted;
        }

        // Whichever path got here first, the other one is moot now
        self.fallback = None;
        if self.lead_in_subscription.take().is_some() {
            self.lead_in.unsubscribe_completion();
        }

        let index = pending.track_index;
        let path = self.config.tracks[index].clone();
        match self.track.load(&path).and_then(|_| self.track.play()) {
            Ok(()) => {
                self.track_started = true;
                self.phase = Phase::Playing(index);
                self.ui.reflect(&OnAirState::on_air(index));
                self.last_failure = None;
                debug!(token = %pending.token, track = index + 1, "track on air");
                Continuation::TrackStarted
            }
            Err(source) => {
                let failure = ControllerFailure::TrackPlaybackRejected {
                    track: index,
                    source,
                };
                warn!(token = %pending.token, "{failure}");
                self.phase = Phase::Idle;
                self.ui.reflect(&OnAirState::idle());
                self.last_failure = Some(failure);
                Continuation::TrackRejected
            }
        }
    }
}
