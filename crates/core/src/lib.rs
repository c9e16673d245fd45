//! The radio widget's playback logic, independent of any UI toolkit.

pub mod clock;
pub mod controller;
pub mod playback;
pub mod session;
pub mod ui;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{
    Continuation, ControllerConfig, ControllerFailure, DEFAULT_FALLBACK_DELAY, Phase,
    SequencedAudioController,
};
pub use playback::{AudioPlayback, EngineVoice, PlaybackError, SilentPlayback};
pub use session::RadioSession;
pub use ui::{IDLE_HINT, IDLE_LABEL, ON_AIR_HINT, OnAirState, UiReflection};

pub use onair_page::{Block, BlockKind, Page, PageError, RadioConfig, load_page, save_page};
pub use onair_transport::{Token, Voice};
