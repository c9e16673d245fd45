//! Scroll-triggered reveal choreography.
//!
//! One configurable pattern covers every "fade, slide or draw in when the
//! element scrolls into view" effect: a [`RevealSpec`] says what to animate,
//! a [`Reveal`] tracks one element's trigger state and playhead, and the host
//! samples [`Props`] from it every frame. Nothing here knows about a DOM or a
//! renderer.

mod ease;
mod reveal;
mod spec;
mod swap;
mod text;
mod trigger;
mod tween;

pub use ease::{Ease, EaseMode};
pub use reveal::{Direction, Reveal, RevealGuard};
pub use spec::RevealSpec;
pub use swap::{CrossoutSwap, SwapFrame};
pub use text::{NBSP, TypeStep, Typewriter, WordToken, split_chars, split_words};
pub use trigger::{
    Action, Region, ScrollTrigger, ToggleActions, TriggerPoint, ViewportGeometry, parallax_offset,
};
pub use tween::{Props, Stagger, Tween};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown ease '{0}'")]
    Ease(String),

    #[error("invalid trigger point '{0}'")]
    TriggerPoint(String),

    #[error("invalid toggle actions '{0}'")]
    ToggleActions(String),
}
