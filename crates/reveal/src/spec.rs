use serde::{Deserialize, Serialize};

use crate::ease::{Ease, EaseMode};
use crate::trigger::{ScrollTrigger, ToggleActions, TriggerPoint};
use crate::tween::{Props, Stagger, Tween};

fn default_duration() -> f32 {
    0.8
}

fn default_ease() -> Ease {
    Ease::Power(3, EaseMode::Out)
}

fn default_start() -> TriggerPoint {
    TriggerPoint::new(0.0, 0.85)
}

fn default_end() -> TriggerPoint {
    TriggerPoint::new(1.0, 0.0)
}

/// Everything needed to reveal one element (or its split items) on scroll.
///
/// ```json
/// { "from": { "opacity": 0, "y": 40 }, "to": { "opacity": 1, "y": 0 },
///   "stagger": 0.08, "start": "top 80%" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealSpec {
    #[serde(default)]
    pub from: Props,
    #[serde(default)]
    pub to: Props,
    #[serde(default = "default_duration")]
    pub duration: f32,
    #[serde(default)]
    pub delay: f32,
    #[serde(default = "default_ease")]
    pub ease: Ease,
    /// Seconds between consecutive items starting.
    #[serde(default)]
    pub stagger: f32,
    #[serde(default = "default_start")]
    pub start: TriggerPoint,
    #[serde(default = "default_end")]
    pub end: TriggerPoint,
    #[serde(default)]
    pub toggle_actions: ToggleActions,
    /// Play at most once, ignoring every later trigger.
    #[serde(default)]
    pub once: bool,
}

impl Default for RevealSpec {
    /// Fade up from 40px below.
    fn default() -> Self {
        Self {
            from: Props::opacity(0.0).with_y(40.0),
            to: Props::opacity(1.0).with_y(0.0),
            duration: default_duration(),
            delay: 0.0,
            ease: default_ease(),
            stagger: 0.0,
            start: default_start(),
            end: default_end(),
            toggle_actions: ToggleActions::default(),
            once: false,
        }
    }
}

impl RevealSpec {
    pub fn fade_in() -> Self {
        Self {
            from: Props::opacity(0.0),
            to: Props::opacity(1.0),
            ..Self::default()
        }
    }

    pub fn with_stagger(mut self, each: f32) -> Self {
        self.stagger = each;
        self
    }

    pub fn with_once(mut self, once: bool) -> Self {
        self.once = once;
        self
    }

    pub fn stagger(&self) -> Stagger {
        Stagger::new(self.stagger)
    }

    /// The tween for the `item`th split item (0 for an unsplit element).
    pub fn tween(&self, item: usize) -> Tween {
        Tween {
            from: self.from,
            to: self.to,
            duration: self.duration,
            delay: self.delay + self.stagger().offset(item),
            ease: self.ease,
        }
    }

    /// Seconds from play until the last of `items` settles.
    pub fn total_duration(&self, items: usize) -> f32 {
        self.delay + self.stagger().spread(items) + self.duration
    }

    pub fn trigger(&self) -> ScrollTrigger {
        ScrollTrigger {
            start: self.start,
            end: self.end,
        }
    }
}
