use serde::{Deserialize, Serialize};

use crate::ease::Ease;

/// Animatable properties. `None` means "not touched by this tween".
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Props {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_percent: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_percent: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
    /// Degrees clockwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
    /// Undrawn fraction of a line: 1 hides it, 0 draws it fully.
    #[serde(skip_serializing_if = "Option::is_none", alias = "strokeDashoffset")]
    pub stroke_dash_offset: Option<f32>,
}

fn mix(from: Option<f32>, to: Option<f32>, rest: f32, t: f32) -> Option<f32> {
    match (from, to) {
        (from, Some(to)) => {
            let from = from.unwrap_or(rest);
            Some(from + (to - from) * t)
        }
        (from, None) => from,
    }
}

impl Props {
    pub fn opacity(value: f32) -> Self {
        Self {
            opacity: Some(value),
            ..Self::default()
        }
    }

    pub fn with_y(mut self, value: f32) -> Self {
        self.y = Some(value);
        self
    }

    pub fn with_x(mut self, value: f32) -> Self {
        self.x = Some(value);
        self
    }

    pub fn with_scale(mut self, value: f32) -> Self {
        self.scale = Some(value);
        self
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = Some(degrees);
        self
    }

    pub fn undrawn(fraction: f32) -> Self {
        Self {
            stroke_dash_offset: Some(fraction),
            ..Self::default()
        }
    }

    /// Interpolate towards `to`. Properties missing from `from` start at
    /// their resting value (opacity and scale 1, everything else 0).
    pub fn lerp(&self, to: &Props, t: f32) -> Props {
        Props {
            opacity: mix(self.opacity, to.opacity, 1.0, t),
            x: mix(self.x, to.x, 0.0, t),
            y: mix(self.y, to.y, 0.0, t),
            x_percent: mix(self.x_percent, to.x_percent, 0.0, t),
            y_percent: mix(self.y_percent, to.y_percent, 0.0, t),
            scale: mix(self.scale, to.scale, 1.0, t),
            rotation: mix(self.rotation, to.rotation, 0.0, t),
            stroke_dash_offset: mix(self.stroke_dash_offset, to.stroke_dash_offset, 0.0, t),
        }
    }

    pub fn opacity_or_rest(&self) -> f32 {
        self.opacity.unwrap_or(1.0)
    }

    pub fn scale_or_rest(&self) -> f32 {
        self.scale.unwrap_or(1.0)
    }

    pub fn rotation_radians(&self) -> f32 {
        self.rotation.unwrap_or(0.0).to_radians()
    }

    /// How much of a line is drawn, in `0..=1`. Untouched lines are whole.
    pub fn drawn_fraction(&self) -> f32 {
        1.0 - self.stroke_dash_offset.unwrap_or(0.0).clamp(0.0, 1.0)
    }

    /// Total vertical offset in pixels for an element `height` tall.
    pub fn offset_y(&self, height: f32) -> f32 {
        self.y.unwrap_or(0.0) + self.y_percent.unwrap_or(0.0) / 100.0 * height
    }

    pub fn offset_x(&self, width: f32) -> f32 {
        self.x.unwrap_or(0.0) + self.x_percent.unwrap_or(0.0) / 100.0 * width
    }
}

/// Per-item start offset for a set of animated items.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stagger {
    pub each: f32,
}

impl Stagger {
    pub fn new(each: f32) -> Self {
        Self { each }
    }

    pub fn offset(&self, item: usize) -> f32 {
        item as f32 * self.each
    }

    /// Time between the first item starting and the last item starting.
    pub fn spread(&self, items: usize) -> f32 {
        self.offset(items.saturating_sub(1))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: Props,
    pub to: Props,
    pub duration: f32,
    pub delay: f32,
    pub ease: Ease,
}

impl Tween {
    pub fn end_time(&self) -> f32 {
        self.delay + self.duration
    }

    /// Linear progress at `time` seconds after the tween was started.
    pub fn progress(&self, time: f32) -> f32 {
        if time <= self.delay {
            return 0.0;
        }
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((time - self.delay) / self.duration).min(1.0)
    }

    pub fn sample(&self, time: f32) -> Props {
        let t = self.ease.apply(self.progress(time));
        self.from.lerp(&self.to, t)
    }
}
