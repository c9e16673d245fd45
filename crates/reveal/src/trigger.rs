use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ParseError;

/// Where an element sits relative to the viewport, in the viewport's pixels.
/// `element_top` is negative once the element's top has scrolled above the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportGeometry {
    pub element_top: f32,
    pub element_height: f32,
    pub viewport_height: f32,
}

/// `"<element edge> <viewport edge>"`, e.g. `"top 80%"`: fires when the
/// element's top reaches 80% of the way down the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TriggerPoint {
    /// Fraction of the element's height, 0 = top.
    pub element: f32,
    /// Fraction of the viewport's height, 0 = top.
    pub viewport: f32,
}

fn parse_edge(s: &str) -> Option<f32> {
    match s {
        "top" => Some(0.0),
        "center" => Some(0.5),
        "bottom" => Some(1.0),
        _ => s
            .strip_suffix('%')
            .and_then(|p| p.parse::<f32>().ok())
            .map(|p| p / 100.0),
    }
}

fn edge_name(fraction: f32) -> String {
    match fraction {
        f if f == 0.0 => "top".to_string(),
        f if f == 0.5 => "center".to_string(),
        f if f == 1.0 => "bottom".to_string(),
        f => format!("{}%", f * 100.0),
    }
}

impl TriggerPoint {
    pub const fn new(element: f32, viewport: f32) -> Self {
        Self { element, viewport }
    }

    /// How far the page still has to scroll before this point is reached.
    /// Zero or negative once it has been passed.
    pub fn distance(&self, geometry: &ViewportGeometry) -> f32 {
        geometry.element_top + self.element * geometry.element_height
            - self.viewport * geometry.viewport_height
    }
}

impl FromStr for TriggerPoint {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::TriggerPoint(s.to_string());
        let mut parts = s.split_whitespace();
        let element = parts.next().and_then(parse_edge).ok_or_else(err)?;
        let viewport = parts.next().and_then(parse_edge).ok_or_else(err)?;
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(Self { element, viewport })
    }
}

impl TryFrom<String> for TriggerPoint {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TriggerPoint> for String {
    fn from(point: TriggerPoint) -> Self {
        point.to_string()
    }
}

impl fmt::Display for TriggerPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", edge_name(self.element), edge_name(self.viewport))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Play,
    Pause,
    Resume,
    Reverse,
    Restart,
    Reset,
    Complete,
    None,
}

impl Action {
    fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "play" => Action::Play,
            "pause" => Action::Pause,
            "resume" => Action::Resume,
            "reverse" => Action::Reverse,
            "restart" => Action::Restart,
            "reset" => Action::Reset,
            "complete" => Action::Complete,
            "none" => Action::None,
            _ => return None,
        })
    }

    fn name(self) -> &'static str {
        match self {
            Action::Play => "play",
            Action::Pause => "pause",
            Action::Resume => "resume",
            Action::Reverse => "reverse",
            Action::Restart => "restart",
            Action::Reset => "reset",
            Action::Complete => "complete",
            Action::None => "none",
        }
    }
}

/// What to do on enter, leave, enter-back and leave-back, in that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToggleActions {
    pub on_enter: Action,
    pub on_leave: Action,
    pub on_enter_back: Action,
    pub on_leave_back: Action,
}

impl Default for ToggleActions {
    /// `play none none reverse`
    fn default() -> Self {
        Self {
            on_enter: Action::Play,
            on_leave: Action::None,
            on_enter_back: Action::None,
            on_leave_back: Action::Reverse,
        }
    }
}

impl FromStr for ToggleActions {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let actions = s
            .split_whitespace()
            .map(Action::parse)
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| ParseError::ToggleActions(s.to_string()))?;
        match actions[..] {
            [on_enter, on_leave, on_enter_back, on_leave_back] => Ok(Self {
                on_enter,
                on_leave,
                on_enter_back,
                on_leave_back,
            }),
            _ => Err(ParseError::ToggleActions(s.to_string())),
        }
    }
}

impl TryFrom<String> for ToggleActions {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ToggleActions> for String {
    fn from(actions: ToggleActions) -> Self {
        format!(
            "{} {} {} {}",
            actions.on_enter.name(),
            actions.on_leave.name(),
            actions.on_enter_back.name(),
            actions.on_leave_back.name()
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Before,
    Active,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollTrigger {
    pub start: TriggerPoint,
    pub end: TriggerPoint,
}

impl ScrollTrigger {
    pub fn region(&self, geometry: &ViewportGeometry) -> Region {
        if self.start.distance(geometry) > 0.0 {
            Region::Before
        } else if self.end.distance(geometry) < 0.0 {
            Region::After
        } else {
            Region::Active
        }
    }

    /// Scrubbed progress from start (0) to end (1).
    pub fn progress(&self, geometry: &ViewportGeometry) -> f32 {
        let start = self.start.distance(geometry);
        let end = self.end.distance(geometry);
        let span = end - start;
        if span <= 0.0 {
            return if start <= 0.0 { 1.0 } else { 0.0 };
        }
        (-start / span).clamp(0.0, 1.0)
    }
}

/// Vertical parallax drift: `y_percent` of the element's height, reached
/// linearly over the trigger's scrubbed progress.
pub fn parallax_offset(progress: f32, y_percent: f32, element_height: f32) -> f32 {
    progress.clamp(0.0, 1.0) * y_percent / 100.0 * element_height
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(element_top: f32) -> ViewportGeometry {
        ViewportGeometry {
            element_top,
            element_height: 100.0,
            viewport_height: 1000.0,
        }
    }

    #[test]
    fn test_parse_trigger_points() {
        assert_eq!("top 80%".parse::<TriggerPoint>().unwrap(), TriggerPoint::new(0.0, 0.8));
        assert_eq!("top bottom".parse::<TriggerPoint>().unwrap(), TriggerPoint::new(0.0, 1.0));
        assert_eq!("bottom top".parse::<TriggerPoint>().unwrap(), TriggerPoint::new(1.0, 0.0));
        assert_eq!("center center".parse::<TriggerPoint>().unwrap(), TriggerPoint::new(0.5, 0.5));
    }

    #[test]
    fn test_reject_bad_trigger_points() {
        assert!("top".parse::<TriggerPoint>().is_err());
        assert!("middle 80%".parse::<TriggerPoint>().is_err());
        assert!("top 80% extra".parse::<TriggerPoint>().is_err());
    }

    #[test]
    fn test_trigger_point_display() {
        assert_eq!(TriggerPoint::new(0.0, 0.85).to_string(), "top 85%");
        assert_eq!(TriggerPoint::new(1.0, 0.0).to_string(), "bottom top");
    }

    #[test]
    fn test_distance_crosses_zero_at_trigger() {
        let start: TriggerPoint = "top 80%".parse().unwrap();
        assert!(start.distance(&geometry(900.0)) > 0.0);
        assert_eq!(start.distance(&geometry(800.0)), 0.0);
        assert!(start.distance(&geometry(700.0)) < 0.0);
    }

    #[test]
    fn test_regions() {
        let trigger = ScrollTrigger {
            start: "top 80%".parse().unwrap(),
            end: "bottom top".parse().unwrap(),
        };
        assert_eq!(trigger.region(&geometry(900.0)), Region::Before);
        assert_eq!(trigger.region(&geometry(500.0)), Region::Active);
        assert_eq!(trigger.region(&geometry(-150.0)), Region::After);
    }

    #[test]
    fn test_scrubbed_progress() {
        let trigger = ScrollTrigger {
            start: "top bottom".parse().unwrap(),
            end: "bottom top".parse().unwrap(),
        };
        // travel from top=1000 to top=-100 is 1100px
        assert_eq!(trigger.progress(&geometry(1200.0)), 0.0);
        assert!((trigger.progress(&geometry(450.0)) - 0.5).abs() < 1e-6);
        assert_eq!(trigger.progress(&geometry(-500.0)), 1.0);
    }

    #[test]
    fn test_toggle_actions() {
        let actions: ToggleActions = "play none none reverse".parse().unwrap();
        assert_eq!(actions, ToggleActions::default());
        assert_eq!(String::from(actions), "play none none reverse");
        assert!("play none".parse::<ToggleActions>().is_err());
        assert!("play none none rewind".parse::<ToggleActions>().is_err());
    }

    #[test]
    fn test_parallax_offset() {
        assert_eq!(parallax_offset(0.0, -5.0, 400.0), 0.0);
        assert!((parallax_offset(1.0, -5.0, 400.0) + 20.0).abs() < 1e-4);
        assert_eq!(
            parallax_offset(2.0, -5.0, 400.0),
            parallax_offset(1.0, -5.0, 400.0)
        );
    }
}
