pub const IDLE_LABEL: &str = "tune in";
pub const IDLE_HINT: &str = "click";
pub const ON_AIR_HINT: &str = "click to switch / stop";

/// What the radio widget shows. Written by the controller, never read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OnAirState {
    pub on_air: bool,
    /// 1-based track number while on air.
    pub track: Option<usize>,
}

impl OnAirState {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn on_air(track_index: usize) -> Self {
        Self {
            on_air: true,
            track: Some(track_index + 1),
        }
    }

    pub fn label(&self) -> String {
        match (self.on_air, self.track) {
            (true, Some(track)) => format!("on air {track}"),
            (true, None) => "on air".to_string(),
            (false, _) => IDLE_LABEL.to_string(),
        }
    }

    pub fn hint(&self) -> &'static str {
        if self.on_air { ON_AIR_HINT } else { IDLE_HINT }
    }
}

pub trait UiReflection {
    fn reflect(&mut self, state: &OnAirState);
}

/// Keeping only the latest state is all a polling UI needs.
impl UiReflection for OnAirState {
    fn reflect(&mut self, state: &OnAirState) {
        *self = *state;
    }
}
