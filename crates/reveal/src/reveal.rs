use crate::spec::RevealSpec;
use crate::trigger::{Action, Region, ViewportGeometry};
use crate::tween::Props;

/// Has-played flag for one element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RevealGuard {
    played: bool,
}

impl RevealGuard {
    pub fn has_played(&self) -> bool {
        self.played
    }

    pub fn mark_played(&mut self) {
        self.played = true;
    }

    /// True exactly once: the first time it is asked.
    pub fn first_time(&mut self) -> bool {
        !std::mem::replace(&mut self.played, true)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Forward,
    Reverse,
    #[default]
    Paused,
}

/// Trigger state and playhead for one element split into `items` pieces.
#[derive(Debug, Clone)]
pub struct Reveal {
    spec: RevealSpec,
    items: usize,
    time: f32,
    direction: Direction,
    region: Option<Region>,
    guard: RevealGuard,
}

impl Reveal {
    pub fn new(spec: RevealSpec, items: usize) -> Self {
        Self {
            spec,
            items: items.max(1),
            time: 0.0,
            direction: Direction::Paused,
            region: None,
            guard: RevealGuard::default(),
        }
    }

    pub fn spec(&self) -> &RevealSpec {
        &self.spec
    }

    pub fn items(&self) -> usize {
        self.items
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn region(&self) -> Option<Region> {
        self.region
    }

    pub fn has_played(&self) -> bool {
        self.guard.has_played()
    }

    pub fn total_duration(&self) -> f32 {
        self.spec.total_duration(self.items)
    }

    /// Feed the element's current position. Returns the toggle action that
    /// fired, if the element crossed a trigger point since the last call.
    ///
    /// The first observation counts as coming from above the start point,
    /// so an element already on screen at load plays immediately.
    pub fn observe(&mut self, geometry: &ViewportGeometry) -> Option<Action> {
        let region = self.spec.trigger().region(geometry);
        let previous = self.region.replace(region).unwrap_or(Region::Before);
        if previous == region {
            return None;
        }

        let actions = self.spec.toggle_actions;
        let action = match (previous, region) {
            (Region::Before, _) => actions.on_enter,
            (Region::Active, Region::After) => actions.on_leave,
            (Region::After, Region::Active) => actions.on_enter_back,
            (_, Region::Before) => actions.on_leave_back,
            _ => return None,
        };
        self.apply(action)
    }

    /// Play without a trigger, for elements revealed by other means.
    pub fn play(&mut self) -> Option<Action> {
        self.apply(Action::Play)
    }

    fn apply(&mut self, action: Action) -> Option<Action> {
        if self.spec.once && self.guard.has_played() {
            return None;
        }

        match action {
            Action::None => return None,
            Action::Play | Action::Resume => self.direction = Direction::Forward,
            Action::Pause => self.direction = Direction::Paused,
            Action::Reverse => self.direction = Direction::Reverse,
            Action::Restart => {
                self.time = 0.0;
                self.direction = Direction::Forward;
            }
            Action::Reset => {
                self.time = 0.0;
                self.direction = Direction::Paused;
            }
            Action::Complete => {
                self.time = self.total_duration();
                self.direction = Direction::Paused;
            }
        }

        if matches!(action, Action::Play | Action::Restart | Action::Complete) {
            self.guard.mark_played();
        }
        Some(action)
    }

    /// Move the playhead by `dt` seconds in the current direction.
    pub fn advance(&mut self, dt: f32) {
        let total = self.total_duration();
        match self.direction {
            Direction::Forward => self.time = (self.time + dt).min(total),
            Direction::Reverse => self.time = (self.time - dt).max(0.0),
            Direction::Paused => {}
        }
    }

    /// Whether `advance` would still move the playhead.
    pub fn is_animating(&self) -> bool {
        match self.direction {
            Direction::Forward => self.time < self.total_duration(),
            Direction::Reverse => self.time > 0.0,
            Direction::Paused => false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.time >= self.total_duration()
    }

    /// Properties for the `item`th piece at the current playhead.
    pub fn sample(&self, item: usize) -> Props {
        self.spec.tween(item).sample(self.time)
    }
}
