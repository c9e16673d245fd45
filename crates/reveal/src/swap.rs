use crate::ease::{Ease, EaseMode};
use crate::tween::{Props, Tween};

/// Props for each part of a cross-out swap at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwapFrame {
    pub line: Props,
    pub old: Props,
    pub new: Props,
}

/// A line drawn through the old text, which dims, while the replacement
/// rises in underneath. All three tweens share one playhead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossoutSwap {
    pub line: Tween,
    pub old: Tween,
    pub new: Tween,
}

impl Default for CrossoutSwap {
    fn default() -> Self {
        Self {
            line: Tween {
                from: Props::undrawn(1.0),
                to: Props::undrawn(0.0),
                duration: 0.7,
                delay: 0.0,
                ease: Ease::Power(2, EaseMode::InOut),
            },
            old: Tween {
                from: Props::opacity(1.0),
                to: Props::opacity(0.45),
                duration: 0.25,
                delay: 0.35,
                ease: Ease::Power(1, EaseMode::Out),
            },
            new: Tween {
                from: Props::opacity(0.0).with_y(6.0),
                to: Props::opacity(1.0).with_y(0.0),
                duration: 0.45,
                delay: 0.45,
                ease: Ease::Power(3, EaseMode::Out),
            },
        }
    }
}

impl CrossoutSwap {
    pub fn duration(&self) -> f32 {
        self.line
            .end_time()
            .max(self.old.end_time())
            .max(self.new.end_time())
    }

    pub fn sample(&self, time: f32) -> SwapFrame {
        SwapFrame {
            line: self.line.sample(time),
            old: self.old.sample(time),
            new: self.new.sample(time),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_starts_with_only_old_text() {
        let frame = CrossoutSwap::default().sample(0.0);
        assert_eq!(frame.line.drawn_fraction(), 0.0);
        assert_eq!(frame.old.opacity_or_rest(), 1.0);
        assert_eq!(frame.new.opacity_or_rest(), 0.0);
        assert_eq!(frame.new.offset_y(20.0), 6.0);
    }

    #[test]
    fn test_replacement_waits_for_line() {
        let swap = CrossoutSwap::default();
        let frame = swap.sample(0.4);
        assert!(frame.line.drawn_fraction() > 0.5);
        assert!(frame.old.opacity_or_rest() < 1.0);
        assert_eq!(frame.new.opacity_or_rest(), 0.0);
    }

    #[test]
    fn test_swap_settles() {
        let swap = CrossoutSwap::default();
        assert!((swap.duration() - 0.9).abs() < 1e-6);
        let frame = swap.sample(swap.duration());
        assert_eq!(frame.line.drawn_fraction(), 1.0);
        assert!((frame.old.opacity_or_rest() - 0.45).abs() < 1e-6);
        assert_eq!(frame.new.opacity_or_rest(), 1.0);
        assert_eq!(frame.new.offset_y(20.0), 0.0);
    }
}
