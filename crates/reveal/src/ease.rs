use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EaseMode {
    In,
    Out,
    InOut,
}

impl EaseMode {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "in" => Some(EaseMode::In),
            "out" => Some(EaseMode::Out),
            "inOut" => Some(EaseMode::InOut),
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            EaseMode::In => "in",
            EaseMode::Out => "out",
            EaseMode::InOut => "inOut",
        }
    }
}

/// Easing curves by their familiar names: `none`, `power3.out`,
/// `sine.inOut`, `back.out(1.7)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Ease {
    #[default]
    None,
    /// `power1` through `power4`; the curve exponent is `power + 1`.
    Power(u8, EaseMode),
    Sine(EaseMode),
    /// Overshoots past 1.0 before settling.
    BackOut(f32),
}

impl Ease {
    /// Map linear progress in `[0, 1]` to eased progress.
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Ease::None => t,
            Ease::Power(power, mode) => {
                let exp = power as i32 + 1;
                match mode {
                    EaseMode::In => t.powi(exp),
                    EaseMode::Out => 1.0 - (1.0 - t).powi(exp),
                    EaseMode::InOut => {
                        if t < 0.5 {
                            (2.0 * t).powi(exp) / 2.0
                        } else {
                            1.0 - (2.0 * (1.0 - t)).powi(exp) / 2.0
                        }
                    }
                }
            }
            Ease::Sine(mode) => match mode {
                EaseMode::In => 1.0 - (t * PI / 2.0).cos(),
                EaseMode::Out => (t * PI / 2.0).sin(),
                EaseMode::InOut => -((PI * t).cos() - 1.0) / 2.0,
            },
            Ease::BackOut(overshoot) => {
                let u = t - 1.0;
                1.0 + (overshoot + 1.0) * u.powi(3) + overshoot * u.powi(2)
            }
        }
    }
}

impl FromStr for Ease {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::Ease(s.to_string());
        let s = s.trim();
        if s == "none" || s == "linear" {
            return Ok(Ease::None);
        }

        if let Some(args) = s.strip_prefix("back.out") {
            let overshoot = match args {
                "" => 1.7,
                _ => args
                    .strip_prefix('(')
                    .and_then(|a| a.strip_suffix(')'))
                    .and_then(|a| a.trim().parse::<f32>().ok())
                    .ok_or_else(err)?,
            };
            return Ok(Ease::BackOut(overshoot));
        }

        let (family, mode) = match s.split_once('.') {
            Some((family, mode)) => (family, EaseMode::parse(mode).ok_or_else(err)?),
            // A bare family name eases out
            None => (s, EaseMode::Out),
        };

        match family {
            "sine" => Ok(Ease::Sine(mode)),
            "power1" => Ok(Ease::Power(1, mode)),
            "power2" => Ok(Ease::Power(2, mode)),
            "power3" => Ok(Ease::Power(3, mode)),
            "power4" => Ok(Ease::Power(4, mode)),
            _ => Err(err()),
        }
    }
}

impl TryFrom<String> for Ease {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Ease> for String {
    fn from(ease: Ease) -> Self {
        ease.to_string()
    }
}

impl fmt::Display for Ease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ease::None => write!(f, "none"),
            Ease::Power(power, mode) => write!(f, "power{power}.{}", mode.name()),
            Ease::Sine(mode) => write!(f, "sine.{}", mode.name()),
            Ease::BackOut(overshoot) => write!(f, "back.out({overshoot})"),
        }
    }
}
