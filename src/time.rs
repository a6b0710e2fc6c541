use std::fmt::Display;

use serde::{Deserialize, Serialize};
use strum_macros::{EnumCount, EnumIter};

/// Playback rates a user can pick from.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, EnumCount, EnumIter, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TimeSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl TimeSpeed {
    /// Factor applied to every step's `dt`.
    pub const fn multiplier(self) -> f64 {
        match self {
            TimeSpeed::Slow => 0.25,
            TimeSpeed::Normal => 1.0,
            TimeSpeed::Fast => 1.75,
        }
    }

    pub const fn get_faster(self) -> Option<Self> {
        match self {
            TimeSpeed::Slow => Some(TimeSpeed::Normal),
            TimeSpeed::Normal => Some(TimeSpeed::Fast),
            TimeSpeed::Fast => None,
        }
    }

    pub const fn get_slower(self) -> Option<Self> {
        match self {
            TimeSpeed::Slow => None,
            TimeSpeed::Normal => Some(TimeSpeed::Slow),
            TimeSpeed::Fast => Some(TimeSpeed::Normal),
        }
    }
}

impl Display for TimeSpeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeSpeed::Slow => write!(f, "slow"),
            TimeSpeed::Normal => write!(f, "normal"),
            TimeSpeed::Fast => write!(f, "fast"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn multipliers_increase_with_speed() {
        let multipliers: Vec<f64> = TimeSpeed::iter().map(TimeSpeed::multiplier).collect();
        assert!(multipliers.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(TimeSpeed::default().multiplier(), 1.0);
    }

    #[test]
    fn faster_and_slower_are_inverse() {
        for speed in TimeSpeed::iter() {
            if let Some(faster) = speed.get_faster() {
                assert_eq!(faster.get_slower(), Some(speed));
            }
        }
    }
}
