//! Weight classes, choice parity, and the bout order produced by the dual-meet scheduler.

use serde::{Deserialize, Serialize};

/// A weight class, identified by its upper limit in pounds.
pub type WeightClass = u32;

/// NFHS high school weight classes, used when a meet is created without its own list.
pub const DEFAULT_WEIGHT_CLASSES: [WeightClass; 14] = [
    106, 113, 120, 126, 132, 138, 144, 150, 157, 165, 175, 190, 215, 285,
];

/// One of the two teams in a dual meet.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    Home,
    Away,
}

impl Side {
    /// The other team.
    pub fn opposite(self) -> Self {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

/// Which bout positions the home team holds choice on, counted in the rotated bout order.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceParity {
    /// 1st, 3rd, 5th ... bout.
    #[default]
    Odds,
    /// 2nd, 4th, 6th ... bout.
    Evens,
}

impl ChoiceParity {
    /// Team holding choice at 0-based `index` of the rotated order.
    pub fn holder_for(self, index: usize) -> Side {
        // index 0 is bout #1, an odd-numbered bout
        let odd_bout = index % 2 == 0;
        let home = match self {
            ChoiceParity::Odds => odd_bout,
            ChoiceParity::Evens => !odd_bout,
        };
        if home {
            Side::Home
        } else {
            Side::Away
        }
    }
}

/// A single scheduled bout slot: bout number, weight, and who holds choice.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BoutSlot {
    /// 1-based bout number.
    pub position: u32,
    pub weight_class: WeightClass,
    pub choice: Side,
}

/// Full bout order of a dual meet, one slot per weight class.
pub type BoutOrder = Vec<BoutSlot>;

/// Rejected scheduler input. Nothing is coerced or defaulted.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InvalidInput {
    EmptyWeightClasses,
    DuplicateWeightClass(WeightClass),
    NonPositiveWeightClass,
    StartingWeightClassNotFound(WeightClass),
}

impl std::fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidInput::EmptyWeightClasses => write!(f, "At least one weight class is required"),
            InvalidInput::DuplicateWeightClass(w) => write!(f, "Weight class {} is listed more than once", w),
            InvalidInput::NonPositiveWeightClass => write!(f, "Weight classes must be positive"),
            InvalidInput::StartingWeightClassNotFound(w) => {
                write!(f, "Starting weight class {} is not one of the meet's weight classes", w)
            }
        }
    }
}

impl std::error::Error for InvalidInput {}
