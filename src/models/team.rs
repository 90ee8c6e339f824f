//! Team, Wrestler, and WeighIn data structures.

use crate::models::schedule::WeightClass;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team.
pub type TeamId = Uuid;

/// Unique identifier for a wrestler (used in bouts and lookups).
pub type WrestlerId = Uuid;

/// A recorded weigh-in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeighIn {
    /// Scale weight in pounds.
    pub weight: f64,
    pub recorded_at: DateTime<Utc>,
    /// Weight was at or under the class limit plus the meet's allowance.
    pub made_weight: bool,
}

/// A wrestler on a team roster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Wrestler {
    pub id: WrestlerId,
    pub first_name: String,
    pub last_name: String,
    pub grade: Option<u8>,
    /// Weight class the wrestler is entered at, if any.
    pub weight_class: Option<WeightClass>,
    pub weigh_in: Option<WeighIn>,
}

impl Wrestler {
    /// Create a new wrestler with no weight class and no weigh-in.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            grade: None,
            weight_class: None,
            weigh_in: None,
        }
    }

    /// Eligible to wrestle: not weighed in yet, or weighed in and made weight.
    pub fn is_eligible(&self) -> bool {
        self.weigh_in.as_ref().map_or(true, |w| w.made_weight)
    }

    /// Eligible and entered at `weight_class`.
    pub fn can_wrestle_at(&self, weight_class: WeightClass) -> bool {
        self.weight_class == Some(weight_class) && self.is_eligible()
    }
}

/// A team and its roster. Roster order is lineup preference within a weight class.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub wrestlers: Vec<Wrestler>,
}

impl Team {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            wrestlers: Vec::new(),
        }
    }

    pub fn get_wrestler(&self, id: WrestlerId) -> Option<&Wrestler> {
        self.wrestlers.iter().find(|w| w.id == id)
    }

    pub fn get_wrestler_mut(&mut self, id: WrestlerId) -> Option<&mut Wrestler> {
        self.wrestlers.iter_mut().find(|w| w.id == id)
    }

    /// Same first and last name already on the roster (case-insensitive).
    pub fn has_wrestler_named(&self, first_name: &str, last_name: &str) -> bool {
        self.wrestlers.iter().any(|w| {
            w.first_name.eq_ignore_ascii_case(first_name) && w.last_name.eq_ignore_ascii_case(last_name)
        })
    }

    /// First eligible wrestler entered at `weight_class`, in roster order.
    pub fn starter_at(&self, weight_class: WeightClass) -> Option<&Wrestler> {
        self.wrestlers.iter().find(|w| w.can_wrestle_at(weight_class))
    }
}
