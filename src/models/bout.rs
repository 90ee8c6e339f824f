//! Bout, its clock, and the result recorded when it completes.

use crate::models::schedule::{Side, WeightClass};
use crate::models::team::WrestlerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a bout.
pub type BoutId = Uuid;

/// Lifecycle of a bout: pending -> active -> completed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoutStatus {
    #[default]
    Pending,
    /// On the mat: points and clock may change.
    Active,
    /// Terminal; `result` is set.
    Completed,
}

/// How a bout was won.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinType {
    Decision,
    MajorDecision,
    TechnicalFall,
    Fall,
    Forfeit,
    Default,
    Disqualification,
}

impl WinType {
    /// Team points awarded to the winning side in a dual meet.
    pub fn team_points(self) -> u32 {
        match self {
            WinType::Decision => 3,
            WinType::MajorDecision => 4,
            WinType::TechnicalFall => 5,
            WinType::Fall | WinType::Forfeit | WinType::Default | WinType::Disqualification => 6,
        }
    }
}

/// Bout clock. Elapsed time is the accumulated time plus the current run, if any.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct BoutClock {
    pub accumulated_ms: i64,
    /// Set while the clock is running.
    pub running_since: Option<DateTime<Utc>>,
}

impl BoutClock {
    pub fn is_running(&self) -> bool {
        self.running_since.is_some()
    }

    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> i64 {
        let current = self
            .running_since
            .map_or(0, |since| (now - since).num_milliseconds().max(0));
        self.accumulated_ms + current
    }

    /// Returns false if the clock was already running.
    pub fn start(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_running() {
            return false;
        }
        self.running_since = Some(now);
        true
    }

    /// Returns false if the clock was not running.
    pub fn pause(&mut self, now: DateTime<Utc>) -> bool {
        match self.running_since.take() {
            Some(since) => {
                self.accumulated_ms += (now - since).num_milliseconds().max(0);
                true
            }
            None => false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Final result of a completed bout.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BoutResult {
    /// None only for a double forfeit.
    pub winner: Option<Side>,
    pub win_type: WinType,
    pub home_score: u32,
    pub away_score: u32,
    pub duration_ms: i64,
}

impl BoutResult {
    /// Team points this result awards to `side`.
    pub fn team_points_for(&self, side: Side) -> u32 {
        if self.winner == Some(side) {
            self.win_type.team_points()
        } else {
            0
        }
    }
}

/// One bout of a dual meet, created from a bout order slot.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bout {
    pub id: BoutId,
    /// 1-based bout number.
    pub position: u32,
    pub weight_class: WeightClass,
    /// Team holding choice of starting position.
    pub choice: Side,
    /// None means that side forfeits.
    pub home_wrestler: Option<WrestlerId>,
    pub away_wrestler: Option<WrestlerId>,
    pub status: BoutStatus,
    pub home_score: u32,
    pub away_score: u32,
    pub clock: BoutClock,
    pub result: Option<BoutResult>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Bout {
    pub fn new(position: u32, weight_class: WeightClass, choice: Side) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            weight_class,
            choice,
            home_wrestler: None,
            away_wrestler: None,
            status: BoutStatus::Pending,
            home_score: 0,
            away_score: 0,
            clock: BoutClock::default(),
            result: None,
            started_at: None,
            completed_at: None,
        }
    }

    pub fn wrestler_mut(&mut self, side: Side) -> &mut Option<WrestlerId> {
        match side {
            Side::Home => &mut self.home_wrestler,
            Side::Away => &mut self.away_wrestler,
        }
    }

    /// Both corners filled.
    pub fn is_contested(&self) -> bool {
        self.home_wrestler.is_some() && self.away_wrestler.is_some()
    }
}
