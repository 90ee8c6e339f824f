//! DualMeet, MeetState, and MeetError.

use crate::logic::validate_weight_classes;
use crate::models::bout::{Bout, BoutId, BoutStatus};
use crate::models::schedule::{ChoiceParity, InvalidInput, Side, WeightClass, DEFAULT_WEIGHT_CLASSES};
use crate::models::team::{Team, WeighIn, Wrestler, WrestlerId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during meet operations.
#[derive(Clone, Debug, PartialEq)]
pub enum MeetError {
    /// Meet is not in a state that allows this action.
    InvalidState,
    /// Weight classes or starting weight class rejected by the scheduler.
    InvalidInput(InvalidInput),
    WrestlerNotFound(WrestlerId),
    /// A wrestler with this name is already on the team (case-insensitive).
    DuplicateWrestlerName,
    EmptyName,
    WeightClassNotInMeet(WeightClass),
    /// Weigh-in weight must be a positive number.
    InvalidWeight,
    /// Bouts cannot be generated before a starting weight class is chosen.
    NoStartingWeightClass,
    BoutNotFound(BoutId),
    /// Bout is not in a status that allows this action.
    InvalidBoutState { bout_id: BoutId, status: BoutStatus },
    /// Another bout is already on the mat.
    AnotherBoutActive(BoutId),
    ClockRunning,
    ClockNotRunning,
    /// Points would push a bout score past its limit.
    ScoreOverflow,
    /// Forfeit needs exactly one empty corner, or both for a double forfeit.
    NoForfeitWinner,
    /// Wrestler is not on the team for this side, or cannot wrestle at this weight.
    WrestlerNotOnTeam(WrestlerId),
    RosterImport { line: u64, message: String },
}

impl std::fmt::Display for MeetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeetError::InvalidState => write!(f, "Invalid state for this action"),
            MeetError::InvalidInput(e) => write!(f, "{}", e),
            MeetError::WrestlerNotFound(_) => write!(f, "Wrestler not found"),
            MeetError::DuplicateWrestlerName => write!(f, "A wrestler with this name is already on the team"),
            MeetError::EmptyName => write!(f, "Name must not be empty"),
            MeetError::WeightClassNotInMeet(w) => write!(f, "Weight class {} is not part of this meet", w),
            MeetError::InvalidWeight => write!(f, "Weight must be a positive number"),
            MeetError::NoStartingWeightClass => write!(f, "Choose a starting weight class first"),
            MeetError::BoutNotFound(_) => write!(f, "Bout not found"),
            MeetError::InvalidBoutState { status, .. } => {
                write!(f, "Bout is {:?}; action not allowed", status)
            }
            MeetError::AnotherBoutActive(_) => write!(f, "Another bout is already in progress"),
            MeetError::ClockRunning => write!(f, "Clock is already running"),
            MeetError::ClockNotRunning => write!(f, "Clock is not running"),
            MeetError::ScoreOverflow => write!(f, "Score is too large"),
            MeetError::NoForfeitWinner => write!(f, "Bout has wrestlers in both corners; it cannot be forfeited"),
            MeetError::WrestlerNotOnTeam(_) => {
                write!(f, "Wrestler is not eligible for this side at this weight")
            }
            MeetError::RosterImport { line, message } => {
                write!(f, "Roster import failed at line {}: {}", line, message)
            }
        }
    }
}

impl std::error::Error for MeetError {}

impl From<InvalidInput> for MeetError {
    fn from(e: InvalidInput) -> Self {
        MeetError::InvalidInput(e)
    }
}

/// Unique identifier for a meet.
pub type MeetId = Uuid;

/// Current phase of the meet.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetState {
    /// Rosters, weigh-ins, and schedule settings are editable.
    #[default]
    Setup,
    /// Bouts generated; wrestling under way.
    InProgress,
    /// Every bout completed.
    Completed,
}

/// Team point totals.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamScores {
    pub home: u32,
    pub away: u32,
}

/// Full dual meet state: both rosters, schedule settings, and bouts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DualMeet {
    pub id: MeetId,
    pub name: String,
    pub date: Option<NaiveDate>,
    pub home_team: Team,
    pub away_team: Team,
    /// Ascending, distinct.
    pub weight_classes: Vec<WeightClass>,
    /// Pounds over the class limit still counted as making weight.
    pub weigh_in_allowance: f64,
    /// Weight class wrestled first; chosen or drawn during setup.
    pub starting_weight_class: Option<WeightClass>,
    /// Bout parity on which the home team holds choice.
    pub home_choice: ChoiceParity,
    pub state: MeetState,
    /// Generated on start, in bout order.
    pub bouts: Vec<Bout>,
}

impl DualMeet {
    /// Create a new meet in Setup with empty rosters and the default weight classes.
    pub fn new(name: impl Into<String>, home_team: impl Into<String>, away_team: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            date: None,
            home_team: Team::new(home_team),
            away_team: Team::new(away_team),
            weight_classes: DEFAULT_WEIGHT_CLASSES.to_vec(),
            weigh_in_allowance: 0.0,
            starting_weight_class: None,
            home_choice: ChoiceParity::default(),
            state: MeetState::Setup,
            bouts: Vec::new(),
        }
    }

    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::Home => &self.home_team,
            Side::Away => &self.away_team,
        }
    }

    pub fn team_mut(&mut self, side: Side) -> &mut Team {
        match side {
            Side::Home => &mut self.home_team,
            Side::Away => &mut self.away_team,
        }
    }

    /// Look up a wrestler on either roster.
    pub fn find_wrestler(&self, id: WrestlerId) -> Option<(Side, &Wrestler)> {
        [Side::Home, Side::Away]
            .into_iter()
            .find_map(|side| self.team(side).get_wrestler(id).map(|w| (side, w)))
    }

    fn find_wrestler_mut(&mut self, id: WrestlerId) -> Option<&mut Wrestler> {
        if self.home_team.get_wrestler(id).is_some() {
            self.home_team.get_wrestler_mut(id)
        } else {
            self.away_team.get_wrestler_mut(id)
        }
    }

    fn require_setup(&self) -> Result<(), MeetError> {
        if self.state != MeetState::Setup {
            return Err(MeetError::InvalidState);
        }
        Ok(())
    }

    /// Add a wrestler to one roster (Setup only). Names are trimmed and unique per team.
    pub fn add_wrestler(
        &mut self,
        side: Side,
        first_name: &str,
        last_name: &str,
        weight_class: Option<WeightClass>,
        grade: Option<u8>,
    ) -> Result<WrestlerId, MeetError> {
        self.require_setup()?;
        let first = first_name.trim();
        let last = last_name.trim();
        if first.is_empty() || last.is_empty() {
            return Err(MeetError::EmptyName);
        }
        if let Some(w) = weight_class {
            if !self.weight_classes.contains(&w) {
                return Err(MeetError::WeightClassNotInMeet(w));
            }
        }
        let team = self.team_mut(side);
        if team.has_wrestler_named(first, last) {
            return Err(MeetError::DuplicateWrestlerName);
        }
        let mut wrestler = Wrestler::new(first, last);
        wrestler.weight_class = weight_class;
        wrestler.grade = grade;
        let id = wrestler.id;
        team.wrestlers.push(wrestler);
        Ok(id)
    }

    /// Remove a wrestler by id (Setup only).
    pub fn remove_wrestler(&mut self, wrestler_id: WrestlerId) -> Result<(), MeetError> {
        self.require_setup()?;
        let (side, _) = self
            .find_wrestler(wrestler_id)
            .ok_or(MeetError::WrestlerNotFound(wrestler_id))?;
        self.team_mut(side).wrestlers.retain(|w| w.id != wrestler_id);
        Ok(())
    }

    /// Enter a wrestler at a weight class, or clear it with None (Setup only).
    /// An existing weigh-in is re-judged against the new class.
    pub fn set_wrestler_weight_class(
        &mut self,
        wrestler_id: WrestlerId,
        weight_class: Option<WeightClass>,
    ) -> Result<(), MeetError> {
        self.require_setup()?;
        if let Some(w) = weight_class {
            if !self.weight_classes.contains(&w) {
                return Err(MeetError::WeightClassNotInMeet(w));
            }
        }
        let allowance = self.weigh_in_allowance;
        let wrestler = self
            .find_wrestler_mut(wrestler_id)
            .ok_or(MeetError::WrestlerNotFound(wrestler_id))?;
        wrestler.weight_class = weight_class;
        if let Some(weigh_in) = wrestler.weigh_in.as_mut() {
            weigh_in.made_weight = made_weight(weigh_in.weight, weight_class, allowance);
        }
        Ok(())
    }

    /// Replace the meet's weight classes (Setup only). Stored ascending.
    /// Wrestlers entered at a removed class lose their entry; a removed starting class is cleared.
    pub fn set_weight_classes(&mut self, weight_classes: &[WeightClass]) -> Result<(), MeetError> {
        self.require_setup()?;
        let sorted = validate_weight_classes(weight_classes)?;
        for team in [&mut self.home_team, &mut self.away_team] {
            for w in &mut team.wrestlers {
                if w.weight_class.is_some_and(|c| !sorted.contains(&c)) {
                    w.weight_class = None;
                }
            }
        }
        if self.starting_weight_class.is_some_and(|c| !sorted.contains(&c)) {
            self.starting_weight_class = None;
        }
        self.weight_classes = sorted;
        self.rejudge_weigh_ins();
        Ok(())
    }

    /// Set the weigh-in allowance in pounds (Setup only). Recorded weigh-ins are re-judged.
    pub fn set_weigh_in_allowance(&mut self, allowance: f64) -> Result<(), MeetError> {
        self.require_setup()?;
        if !allowance.is_finite() || allowance < 0.0 {
            return Err(MeetError::InvalidWeight);
        }
        self.weigh_in_allowance = allowance;
        self.rejudge_weigh_ins();
        Ok(())
    }

    /// Recompute `made_weight` for every recorded weigh-in from the current entry and allowance.
    fn rejudge_weigh_ins(&mut self) {
        let allowance = self.weigh_in_allowance;
        for team in [&mut self.home_team, &mut self.away_team] {
            for w in &mut team.wrestlers {
                let weight_class = w.weight_class;
                if let Some(weigh_in) = w.weigh_in.as_mut() {
                    weigh_in.made_weight = made_weight(weigh_in.weight, weight_class, allowance);
                }
            }
        }
    }

    /// Choose the starting weight class (Setup only). Must be one of the meet's classes.
    pub fn set_starting_weight_class(&mut self, weight_class: WeightClass) -> Result<(), MeetError> {
        self.require_setup()?;
        if !self.weight_classes.contains(&weight_class) {
            return Err(InvalidInput::StartingWeightClassNotFound(weight_class).into());
        }
        self.starting_weight_class = Some(weight_class);
        Ok(())
    }

    /// Set which bout parity the home team holds choice on (Setup only).
    pub fn set_home_choice(&mut self, parity: ChoiceParity) -> Result<(), MeetError> {
        self.require_setup()?;
        self.home_choice = parity;
        Ok(())
    }

    /// Record a weigh-in (Setup only). Re-weighing replaces the previous record.
    pub fn record_weigh_in(
        &mut self,
        wrestler_id: WrestlerId,
        weight: f64,
        now: DateTime<Utc>,
    ) -> Result<&WeighIn, MeetError> {
        self.require_setup()?;
        if !weight.is_finite() || weight <= 0.0 {
            return Err(MeetError::InvalidWeight);
        }
        let allowance = self.weigh_in_allowance;
        let wrestler = self
            .find_wrestler_mut(wrestler_id)
            .ok_or(MeetError::WrestlerNotFound(wrestler_id))?;
        let weigh_in = WeighIn {
            weight,
            recorded_at: now,
            made_weight: made_weight(weight, wrestler.weight_class, allowance),
        };
        let recorded = &*wrestler.weigh_in.insert(weigh_in);
        Ok(recorded)
    }

    pub fn get_bout(&self, bout_id: BoutId) -> Option<&Bout> {
        self.bouts.iter().find(|b| b.id == bout_id)
    }

    pub fn get_bout_mut(&mut self, bout_id: BoutId) -> Option<&mut Bout> {
        self.bouts.iter_mut().find(|b| b.id == bout_id)
    }

    /// The bout currently on the mat, if any.
    pub fn active_bout(&self) -> Option<&Bout> {
        self.bouts.iter().find(|b| b.status == BoutStatus::Active)
    }

    /// Team points from completed bouts.
    pub fn team_scores(&self) -> TeamScores {
        self.bouts
            .iter()
            .filter_map(|b| b.result.as_ref())
            .fold(TeamScores::default(), |acc, r| TeamScores {
                home: acc.home + r.team_points_for(Side::Home),
                away: acc.away + r.team_points_for(Side::Away),
            })
    }

    /// Restart the meet: back to Setup with rosters, weigh-ins, and settings kept. Clears bouts.
    pub fn restart(&mut self) -> Result<(), MeetError> {
        if self.state == MeetState::Setup {
            return Err(MeetError::InvalidState);
        }
        self.bouts.clear();
        self.state = MeetState::Setup;
        Ok(())
    }
}

/// Scale weight within the class limit plus allowance. Unentered wrestlers never make weight.
fn made_weight(weight: f64, weight_class: Option<WeightClass>, allowance: f64) -> bool {
    weight_class.is_some_and(|limit| weight <= f64::from(limit) + allowance)
}
