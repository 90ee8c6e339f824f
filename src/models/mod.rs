//! Data structures for the wrestling meet: teams, wrestlers, schedule, bouts, meet state.

mod bout;
mod meet;
mod schedule;
mod team;

pub use bout::{Bout, BoutClock, BoutId, BoutResult, BoutStatus, WinType};
pub use meet::{DualMeet, MeetError, MeetId, MeetState, TeamScores};
pub use schedule::{
    BoutOrder, BoutSlot, ChoiceParity, InvalidInput, Side, WeightClass, DEFAULT_WEIGHT_CLASSES,
};
pub use team::{Team, TeamId, WeighIn, Wrestler, WrestlerId};
