//! Wrestling dual-meet manager: library with models, scheduling, and meet logic.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    add_points, assign_bout_wrestler, complete_bout, compute_bout_order, draw_starting_weight_class,
    forfeit_bout, import_roster_csv, pair_wrestlers_for_dual, pause_clock, reset_clock, start_bout,
    start_clock, start_meet, validate_weight_classes, Entrant, Pairing,
};
pub use models::{
    Bout, BoutClock, BoutId, BoutOrder, BoutResult, BoutSlot, BoutStatus, ChoiceParity, DualMeet,
    InvalidInput, MeetError, MeetId, MeetState, Side, Team, TeamId, TeamScores, WeighIn, WeightClass,
    WinType, Wrestler, WrestlerId, DEFAULT_WEIGHT_CLASSES,
};
pub use store::{KeyValueStore, MeetStore, MemoryStore, StoreError};
