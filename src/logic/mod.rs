//! Meet business logic: scheduling, pairing preview, setup, roster import, bout control.

mod bout_control;
mod pairing;
mod roster;
mod schedule;
mod setup;

pub use bout_control::{
    add_points, complete_bout, forfeit_bout, pause_clock, reset_clock, start_bout, start_clock,
};
pub use pairing::{pair_wrestlers_for_dual, Entrant, Pairing};
pub use roster::import_roster_csv;
pub use schedule::{compute_bout_order, draw_starting_weight_class, validate_weight_classes};
pub use setup::{assign_bout_wrestler, start_meet};
