//! Setup phase: start the meet (Setup -> InProgress) and adjust bout lineups before wrestling.

use crate::models::{Bout, BoutId, BoutStatus, DualMeet, MeetError, MeetState, Side, WrestlerId};

/// Start the meet: compute the bout order and create one bout per weight class.
///
/// Each corner gets the first eligible wrestler entered at that weight, in roster order.
/// An empty corner is a forfeit.
pub fn start_meet(meet: &mut DualMeet) -> Result<(), MeetError> {
    if meet.state != MeetState::Setup {
        return Err(MeetError::InvalidState);
    }
    let order = meet.bout_order()?;

    let bouts: Vec<Bout> = order
        .iter()
        .map(|slot| {
            let mut bout = Bout::new(slot.position, slot.weight_class, slot.choice);
            bout.home_wrestler = meet.home_team.starter_at(slot.weight_class).map(|w| w.id);
            bout.away_wrestler = meet.away_team.starter_at(slot.weight_class).map(|w| w.id);
            bout
        })
        .collect();

    let open = bouts.iter().filter(|b| !b.is_contested()).count();
    log::info!(
        "Meet {} started: {} bouts from {} lbs, {} with an open corner",
        meet.id,
        bouts.len(),
        order[0].weight_class,
        open
    );

    meet.bouts = bouts;
    meet.state = MeetState::InProgress;
    Ok(())
}

/// Put a wrestler in (or clear) one corner of a pending bout.
///
/// The wrestler must be on that side's team and eligible at the bout's weight class.
pub fn assign_bout_wrestler(
    meet: &mut DualMeet,
    bout_id: BoutId,
    side: Side,
    wrestler_id: Option<WrestlerId>,
) -> Result<(), MeetError> {
    if meet.state != MeetState::InProgress {
        return Err(MeetError::InvalidState);
    }
    let bout = meet.get_bout(bout_id).ok_or(MeetError::BoutNotFound(bout_id))?;
    if bout.status != BoutStatus::Pending {
        return Err(MeetError::InvalidBoutState {
            bout_id,
            status: bout.status,
        });
    }
    if let Some(id) = wrestler_id {
        let allowed = meet
            .team(side)
            .get_wrestler(id)
            .is_some_and(|w| w.can_wrestle_at(bout.weight_class));
        if !allowed {
            return Err(MeetError::WrestlerNotOnTeam(id));
        }
    }
    if let Some(bout) = meet.get_bout_mut(bout_id) {
        *bout.wrestler_mut(side) = wrestler_id;
    }
    Ok(())
}
