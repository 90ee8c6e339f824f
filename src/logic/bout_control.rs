//! Live bout control: start, score, clock, and completion.

use crate::models::{
    Bout, BoutId, BoutResult, BoutStatus, DualMeet, MeetError, MeetState, Side, WinType,
};
use chrono::{DateTime, Utc};

/// Mutable bout in an in-progress meet, checked against the required status.
fn bout_in_status(
    meet: &mut DualMeet,
    bout_id: BoutId,
    required: BoutStatus,
) -> Result<&mut Bout, MeetError> {
    if meet.state != MeetState::InProgress {
        return Err(MeetError::InvalidState);
    }
    let bout = meet
        .get_bout_mut(bout_id)
        .ok_or(MeetError::BoutNotFound(bout_id))?;
    if bout.status != required {
        return Err(MeetError::InvalidBoutState {
            bout_id,
            status: bout.status,
        });
    }
    Ok(bout)
}

/// Put a pending, contested bout on the mat. Only one bout may be active at a time.
pub fn start_bout(meet: &mut DualMeet, bout_id: BoutId, now: DateTime<Utc>) -> Result<(), MeetError> {
    if let Some(active) = meet.active_bout() {
        if active.id != bout_id {
            return Err(MeetError::AnotherBoutActive(active.id));
        }
    }
    let bout = bout_in_status(meet, bout_id, BoutStatus::Pending)?;
    if !bout.is_contested() {
        // open corner: only a forfeit can settle it
        return Err(MeetError::InvalidBoutState {
            bout_id,
            status: bout.status,
        });
    }
    bout.status = BoutStatus::Active;
    bout.started_at = Some(now);
    log::debug!("Bout {} ({} lbs) started", bout.position, bout.weight_class);
    Ok(())
}

/// Add match points to one side of an active bout. A total that would overflow is rejected.
pub fn add_points(meet: &mut DualMeet, bout_id: BoutId, side: Side, points: u32) -> Result<(), MeetError> {
    let bout = bout_in_status(meet, bout_id, BoutStatus::Active)?;
    let score = match side {
        Side::Home => &mut bout.home_score,
        Side::Away => &mut bout.away_score,
    };
    *score = score.checked_add(points).ok_or(MeetError::ScoreOverflow)?;
    Ok(())
}

pub fn start_clock(meet: &mut DualMeet, bout_id: BoutId, now: DateTime<Utc>) -> Result<(), MeetError> {
    let bout = bout_in_status(meet, bout_id, BoutStatus::Active)?;
    if !bout.clock.start(now) {
        return Err(MeetError::ClockRunning);
    }
    Ok(())
}

pub fn pause_clock(meet: &mut DualMeet, bout_id: BoutId, now: DateTime<Utc>) -> Result<(), MeetError> {
    let bout = bout_in_status(meet, bout_id, BoutStatus::Active)?;
    if !bout.clock.pause(now) {
        return Err(MeetError::ClockNotRunning);
    }
    Ok(())
}

pub fn reset_clock(meet: &mut DualMeet, bout_id: BoutId) -> Result<(), MeetError> {
    let bout = bout_in_status(meet, bout_id, BoutStatus::Active)?;
    bout.clock.reset();
    Ok(())
}

/// Complete an active bout with its winner and win type. Stops the clock and records the final
/// score and duration. Completes the meet once every bout is done.
pub fn complete_bout(
    meet: &mut DualMeet,
    bout_id: BoutId,
    winner: Side,
    win_type: WinType,
    now: DateTime<Utc>,
) -> Result<(), MeetError> {
    let bout = bout_in_status(meet, bout_id, BoutStatus::Active)?;
    bout.clock.pause(now);
    let result = BoutResult {
        winner: Some(winner),
        win_type,
        home_score: bout.home_score,
        away_score: bout.away_score,
        duration_ms: bout.clock.elapsed_ms(now),
    };
    finish(bout, result, now);
    finish_meet_if_done(meet);
    Ok(())
}

/// Settle a pending bout with an open corner by forfeit. The wrestler present wins; with both
/// corners open it is a double forfeit and nobody scores.
pub fn forfeit_bout(meet: &mut DualMeet, bout_id: BoutId, now: DateTime<Utc>) -> Result<(), MeetError> {
    let bout = bout_in_status(meet, bout_id, BoutStatus::Pending)?;
    let winner = match (bout.home_wrestler, bout.away_wrestler) {
        (Some(_), Some(_)) => return Err(MeetError::NoForfeitWinner),
        (Some(_), None) => Some(Side::Home),
        (None, Some(_)) => Some(Side::Away),
        (None, None) => None,
    };
    let result = BoutResult {
        winner,
        win_type: WinType::Forfeit,
        home_score: 0,
        away_score: 0,
        duration_ms: 0,
    };
    finish(bout, result, now);
    finish_meet_if_done(meet);
    Ok(())
}

fn finish(bout: &mut Bout, result: BoutResult, now: DateTime<Utc>) {
    log::info!(
        "Bout {} ({} lbs) completed: {:?} by {:?}",
        bout.position,
        bout.weight_class,
        result.winner,
        result.win_type
    );
    bout.status = BoutStatus::Completed;
    bout.result = Some(result);
    bout.completed_at = Some(now);
}

fn finish_meet_if_done(meet: &mut DualMeet) {
    if meet.bouts.iter().all(|b| b.status == BoutStatus::Completed) {
        meet.state = MeetState::Completed;
        let scores = meet.team_scores();
        log::info!(
            "Meet {} completed: {} {} - {} {}",
            meet.id,
            meet.home_team.name,
            scores.home,
            scores.away,
            meet.away_team.name
        );
    }
}
