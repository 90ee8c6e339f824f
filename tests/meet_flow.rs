//! Integration tests for meet setup, weigh-ins, bout generation, bout control, and team scores.

use chrono::{Duration, TimeZone, Utc};
use wrestling_meet_web::{
    add_points, assign_bout_wrestler, complete_bout, forfeit_bout, pause_clock, reset_clock, start_bout,
    start_clock, start_meet, BoutStatus, ChoiceParity, DualMeet, InvalidInput, MeetError, MeetState,
    Side, WinType,
};

/// Three-weight meet: 106 contested, 113 home only, 120 contested. Starts at 113, home on odds.
fn small_meet() -> DualMeet {
    let mut meet = DualMeet::new("Test Dual", "Eagles", "Hawks");
    meet.set_weight_classes(&[120, 106, 113]).unwrap();
    meet.add_wrestler(Side::Home, "Ann", "Lee", Some(106), Some(10)).unwrap();
    meet.add_wrestler(Side::Home, "Bo", "Ray", Some(113), None).unwrap();
    meet.add_wrestler(Side::Home, "Cal", "Moss", Some(120), None).unwrap();
    meet.add_wrestler(Side::Away, "Dee", "Park", Some(106), None).unwrap();
    meet.add_wrestler(Side::Away, "Eli", "Ng", Some(120), None).unwrap();
    meet.set_starting_weight_class(113).unwrap();
    meet.set_home_choice(ChoiceParity::Odds).unwrap();
    meet
}

fn t(secs: i64) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 10, 18, 0, 0).unwrap() + Duration::seconds(secs)
}

#[test]
fn weight_classes_are_stored_sorted_and_validated() {
    let mut meet = DualMeet::new("Dual", "A", "B");
    meet.set_weight_classes(&[126, 106]).unwrap();
    assert_eq!(meet.weight_classes, vec![106, 126]);
    assert_eq!(
        meet.set_weight_classes(&[106, 106]),
        Err(MeetError::InvalidInput(InvalidInput::DuplicateWeightClass(106)))
    );
    assert_eq!(
        meet.set_starting_weight_class(999),
        Err(MeetError::InvalidInput(InvalidInput::StartingWeightClassNotFound(999)))
    );
}

#[test]
fn removing_a_weight_class_clears_entries_and_starting_weight() {
    let mut meet = small_meet();
    meet.set_weight_classes(&[106, 120]).unwrap();
    assert_eq!(meet.starting_weight_class, None);
    assert!(meet.home_team.wrestlers.iter().all(|w| w.weight_class != Some(113)));
}

#[test]
fn duplicate_and_empty_names_are_rejected() {
    let mut meet = small_meet();
    assert_eq!(
        meet.add_wrestler(Side::Home, " ann ", "LEE", None, None),
        Err(MeetError::DuplicateWrestlerName)
    );
    // same name on the other team is fine
    assert!(meet.add_wrestler(Side::Away, "Ann", "Lee", None, None).is_ok());
    assert_eq!(meet.add_wrestler(Side::Home, "  ", "X", None, None), Err(MeetError::EmptyName));
    assert_eq!(
        meet.add_wrestler(Side::Home, "New", "Kid", Some(99), None),
        Err(MeetError::WeightClassNotInMeet(99))
    );
}

#[test]
fn weigh_in_judges_against_class_and_allowance() {
    let mut meet = small_meet();
    let id = meet.home_team.wrestlers[0].id; // 106
    assert!(!meet.record_weigh_in(id, 106.8, t(0)).unwrap().made_weight);
    meet.set_weigh_in_allowance(1.0).unwrap();
    assert!(meet.record_weigh_in(id, 106.8, t(1)).unwrap().made_weight);
    assert!(matches!(meet.record_weigh_in(id, -1.0, t(2)), Err(MeetError::InvalidWeight)));
    // bumping up a class re-judges the recorded weight
    meet.set_weigh_in_allowance(0.0).unwrap();
    meet.record_weigh_in(id, 110.0, t(3)).unwrap();
    assert!(!meet.home_team.wrestlers[0].is_eligible());
    meet.set_wrestler_weight_class(id, Some(113)).unwrap();
    assert!(meet.home_team.wrestlers[0].is_eligible());
}

#[test]
fn changing_the_allowance_rejudges_recorded_weigh_ins() {
    let mut meet = small_meet();
    let dee = meet.away_team.wrestlers[0].id; // 106
    meet.record_weigh_in(dee, 106.8, t(0)).unwrap();
    assert!(!meet.away_team.wrestlers[0].is_eligible());

    meet.set_weigh_in_allowance(1.0).unwrap();
    assert!(meet.away_team.wrestlers[0].weigh_in.as_ref().unwrap().made_weight);
    start_meet(&mut meet).unwrap();
    assert_eq!(meet.bouts[2].weight_class, 106);
    assert_eq!(meet.bouts[2].away_wrestler, Some(dee));

    meet.restart().unwrap();
    meet.set_weigh_in_allowance(0.5).unwrap();
    assert!(!meet.away_team.wrestlers[0].is_eligible());
}

#[test]
fn dropping_a_weight_class_fails_its_weigh_ins() {
    let mut meet = small_meet();
    let bo = meet.home_team.wrestlers[1].id; // 113
    meet.record_weigh_in(bo, 112.0, t(0)).unwrap();
    assert!(meet.home_team.wrestlers[1].is_eligible());

    meet.set_weight_classes(&[106, 120]).unwrap();
    let wrestler = &meet.home_team.wrestlers[1];
    assert_eq!(wrestler.weight_class, None);
    assert!(!wrestler.weigh_in.as_ref().unwrap().made_weight);

    // same outcome as clearing the entry directly
    let cal = meet.home_team.wrestlers[2].id;
    meet.record_weigh_in(cal, 119.0, t(1)).unwrap();
    meet.set_wrestler_weight_class(cal, None).unwrap();
    assert!(!meet.home_team.wrestlers[2].is_eligible());
}

#[test]
fn remove_wrestler_only_during_setup() {
    let mut meet = small_meet();
    let cal = meet.home_team.wrestlers[2].id;
    meet.remove_wrestler(cal).unwrap();
    assert_eq!(meet.home_team.wrestlers.len(), 2);
    assert!(meet.find_wrestler(cal).is_none());
    assert_eq!(meet.remove_wrestler(cal), Err(MeetError::WrestlerNotFound(cal)));

    let unknown = uuid::Uuid::new_v4();
    assert_eq!(meet.remove_wrestler(unknown), Err(MeetError::WrestlerNotFound(unknown)));

    let dee = meet.away_team.wrestlers[0].id;
    start_meet(&mut meet).unwrap();
    assert_eq!(meet.remove_wrestler(dee), Err(MeetError::InvalidState));
    assert_eq!(meet.away_team.wrestlers.len(), 2);
}

#[test]
fn restart_keeps_rosters_and_weigh_ins() {
    let mut meet = small_meet();
    assert_eq!(meet.restart(), Err(MeetError::InvalidState));

    let ann = meet.home_team.wrestlers[0].id;
    meet.record_weigh_in(ann, 105.5, t(0)).unwrap();
    start_meet(&mut meet).unwrap();
    let bout_id = meet.bouts[1].id;
    start_bout(&mut meet, bout_id, t(1)).unwrap();
    add_points(&mut meet, bout_id, Side::Home, 2).unwrap();

    meet.restart().unwrap();
    assert_eq!(meet.state, MeetState::Setup);
    assert!(meet.bouts.is_empty());
    assert!(meet.active_bout().is_none());
    assert_eq!((meet.home_team.wrestlers.len(), meet.away_team.wrestlers.len()), (3, 2));
    let weigh_in = meet.home_team.wrestlers[0].weigh_in.as_ref().unwrap();
    assert_eq!(weigh_in.weight, 105.5);
    assert!(weigh_in.made_weight);
    assert_eq!(meet.starting_weight_class, Some(113));
}

#[test]
fn start_requires_a_starting_weight() {
    let mut meet = DualMeet::new("Dual", "A", "B");
    assert_eq!(start_meet(&mut meet), Err(MeetError::NoStartingWeightClass));
    assert_eq!(meet.state, MeetState::Setup);
}

#[test]
fn start_builds_bouts_in_rotated_order_with_lineups() {
    let mut meet = small_meet();
    start_meet(&mut meet).unwrap();
    assert_eq!(meet.state, MeetState::InProgress);

    let summary: Vec<(u32, u32, Side, bool)> = meet
        .bouts
        .iter()
        .map(|b| (b.position, b.weight_class, b.choice, b.is_contested()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (1, 113, Side::Home, false),
            (2, 120, Side::Away, true),
            (3, 106, Side::Home, true),
        ]
    );
    assert!(meet.bouts.iter().all(|b| b.status == BoutStatus::Pending));
    // rosters are locked once wrestling starts
    assert_eq!(
        meet.add_wrestler(Side::Home, "Late", "Entry", None, None),
        Err(MeetError::InvalidState)
    );
}

#[test]
fn open_corner_can_only_be_forfeited() {
    let mut meet = small_meet();
    start_meet(&mut meet).unwrap();
    let open = meet.bouts[0].id;
    assert!(matches!(
        start_bout(&mut meet, open, t(0)),
        Err(MeetError::InvalidBoutState { .. })
    ));
    forfeit_bout(&mut meet, open, t(0)).unwrap();
    let result = meet.bouts[0].result.clone().unwrap();
    assert_eq!(result.winner, Some(Side::Home));
    assert_eq!(result.win_type, WinType::Forfeit);

    let contested = meet.bouts[1].id;
    assert_eq!(forfeit_bout(&mut meet, contested, t(1)), Err(MeetError::NoForfeitWinner));
}

#[test]
fn bout_lifecycle_scores_clock_and_result() {
    let mut meet = small_meet();
    start_meet(&mut meet).unwrap();
    let bout_id = meet.bouts[1].id;

    // points before the bout starts are rejected
    assert!(matches!(
        add_points(&mut meet, bout_id, Side::Home, 2),
        Err(MeetError::InvalidBoutState { status: BoutStatus::Pending, .. })
    ));

    start_bout(&mut meet, bout_id, t(0)).unwrap();
    start_clock(&mut meet, bout_id, t(0)).unwrap();
    assert_eq!(start_clock(&mut meet, bout_id, t(1)), Err(MeetError::ClockRunning));
    add_points(&mut meet, bout_id, Side::Home, 2).unwrap();
    add_points(&mut meet, bout_id, Side::Away, 1).unwrap();
    pause_clock(&mut meet, bout_id, t(30)).unwrap();
    assert_eq!(pause_clock(&mut meet, bout_id, t(31)), Err(MeetError::ClockNotRunning));
    start_clock(&mut meet, bout_id, t(40)).unwrap();
    add_points(&mut meet, bout_id, Side::Home, 3).unwrap();
    complete_bout(&mut meet, bout_id, Side::Home, WinType::Decision, t(100)).unwrap();

    let bout = meet.get_bout(bout_id).unwrap();
    assert_eq!(bout.status, BoutStatus::Completed);
    let result = bout.result.clone().unwrap();
    assert_eq!((result.home_score, result.away_score), (5, 1));
    assert_eq!(result.duration_ms, 90_000);
    assert!(!bout.clock.is_running());

    // completed is terminal
    assert!(add_points(&mut meet, bout_id, Side::Away, 1).is_err());
    assert!(complete_bout(&mut meet, bout_id, Side::Away, WinType::Fall, t(101)).is_err());
}

#[test]
fn score_overflow_is_rejected() {
    let mut meet = small_meet();
    start_meet(&mut meet).unwrap();
    let bout_id = meet.bouts[1].id;
    start_bout(&mut meet, bout_id, t(0)).unwrap();
    add_points(&mut meet, bout_id, Side::Away, u32::MAX).unwrap();
    assert_eq!(add_points(&mut meet, bout_id, Side::Away, 1), Err(MeetError::ScoreOverflow));
    assert_eq!(meet.get_bout(bout_id).unwrap().away_score, u32::MAX);
    add_points(&mut meet, bout_id, Side::Home, 1).unwrap();
}

#[test]
fn reset_clock_zeroes_elapsed_time() {
    let mut meet = small_meet();
    start_meet(&mut meet).unwrap();
    let bout_id = meet.bouts[2].id;
    start_bout(&mut meet, bout_id, t(0)).unwrap();
    start_clock(&mut meet, bout_id, t(0)).unwrap();
    pause_clock(&mut meet, bout_id, t(20)).unwrap();
    reset_clock(&mut meet, bout_id).unwrap();
    assert_eq!(meet.get_bout(bout_id).unwrap().clock.elapsed_ms(t(50)), 0);
}

#[test]
fn only_one_bout_on_the_mat() {
    let mut meet = small_meet();
    start_meet(&mut meet).unwrap();
    let (first, second) = (meet.bouts[1].id, meet.bouts[2].id);
    start_bout(&mut meet, first, t(0)).unwrap();
    assert_eq!(start_bout(&mut meet, second, t(1)), Err(MeetError::AnotherBoutActive(first)));
}

#[test]
fn lineup_change_only_with_eligible_wrestler_on_that_side() {
    let mut meet = small_meet();
    let backup = meet.add_wrestler(Side::Away, "Fay", "Orr", Some(120), None).unwrap();
    let home_113 = meet.home_team.wrestlers[1].id;
    let away_106 = meet.away_team.wrestlers[0].id;
    start_meet(&mut meet).unwrap();
    let (open, at_120) = (meet.bouts[0].id, meet.bouts[1].id);

    // roster order picks the first 120 pounder
    assert_eq!(meet.bouts[1].away_wrestler, Some(meet.away_team.wrestlers[1].id));
    assign_bout_wrestler(&mut meet, at_120, Side::Away, Some(backup)).unwrap();
    assert_eq!(meet.bouts[1].away_wrestler, Some(backup));

    assert_eq!(
        assign_bout_wrestler(&mut meet, open, Side::Away, Some(home_113)),
        Err(MeetError::WrestlerNotOnTeam(home_113))
    );
    assert_eq!(
        assign_bout_wrestler(&mut meet, open, Side::Away, Some(away_106)),
        Err(MeetError::WrestlerNotOnTeam(away_106))
    );

    // clearing a corner turns a contested bout into a forfeit
    assign_bout_wrestler(&mut meet, at_120, Side::Home, None).unwrap();
    forfeit_bout(&mut meet, at_120, t(0)).unwrap();
    assert_eq!(meet.bouts[1].result.as_ref().unwrap().winner, Some(Side::Away));
    assert!(assign_bout_wrestler(&mut meet, at_120, Side::Home, Some(home_113)).is_err());
}

#[test]
fn meet_completes_and_totals_team_points() {
    let mut meet = small_meet();
    start_meet(&mut meet).unwrap();
    let ids: Vec<_> = meet.bouts.iter().map(|b| b.id).collect();

    forfeit_bout(&mut meet, ids[0], t(0)).unwrap(); // home +6
    start_bout(&mut meet, ids[1], t(10)).unwrap();
    complete_bout(&mut meet, ids[1], Side::Away, WinType::MajorDecision, t(20)).unwrap(); // away +4
    assert_eq!(meet.state, MeetState::InProgress);
    start_bout(&mut meet, ids[2], t(30)).unwrap();
    complete_bout(&mut meet, ids[2], Side::Home, WinType::Fall, t(40)).unwrap(); // home +6

    assert_eq!(meet.state, MeetState::Completed);
    let scores = meet.team_scores();
    assert_eq!((scores.home, scores.away), (12, 4));

    meet.restart().unwrap();
    assert_eq!(meet.state, MeetState::Setup);
    assert!(meet.bouts.is_empty());
    assert_eq!(meet.home_team.wrestlers.len(), 3);
}

#[test]
fn double_forfeit_scores_nothing() {
    let mut meet = DualMeet::new("Dual", "A", "B");
    meet.set_weight_classes(&[285]).unwrap();
    meet.set_starting_weight_class(285).unwrap();
    start_meet(&mut meet).unwrap();
    let id = meet.bouts[0].id;
    forfeit_bout(&mut meet, id, t(0)).unwrap();
    assert_eq!(meet.bouts[0].result.as_ref().unwrap().winner, None);
    assert_eq!(meet.team_scores().home + meet.team_scores().away, 0);
    assert_eq!(meet.state, MeetState::Completed);
}

#[test]
fn drawn_starting_weight_is_set_on_the_meet() {
    use rand::SeedableRng;
    let mut meet = DualMeet::new("Dual", "A", "B");
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let drawn = meet.draw_starting_weight_class(&mut rng).unwrap();
    assert_eq!(meet.starting_weight_class, Some(drawn));
    assert_eq!(meet.bout_order().unwrap()[0].weight_class, drawn);
}
