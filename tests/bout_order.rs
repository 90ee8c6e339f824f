//! Integration tests for the dual-meet scheduler: bout order, choice assignment, starting draw.

use rand::rngs::StdRng;
use rand::SeedableRng;
use wrestling_meet_web::{
    compute_bout_order, draw_starting_weight_class, validate_weight_classes, ChoiceParity, InvalidInput,
    Side, DEFAULT_WEIGHT_CLASSES,
};

fn weights_and_choices(order: &[wrestling_meet_web::BoutSlot]) -> Vec<(u32, Side)> {
    order.iter().map(|s| (s.weight_class, s.choice)).collect()
}

#[test]
fn starts_mid_list_with_home_on_odds() {
    let order = compute_bout_order(&[106, 113, 120, 126], 120, ChoiceParity::Odds).unwrap();
    assert_eq!(
        weights_and_choices(&order),
        vec![(120, Side::Home), (126, Side::Away), (106, Side::Home), (113, Side::Away)]
    );
    let positions: Vec<u32> = order.iter().map(|s| s.position).collect();
    assert_eq!(positions, vec![1, 2, 3, 4]);
}

#[test]
fn starts_at_lightest_with_home_on_evens() {
    let order = compute_bout_order(&[106, 113, 120, 126], 106, ChoiceParity::Evens).unwrap();
    assert_eq!(
        weights_and_choices(&order),
        vec![(106, Side::Away), (113, Side::Home), (120, Side::Away), (126, Side::Home)]
    );
}

#[test]
fn unsorted_input_is_sorted_before_rotation() {
    let order = compute_bout_order(&[126, 106, 120, 113], 120, ChoiceParity::Odds).unwrap();
    let weights: Vec<u32> = order.iter().map(|s| s.weight_class).collect();
    assert_eq!(weights, vec![120, 126, 106, 113]);
}

#[test]
fn choice_follows_rotated_position_not_sorted_index() {
    // 113 is sorted index 1 (an even bout if unrotated) but bout #1 here
    let order = compute_bout_order(&[106, 113, 120], 113, ChoiceParity::Odds).unwrap();
    assert_eq!(order[0].weight_class, 113);
    assert_eq!(order[0].choice, Side::Home);
    // wrap-around: 106 lands at bout #3, still odd
    assert_eq!(order[2].weight_class, 106);
    assert_eq!(order[2].choice, Side::Home);
}

#[test]
fn every_start_yields_a_full_alternating_rotation() {
    for &start in DEFAULT_WEIGHT_CLASSES.iter() {
        for parity in [ChoiceParity::Odds, ChoiceParity::Evens] {
            let order = compute_bout_order(&DEFAULT_WEIGHT_CLASSES, start, parity).unwrap();
            assert_eq!(order.len(), DEFAULT_WEIGHT_CLASSES.len());
            assert_eq!(order[0].weight_class, start);

            let mut weights: Vec<u32> = order.iter().map(|s| s.weight_class).collect();
            weights.sort_unstable();
            assert_eq!(weights, DEFAULT_WEIGHT_CLASSES.to_vec());

            for pair in order.windows(2) {
                assert_eq!(pair[1].choice, pair[0].choice.opposite());
                assert_eq!(pair[1].position, pair[0].position + 1);
            }
            let expected_first = match parity {
                ChoiceParity::Odds => Side::Home,
                ChoiceParity::Evens => Side::Away,
            };
            assert_eq!(order[0].choice, expected_first);
        }
    }
}

#[test]
fn same_input_gives_same_order() {
    let a = compute_bout_order(&DEFAULT_WEIGHT_CLASSES, 157, ChoiceParity::Evens).unwrap();
    let b = compute_bout_order(&DEFAULT_WEIGHT_CLASSES, 157, ChoiceParity::Evens).unwrap();
    assert_eq!(a, b);
}

#[test]
fn single_weight_class() {
    let order = compute_bout_order(&[285], 285, ChoiceParity::Evens).unwrap();
    assert_eq!(order.len(), 1);
    assert_eq!(order[0].choice, Side::Away);
}

#[test]
fn starting_weight_not_in_set_is_rejected() {
    assert_eq!(
        compute_bout_order(&[106, 113, 120, 126], 999, ChoiceParity::Odds),
        Err(InvalidInput::StartingWeightClassNotFound(999))
    );
}

#[test]
fn empty_duplicate_and_zero_sets_are_rejected() {
    assert_eq!(
        compute_bout_order(&[], 106, ChoiceParity::Odds),
        Err(InvalidInput::EmptyWeightClasses)
    );
    assert_eq!(
        compute_bout_order(&[106, 113, 106], 106, ChoiceParity::Odds),
        Err(InvalidInput::DuplicateWeightClass(106))
    );
    assert_eq!(
        validate_weight_classes(&[0, 106]),
        Err(InvalidInput::NonPositiveWeightClass)
    );
}

#[test]
fn draw_picks_a_member_and_is_reproducible_with_a_seed() {
    let mut rng = StdRng::seed_from_u64(7);
    let first = draw_starting_weight_class(&DEFAULT_WEIGHT_CLASSES, &mut rng).unwrap();
    assert!(DEFAULT_WEIGHT_CLASSES.contains(&first));

    let mut again = StdRng::seed_from_u64(7);
    assert_eq!(draw_starting_weight_class(&DEFAULT_WEIGHT_CLASSES, &mut again).unwrap(), first);

    assert_eq!(
        draw_starting_weight_class(&[], &mut rng),
        Err(InvalidInput::EmptyWeightClasses)
    );
}
