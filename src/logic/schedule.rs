//! Dual-meet scheduler: bout order from weight classes, starting weight, and choice parity.

use crate::models::{BoutOrder, BoutSlot, ChoiceParity, DualMeet, InvalidInput, MeetError, WeightClass};
use rand::seq::SliceRandom;
use rand::Rng;

/// Check a weight-class set and return it sorted ascending.
///
/// Rejects an empty set, a zero weight, and duplicates.
pub fn validate_weight_classes(weight_classes: &[WeightClass]) -> Result<Vec<WeightClass>, InvalidInput> {
    if weight_classes.is_empty() {
        return Err(InvalidInput::EmptyWeightClasses);
    }
    let mut sorted = weight_classes.to_vec();
    sorted.sort_unstable();
    if sorted[0] == 0 {
        return Err(InvalidInput::NonPositiveWeightClass);
    }
    if let Some(pair) = sorted.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(InvalidInput::DuplicateWeightClass(pair[0]));
    }
    Ok(sorted)
}

/// Compute the bout order of a dual meet.
///
/// 1. Sort the weight classes ascending.
/// 2. Rotate so `starting_weight_class` is bout #1, wrapping from the heaviest back to the lightest.
/// 3. Assign choice by position in the rotated order: the home team holds choice on the bouts
///    matching `home_choice`, the away team on the rest.
pub fn compute_bout_order(
    weight_classes: &[WeightClass],
    starting_weight_class: WeightClass,
    home_choice: ChoiceParity,
) -> Result<BoutOrder, InvalidInput> {
    let mut sorted = validate_weight_classes(weight_classes)?;
    let start_index = sorted
        .iter()
        .position(|&w| w == starting_weight_class)
        .ok_or(InvalidInput::StartingWeightClassNotFound(starting_weight_class))?;
    sorted.rotate_left(start_index);

    let order = sorted
        .into_iter()
        .enumerate()
        .map(|(i, weight_class)| BoutSlot {
            position: i as u32 + 1,
            weight_class,
            choice: home_choice.holder_for(i),
        })
        .collect();
    Ok(order)
}

/// Draw the starting weight class uniformly at random from a valid set.
pub fn draw_starting_weight_class<R: Rng + ?Sized>(
    weight_classes: &[WeightClass],
    rng: &mut R,
) -> Result<WeightClass, InvalidInput> {
    let sorted = validate_weight_classes(weight_classes)?;
    sorted
        .choose(rng)
        .copied()
        .ok_or(InvalidInput::EmptyWeightClasses)
}

impl DualMeet {
    /// Bout order for the meet's current settings.
    pub fn bout_order(&self) -> Result<BoutOrder, MeetError> {
        let start = self
            .starting_weight_class
            .ok_or(MeetError::NoStartingWeightClass)?;
        Ok(compute_bout_order(&self.weight_classes, start, self.home_choice)?)
    }

    /// Draw and set a random starting weight class (Setup only).
    pub fn draw_starting_weight_class<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<WeightClass, MeetError> {
        let drawn = draw_starting_weight_class(&self.weight_classes, rng)?;
        self.set_starting_weight_class(drawn)?;
        log::info!("Meet {}: drew starting weight class {}", self.id, drawn);
        Ok(drawn)
    }
}
