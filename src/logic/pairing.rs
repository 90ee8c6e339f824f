//! Potential-match preview: cross-pair the two teams' wrestlers at each weight class.

use crate::models::{DualMeet, Side, TeamId, WeightClass, WrestlerId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A wrestler taking part at a weight class, tagged with their team.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Entrant {
    pub wrestler_id: WrestlerId,
    pub team_id: TeamId,
}

/// A potential match between a team A and a team B wrestler.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pairing {
    pub weight_class: WeightClass,
    pub wrestler_a: WrestlerId,
    pub wrestler_b: WrestlerId,
}

/// For each weight class with entrants from both teams, pair every team A wrestler with every
/// team B wrestler. Weight classes missing either team produce nothing.
///
/// Output is ascending by weight class, then in entrant order.
pub fn pair_wrestlers_for_dual(
    participating: &BTreeMap<WeightClass, Vec<Entrant>>,
    team_a: TeamId,
    team_b: TeamId,
) -> Vec<Pairing> {
    let mut pairings = Vec::new();
    for (&weight_class, entrants) in participating {
        let side_a: Vec<_> = entrants.iter().filter(|e| e.team_id == team_a).collect();
        let side_b: Vec<_> = entrants.iter().filter(|e| e.team_id == team_b).collect();
        for a in &side_a {
            for b in &side_b {
                pairings.push(Pairing {
                    weight_class,
                    wrestler_a: a.wrestler_id,
                    wrestler_b: b.wrestler_id,
                });
            }
        }
    }
    pairings
}

impl DualMeet {
    /// Eligible wrestlers of both teams grouped by the meet's weight classes (home first).
    /// Every weight class has an entry, possibly empty.
    pub fn participating_wrestlers(&self) -> BTreeMap<WeightClass, Vec<Entrant>> {
        let mut by_weight: BTreeMap<WeightClass, Vec<Entrant>> =
            self.weight_classes.iter().map(|&w| (w, Vec::new())).collect();
        for side in [Side::Home, Side::Away] {
            let team = self.team(side);
            for wrestler in team.wrestlers.iter().filter(|w| w.is_eligible()) {
                let Some(weight_class) = wrestler.weight_class else {
                    continue;
                };
                if let Some(entrants) = by_weight.get_mut(&weight_class) {
                    entrants.push(Entrant {
                        wrestler_id: wrestler.id,
                        team_id: team.id,
                    });
                }
            }
        }
        by_weight
    }

    /// Home vs away pairing preview.
    pub fn pairings(&self) -> Vec<Pairing> {
        pair_wrestlers_for_dual(
            &self.participating_wrestlers(),
            self.home_team.id,
            self.away_team.id,
        )
    }
}
