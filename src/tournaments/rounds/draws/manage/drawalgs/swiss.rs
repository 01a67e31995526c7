//! Swiss pairing for the later rounds of a tournament.

use crate::tournaments::{
    rounds::draws::manage::drawalgs::{TeamsOfRoom, best_opponent},
    standings::TeamStandings,
    teams::Team,
};

/// Walks down the standings, pairing each team which is still free with the
/// closest-performing free team it is allowed to meet. Sides are then decided
/// by [`determine_sides`].
pub fn gen_swiss<'a>(teams: &[&'a Team]) -> Vec<TeamsOfRoom<'a>> {
    let ranked = TeamStandings::of(teams.iter().copied()).sorted;
    let mut paired = vec![false; ranked.len()];
    let mut rooms = Vec::with_capacity(ranked.len() / 2);

    for i in 0..ranked.len() {
        if paired[i] {
            continue;
        }

        let candidates = ranked
            .iter()
            .copied()
            .enumerate()
            .filter(|(j, _)| *j != i && !paired[*j]);

        match best_opponent(ranked[i], candidates) {
            Some(j) => {
                paired[i] = true;
                paired[j] = true;
                rooms.push(determine_sides(ranked[i], ranked[j]));
            }
            None => {
                tracing::debug!(team = %ranked[i].id, "no free opponent");
            }
        }
    }

    rooms
}

/// Returns `(proposition, opposition)`. The team which has been on opposition
/// more often (relative to proposition) proposes; if both are owed the same,
/// the stronger team proposes.
pub fn determine_sides<'a>(a: &'a Team, b: &'a Team) -> TeamsOfRoom<'a> {
    let a_proposes = match a.proposition_need().cmp(&b.proposition_need()) {
        std::cmp::Ordering::Greater => true,
        std::cmp::Ordering::Less => false,
        std::cmp::Ordering::Equal => {
            a.performance_score >= b.performance_score
        }
    };

    if a_proposes { (a, b) } else { (b, a) }
}
