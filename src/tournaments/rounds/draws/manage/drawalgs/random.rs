//! Creates a random draw for the first round of a tournament.

use rand::{Rng, seq::SliceRandom};

use crate::tournaments::{
    rounds::draws::manage::drawalgs::TeamsOfRoom, teams::Team,
};

/// Shuffles the teams, splits them in half and draws the first half as
/// proposition against the second half.
///
/// Nobody has any results yet, so no seeding is applied.
pub fn gen_random_fold<'a, R: Rng + ?Sized>(
    teams: &[&'a Team],
    rng: &mut R,
) -> Vec<TeamsOfRoom<'a>> {
    let mut teams = teams.to_vec();
    teams.shuffle(rng);

    let (prop, opp) = teams.split_at(teams.len() / 2);

    prop.iter().copied().zip(opp.iter().copied()).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use super::*;

    #[test]
    fn every_team_drawn_once() {
        let teams = (0..12)
            .map(|i| Team {
                id: format!("t{i}"),
                ..Default::default()
            })
            .collect::<Vec<_>>();
        let refs = teams.iter().collect::<Vec<_>>();

        let rooms =
            gen_random_fold(&refs, &mut ChaCha20Rng::seed_from_u64(3));
        assert_eq!(rooms.len(), 6);

        let ids = rooms
            .iter()
            .flat_map(|(p, o)| [p.id.clone(), o.id.clone()])
            .collect::<HashSet<_>>();
        assert_eq!(ids.len(), 12);
    }

    #[test]
    fn empty_input() {
        let rooms = gen_random_fold(&[], &mut ChaCha20Rng::seed_from_u64(0));
        assert!(rooms.is_empty());
    }
}
