//! Fold (power) pairing for the early rounds of a tournament.
//!
//! Teams are ranked, split into a proposition pool and an opposition pool
//! depending on which side they were on last, and then each proposition team
//! is matched to the closest-performing opposition team it is allowed to
//! meet.

use crate::tournaments::{
    rounds::draws::manage::drawalgs::{TeamsOfRoom, best_opponent},
    standings::TeamStandings,
    teams::{Side, Team},
};

pub fn gen_fold<'a>(teams: &[&'a Team]) -> Vec<TeamsOfRoom<'a>> {
    let standings = TeamStandings::of(teams.iter().copied());
    let (prop_pool, opp_pool) = side_pools(&standings.sorted);

    let mut opp_taken = vec![false; opp_pool.len()];
    let mut rooms = Vec::with_capacity(prop_pool.len().min(opp_pool.len()));

    for prop in prop_pool {
        let candidates = opp_pool
            .iter()
            .copied()
            .enumerate()
            .filter(|(i, _)| !opp_taken[*i]);

        match best_opponent(prop, candidates) {
            Some(idx) => {
                opp_taken[idx] = true;
                rooms.push((prop, opp_pool[idx]));
            }
            None => {
                // note: the team is not retried (as opposition or against a
                // relaxed set of constraints)
                tracing::debug!(team = %prop.id, "no opponent in fold pool");
            }
        }
    }

    rooms
}

/// Splits ranked teams into (proposition, opposition) pools. Teams that were
/// last on proposition go to the opposition pool and everyone else to the
/// proposition pool. The pools are then evened out (to within one team) by
/// moving the lowest-ranked teams of the larger pool across.
pub fn side_pools<'a>(ranked: &[&'a Team]) -> (Vec<&'a Team>, Vec<&'a Team>) {
    let (mut opp_pool, mut prop_pool): (Vec<&Team>, Vec<&Team>) = ranked
        .iter()
        .copied()
        .partition(|team| team.last_side() == Some(Side::Proposition));

    while prop_pool.len().abs_diff(opp_pool.len()) > 1 {
        let (larger, smaller) = if prop_pool.len() > opp_pool.len() {
            (&mut prop_pool, &mut opp_pool)
        } else {
            (&mut opp_pool, &mut prop_pool)
        };
        if let Some(team) = larger.pop() {
            smaller.push(team);
        }
    }

    (prop_pool, opp_pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: &str, wins: u32, performance: f64, last: Option<Side>) -> Team {
        Team {
            id: id.to_string(),
            wins,
            performance_score: performance,
            side_history: last.into_iter().collect(),
            ..Default::default()
        }
    }

    fn ids(teams: &[&Team]) -> Vec<String> {
        teams.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn pools_follow_last_side() {
        let teams = vec![
            team("a", 2, 0.0, Some(Side::Proposition)),
            team("b", 2, 0.0, Some(Side::Opposition)),
            team("c", 1, 0.0, Some(Side::Opposition)),
            team("d", 0, 0.0, Some(Side::Proposition)),
        ];
        let refs = teams.iter().collect::<Vec<_>>();
        let (prop, opp) = side_pools(&refs);
        assert_eq!(ids(&prop), vec!["b", "c"]);
        assert_eq!(ids(&opp), vec!["a", "d"]);
    }

    #[test]
    fn pools_are_balanced_from_the_bottom() {
        let teams = vec![
            team("a", 3, 0.0, Some(Side::Opposition)),
            team("b", 2, 0.0, Some(Side::Opposition)),
            team("c", 1, 0.0, Some(Side::Opposition)),
            team("d", 0, 0.0, Some(Side::Opposition)),
            team("e", 0, 1.0, Some(Side::Opposition)),
            team("f", 0, 2.0, Some(Side::Proposition)),
        ];
        let refs = teams.iter().collect::<Vec<_>>();
        let (prop, opp) = side_pools(&refs);
        assert_eq!(ids(&prop), vec!["a", "b", "c"]);
        assert_eq!(ids(&opp), vec!["f", "e", "d"]);
    }

    #[test]
    fn proposition_pool_proposes() {
        let teams = vec![
            team("a", 1, 100.0, Some(Side::Proposition)),
            team("b", 1, 110.0, Some(Side::Opposition)),
            team("c", 0, 50.0, Some(Side::Proposition)),
            team("d", 0, 60.0, Some(Side::Opposition)),
        ];
        let refs = teams.iter().collect::<Vec<_>>();
        let rooms = gen_fold(&refs);
        let rooms = rooms
            .iter()
            .map(|(p, o)| (p.id.as_str(), o.id.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(rooms, vec![("b", "a"), ("d", "c")]);
    }

    #[test]
    fn unmatchable_team_is_dropped() {
        let mut teams = vec![
            team("a", 1, 100.0, Some(Side::Opposition)),
            team("b", 1, 100.0, Some(Side::Proposition)),
        ];
        teams[0].opponents_faced.insert("b".to_string());
        let refs = teams.iter().collect::<Vec<_>>();
        assert!(gen_fold(&refs).is_empty());
    }
}
