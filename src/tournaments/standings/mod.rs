use std::cmp::Ordering;

use crate::tournaments::teams::Team;

/// Teams in the order in which the power-paired draws consider them.
pub struct TeamStandings<'a> {
    pub sorted: Vec<&'a Team>,
}

impl<'a> TeamStandings<'a> {
    pub fn of(teams: impl IntoIterator<Item = &'a Team>) -> Self {
        let mut sorted = teams.into_iter().collect::<Vec<_>>();
        // stable, so teams which are level on everything keep their input
        // order
        sorted.sort_by(|a, b| pairing_order(a, b));
        Self { sorted }
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }
}

/// Most wins first, then most points. The final tie-break puts the team with
/// the *lower* performance score first.
pub fn pairing_order(a: &Team, b: &Team) -> Ordering {
    b.wins
        .cmp(&a.wins)
        .then_with(|| b.total_points.total_cmp(&a.total_points))
        .then_with(|| a.performance_score.total_cmp(&b.performance_score))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn team(id: &str, wins: u32, points: f64, performance: f64) -> Team {
        Team {
            id: id.to_string(),
            wins,
            total_points: points,
            performance_score: performance,
            ..Default::default()
        }
    }

    #[test]
    fn ordering_priorities() {
        let teams = vec![
            team("a", 1, 150.0, 10.0),
            team("b", 2, 100.0, 10.0),
            team("c", 2, 120.0, 50.0),
            team("d", 2, 120.0, 20.0),
            team("e", 1, 150.0, 10.0),
        ];

        let standings = TeamStandings::of(&teams);
        let ids = standings
            .sorted
            .iter()
            .map(|t| t.id.as_str())
            .collect::<Vec<_>>();

        assert_eq!(ids, vec!["d", "c", "b", "a", "e"]);
    }
}
