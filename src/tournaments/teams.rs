use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

/// The side of the house a team debated on.
#[derive(Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Proposition,
    Opposition,
}

/// A team's standing in the tournament, as of the round which is about to be
/// drawn.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Team {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub school_id: Option<String>,
    /// Every side this team has debated on, oldest first.
    #[serde(default)]
    pub side_history: Vec<Side>,
    #[serde(default)]
    pub opponents_faced: HashSet<String>,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub total_points: f64,
    /// The round numbers in which this team was given a bye.
    #[serde(default)]
    pub bye_rounds: BTreeSet<u32>,
    /// Higher is stronger.
    #[serde(default)]
    pub performance_score: f64,
    #[serde(default)]
    pub aggregate: Option<TeamAggregateStats>,
}

/// Statistics carried over from other tournaments. These are shown to tab
/// directors but never used to draw a round.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TeamAggregateStats {
    pub tournaments_attended: u32,
    pub historical_win_rate: f64,
    pub average_points: f64,
}

impl Team {
    pub fn last_side(&self) -> Option<Side> {
        self.side_history.last().copied()
    }

    /// Returns `(proposition, opposition)` counts over the side history.
    pub fn side_counts(&self) -> (usize, usize) {
        self.side_history.iter().fold((0, 0), |(prop, opp), side| match side {
            Side::Proposition => (prop + 1, opp),
            Side::Opposition => (prop, opp + 1),
        })
    }

    /// How much this team is owed a proposition slot: the number of
    /// opposition rounds minus the number of proposition rounds.
    pub fn proposition_need(&self) -> i64 {
        let (prop, opp) = self.side_counts();
        opp as i64 - prop as i64
    }

    pub fn has_had_bye(&self) -> bool {
        !self.bye_rounds.is_empty()
    }

    /// Whether either team has recorded the other as a previous opponent.
    pub fn has_faced(&self, other: &Team) -> bool {
        self.opponents_faced.contains(&other.id)
            || other.opponents_faced.contains(&self.id)
    }

    /// Teams without a school never share one.
    pub fn shares_school_with(&self, other: &Team) -> bool {
        matches!(
            (&self.school_id, &other.school_id),
            (Some(a), Some(b)) if a == b
        )
    }

    pub fn performance_gap(&self, other: &Team) -> f64 {
        (self.performance_score - other.performance_score).abs()
    }
}
