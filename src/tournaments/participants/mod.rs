use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::tournaments::teams::Team;

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Judge {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub school_id: Option<String>,
    /// Lifetime number of debates judged.
    #[serde(default)]
    pub debates_judged: u32,
    #[serde(default)]
    pub elimination_debates: u32,
    #[serde(default)]
    pub avg_feedback: f64,
    /// Teams this judge may not adjudicate (recorded complaints, personal
    /// relationships, etc).
    #[serde(default)]
    pub conflicts: HashSet<String>,
    #[serde(default)]
    pub assignments_this_tournament: u32,
    #[serde(default)]
    pub aggregate: Option<JudgeAggregateStats>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct JudgeAggregateStats {
    pub consistency_score: f64,
    pub tournaments_judged: u32,
}

impl Judge {
    pub fn consistency_score(&self) -> f64 {
        self.aggregate
            .as_ref()
            .map(|stats| stats.consistency_score)
            .unwrap_or(0.0)
    }

    /// The weighted experience score which determines the order in which
    /// judges are considered for panels.
    pub fn seniority(&self) -> f64 {
        0.4 * self.debates_judged as f64
            + 0.3 * self.elimination_debates as f64
            + 0.2 * self.avg_feedback
            + 0.1 * self.consistency_score()
    }

    /// Used to order judges with an equal workload.
    pub fn panel_quality(&self) -> f64 {
        self.debates_judged as f64 + self.avg_feedback * 10.0
    }

    /// Used to pick the chair of a panel.
    pub fn chair_score(&self) -> f64 {
        self.debates_judged as f64
            + self.elimination_debates as f64 * 2.0
            + self.avg_feedback * 5.0
    }

    pub fn shares_school_with(&self, team: &Team) -> bool {
        matches!(
            (&self.school_id, &team.school_id),
            (Some(a), Some(b)) if a == b
        )
    }

    pub fn is_conflicted_with(&self, team: &Team) -> bool {
        self.conflicts.contains(&team.id)
    }

    /// A judge can sit on a debate if they are from neither team's school and
    /// have no recorded conflict with either team.
    pub fn can_judge(&self, prop: &Team, opp: &Team) -> bool {
        [prop, opp].into_iter().all(|team| {
            !self.shares_school_with(team) && !self.is_conflicted_with(team)
        })
    }
}
