use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

pub mod manage;

/// One room of a drawn round (or a bye).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PairingResult {
    pub room: String,
    pub proposition_team_id: Option<String>,
    /// Always `None` for byes.
    pub opposition_team_id: Option<String>,
    pub judges: BTreeSet<String>,
    /// If present, this is one of `judges`.
    pub head_judge_id: Option<String>,
    pub is_bye_round: bool,
    pub conflicts: Vec<Conflict>,
    pub quality_score: f64,
}

impl PairingResult {
    pub fn debate(prop: &str, opp: &str) -> Self {
        Self {
            room: String::new(),
            proposition_team_id: Some(prop.to_string()),
            opposition_team_id: Some(opp.to_string()),
            judges: BTreeSet::new(),
            head_judge_id: None,
            is_bye_round: false,
            conflicts: Vec::new(),
            quality_score: 0.0,
        }
    }

    /// The team sits this round out and advances automatically.
    pub fn bye(team: &str) -> Self {
        Self {
            room: String::new(),
            proposition_team_id: Some(team.to_string()),
            opposition_team_id: None,
            judges: BTreeSet::new(),
            head_judge_id: None,
            is_bye_round: true,
            conflicts: Vec::new(),
            quality_score: 0.0,
        }
    }

    pub fn team_ids(&self) -> impl Iterator<Item = &str> {
        self.proposition_team_id
            .iter()
            .chain(self.opposition_team_id.iter())
            .map(String::as_str)
    }

    pub fn has_errors(&self) -> bool {
        self.conflicts
            .iter()
            .any(|conflict| conflict.severity == Severity::Error)
    }
}

/// Names rooms in output order. Byes and debates share one counter, so a
/// draw which starts with a bye reads "Public Speaking 1", "Room 2", ...
pub fn assign_room_names(pairings: &mut [PairingResult]) {
    for (i, pairing) in pairings.iter_mut().enumerate() {
        let n = i + 1;
        pairing.room = if pairing.is_bye_round {
            format!("Public Speaking {n}")
        } else {
            format!("Room {n}")
        };
    }
}

#[derive(
    Serialize, Deserialize, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "snake_case")]
pub enum ConflictKind {
    /// The two teams have debated each other before.
    RepeatOpponent,
    SameSchool,
    /// A team has been on one side at least three more times than the other.
    SideImbalance,
    /// A team has been given a second bye.
    ByeViolation,
    InsufficientJudges,
    /// A team has been drawn against itself.
    SelfPairing,
    /// A judge is from the same school as one of the teams.
    JudgeSchoolConflict,
    /// A judge has a recorded conflict with one of the teams.
    JudgeTeamConflict,
    UnknownTeam,
    UnknownJudge,
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ConflictKind::RepeatOpponent => "repeat opponent",
            ConflictKind::SameSchool => "same school",
            ConflictKind::SideImbalance => "side imbalance",
            ConflictKind::ByeViolation => "bye violation",
            ConflictKind::InsufficientJudges => "insufficient judges",
            ConflictKind::SelfPairing => "self pairing",
            ConflictKind::JudgeSchoolConflict => "judge school conflict",
            ConflictKind::JudgeTeamConflict => "judge team conflict",
            ConflictKind::UnknownTeam => "unknown team",
            ConflictKind::UnknownJudge => "unknown judge",
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Conflict {
    #[serde(rename = "type")]
    pub kind: ConflictKind,
    pub severity: Severity,
    #[serde(default)]
    pub team_ids: Vec<String>,
    #[serde(default)]
    pub judge_ids: Vec<String>,
    pub description: String,
}

impl Conflict {
    pub fn new(
        kind: ConflictKind,
        severity: Severity,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            severity,
            team_ids: Vec::new(),
            judge_ids: Vec::new(),
            description: description.into(),
        }
    }

    pub fn error(kind: ConflictKind, description: impl Into<String>) -> Self {
        Self::new(kind, Severity::Error, description)
    }

    pub fn warning(kind: ConflictKind, description: impl Into<String>) -> Self {
        Self::new(kind, Severity::Warning, description)
    }

    pub fn with_teams<'a>(
        mut self,
        teams: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        self.team_ids.extend(teams.into_iter().map(str::to_string));
        self
    }

    pub fn with_judges<'a>(
        mut self,
        judges: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        self.judge_ids.extend(judges.into_iter().map(str::to_string));
        self
    }
}

/// Aggregate statistics about a drawn round.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DrawSummary {
    pub debates: usize,
    pub byes: usize,
    /// Teams which were available but left out of the draw.
    pub dropped_teams: usize,
    pub errors: usize,
    pub warnings: usize,
    /// Mean quality score of the debates (byes are not counted).
    pub mean_quality: f64,
    /// The room with the lowest quality score, if there are any debates.
    pub worst_room: Option<(String, f64)>,
}

impl DrawSummary {
    pub fn of(pairings: &[PairingResult], available_teams: usize) -> Self {
        let debates = pairings.iter().filter(|p| !p.is_bye_round);

        let (errors, warnings) = pairings
            .iter()
            .flat_map(|p| p.conflicts.iter())
            .fold((0, 0), |(e, w), conflict| match conflict.severity {
                Severity::Error => (e + 1, w),
                Severity::Warning => (e, w + 1),
            });

        let placed = pairings.iter().map(|p| p.team_ids().count()).sum::<usize>();

        let worst_room = debates
            .clone()
            .min_by(|a, b| a.quality_score.total_cmp(&b.quality_score))
            .map(|p| (p.room.clone(), p.quality_score));

        let debate_count = debates.clone().count();
        let mean_quality = if debate_count == 0 {
            0.0
        } else {
            debates.map(|p| p.quality_score).sum::<f64>() / debate_count as f64
        };

        Self {
            debates: debate_count,
            byes: pairings.len() - debate_count,
            dropped_teams: available_teams.saturating_sub(placed),
            errors,
            warnings,
            mean_quality,
            worst_room,
        }
    }
}
