//! Checks drawn rooms for problems and scores how good each room is.

use indexmap::IndexMap;

use crate::tournaments::{
    config::TournamentConfig,
    participants::Judge,
    rounds::draws::{Conflict, ConflictKind, PairingResult, Severity},
    teams::Team,
};

/// A team is flagged once it has been on one side this many more times than
/// the other.
const SIDE_IMBALANCE_LIMIT: usize = 2;

const ERROR_PENALTY: f64 = 25.0;
const WARNING_PENALTY: f64 = 10.0;
const FULL_PANEL_BONUS: f64 = 10.0;
const CLOSE_MATCH_BONUS: f64 = 15.0;
const MISMATCH_PENALTY: f64 = 15.0;
const CLOSE_MATCH_GAP: f64 = 50.0;
const MISMATCH_GAP: f64 = 200.0;

/// Adds team conflicts to every room of the draw (on top of any already
/// recorded during judge allocation) and computes each room's quality score.
pub fn validate_draw(
    pairings: &mut [PairingResult],
    teams: &IndexMap<&str, &Team>,
    config: &TournamentConfig,
) {
    for pairing in pairings.iter_mut() {
        let prop = pairing
            .proposition_team_id
            .as_deref()
            .and_then(|id| teams.get(id));

        if pairing.is_bye_round {
            if let Some(team) = prop
                && team.has_had_bye()
            {
                pairing.conflicts.push(bye_violation(team));
            }
            pairing.quality_score = 0.0;
            continue;
        }

        let opp = pairing
            .opposition_team_id
            .as_deref()
            .and_then(|id| teams.get(id));

        let (Some(prop), Some(opp)) = (prop, opp) else {
            continue;
        };

        pairing.conflicts.extend(team_conflicts(prop, opp));
        pairing
            .conflicts
            .extend([prop, opp].into_iter().filter_map(|team| side_imbalance(team)));

        pairing.quality_score =
            quality_score(&pairing.conflicts, pairing.judges.len(), prop, opp, config);

        if pairing.has_errors() {
            tracing::warn!(
                room = %pairing.room,
                prop = %prop.id,
                opp = %opp.id,
                conflicts = ?pairing.conflicts.iter().map(|c| c.kind).collect::<Vec<_>>(),
                "room has errors"
            );
        }
    }
}

/// Conflicts between the two teams of a debate.
pub fn team_conflicts(prop: &Team, opp: &Team) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    if prop.has_faced(opp) {
        conflicts.push(
            Conflict::error(
                ConflictKind::RepeatOpponent,
                format!("{} and {} have debated each other before.", prop.id, opp.id),
            )
            .with_teams([prop.id.as_str(), opp.id.as_str()]),
        );
    }

    if prop.shares_school_with(opp) {
        conflicts.push(
            Conflict::warning(
                ConflictKind::SameSchool,
                format!("{} and {} are from the same school.", prop.id, opp.id),
            )
            .with_teams([prop.id.as_str(), opp.id.as_str()]),
        );
    }

    conflicts
}

pub fn side_imbalance(team: &Team) -> Option<Conflict> {
    let (prop, opp) = team.side_counts();
    if prop.abs_diff(opp) > SIDE_IMBALANCE_LIMIT {
        Some(
            Conflict::warning(
                ConflictKind::SideImbalance,
                format!(
                    "{} has been on proposition {prop} times and on opposition {opp} times.",
                    team.id
                ),
            )
            .with_teams([team.id.as_str()]),
        )
    } else {
        None
    }
}

pub fn bye_violation(team: &Team) -> Conflict {
    Conflict::error(
        ConflictKind::ByeViolation,
        format!(
            "{} has already had a bye (in round(s) {:?}).",
            team.id, team.bye_rounds
        ),
    )
    .with_teams([team.id.as_str()])
}

/// Scores a debate out of 100. Each error costs 25 points and each warning
/// 10. A full panel earns 10 points and a close match 15, whereas a mismatch
/// loses 15.
pub fn quality_score(
    conflicts: &[Conflict],
    judges: usize,
    prop: &Team,
    opp: &Team,
    config: &TournamentConfig,
) -> f64 {
    let mut score = 100.0;

    for conflict in conflicts {
        score -= match conflict.severity {
            Severity::Error => ERROR_PENALTY,
            Severity::Warning => WARNING_PENALTY,
        };
    }

    if judges >= config.judges_per_debate as usize {
        score += FULL_PANEL_BONUS;
    }

    let gap = prop.performance_gap(opp);
    if gap < CLOSE_MATCH_GAP {
        score += CLOSE_MATCH_BONUS;
    } else if gap > MISMATCH_GAP {
        score -= MISMATCH_PENALTY;
    }

    score.clamp(0.0, 100.0)
}

/// Checks a proposed debate (for example, one a tab director is about to
/// create by hand) without drawing a round.
///
/// Either team may be left out, in which case only the checks which apply
/// to the other team (and the judges) are run.
#[tracing::instrument(skip(teams, judges))]
pub fn validate_pairing(
    teams: &[Team],
    judges: &[Judge],
    proposition_team_id: Option<&str>,
    opposition_team_id: Option<&str>,
    judge_ids: &[String],
) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    let prop = find_team(teams, proposition_team_id, &mut conflicts);
    let opp = find_team(teams, opposition_team_id, &mut conflicts);

    if let (Some(prop_id), Some(opp_id)) = (proposition_team_id, opposition_team_id)
        && prop_id == opp_id
    {
        conflicts.push(
            Conflict::error(
                ConflictKind::SelfPairing,
                format!("{prop_id} cannot debate against itself."),
            )
            .with_teams([prop_id]),
        );
    } else if let (Some(prop), Some(opp)) = (prop, opp) {
        conflicts.extend(team_conflicts(prop, opp));
    }

    let sides = prop.into_iter().chain(opp).collect::<Vec<_>>();

    for judge_id in judge_ids {
        let Some(judge) = judges.iter().find(|judge| &judge.id == judge_id) else {
            conflicts.push(
                Conflict::error(
                    ConflictKind::UnknownJudge,
                    format!("There is no judge with id `{judge_id}`."),
                )
                .with_judges([judge_id.as_str()]),
            );
            continue;
        };

        // a team listed on both sides is only checked once
        for (i, team) in sides.iter().enumerate() {
            if sides[..i].iter().any(|seen| seen.id == team.id) {
                continue;
            }
            conflicts.extend(judge_conflicts(judge, team));
        }
    }

    conflicts
}

fn find_team<'a>(
    teams: &'a [Team],
    id: Option<&str>,
    conflicts: &mut Vec<Conflict>,
) -> Option<&'a Team> {
    let id = id?;
    let team = teams.iter().find(|team| team.id == id);
    if team.is_none() {
        conflicts.push(
            Conflict::error(
                ConflictKind::UnknownTeam,
                format!("There is no team with id `{id}`."),
            )
            .with_teams([id]),
        );
    }
    team
}

/// Reasons the judge should not judge the team.
pub fn judge_conflicts(judge: &Judge, team: &Team) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    if judge.shares_school_with(team) {
        conflicts.push(
            Conflict::error(
                ConflictKind::JudgeSchoolConflict,
                format!("{} is from the same school as {}.", judge.id, team.id),
            )
            .with_teams([team.id.as_str()])
            .with_judges([judge.id.as_str()]),
        );
    }

    if judge.is_conflicted_with(team) {
        conflicts.push(
            Conflict::error(
                ConflictKind::JudgeTeamConflict,
                format!("{} has a recorded conflict with {}.", judge.id, team.id),
            )
            .with_teams([team.id.as_str()])
            .with_judges([judge.id.as_str()]),
        );
    }

    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournaments::teams::Side;

    fn team(id: &str, school: Option<&str>, performance: f64) -> Team {
        Team {
            id: id.to_string(),
            school_id: school.map(str::to_string),
            performance_score: performance,
            ..Default::default()
        }
    }

    fn kinds(conflicts: &[Conflict]) -> Vec<ConflictKind> {
        conflicts.iter().map(|c| c.kind).collect()
    }

    #[test]
    fn same_school_is_a_warning() {
        let teams = vec![
            team("a", Some("s"), 0.0),
            team("b", Some("s"), 0.0),
        ];
        let conflicts = validate_pairing(&teams, &[], Some("a"), Some("b"), &[]);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].kind, ConflictKind::SameSchool);
        assert_eq!(conflicts[0].severity, Severity::Warning);
        assert_eq!(conflicts[0].team_ids, vec!["a", "b"]);
    }

    #[test]
    fn self_pairing_and_unknowns() {
        let teams = vec![team("a", None, 0.0)];
        let conflicts = validate_pairing(
            &teams,
            &[],
            Some("a"),
            Some("a"),
            &["ghost".to_string()],
        );
        assert_eq!(
            kinds(&conflicts),
            vec![ConflictKind::SelfPairing, ConflictKind::UnknownJudge]
        );

        let conflicts = validate_pairing(&teams, &[], Some("a"), Some("zz"), &[]);
        assert_eq!(kinds(&conflicts), vec![ConflictKind::UnknownTeam]);
        assert!(conflicts.iter().all(|c| c.severity == Severity::Error));
    }

    #[test]
    fn judge_conflicts_are_errors() {
        let mut a = team("a", Some("north"), 0.0);
        a.opponents_faced.insert("b".to_string());
        let b = team("b", None, 0.0);
        let judges = vec![
            Judge {
                id: "j1".to_string(),
                school_id: Some("north".to_string()),
                ..Default::default()
            },
            Judge {
                id: "j2".to_string(),
                conflicts: ["b".to_string()].into_iter().collect(),
                ..Default::default()
            },
            Judge {
                id: "j3".to_string(),
                ..Default::default()
            },
        ];
        let conflicts = validate_pairing(
            &[a, b],
            &judges,
            Some("a"),
            Some("b"),
            &["j1".to_string(), "j2".to_string(), "j3".to_string()],
        );
        assert_eq!(
            kinds(&conflicts),
            vec![
                ConflictKind::RepeatOpponent,
                ConflictKind::JudgeSchoolConflict,
                ConflictKind::JudgeTeamConflict,
            ]
        );
        assert!(conflicts.iter().all(|c| c.severity == Severity::Error));
        assert_eq!(conflicts[1].judge_ids, vec!["j1"]);
        assert_eq!(conflicts[2].team_ids, vec!["b"]);
    }

    #[test]
    fn validation_is_repeatable() {
        let teams = vec![
            team("a", Some("s"), 0.0),
            team("b", Some("s"), 0.0),
        ];
        let judges = vec![Judge {
            id: "j".to_string(),
            school_id: Some("s".to_string()),
            ..Default::default()
        }];
        let run = || {
            validate_pairing(&teams, &judges, Some("a"), Some("b"), &["j".to_string()])
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn one_sided_validation() {
        let teams = vec![team("a", Some("s"), 0.0)];
        let judges = vec![Judge {
            id: "j".to_string(),
            school_id: Some("s".to_string()),
            ..Default::default()
        }];
        let conflicts =
            validate_pairing(&teams, &judges, Some("a"), None, &["j".to_string()]);
        assert_eq!(kinds(&conflicts), vec![ConflictKind::JudgeSchoolConflict]);
        assert!(validate_pairing(&teams, &judges, None, None, &[]).is_empty());
    }

    #[test]
    fn side_imbalance_threshold() {
        let mut t = team("a", None, 0.0);
        t.side_history = vec![Side::Proposition; 2];
        assert!(side_imbalance(&t).is_none());
        t.side_history.push(Side::Proposition);
        let conflict = side_imbalance(&t).unwrap();
        assert_eq!(conflict.kind, ConflictKind::SideImbalance);
        assert_eq!(conflict.severity, Severity::Warning);
        t.side_history.push(Side::Opposition);
        assert!(side_imbalance(&t).is_none());
    }

    #[test]
    fn quality_scoring() {
        let config = TournamentConfig::default();
        let a = team("a", None, 100.0);
        let close = team("b", None, 130.0);
        let middling = team("c", None, 200.0);
        let far = team("d", None, 400.0);

        // full panel and close match is clamped to 100
        assert_eq!(quality_score(&[], 3, &a, &close, &config), 100.0);
        assert_eq!(quality_score(&[], 2, &a, &middling, &config), 100.0);
        assert_eq!(quality_score(&[], 2, &a, &far, &config), 85.0);

        let conflicts = vec![
            Conflict::error(ConflictKind::RepeatOpponent, ""),
            Conflict::warning(ConflictKind::SameSchool, ""),
        ];
        assert_eq!(quality_score(&conflicts, 3, &a, &close, &config), 90.0);
        assert_eq!(quality_score(&conflicts, 0, &a, &far, &config), 50.0);

        let many = vec![Conflict::error(ConflictKind::RepeatOpponent, ""); 6];
        assert_eq!(quality_score(&many, 0, &a, &far, &config), 0.0);
    }

    #[test]
    fn draw_validation_adds_team_conflicts() {
        let mut a = team("a", Some("s"), 0.0);
        a.side_history = vec![Side::Opposition; 3];
        a.opponents_faced.insert("b".to_string());
        let b = team("b", Some("s"), 10.0);
        let c = team("c", None, 0.0);
        let teams = [&a, &b, &c]
            .into_iter()
            .map(|t| (t.id.as_str(), t))
            .collect::<IndexMap<_, _>>();

        let mut pairings = vec![PairingResult::debate("a", "b"), PairingResult::bye("c")];
        validate_draw(&mut pairings, &teams, &TournamentConfig::default());

        assert_eq!(
            kinds(&pairings[0].conflicts),
            vec![
                ConflictKind::RepeatOpponent,
                ConflictKind::SameSchool,
                ConflictKind::SideImbalance,
            ]
        );
        // 100 - 25 - 10 - 10 + 15 (close match, no judges)
        assert_eq!(pairings[0].quality_score, 70.0);
        assert!(pairings[1].conflicts.is_empty());
        assert_eq!(pairings[1].quality_score, 0.0);
    }
}
