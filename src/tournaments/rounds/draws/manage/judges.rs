//! Allocates judges to the debates of a drawn round.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::tournaments::{
    config::TournamentConfig,
    participants::Judge,
    rounds::draws::{Conflict, ConflictKind, PairingResult},
    teams::Team,
};

/// The number of debates each judge has been allocated to so far. This
/// starts from [`Judge::assignments_this_tournament`] and only lives for the
/// duration of one allocation.
pub struct JudgeWorkload<'a>(pub HashMap<&'a str, u32>);

impl<'a> JudgeWorkload<'a> {
    pub fn new(judges: &'a [Judge]) -> Self {
        Self(
            judges
                .iter()
                .map(|judge| (judge.id.as_str(), judge.assignments_this_tournament))
                .collect(),
        )
    }

    pub fn of(&self, judge: &Judge) -> u32 {
        self.0.get(judge.id.as_str()).copied().unwrap_or(0)
    }

    fn record(&mut self, judge: &'a Judge) {
        *self.0.entry(judge.id.as_str()).or_insert(0) += 1;
    }
}

/// Places judges on every debate (byes are skipped), in order.
///
/// For each debate, the judges who may sit on it are ordered by how many
/// debates they have already been given (fewest first) and then by
/// experience. The panel is the first [`TournamentConfig::panel_size`] of
/// these, and its most experienced member chairs.
pub fn allocate_judges<'a>(
    pairings: &mut [PairingResult],
    teams: &IndexMap<&str, &Team>,
    judges: &'a [Judge],
    config: &TournamentConfig,
) -> JudgeWorkload<'a> {
    let mut ranked = judges.iter().collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.seniority().total_cmp(&a.seniority()));

    let mut workload = JudgeWorkload::new(judges);
    let target = config.judges_per_debate as usize;

    for pairing in pairings.iter_mut().filter(|p| !p.is_bye_round) {
        let (Some(prop), Some(opp)) = (
            pairing
                .proposition_team_id
                .as_deref()
                .and_then(|id| teams.get(id)),
            pairing
                .opposition_team_id
                .as_deref()
                .and_then(|id| teams.get(id)),
        ) else {
            continue;
        };

        let mut eligible = ranked
            .iter()
            .copied()
            .filter(|judge| judge.can_judge(prop, opp))
            .collect::<Vec<_>>();
        eligible.sort_by(|a, b| {
            workload
                .of(a)
                .cmp(&workload.of(b))
                .then_with(|| b.panel_quality().total_cmp(&a.panel_quality()))
        });

        let panel = &eligible[..config.panel_size(eligible.len())];
        for judge in panel {
            workload.record(*judge);
        }

        pairing.judges = panel.iter().map(|judge| judge.id.clone()).collect();
        pairing.head_judge_id = chair_of(panel).map(|judge| judge.id.clone());

        tracing::debug!(
            prop = %prop.id,
            opp = %opp.id,
            judges = ?pairing.judges,
            chair = ?pairing.head_judge_id,
            "allocated panel"
        );

        if panel.len() < target {
            let conflict = if panel.is_empty() {
                tracing::warn!(prop = %prop.id, opp = %opp.id, "no judges available for debate");
                Conflict::error(
                    ConflictKind::InsufficientJudges,
                    "No eligible judges were available for this debate.",
                )
            } else {
                Conflict::warning(
                    ConflictKind::InsufficientJudges,
                    format!(
                        "Only {} of {target} judges could be allocated.",
                        panel.len()
                    ),
                )
            };
            pairing.conflicts.push(
                conflict
                    .with_teams([prop.id.as_str(), opp.id.as_str()])
                    .with_judges(panel.iter().map(|judge| judge.id.as_str())),
            );
        }
    }

    workload
}

/// The most experienced judge on the panel. Ties go to whoever was placed on
/// the panel first.
pub fn chair_of<'a>(panel: &[&'a Judge]) -> Option<&'a Judge> {
    panel.iter().copied().fold(None, |best, judge| match best {
        Some(best) if best.chair_score() >= judge.chair_score() => Some(best),
        _ => Some(judge),
    })
}
