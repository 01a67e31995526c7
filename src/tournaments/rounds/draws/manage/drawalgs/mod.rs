use std::collections::HashSet;

use indexmap::IndexMap;
use rand::Rng;

use crate::tournaments::{
    config::TournamentConfig,
    participants::Judge,
    rounds::{
        RoundMethod,
        draws::{
            DrawSummary, PairingResult, assign_room_names,
            manage::{judges::allocate_judges, validate::validate_draw},
        },
    },
    teams::Team,
};

pub mod fold;
pub mod random;
pub mod swiss;

/// The error messages will be shown to tab directors, and therefore should
/// be readable.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MakeDrawError {
    #[error("There are no available teams to draw!")]
    NoTeamsAvailable,
    #[error("The team `{0}` was listed more than once in the available teams.")]
    DuplicateTeam(String),
}

/// Everything the pairing algorithms need to know about the round that is
/// about to be drawn. The caller is responsible for filtering the teams and
/// judges down to those which are available for this round.
#[derive(Clone, Copy)]
pub struct DrawInput<'a> {
    pub config: &'a TournamentConfig,
    pub round_number: u32,
    pub teams: &'a [Team],
    pub judges: &'a [Judge],
}

/// (proposition, opposition)
pub type TeamsOfRoom<'a> = (&'a Team, &'a Team);

/// Draws one round.
///
/// The random number generator is only used for the first round; every other
/// round is deterministic given the same input.
#[tracing::instrument(skip_all, fields(round = input.round_number, teams = input.teams.len(), judges = input.judges.len()))]
pub fn make_draw<R: Rng + ?Sized>(
    input: DrawInput<'_>,
    rng: &mut R,
) -> Result<Vec<PairingResult>, MakeDrawError> {
    if input.teams.is_empty() {
        return Err(MakeDrawError::NoTeamsAvailable);
    }

    let mut teams_by_id: IndexMap<&str, &Team> =
        IndexMap::with_capacity(input.teams.len());
    for team in input.teams {
        if teams_by_id.insert(team.id.as_str(), team).is_some() {
            return Err(MakeDrawError::DuplicateTeam(team.id.clone()));
        }
    }

    let bye = select_bye(input.teams);
    let to_pair = input
        .teams
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != bye)
        .map(|(_, team)| team)
        .collect::<Vec<_>>();

    let method = RoundMethod::for_round(input.round_number);
    let rooms = match method {
        RoundMethod::RandomFold => random::gen_random_fold(&to_pair, rng),
        RoundMethod::Fold => fold::gen_fold(&to_pair),
        RoundMethod::Swiss => swiss::gen_swiss(&to_pair),
    };

    if rooms.len() * 2 < to_pair.len() {
        let placed = rooms
            .iter()
            .flat_map(|(prop, opp)| [prop.id.as_str(), opp.id.as_str()])
            .collect::<HashSet<_>>();
        for team in to_pair.iter().filter(|t| !placed.contains(t.id.as_str())) {
            tracing::warn!(
                team = %team.id,
                %method,
                "no valid opponent remained, team left out of the draw"
            );
        }
    }

    let mut output = Vec::with_capacity(rooms.len() + 1);
    if let Some(bye) = bye {
        let team = &input.teams[bye];
        tracing::debug!(team = %team.id, "awarding bye");
        output.push(PairingResult::bye(&team.id));
    }
    for (prop, opp) in rooms {
        tracing::debug!(prop = %prop.id, opp = %opp.id, "paired");
        output.push(PairingResult::debate(&prop.id, &opp.id));
    }

    allocate_judges(&mut output, &teams_by_id, input.judges, input.config);
    assign_room_names(&mut output);
    validate_draw(&mut output, &teams_by_id, input.config);

    let summary = DrawSummary::of(&output, input.teams.len());
    tracing::info!(
        %method,
        debates = summary.debates,
        byes = summary.byes,
        dropped = summary.dropped_teams,
        errors = summary.errors,
        warnings = summary.warnings,
        mean_quality = summary.mean_quality,
        "generated draw"
    );

    Ok(output)
}

/// Generates the pairings for round `round_number` of a tournament.
pub fn generate_tournament_pairings<R: Rng + ?Sized>(
    teams: &[Team],
    judges: &[Judge],
    config: &TournamentConfig,
    round_number: u32,
    rng: &mut R,
) -> Result<Vec<PairingResult>, MakeDrawError> {
    make_draw(
        DrawInput {
            config,
            round_number,
            teams,
            judges,
        },
        rng,
    )
}

/// Picks the team which sits out this round, if there is an odd number of
/// teams. This is the weakest team which has not yet had a bye (or the weakest
/// team overall, if every team has had one).
pub fn select_bye(teams: &[Team]) -> Option<usize> {
    if teams.len() % 2 == 0 {
        return None;
    }

    let by_performance = |a: &(usize, &Team), b: &(usize, &Team)| {
        a.1.performance_score.total_cmp(&b.1.performance_score)
    };

    teams
        .iter()
        .enumerate()
        .filter(|(_, team)| !team.has_had_bye())
        .min_by(by_performance)
        .or_else(|| teams.iter().enumerate().min_by(by_performance))
        .map(|(i, _)| i)
}

/// Whether the two teams may be drawn against each other in a power-paired
/// round.
pub fn can_meet(a: &Team, b: &Team) -> bool {
    a.id != b.id && !a.has_faced(b) && !a.shares_school_with(b)
}

/// Closer matches score higher.
pub fn pairing_score(a: &Team, b: &Team) -> f64 {
    1000.0 - a.performance_gap(b)
}

/// Returns the index (as yielded by `candidates`) of the best opponent for
/// `team`. Ties go to the earliest candidate.
pub fn best_opponent<'a>(
    team: &Team,
    candidates: impl IntoIterator<Item = (usize, &'a Team)>,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, candidate) in candidates {
        if !can_meet(team, candidate) {
            continue;
        }
        let score = pairing_score(team, candidate);
        match best {
            Some((_, best_score)) if best_score >= score => {}
            _ => best = Some((idx, score)),
        }
    }
    best.map(|(idx, _)| idx)
}
