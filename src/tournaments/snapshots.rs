//! A serialisable picture of a tournament just before a round is drawn.
//!
//! Drawing a round never changes a snapshot. Once the round has been debated
//! [`RoundSnapshot::apply_round`] can be used to produce the input for the
//! next round.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use chrono::{NaiveDateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tournaments::{
    config::TournamentConfig,
    participants::Judge,
    rounds::draws::{
        PairingResult,
        manage::drawalgs::{DrawInput, MakeDrawError, make_draw},
    },
    teams::{Side, Team},
};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RoundSnapshot {
    /// The round which is about to be drawn.
    pub round_number: u32,
    #[serde(default = "now")]
    pub taken_at: NaiveDateTime,
    #[serde(default)]
    pub config: TournamentConfig,
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub judges: Vec<Judge>,
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("could not access snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON snapshot: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid TOML snapshot: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("could not write TOML snapshot: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("unsupported snapshot format for {0:?} (expected .json or .toml)")]
    UnsupportedFormat(PathBuf),
}

/// The result of one debate, as entered on the ballot.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DebateOutcome {
    pub winner: Side,
    pub proposition_points: f64,
    pub opposition_points: f64,
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

enum Format {
    Json,
    Toml,
}

fn format_of(path: &Path) -> Result<Format, SnapshotError> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(Format::Json),
        Some("toml") => Ok(Format::Toml),
        _ => Err(SnapshotError::UnsupportedFormat(path.to_path_buf())),
    }
}

impl RoundSnapshot {
    /// A snapshot of a tournament which has not started yet.
    pub fn new(config: TournamentConfig, teams: Vec<Team>, judges: Vec<Judge>) -> Self {
        Self {
            round_number: 1,
            taken_at: now(),
            config,
            teams,
            judges,
        }
    }

    #[tracing::instrument]
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let format = format_of(path)?;
        let contents = std::fs::read_to_string(path)?;
        let snapshot: RoundSnapshot = match format {
            Format::Json => serde_json::from_str(&contents)?,
            Format::Toml => toml::from_str(&contents)?,
        };
        tracing::debug!(
            round = snapshot.round_number,
            teams = snapshot.teams.len(),
            judges = snapshot.judges.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    #[tracing::instrument(skip(self))]
    pub fn save(&self, path: &Path) -> Result<(), SnapshotError> {
        let contents = match format_of(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn draw_input(&self) -> DrawInput<'_> {
        DrawInput {
            config: &self.config,
            round_number: self.round_number,
            teams: &self.teams,
            judges: &self.judges,
        }
    }

    /// Draws the round this snapshot describes.
    pub fn draw<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Vec<PairingResult>, MakeDrawError> {
        make_draw(self.draw_input(), rng)
    }

    /// Records a debated round and moves the snapshot on to the next round.
    ///
    /// `outcomes` maps room names to results. Debates without an outcome are
    /// still recorded (sides and opponents) but nobody is credited with a
    /// win. Teams on a bye are credited with a win, as they advance.
    pub fn apply_round(
        &mut self,
        pairings: &[PairingResult],
        outcomes: &HashMap<String, DebateOutcome>,
    ) {
        let round = self.round_number;
        let is_elim = round > self.config.prelim_rounds;

        let team_idx = self
            .teams
            .iter()
            .enumerate()
            .map(|(i, team)| (team.id.clone(), i))
            .collect::<HashMap<_, _>>();
        let judge_idx = self
            .judges
            .iter()
            .enumerate()
            .map(|(i, judge)| (judge.id.clone(), i))
            .collect::<HashMap<_, _>>();

        for pairing in pairings {
            if pairing.is_bye_round {
                if let Some(&i) = pairing
                    .proposition_team_id
                    .as_ref()
                    .and_then(|id| team_idx.get(id))
                {
                    let team = &mut self.teams[i];
                    team.bye_rounds.insert(round);
                    team.wins += 1;
                }
                continue;
            }

            let (Some(&prop), Some(&opp)) = (
                pairing
                    .proposition_team_id
                    .as_ref()
                    .and_then(|id| team_idx.get(id)),
                pairing
                    .opposition_team_id
                    .as_ref()
                    .and_then(|id| team_idx.get(id)),
            ) else {
                tracing::warn!(room = %pairing.room, "skipping room with unknown teams");
                continue;
            };

            let outcome = outcomes.get(&pairing.room);
            let opp_id = self.teams[opp].id.clone();
            let prop_id = self.teams[prop].id.clone();

            for (i, side, opponent) in [
                (prop, Side::Proposition, opp_id),
                (opp, Side::Opposition, prop_id),
            ] {
                let team = &mut self.teams[i];
                team.side_history.push(side);
                team.opponents_faced.insert(opponent);

                if let Some(outcome) = outcome {
                    team.total_points += match side {
                        Side::Proposition => outcome.proposition_points,
                        Side::Opposition => outcome.opposition_points,
                    };
                    if outcome.winner == side {
                        team.wins += 1;
                    }
                }
            }

            for judge_id in &pairing.judges {
                if let Some(&j) = judge_idx.get(judge_id) {
                    let judge = &mut self.judges[j];
                    judge.debates_judged += 1;
                    judge.assignments_this_tournament += 1;
                    if is_elim {
                        judge.elimination_debates += 1;
                    }
                }
            }
        }

        for team in &mut self.teams {
            team.performance_score = performance_of(team);
        }

        self.round_number += 1;
        self.taken_at = now();
    }
}

/// 100 per win, plus the team's average points per debate.
pub fn performance_of(team: &Team) -> f64 {
    let debated = team.side_history.len().max(1) as f64;
    team.wins as f64 * 100.0 + team.total_points / debated
}
