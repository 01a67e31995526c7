//! Builds a snapshot for a tournament which has not started yet, either from
//! Tabbycat-style CSV files or from randomly generated participants.

use std::{
    collections::{HashMap, HashSet},
    fs::File,
    path::{Path, PathBuf},
};

use abacus_pairings::{
    config::init_tracing,
    tournaments::{
        config::TournamentConfig, participants::Judge, snapshots::RoundSnapshot,
        teams::Team,
    },
};
use anyhow::{Context, bail};
use clap::Parser;
use rand::{Rng, SeedableRng, seq::IndexedRandom};
use rand_chacha::ChaCha20Rng;
use tracing::Level;
use uuid::Uuid;

use crate::tabbycat_cli_copied::{JudgeRow, TeamRow};

#[derive(Parser)]
pub struct Import {
    /// Where to write the snapshot (`.json` or `.toml`).
    output: PathBuf,
    #[clap(long, short)]
    teams: Option<PathBuf>,
    #[clap(long, short)]
    judges: Option<PathBuf>,
    /// Generate this many teams (and twice as many judges) instead of
    /// reading CSV files.
    #[clap(long)]
    random: Option<usize>,
    #[clap(long, default_value_t = 8)]
    schools: usize,
    #[clap(long)]
    seed: Option<u64>,
    #[clap(long, default_value_t = 5)]
    prelim_rounds: u32,
    #[clap(long, default_value_t = 3)]
    judges_per_debate: u32,
}

/// Hands out one id per distinct institution name.
#[derive(Default)]
struct Schools(HashMap<String, String>);

impl Schools {
    fn get_or_create(&mut self, institution: &Option<String>) -> Option<String> {
        let name = institution.as_deref()?.trim();
        if name.is_empty() {
            return None;
        }
        Some(
            self.0
                .entry(name.to_string())
                .or_insert_with(|| Uuid::now_v7().to_string())
                .clone(),
        )
    }
}

fn main() -> anyhow::Result<()> {
    let args = Import::parse();
    init_tracing(false, Level::INFO);

    let (teams, judges) = match args.random {
        Some(n) => random_participants(n, args.schools.max(1), args.seed),
        None => {
            let (Some(teams), Some(judges)) = (&args.teams, &args.judges) else {
                bail!("either pass `--random` or both `--teams` and `--judges`");
            };
            read_participants(teams, judges)?
        }
    };

    tracing::info!(teams = teams.len(), judges = judges.len(), "generated participants");

    let snapshot = RoundSnapshot::new(
        TournamentConfig {
            prelim_rounds: args.prelim_rounds,
            elim_rounds: 0,
            judges_per_debate: args.judges_per_debate,
        },
        teams,
        judges,
    );
    snapshot
        .save(&args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;

    println!("Wrote {}", args.output.display());
    Ok(())
}

fn read_participants(
    teams_csv: &Path,
    judges_csv: &Path,
) -> anyhow::Result<(Vec<Team>, Vec<Judge>)> {
    let mut schools = Schools::default();

    let mut reader = csv::Reader::from_reader(
        File::open(teams_csv)
            .with_context(|| format!("opening {}", teams_csv.display()))?,
    );
    let mut teams = Vec::new();
    for (i, result) in reader.deserialize::<TeamRow>().enumerate() {
        let row = result.with_context(|| format!("team on line {}", i + 2))?;
        teams.push(Team {
            id: Uuid::now_v7().to_string(),
            name: row.full_name,
            school_id: schools.get_or_create(&row.institution),
            ..Default::default()
        });
    }

    let team_ids = teams
        .iter()
        .map(|team| (team.name.clone(), team.id.clone()))
        .collect::<HashMap<_, _>>();

    let mut reader = csv::Reader::from_reader(
        File::open(judges_csv)
            .with_context(|| format!("opening {}", judges_csv.display()))?,
    );
    let mut judges = Vec::new();
    for (i, result) in reader.deserialize::<JudgeRow>().enumerate() {
        let row = result.with_context(|| format!("judge on line {}", i + 2))?;
        let mut conflicts = HashSet::new();
        for team in &row.team_clashes {
            match team_ids.get(team.trim()) {
                Some(id) => {
                    conflicts.insert(id.clone());
                }
                None => bail!("judge {} clashes with unknown team {team}", row.name),
            }
        }
        judges.push(Judge {
            id: Uuid::now_v7().to_string(),
            name: row.name,
            school_id: schools.get_or_create(&row.institution),
            debates_judged: row.debates_judged.unwrap_or(0),
            avg_feedback: row.base_score.unwrap_or(0.0),
            conflicts,
            ..Default::default()
        });
    }

    Ok((teams, judges))
}

fn random_participants(
    n: usize,
    num_schools: usize,
    seed: Option<u64>,
) -> (Vec<Team>, Vec<Judge>) {
    let mut rng = match seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_os_rng(),
    };
    let schools = (0..num_schools)
        .map(|_| Uuid::now_v7().to_string())
        .collect::<Vec<_>>();

    let teams = (0..n)
        .map(|i| Team {
            id: Uuid::now_v7().to_string(),
            name: format!("Team {}", i + 1),
            school_id: schools.choose(&mut rng).cloned(),
            ..Default::default()
        })
        .collect::<Vec<_>>();

    let judges = (0..n * 2)
        .map(|i| Judge {
            id: Uuid::now_v7().to_string(),
            name: format!("Judge {}", i + 1),
            school_id: if rng.random_bool(0.7) {
                schools.choose(&mut rng).cloned()
            } else {
                None
            },
            debates_judged: rng.random_range(0..120),
            elimination_debates: rng.random_range(0..20),
            avg_feedback: (rng.random_range(20..=50) as f64) / 10.0,
            ..Default::default()
        })
        .collect();

    (teams, judges)
}

mod tabbycat_cli_copied {
    //! Row formats of the Tabbycat CSV importer (only the columns used by the
    //! draw).

    use serde::{Deserialize, Deserializer};

    fn tags_deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let str_sequence = String::deserialize(deserializer)?;
        Ok(str_sequence
            .split(',')
            .map(|item| item.trim().to_owned())
            .filter(|item| !item.is_empty())
            .collect())
    }

    #[derive(Deserialize, Debug, Clone)]
    pub struct TeamRow {
        pub full_name: String,
        pub institution: Option<String>,
    }

    #[derive(Deserialize, Debug, Clone)]
    pub struct JudgeRow {
        pub name: String,
        pub institution: Option<String>,
        /// Full names of teams this judge may not adjudicate.
        #[serde(deserialize_with = "tags_deserialize", default = "Vec::new")]
        pub team_clashes: Vec<String>,
        pub base_score: Option<f64>,
        pub debates_judged: Option<u32>,
    }
}
