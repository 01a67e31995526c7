//! Simulates rounds.
//!
//! Loads a snapshot, then repeatedly draws a round, prints it, makes up a
//! result for every debate and applies those results before drawing the next
//! round.

use std::{collections::HashMap, path::PathBuf};

use abacus_pairings::{
    config::{SimulationConfig, init_tracing},
    tournaments::{
        rounds::{RoundMethod, draws::manage::DrawTable},
        snapshots::{DebateOutcome, RoundSnapshot},
        teams::Side,
    },
};
use anyhow::Context;
use clap::Parser;
use rand::{Rng, SeedableRng, distr::Uniform};
use rand_chacha::ChaCha20Rng;
use tracing::Level;

#[derive(Parser)]
pub struct Simulate {
    /// Snapshot to start from (`.json` or `.toml`).
    snapshot: PathBuf,
    /// Simulation settings. Command line flags take precedence.
    #[clap(long, short)]
    config: Option<PathBuf>,
    #[clap(long, short)]
    rounds: Option<u32>,
    #[clap(long, short)]
    seed: Option<u64>,
    /// Where to write the snapshot for the round after the last simulated
    /// one.
    #[clap(long)]
    save: Option<PathBuf>,
    #[clap(long, short, action)]
    verbose: bool,
    #[clap(long, action)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Simulate::parse();

    let mut settings = match &args.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    if let Some(rounds) = args.rounds {
        settings.rounds = rounds;
    }
    if args.seed.is_some() {
        settings.seed = args.seed;
    }

    init_tracing(
        args.json || settings.json_logs,
        if args.verbose { Level::DEBUG } else { Level::WARN },
    );

    let mut snapshot = RoundSnapshot::load(&args.snapshot)
        .with_context(|| format!("loading {}", args.snapshot.display()))?;
    if let Some(judges_per_debate) = settings.judges_per_debate {
        snapshot.config.judges_per_debate = judges_per_debate;
    }

    let mut rng = match settings.seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_os_rng(),
    };
    let points = Uniform::new(140.0f64, 180.0f64)?;

    for _ in 0..settings.rounds {
        let round = snapshot.round_number;
        let pairings = snapshot
            .draw(&mut rng)
            .with_context(|| format!("drawing round {round}"))?;

        println!("Round {round} ({})", RoundMethod::for_round(round));
        println!(
            "{}\n",
            DrawTable {
                pairings: &pairings,
                available_teams: snapshot.teams.len(),
            }
        );

        let outcomes = pairings
            .iter()
            .filter(|pairing| !pairing.is_bye_round)
            .map(|pairing| {
                let prop = rng.sample(points);
                let opp = rng.sample(points);
                let winner = if prop >= opp {
                    Side::Proposition
                } else {
                    Side::Opposition
                };
                (
                    pairing.room.clone(),
                    DebateOutcome {
                        winner,
                        proposition_points: prop,
                        opposition_points: opp,
                    },
                )
            })
            .collect::<HashMap<_, _>>();

        snapshot.apply_round(&pairings, &outcomes);
    }

    if let Some(path) = &args.save {
        snapshot
            .save(path)
            .with_context(|| format!("saving {}", path.display()))?;
    }

    println!("Simulated {} round(s)", settings.rounds);
    Ok(())
}
