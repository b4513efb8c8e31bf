use crate::probability::NUM_SIMULATIONS;
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

/// NPB/KBO over/under totals analyzer
#[derive(Parser, Debug, Clone)]
#[command(name = "npb-kbo-totals", version, about)]
pub struct Config {
    /// Trials per stochastic model
    #[arg(long, env = "NUM_SIMULATIONS", default_value_t = NUM_SIMULATIONS, global = true)]
    pub simulations: usize,

    /// Seed for the random source; runs with the same seed repeat exactly
    #[arg(long, env = "ANALYZER_SEED", global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Prompt for matchups and compare the full and baseline models (default)
    Interactive,
    /// Analyze a matchup read from a JSON file with the full model
    Form {
        /// Match file: league, time_period, target, away and home team stats
        path: PathBuf,

        /// Print the analysis as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.simulations == 0 {
            anyhow::bail!("simulations must be at least 1");
        }
        Ok(())
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
