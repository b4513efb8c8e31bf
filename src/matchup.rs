use crate::league::League;
use crate::probability::{ModelResult, Simulator};
use crate::recommend::{recommend, Recommendation};
use crate::score::{estimate_scores, Model, ScoreError};
use crate::stats::TeamStat;
use crate::util::AwayHome;
use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::path::Path;
use tracing::{instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimePeriod {
    Day,
    Night,
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimePeriod::Day => "day",
            TimePeriod::Night => "night",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Team {
    pub name: String,
    #[serde(flatten)]
    pub stats: TeamStat,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MatchContext {
    pub league: League,
    /// Carried through to the report; no model reads it.
    pub time_period: TimePeriod,
    pub target: f64,
    pub away: Team,
    pub home: Team,
}

impl MatchContext {
    /// Reads a match from a JSON file, clamping every stat into its valid range.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        let context: MatchContext = serde_json::from_reader(file)
            .with_context(|| format!("parsing match file {}", path.display()))?;
        context.validated()
    }

    pub fn validated(mut self) -> Result<Self> {
        if !self.target.is_finite() || self.target < 0.0 {
            anyhow::bail!("target total must be a non-negative number, got {}", self.target);
        }
        for team in &mut [&mut self.away, &mut self.home] {
            if !team.stats.is_finite() {
                anyhow::bail!("stats for {:?} contain a non-finite value", team.name);
            }
            team.stats = team.stats.clamped();
            if team.stats.suspicious_form() {
                warn!(
                    team = %team.name,
                    time_avg = %team.stats.time_avg,
                    base_avg = %team.stats.base_avg,
                    "period scoring average is well above the season average"
                );
            }
        }
        Ok(self)
    }

    pub fn stats(&self) -> AwayHome<TeamStat> {
        AwayHome {
            away: self.away.stats,
            home: self.home.stats,
        }
    }
}

/// One model's view of a matchup.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub model: Model,
    pub scores: AwayHome<f64>,
    pub target: f64,
    pub result: ModelResult,
    /// Set when the probability models failed and `result` is the neutral fallback.
    pub neutral: bool,
    pub recommendation: Recommendation,
}

impl Analysis {
    #[instrument(name = "Analysis::run", skip(context, simulator, rng), fields(league = %context.league))]
    pub fn run<R: Rng + ?Sized>(
        context: &MatchContext,
        model: Model,
        simulator: &Simulator,
        rng: &mut R,
    ) -> Result<Analysis, ScoreError> {
        let league = context.league.constants();
        let scores = estimate_scores(&context.stats(), league, model)?;
        let evaluation = simulator.evaluate(rng, &scores, context.target, league);
        let result = evaluation.result();
        Ok(Analysis {
            model,
            scores,
            target: context.target,
            result,
            neutral: evaluation.is_neutral(),
            recommendation: recommend(result.final_prob),
        })
    }
}

/// Full and baseline analyses of the same matchup.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub full: Analysis,
    pub baseline: Analysis,
}

impl Comparison {
    pub fn run<R: Rng + ?Sized>(
        context: &MatchContext,
        simulator: &Simulator,
        rng: &mut R,
    ) -> Result<Comparison, ScoreError> {
        Ok(Comparison {
            full: Analysis::run(context, Model::Full, simulator, rng)?,
            baseline: Analysis::run(context, Model::Baseline, simulator, rng)?,
        })
    }

    /// How much pitching and offense move the over probability, in percentage points.
    pub fn delta(&self) -> f64 {
        self.full.result.final_prob - self.baseline.result.final_prob
    }
}

#[cfg(test)]
pub(crate) fn sample_context() -> MatchContext {
    use crate::stats::average_team;

    MatchContext {
        league: League::Npb,
        time_period: TimePeriod::Night,
        target: 8.0,
        away: Team {
            name: "Tigers".to_string(),
            stats: average_team(),
        },
        home: Team {
            name: "Giants".to_string(),
            stats: average_team(),
        },
    }
}
