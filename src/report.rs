use crate::matchup::{Analysis, Comparison, MatchContext};
use crate::recommend::Verdict;
use serde::Serialize;
use std::fmt;

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{} model]", self.model)?;
        writeln!(
            f,
            "Expected runs: home {:.2} - away {:.2}",
            self.scores.home, self.scores.away
        )?;
        writeln!(
            f,
            "Expected total: {:.2} (target {})",
            self.scores.total(),
            self.target
        )?;
        if self.neutral {
            writeln!(f, "Models failed to run; showing a neutral 50% result")?;
        }
        writeln!(f, "Over probability by model:")?;
        writeln!(f, "  Monte Carlo:       {:.1}%", self.result.monte_carlo)?;
        writeln!(f, "  Negative binomial: {:.1}%", self.result.negative_binomial)?;
        writeln!(f, "  Poisson:           {:.1}%", self.result.poisson)?;
        writeln!(f, "Blended: {:.1}%", self.result.final_prob)?;
        write!(f, "Recommendation: {}", self.recommendation)
    }
}

/// Console report: both models plus the effect of pitching and offense.
pub struct ComparisonReport<'a> {
    pub context: &'a MatchContext,
    pub comparison: &'a Comparison,
}

impl fmt::Display for ComparisonReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let context = self.context;
        writeln!(f, "=== {} analysis ({} game) ===", context.league, context.time_period)?;
        writeln!(f, "Matchup: {} vs {}", context.home.name, context.away.name)?;
        writeln!(f, "Target total: {}", context.target)?;
        writeln!(f)?;
        writeln!(f, "{}", self.comparison.full)?;
        writeln!(f)?;
        writeln!(f, "{}", self.comparison.baseline)?;
        writeln!(f)?;
        let delta = self.comparison.delta();
        write!(
            f,
            "Pitching + offense effect: {} over probability by {:.1}%",
            if delta >= 0.0 { "raises" } else { "lowers" },
            delta.abs()
        )
    }
}

/// Form report: the full model and a three-way verdict.
#[derive(Serialize)]
pub struct FormReport<'a> {
    #[serde(flatten)]
    pub context: &'a MatchContext,
    pub analysis: &'a Analysis,
    pub verdict: Verdict,
}

impl<'a> FormReport<'a> {
    pub fn new(context: &'a MatchContext, analysis: &'a Analysis) -> FormReport<'a> {
        FormReport {
            context,
            analysis,
            verdict: Verdict::from_prob(analysis.result.final_prob),
        }
    }
}

impl fmt::Display for FormReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let context = self.context;
        writeln!(f, "=== {} analysis ({} game) ===", context.league, context.time_period)?;
        writeln!(f, "Matchup: {} vs {}", context.home.name, context.away.name)?;
        writeln!(f, "{}", self.analysis)?;
        write!(f, "Verdict: {}", self.verdict)
    }
}
