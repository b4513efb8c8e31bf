use crate::league::LeagueConstants;
use crate::util::{floor, percent, AwayHome};
use rand::Rng;
use rand_distr::{Distribution, Gamma, GammaError, Normal, NormalError, Poisson, PoissonError};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace, warn};

pub const NUM_SIMULATIONS: usize = 100_000;

/// Probability (as a percentage) that the combined score goes over the target, per model.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ModelResult {
    pub monte_carlo: f64,
    pub negative_binomial: f64,
    pub poisson: f64,
    #[serde(rename = "final")]
    pub final_prob: f64,
}

impl ModelResult {
    /// "No information": every model at even odds.
    pub const NEUTRAL: ModelResult = ModelResult {
        monte_carlo: 50.0,
        negative_binomial: 50.0,
        poisson: 50.0,
        final_prob: 50.0,
    };
}

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("expected {side} score must be finite and positive, got {value}")]
    InvalidScore { side: &'static str, value: f64 },
    #[error("target total must be finite and non-negative, got {0}")]
    InvalidTarget(f64),
    #[error("simulation count must be positive")]
    NoSimulations,
    #[error("normal model: {0}")]
    Normal(#[from] NormalError),
    #[error("poisson model: {0}")]
    Poisson(#[from] PoissonError),
    #[error("negative binomial model: {0}")]
    Gamma(#[from] GammaError),
    #[error("{model} model produced a non-finite probability")]
    NonFinite { model: &'static str },
}

/// The outcome of an evaluation. A failed evaluation still yields a usable (neutral) result.
#[derive(Debug)]
pub enum Evaluation {
    Computed(ModelResult),
    Neutral(ModelError),
}

impl Evaluation {
    pub fn result(&self) -> ModelResult {
        match self {
            Evaluation::Computed(result) => *result,
            Evaluation::Neutral(_) => ModelResult::NEUTRAL,
        }
    }

    pub fn is_neutral(&self) -> bool {
        matches!(self, Evaluation::Neutral(_))
    }
}

/// Mean-parameterized negative binomial, drawn as a gamma-poisson mixture.
#[derive(Debug, Clone)]
pub struct NegativeBinomial {
    rate: Gamma<f64>,
}

impl NegativeBinomial {
    pub fn new(r: f64, mean: f64) -> Result<NegativeBinomial, GammaError> {
        let p = r / floor(r + mean, 0.1);
        Ok(NegativeBinomial {
            rate: Gamma::new(r, (1.0 - p) / p)?,
        })
    }
}

impl Distribution<f64> for NegativeBinomial {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let lambda = self.rate.sample(rng);
        // a vanishingly small gamma draw is a zero count
        Poisson::new(lambda).map_or(0.0, |poisson| poisson.sample(rng))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Simulator {
    pub simulations: usize,
}

impl Default for Simulator {
    fn default() -> Simulator {
        Simulator {
            simulations: NUM_SIMULATIONS,
        }
    }
}

impl Simulator {
    pub fn new(simulations: usize) -> Simulator {
        Simulator { simulations }
    }

    /// Runs all three models and blends them. Never fails; see [`Evaluation`].
    #[instrument(name = "Simulator::evaluate", skip(self, rng, league))]
    pub fn evaluate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        scores: &AwayHome<f64>,
        target: f64,
        league: &LeagueConstants,
    ) -> Evaluation {
        match self.try_evaluate(rng, scores, target, league) {
            Ok(result) => {
                debug!(?result, "evaluation complete");
                Evaluation::Computed(result)
            }
            Err(err) => {
                warn!(%err, "falling back to a neutral result");
                Evaluation::Neutral(err)
            }
        }
    }

    pub fn try_evaluate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        scores: &AwayHome<f64>,
        target: f64,
        league: &LeagueConstants,
    ) -> Result<ModelResult, ModelError> {
        for (side, value) in &[("away", scores.away), ("home", scores.home)] {
            if !value.is_finite() || *value <= 0.0 {
                return Err(ModelError::InvalidScore {
                    side: *side,
                    value: *value,
                });
            }
        }
        if !target.is_finite() || target < 0.0 {
            return Err(ModelError::InvalidTarget(target));
        }
        if self.simulations == 0 {
            return Err(ModelError::NoSimulations);
        }

        let monte_carlo = checked("monte carlo", self.monte_carlo(rng, scores, target, league)?)?;
        let negative_binomial = checked(
            "negative binomial",
            self.negative_binomial(rng, scores, target, league)?,
        )?;
        let poisson = checked("poisson", self.poisson(rng, scores, target)?)?;
        let final_prob = checked(
            "blended",
            league
                .weights
                .blend(monte_carlo, negative_binomial, poisson),
        )?;

        Ok(ModelResult {
            monte_carlo,
            negative_binomial,
            poisson,
            final_prob,
        })
    }

    /// Normal draws per side, with the league deviation split by each side's share of the runs.
    pub fn monte_carlo<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        scores: &AwayHome<f64>,
        target: f64,
        league: &LeagueConstants,
    ) -> Result<f64, ModelError> {
        let total = floor(scores.total(), 0.1);
        let std = scores.map(|score| league.std_dev * score / total);
        trace!(home_std = %std.home, away_std = %std.away);
        let home = Normal::new(scores.home, std.home)?;
        let away = Normal::new(scores.away, std.away)?;
        Ok(self.over_rate(target, || home.sample(rng) + away.sample(rng)))
    }

    pub fn negative_binomial<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        scores: &AwayHome<f64>,
        target: f64,
        league: &LeagueConstants,
    ) -> Result<f64, ModelError> {
        let home = NegativeBinomial::new(league.nb_r, scores.home)?;
        let away = NegativeBinomial::new(league.nb_r, scores.away)?;
        Ok(self.over_rate(target, || home.sample(rng) + away.sample(rng)))
    }

    pub fn poisson<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        scores: &AwayHome<f64>,
        target: f64,
    ) -> Result<f64, ModelError> {
        let home = Poisson::new(scores.home)?;
        let away = Poisson::new(scores.away)?;
        Ok(self.over_rate(target, || home.sample(rng) + away.sample(rng)))
    }

    fn over_rate<F>(&self, target: f64, mut total: F) -> f64
    where
        F: FnMut() -> f64,
    {
        let hits = (0..self.simulations).filter(|_| total() > target).count();
        percent(hits, self.simulations)
    }
}

fn checked(model: &'static str, probability: f64) -> Result<f64, ModelError> {
    trace!(model, %probability);
    if probability.is_finite() {
        Ok(probability)
    } else {
        Err(ModelError::NonFinite { model })
    }
}

#[cfg(test)]
mod tests {
    use super::{ModelError, ModelResult, NegativeBinomial, Simulator};
    use crate::league::League;
    use crate::util::AwayHome;
    use assert_approx_eq::assert_approx_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::Distribution;

    fn sides(away: f64, home: f64) -> AwayHome<f64> {
        AwayHome { away, home }
    }

    #[test]
    fn test_symmetric_matchup() {
        // both sides at 4.79 expected runs, NPB, total 8.0
        let mut rng = StdRng::seed_from_u64(8);
        let scores = sides(4.792_470_588, 4.792_470_588);
        let result = Simulator::default()
            .try_evaluate(&mut rng, &scores, 8.0, League::Npb.constants())
            .unwrap();
        // combined deviation is 2.3 / sqrt(2), so P(total > 8) is about 83.5%
        assert_approx_eq!(result.monte_carlo, 83.5, 1.0);
        assert!(result.negative_binomial > 50.0 && result.negative_binomial < 100.0);
        assert!(result.poisson > 50.0 && result.poisson < 100.0);
    }

    #[test]
    fn test_target_at_expected_total() {
        let mut rng = StdRng::seed_from_u64(1);
        let scores = sides(3.7, 3.7);
        let p = Simulator::default()
            .monte_carlo(&mut rng, &scores, 7.4, League::Kbo.constants())
            .unwrap();
        assert_approx_eq!(p, 50.0, 1.0);
    }

    #[test]
    fn test_extreme_targets() {
        let mut rng = StdRng::seed_from_u64(2);
        let scores = sides(4.5, 5.0);
        for league in &League::ALL {
            let low = Simulator::default()
                .try_evaluate(&mut rng, &scores, 0.0, league.constants())
                .unwrap();
            assert!(low.monte_carlo > 99.0);
            assert!(low.negative_binomial > 99.0);
            assert!(low.poisson > 99.0);

            let high = Simulator::default()
                .try_evaluate(&mut rng, &scores, 1000.0, league.constants())
                .unwrap();
            assert_approx_eq!(high.monte_carlo, 0.0);
            assert_approx_eq!(high.negative_binomial, 0.0);
            assert_approx_eq!(high.poisson, 0.0);
            assert_approx_eq!(high.final_prob, 0.0);
        }
    }

    #[test]
    fn test_final_is_convex_blend() {
        let mut rng = StdRng::seed_from_u64(3);
        let simulator = Simulator::new(20_000);
        for &(away, home, target) in &[(0.1, 0.1, 0.5), (3.2, 5.9, 8.5), (7.0, 6.0, 9.5)] {
            for league in &League::ALL {
                let result = simulator
                    .try_evaluate(&mut rng, &sides(away, home), target, league.constants())
                    .unwrap();
                let parts = [result.monte_carlo, result.negative_binomial, result.poisson];
                let min = parts.iter().cloned().fold(f64::INFINITY, f64::min);
                let max = parts.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                for p in parts.iter().chain(std::iter::once(&result.final_prob)) {
                    assert!((0.0..=100.0).contains(p));
                }
                assert!(result.final_prob >= min - 1e-9);
                assert!(result.final_prob <= max + 1e-9);
            }
        }
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let scores = sides(4.1, 3.3);
        let league = League::Kbo.constants();
        let simulator = Simulator::new(10_000);
        let a = simulator.evaluate(&mut StdRng::seed_from_u64(42), &scores, 7.5, league);
        let b = simulator.evaluate(&mut StdRng::seed_from_u64(42), &scores, 7.5, league);
        assert_eq!(a.result(), b.result());
    }

    #[test]
    fn test_negative_binomial_mean() {
        let mut rng = StdRng::seed_from_u64(4);
        let nb = NegativeBinomial::new(9.0, 4.0).unwrap();
        let n = 100_000;
        let draws: Vec<f64> = (0..n).map(|_| nb.sample(&mut rng)).collect();
        let mean = draws.iter().sum::<f64>() / f64::from(n);
        let var = draws.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / f64::from(n);
        assert_approx_eq!(mean, 4.0, 0.05);
        // mean + mean^2 / r
        assert_approx_eq!(var, 4.0 + 16.0 / 9.0, 0.15);
        assert!(draws.iter().all(|x| *x >= 0.0 && x.fract() == 0.0));
    }

    #[test]
    fn test_neutral_fallback() {
        let mut rng = StdRng::seed_from_u64(5);
        let simulator = Simulator::default();
        let league = League::Npb.constants();

        let evaluation = simulator.evaluate(&mut rng, &sides(f64::NAN, 4.0), 8.0, league);
        assert!(evaluation.is_neutral());
        assert_eq!(evaluation.result(), ModelResult::NEUTRAL);

        let evaluation = simulator.evaluate(&mut rng, &sides(4.0, 0.0), 8.0, league);
        assert!(evaluation.is_neutral());

        let evaluation = simulator.evaluate(&mut rng, &sides(4.0, 4.0), f64::INFINITY, league);
        assert!(matches!(
            evaluation,
            super::Evaluation::Neutral(ModelError::InvalidTarget(_))
        ));

        let evaluation = Simulator::new(0).evaluate(&mut rng, &sides(4.0, 4.0), 8.0, league);
        assert!(evaluation.is_neutral());
    }
}
