use crate::league::LeagueConstants;
use crate::stats::TeamStat;
use crate::util::{floor, AwayHome};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{instrument, trace};

/// Smallest expected run total handed to the probability models.
pub const MIN_RUNS: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Model {
    /// Pitching and team offense applied on top of scoring averages.
    Full,
    /// Scoring averages only.
    Baseline,
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Model::Full => "Full (pitching + offense)",
            Model::Baseline => "Baseline (scoring averages only)",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScoreError {
    #[error("{side} team stats contain a non-finite value")]
    NonFiniteInput { side: &'static str },
    #[error("expected {side} score is not finite ({value})")]
    NonFiniteScore { side: &'static str, value: f64 },
}

/// Expected runs for each side.
#[instrument(level = "debug", skip(teams, league))]
pub fn estimate_scores(
    teams: &AwayHome<TeamStat>,
    league: &LeagueConstants,
    model: Model,
) -> Result<AwayHome<f64>, ScoreError> {
    for (side, team) in &[("away", &teams.away), ("home", &teams.home)] {
        if !team.is_finite() {
            return Err(ScoreError::NonFiniteInput { side: *side });
        }
    }

    let scores = teams.versus().map(|(batting, opponent)| match model {
        Model::Full => weighted_score(batting, opponent, league.multiplier),
        Model::Baseline => floor(batting.baseline_score() * league.multiplier, MIN_RUNS),
    });

    for (side, value) in &[("away", scores.away), ("home", scores.home)] {
        if !value.is_finite() {
            return Err(ScoreError::NonFiniteScore {
                side: *side,
                value: *value,
            });
        }
    }
    trace!(away = %scores.away, home = %scores.home, ?model);
    Ok(scores)
}

/// Expected runs for `batting`, facing `opponent`'s starting pitcher.
pub fn weighted_score(batting: &TeamStat, opponent: &TeamStat, multiplier: f64) -> f64 {
    let pitcher_factor = opponent.pitcher.factor();
    let score = batting.base_score()
        * multiplier
        * batting.over_factor()
        * floor(pitcher_factor, 0.1).recip()
        * batting.offense_factor();
    trace!(
        %pitcher_factor,
        offense_factor = %batting.offense_factor(),
        base_score = %batting.base_score(),
        %score,
    );
    floor(score, MIN_RUNS)
}

#[cfg(test)]
mod tests {
    use super::{estimate_scores, Model, MIN_RUNS};
    use crate::league::League;
    use crate::stats::{average_team, Pitcher, TeamStat};
    use crate::util::AwayHome;
    use assert_approx_eq::assert_approx_eq;

    fn matchup(away: TeamStat, home: TeamStat) -> AwayHome<TeamStat> {
        AwayHome { away, home }
    }

    fn zero_team() -> TeamStat {
        TeamStat {
            time_avg: 0.0,
            base_avg: 0.0,
            allow: 0.0,
            over_rate: 0.0,
            team_batting: 0.0,
            team_obp: 0.0,
            pitcher: Pitcher { era: 0.0, baa: 0.0 },
        }
    }

    #[test]
    fn test_full_score() {
        let teams = matchup(average_team(), average_team());
        let scores = estimate_scores(&teams, League::Npb.constants(), Model::Full).unwrap();
        let pitcher_factor = 4.5 / 4.0 * 0.7 + 0.3 / 0.25 * 0.3;
        let expected = 4.02 * 0.95 * 0.9 / pitcher_factor * 1.6;
        assert_approx_eq!(scores.home, expected);
        assert_approx_eq!(scores.away, expected);
    }

    #[test]
    fn test_baseline_score() {
        let teams = matchup(average_team(), average_team());
        let scores = estimate_scores(&teams, League::Kbo.constants(), Model::Baseline).unwrap();
        assert_approx_eq!(scores.home, (4.0 * 0.6 + 4.2 * 0.4) * 1.05);
        assert_approx_eq!(scores.away, (4.0 * 0.6 + 4.2 * 0.4) * 1.05);
    }

    #[test]
    fn test_scores_are_positive() {
        for league in &League::ALL {
            for model in &[Model::Full, Model::Baseline] {
                let teams = matchup(zero_team(), zero_team());
                let scores = estimate_scores(&teams, league.constants(), *model).unwrap();
                assert_approx_eq!(scores.home, MIN_RUNS);
                assert_approx_eq!(scores.away, MIN_RUNS);

                let teams = matchup(average_team(), zero_team());
                let scores = estimate_scores(&teams, league.constants(), *model).unwrap();
                assert!(scores.home > 0.0 && scores.away > 0.0);
            }
        }
    }

    #[test]
    fn test_baseline_ignores_pitching_and_offense() {
        let base = matchup(average_team(), average_team());
        let changed = matchup(
            TeamStat {
                team_batting: 0.310,
                team_obp: 0.400,
                pitcher: Pitcher {
                    era: 1.5,
                    baa: 0.190,
                },
                ..average_team()
            },
            TeamStat {
                team_batting: 0.220,
                pitcher: Pitcher {
                    era: 7.5,
                    baa: 0.330,
                },
                ..average_team()
            },
        );
        let league = League::Npb.constants();
        let a = estimate_scores(&base, league, Model::Baseline).unwrap();
        let b = estimate_scores(&changed, league, Model::Baseline).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_offense_monotonic() {
        let league = League::Npb.constants();
        let mut previous = 0.0;
        for step in 0..=10 {
            let x = f64::from(step) / 10.0;
            let home = TeamStat {
                team_batting: x * 0.4,
                team_obp: x * 0.5,
                ..average_team()
            };
            let scores =
                estimate_scores(&matchup(average_team(), home), league, Model::Full).unwrap();
            assert!(scores.home >= previous);
            previous = scores.home;
        }
    }

    #[test]
    fn test_worse_opposing_pitcher_raises_score() {
        let league = League::Kbo.constants();
        let ace = TeamStat {
            pitcher: Pitcher {
                era: 2.2,
                baa: 0.210,
            },
            ..average_team()
        };
        let journeyman = TeamStat {
            pitcher: Pitcher {
                era: 5.8,
                baa: 0.300,
            },
            ..average_team()
        };
        // away bats against the home starter
        let vs_ace = estimate_scores(&matchup(average_team(), ace), league, Model::Full).unwrap();
        let vs_journeyman =
            estimate_scores(&matchup(average_team(), journeyman), league, Model::Full).unwrap();
        assert!(vs_journeyman.away > vs_ace.away);
        // the home side's own pitcher does not affect its own score
        assert_approx_eq!(vs_journeyman.home, vs_ace.home);
    }

    #[test]
    fn test_non_finite_input() {
        let teams = matchup(
            average_team(),
            TeamStat {
                time_avg: f64::INFINITY,
                ..average_team()
            },
        );
        assert!(estimate_scores(&teams, League::Npb.constants(), Model::Full).is_err());
    }
}
