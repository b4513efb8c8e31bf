use crate::util::floor;
use serde::{Deserialize, Serialize};

const LEAGUE_ERA: f64 = 4.5;
const LEAGUE_BAA: f64 = 0.3;
const REFERENCE_BATTING: f64 = 0.270;
const REFERENCE_OBP: f64 = 0.340;
const MAX_PITCHER_FACTOR: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Pitcher {
    pub era: f64,
    pub baa: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct TeamStat {
    /// Runs per game over the selected time period (day or night games).
    pub time_avg: f64,
    /// Runs per game over the whole season.
    pub base_avg: f64,
    /// Runs allowed per game.
    pub allow: f64,
    /// Fraction of games that went over the posted total.
    pub over_rate: f64,
    pub team_batting: f64,
    pub team_obp: f64,
    /// Today's starting pitcher.
    pub pitcher: Pitcher,
}

fn unit(x: f64) -> f64 {
    x.max(0.0).min(1.0)
}

impl Pitcher {
    /// How hard this pitcher is to score against, capped at 2.0. A low ERA or BAA raises it.
    pub fn factor(&self) -> f64 {
        let era_impact = (LEAGUE_ERA / floor(self.era, 0.01)) * 0.7;
        let baa_impact = (LEAGUE_BAA / floor(self.baa, 0.001)) * 0.3;
        (era_impact + baa_impact).min(MAX_PITCHER_FACTOR)
    }

    pub fn clamped(&self) -> Pitcher {
        Pitcher {
            era: self.era.max(0.0),
            baa: unit(self.baa),
        }
    }
}

impl TeamStat {
    pub fn offense_factor(&self) -> f64 {
        0.6 + (self.team_batting / floor(REFERENCE_BATTING, 0.001)) * 0.5
            + (self.team_obp / floor(REFERENCE_OBP, 0.001)) * 0.5
    }

    /// Recent form weighted highest; runs allowed stand in for park and opponent effects.
    pub fn base_score(&self) -> f64 {
        self.time_avg * 0.5 + self.base_avg * 0.3 + self.allow * 0.2
    }

    pub fn baseline_score(&self) -> f64 {
        self.time_avg * 0.6 + self.base_avg * 0.4
    }

    pub fn over_factor(&self) -> f64 {
        0.8 + 0.2 * self.over_rate
    }

    /// Flags a period average far above the season average, which usually means a typo.
    pub fn suspicious_form(&self) -> bool {
        self.time_avg > self.base_avg * 1.5
    }

    pub fn clamped(&self) -> TeamStat {
        TeamStat {
            time_avg: self.time_avg.max(0.0),
            base_avg: self.base_avg.max(0.0),
            allow: self.allow.max(0.0),
            over_rate: unit(self.over_rate),
            team_batting: unit(self.team_batting),
            team_obp: unit(self.team_obp),
            pitcher: self.pitcher.clamped(),
        }
    }

    pub fn is_finite(&self) -> bool {
        [
            self.time_avg,
            self.base_avg,
            self.allow,
            self.over_rate,
            self.team_batting,
            self.team_obp,
            self.pitcher.era,
            self.pitcher.baa,
        ]
        .iter()
        .all(|x| x.is_finite())
    }
}

#[cfg(test)]
pub(crate) fn average_team() -> TeamStat {
    TeamStat {
        time_avg: 4.0,
        base_avg: 4.2,
        allow: 3.8,
        over_rate: 0.5,
        team_batting: 0.270,
        team_obp: 0.340,
        pitcher: Pitcher {
            era: 4.0,
            baa: 0.250,
        },
    }
}
