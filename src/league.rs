use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum League {
    #[serde(rename = "NPB")]
    Npb,
    #[serde(rename = "KBO")]
    Kbo,
}

/// Fixed per-league model parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeagueConstants {
    /// Standard deviation of the combined run total in the normal-sum model.
    pub std_dev: f64,
    /// Negative binomial dispersion.
    pub nb_r: f64,
    /// Run environment multiplier applied to every expected score.
    pub multiplier: f64,
    pub weights: Weights,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub monte_carlo: f64,
    pub negative_binomial: f64,
    pub poisson: f64,
}

impl Weights {
    pub fn blend(&self, monte_carlo: f64, negative_binomial: f64, poisson: f64) -> f64 {
        debug_assert!((self.sum() - 1.0).abs() < 1e-9);
        monte_carlo * self.monte_carlo
            + negative_binomial * self.negative_binomial
            + poisson * self.poisson
    }

    pub fn sum(&self) -> f64 {
        self.monte_carlo + self.negative_binomial + self.poisson
    }
}

const NPB: LeagueConstants = LeagueConstants {
    std_dev: 2.3,
    nb_r: 9.0,
    multiplier: 0.95,
    weights: Weights {
        monte_carlo: 0.5,
        negative_binomial: 0.35,
        poisson: 0.15,
    },
};

// KBO plays in a higher scoring, higher variance run environment.
const KBO: LeagueConstants = LeagueConstants {
    std_dev: 2.8,
    nb_r: 7.5,
    multiplier: 1.05,
    weights: Weights {
        monte_carlo: 0.6,
        negative_binomial: 0.25,
        poisson: 0.15,
    },
};

impl League {
    #[cfg(test)]
    pub const ALL: [League; 2] = [League::Npb, League::Kbo];

    pub fn constants(self) -> &'static LeagueConstants {
        match self {
            League::Npb => &NPB,
            League::Kbo => &KBO,
        }
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            League::Npb => "NPB",
            League::Kbo => "KBO",
        })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown league {0:?} (expected NPB or KBO)")]
pub struct UnknownLeague(String);

impl FromStr for League {
    type Err = UnknownLeague;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NPB" | "1" => Ok(League::Npb),
            "KBO" | "2" => Ok(League::Kbo),
            _ => Err(UnknownLeague(s.to_string())),
        }
    }
}
