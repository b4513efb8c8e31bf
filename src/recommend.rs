use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Over,
    Under,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Over => "over",
            Side::Under => "under",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub side: Side,
    /// 3.0, 3.5, 4.0 or 5.0.
    pub rating: f64,
    /// Probability of the recommended side, as a percentage.
    pub shown_prob: f64,
    pub label: String,
}

/// Maps a blended over probability to a star rating. Exactly 50% leans over.
pub fn recommend(final_prob: f64) -> Recommendation {
    let (side, strength, shown_prob) = if final_prob >= 50.0 {
        (Side::Over, final_prob - 50.0, final_prob)
    } else {
        (Side::Under, 50.0 - final_prob, 100.0 - final_prob)
    };
    let (rating, wording) = if strength >= 20.0 {
        (5.0, "Extremely strong")
    } else if strength >= 10.0 {
        (4.0, "Strong")
    } else if strength >= 5.0 {
        (3.5, "Favored")
    } else {
        (3.0, "Slight lean")
    };
    Recommendation {
        side,
        rating,
        shown_prob,
        label: format!("{}: {} (probability {:.1}%)", wording, side, shown_prob),
    }
}

/// Draws a rating out of five, e.g. `★★★½☆`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn stars(rating: f64) -> String {
    let rating = rating.max(0.0).min(5.0);
    let full = rating.trunc() as usize;
    let half = rating.fract() >= 0.5;
    let empty = 5 - rating.ceil() as usize;
    let mut out = "★".repeat(full);
    if half {
        out.push('½');
    }
    out.push_str(&"☆".repeat(empty));
    out
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", stars(self.rating), self.label)
    }
}

// =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=

/// Coarse three-way call used by the form front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Over,
    Under,
    TossUp,
}

impl Verdict {
    pub fn from_prob(final_prob: f64) -> Verdict {
        if final_prob >= 55.0 {
            Verdict::Over
        } else if final_prob <= 45.0 {
            Verdict::Under
        } else {
            Verdict::TossUp
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::Over => "Lean towards the OVER",
            Verdict::Under => "Lean towards the UNDER",
            Verdict::TossUp => "Toss-up: weigh other factors before betting",
        })
    }
}
