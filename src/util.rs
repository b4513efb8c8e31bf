use serde::{Deserialize, Serialize};
use std::ops::Add;

/// Floor for divisors and expected run totals.
pub fn floor(x: f64, min: f64) -> f64 {
    x.max(min)
}

/// Percentage of `hits` out of `trials`, in [0, 100].
#[allow(clippy::cast_precision_loss)]
pub fn percent(hits: usize, trials: usize) -> f64 {
    debug_assert!(hits <= trials);
    if trials == 0 {
        return 0.0;
    }
    hits as f64 / trials as f64 * 100.0
}

#[cfg(test)]
#[test]
fn test_percent() {
    use assert_approx_eq::assert_approx_eq;

    assert_approx_eq!(percent(0, 10), 0.0);
    assert_approx_eq!(percent(5, 10), 50.0);
    assert_approx_eq!(percent(10, 10), 100.0);
    assert_approx_eq!(percent(0, 0), 0.0);
}

// =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=   =^..^=

#[derive(Debug, Default, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct AwayHome<T> {
    pub away: T,
    pub home: T,
}

impl<T> AwayHome<T> {
    pub fn map<F, U>(&self, f: F) -> AwayHome<U>
    where
        F: Fn(&T) -> U,
    {
        AwayHome {
            away: f(&self.away),
            home: f(&self.home),
        }
    }

    /// Pairs each side with the opposing side's value.
    pub fn versus(&self) -> AwayHome<(&T, &T)> {
        AwayHome {
            away: (&self.away, &self.home),
            home: (&self.home, &self.away),
        }
    }
}

impl<T: Add<Output = T> + Copy> AwayHome<T> {
    pub fn total(&self) -> T {
        self.away + self.home
    }
}
