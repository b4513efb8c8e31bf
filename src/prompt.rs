use crate::league::League;
use crate::matchup::{Comparison, MatchContext, Team, TimePeriod};
use crate::probability::Simulator;
use crate::report::ComparisonReport;
use crate::stats::{Pitcher, TeamStat};
use rand::Rng;
use std::io::{self, BufRead, Write};
use tracing::{error, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// Input ended; the session is over.
    #[error("input closed")]
    Cancelled,
    #[error(transparent)]
    Io(#[from] io::Error),
}

type Result<T> = std::result::Result<T, PromptError>;

struct Bounds {
    default: Option<f64>,
    min: Option<f64>,
    max: Option<f64>,
}

impl Bounds {
    const NON_NEGATIVE: Bounds = Bounds {
        default: None,
        min: Some(0.0),
        max: None,
    };

    fn fraction(default: Option<f64>) -> Bounds {
        Bounds {
            default,
            min: Some(0.0),
            max: Some(1.0),
        }
    }
}

/// Line-oriented console front end.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Console<R, W> {
        Console { input, output }
    }

    fn line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Err(PromptError::Cancelled);
        }
        Ok(buf.trim().to_string())
    }

    fn number(&mut self, prompt: &str, bounds: &Bounds) -> Result<f64> {
        loop {
            let raw = self.line(prompt)?;
            let value = match (raw.is_empty(), bounds.default) {
                (true, Some(default)) => return Ok(default),
                _ => match raw.parse::<f64>() {
                    Ok(value) if value.is_finite() => value,
                    _ => {
                        writeln!(self.output, "Please enter a valid number.")?;
                        continue;
                    }
                },
            };
            if let Some(min) = bounds.min.filter(|min| value < *min) {
                writeln!(self.output, "Value cannot be less than {}.", min)?;
                continue;
            }
            if let Some(max) = bounds.max.filter(|max| value > *max) {
                writeln!(self.output, "Value cannot be greater than {}.", max)?;
                continue;
            }
            return Ok(value);
        }
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(self.line(prompt)?.to_lowercase().starts_with('y'))
    }

    fn team(&mut self, name: &str, period: TimePeriod, home: bool) -> Result<TeamStat> {
        loop {
            writeln!(
                self.output,
                "\n[{} ({}) stats, {} games]",
                name,
                if home { "home" } else { "away" },
                period
            )?;
            let team = TeamStat {
                time_avg: self.number(
                    &format!("Runs per game ({} games): ", period),
                    &Bounds::NON_NEGATIVE,
                )?,
                base_avg: self.number("Runs per game (season): ", &Bounds::NON_NEGATIVE)?,
                allow: self.number("Runs allowed per game: ", &Bounds::NON_NEGATIVE)?,
                over_rate: self.number(
                    "Over rate (%): ",
                    &Bounds {
                        default: None,
                        min: Some(0.0),
                        max: Some(100.0),
                    },
                )? / 100.0,
                team_batting: self.number(
                    "Team batting average [0.270]: ",
                    &Bounds::fraction(Some(0.270)),
                )?,
                team_obp: self.number(
                    "Team on-base percentage [0.340]: ",
                    &Bounds::fraction(Some(0.340)),
                )?,
                pitcher: Pitcher {
                    era: self.number("Starting pitcher ERA: ", &Bounds::NON_NEGATIVE)?,
                    baa: self.number(
                        "Starting pitcher batting average against [0.250]: ",
                        &Bounds::fraction(Some(0.250)),
                    )?,
                },
            };

            if team.suspicious_form() {
                warn!(time_avg = %team.time_avg, base_avg = %team.base_avg, "suspicious period average");
                writeln!(
                    self.output,
                    "Warning: {} game average ({}) is well above the season average ({})",
                    period, team.time_avg, team.base_avg
                )?;
                if !self.confirm("Is this correct? (y/n): ")? {
                    continue;
                }
            }
            return Ok(team);
        }
    }

    fn matchup(&mut self) -> Result<MatchContext> {
        let league = match self.line("\nLeague (1. NPB / 2. KBO): ")?.as_str() {
            "1" => League::Npb,
            other => other.parse().unwrap_or(League::Kbo),
        };
        let time_period = if self.line("Time of game (1. day / 2. night): ")? == "1" {
            TimePeriod::Day
        } else {
            TimePeriod::Night
        };
        let home_name = self.line("\nHome team: ")?;
        let away_name = self.line("Away team: ")?;
        let target = self.number("Target total: ", &Bounds::NON_NEGATIVE)?;

        let home = self.team(&home_name, time_period, true)?;
        let away = self.team(&away_name, time_period, false)?;

        Ok(MatchContext {
            league,
            time_period,
            target,
            away: Team {
                name: away_name,
                stats: away,
            },
            home: Team {
                name: home_name,
                stats: home,
            },
        })
    }

    /// Prompts for matchups until the user stops or input ends.
    pub fn run<G: Rng + ?Sized>(&mut self, simulator: &Simulator, rng: &mut G) -> io::Result<()> {
        writeln!(self.output, "=== NPB/KBO totals analyzer ===")?;
        writeln!(self.output, "Simulations per model: {}", simulator.simulations)?;
        writeln!(self.output, "- Full model: pitching and team offense included")?;
        writeln!(self.output, "- Baseline model: scoring averages only")?;

        loop {
            match self.round(simulator, rng) {
                Ok(true) => {}
                Ok(false) => {
                    writeln!(self.output, "Thanks for using the analyzer!")?;
                    return Ok(());
                }
                Err(PromptError::Cancelled) => {
                    info!("input closed, ending session");
                    writeln!(self.output)?;
                    return Ok(());
                }
                Err(PromptError::Io(err)) => return Err(err),
            }
        }
    }

    fn round<G: Rng + ?Sized>(&mut self, simulator: &Simulator, rng: &mut G) -> Result<bool> {
        let context = self.matchup()?;
        match Comparison::run(&context, simulator, rng) {
            Ok(comparison) => {
                let report = ComparisonReport {
                    context: &context,
                    comparison: &comparison,
                };
                writeln!(self.output, "\n{}", report)?;
                self.confirm("\nAnalyze another game? (y/n): ")
            }
            Err(err) => {
                error!(%err, "score estimation failed");
                writeln!(self.output, "\nError: {}", err)?;
                self.confirm("Continue? (y/n): ")
            }
        }
    }
}
