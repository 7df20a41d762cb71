//! Poll worker results and operator console commands.

use shared::domain::{SourceMode, StatusField, StatusToken, StatusTriple};

/// Results flowing from the poll worker back to the foreground loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Statuses(StatusTriple),
    FallbackEngaged { embed_url: String },
    FallbackCleared,
    Info(String),
}

/// One line typed at the operator console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorCommand {
    StartDuration {
        hours: String,
        minutes: String,
        seconds: String,
    },
    StartClock {
        hours: String,
        minutes: String,
        seconds: String,
    },
    Hold,
    Resume,
    Scrub,
    Reset,
    Mission(String),
    HideMission(bool),
    Toggle(StatusField),
    SetManual(StatusField, StatusToken),
    Mode(SourceMode),
    Source(String),
    Cells {
        range: String,
        weather: String,
        vehicle: String,
    },
    Timezone(String),
    AutoHolds(Vec<u32>),
    Status,
    Refresh,
    Reload,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  start H M S        count down for a duration
  clock H M S        count down to a wall-clock time (24h)
  hold | resume | scrub | reset
  mission <name>     set the mission name
  hide-mission on|off
  toggle <field>     flip a manual status (range, weather, vehicle)
  set <field> <GO|NO-GO|N/A>
  mode sheet|buttons
  source <csv url>   set the published sheet link
  cells <range> <weather> <vehicle>
  timezone <local|UTC|+HH:MM>
  auto-holds <secs>...
  status | refresh | reload | help | quit";

impl OperatorCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err("empty command".into());
        };
        let args: Vec<&str> = words.collect();

        let command = match verb.to_ascii_lowercase().as_str() {
            "start" | "clock" => {
                if args.len() > 3 {
                    return Err(format!("{verb} takes at most three fields: H M S"));
                }
                let field = |idx: usize| args.get(idx).map(|s| s.to_string()).unwrap_or_default();
                let (hours, minutes, seconds) = (field(0), field(1), field(2));
                if verb.eq_ignore_ascii_case("start") {
                    Self::StartDuration {
                        hours,
                        minutes,
                        seconds,
                    }
                } else {
                    Self::StartClock {
                        hours,
                        minutes,
                        seconds,
                    }
                }
            }
            "hold" => Self::Hold,
            "resume" => Self::Resume,
            "scrub" => Self::Scrub,
            "reset" => Self::Reset,
            "mission" => Self::Mission(rest_of(line)),
            "hide-mission" => match args.first().map(|s| s.to_ascii_lowercase()).as_deref() {
                Some("on" | "true" | "yes") => Self::HideMission(true),
                Some("off" | "false" | "no") => Self::HideMission(false),
                _ => return Err("usage: hide-mission on|off".into()),
            },
            "toggle" => Self::Toggle(field_arg(args.first().copied())?),
            "set" => {
                let field = field_arg(args.first().copied())?;
                if args.len() < 2 {
                    return Err("usage: set <field> <GO|NO-GO|N/A>".into());
                }
                Self::SetManual(field, manual_token(&args[1..].join(" "))?)
            }
            "mode" => {
                let raw = args.first().copied().unwrap_or_default();
                Self::Mode(
                    SourceMode::parse(raw).ok_or_else(|| format!("unknown mode '{raw}'"))?,
                )
            }
            "source" => Self::Source(rest_of(line)),
            "cells" => match args.as_slice() {
                [range, weather, vehicle] => Self::Cells {
                    range: range.to_string(),
                    weather: weather.to_string(),
                    vehicle: vehicle.to_string(),
                },
                _ => return Err("usage: cells <range> <weather> <vehicle>".into()),
            },
            "timezone" | "tz" => Self::Timezone(rest_of(line)),
            "auto-holds" => Self::AutoHolds(
                args.iter()
                    .map(|raw| {
                        raw.trim_end_matches(',')
                            .parse::<u32>()
                            .map_err(|_| format!("'{raw}' is not a number of seconds"))
                    })
                    .collect::<Result<_, _>>()?,
            ),
            "status" => Self::Status,
            "refresh" => Self::Refresh,
            "reload" => Self::Reload,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => return Err(format!("unknown command '{other}'; try 'help'")),
        };

        Ok(command)
    }
}

fn rest_of(line: &str) -> String {
    let trimmed = line.trim_start();
    trimmed
        .split_once(char::is_whitespace)
        .map(|(_, rest)| rest.trim().to_string())
        .unwrap_or_default()
}

fn field_arg(raw: Option<&str>) -> Result<StatusField, String> {
    let raw = raw.unwrap_or_default();
    StatusField::parse(raw).ok_or_else(|| format!("unknown field '{raw}'; use range, weather or vehicle"))
}

fn manual_token(raw: &str) -> Result<StatusToken, String> {
    StatusToken::parse_manual(raw).ok_or_else(|| format!("'{raw}' is not GO, NO-GO or N/A"))
}

#[cfg(test)]
#[path = "tests/events_tests.rs"]
mod tests;
