use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One of the three readiness indicators shown on the Go/No-Go board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusField {
    Range,
    Weather,
    Vehicle,
}

impl StatusField {
    pub const ALL: [StatusField; 3] = [Self::Range, Self::Weather, Self::Vehicle];

    pub fn label(self) -> &'static str {
        match self {
            Self::Range => "Range",
            Self::Weather => "Weather",
            Self::Vehicle => "Vehicle",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "range" => Some(Self::Range),
            "weather" => Some(Self::Weather),
            "vehicle" => Some(Self::Vehicle),
            _ => None,
        }
    }
}

impl fmt::Display for StatusField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusToken {
    Go,
    NoGo,
    #[default]
    NotAvailable,
    Error,
}

impl StatusToken {
    /// Normalizes free-form cell text. Only letters are compared, so
    /// "no go", "NO-GO" and "NoGo" all land on [`StatusToken::NoGo`].
    pub fn normalize(raw: &str) -> Self {
        let letters: String = raw
            .trim()
            .chars()
            .filter(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_uppercase())
            .collect();

        match letters.as_str() {
            "GO" => Self::Go,
            "NOGO" => Self::NoGo,
            "ERROR" => Self::Error,
            _ => Self::NotAvailable,
        }
    }

    /// Strict parse for operator-entered manual values: only GO, NO-GO and
    /// N/A (in any spelling [`Self::normalize`] accepts) are board values.
    pub fn parse_manual(raw: &str) -> Option<Self> {
        let letters: String = raw
            .chars()
            .filter(char::is_ascii_alphabetic)
            .map(|c| c.to_ascii_uppercase())
            .collect();
        match Self::normalize(raw) {
            Self::NotAvailable if letters != "NA" => None,
            Self::Error => None,
            token => Some(token),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Go => "GO",
            Self::NoGo => "NO-GO",
            Self::NotAvailable => "N/A",
            Self::Error => "ERROR",
        }
    }

    pub fn is_go(self) -> bool {
        self == Self::Go
    }

    /// Manual toggle: GO flips to NO-GO, anything else becomes GO.
    pub fn toggled(self) -> Self {
        if self.is_go() {
            Self::NoGo
        } else {
            Self::Go
        }
    }
}

impl fmt::Display for StatusToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StatusToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StatusToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::normalize(&raw))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusTriple {
    pub range: StatusToken,
    pub weather: StatusToken,
    pub vehicle: StatusToken,
}

impl StatusTriple {
    pub fn new(range: StatusToken, weather: StatusToken, vehicle: StatusToken) -> Self {
        Self {
            range,
            weather,
            vehicle,
        }
    }

    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn error() -> Self {
        Self::new(StatusToken::Error, StatusToken::Error, StatusToken::Error)
    }

    pub fn get(&self, field: StatusField) -> StatusToken {
        match field {
            StatusField::Range => self.range,
            StatusField::Weather => self.weather,
            StatusField::Vehicle => self.vehicle,
        }
    }

    pub fn set(&mut self, field: StatusField, token: StatusToken) {
        match field {
            StatusField::Range => self.range = token,
            StatusField::Weather => self.weather = token,
            StatusField::Vehicle => self.vehicle = token,
        }
    }
}

impl fmt::Display for StatusTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RANGE: {} | WEATHER: {} | VEHICLE: {}",
            self.range, self.weather, self.vehicle
        )
    }
}

/// Where the status triple comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceMode {
    #[default]
    Spreadsheet,
    Buttons,
}

impl SourceMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "spreadsheet" | "sheet" => Some(Self::Spreadsheet),
            "buttons" | "manual" => Some(Self::Buttons),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
