//! Campus enumeration.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Campuses a study group can meet at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Campus {
    West,
    East,
    #[serde(rename = "Winter Park")]
    WinterPark,
    Osceola,
    Poinciana,
    #[serde(rename = "Lake Nona")]
    LakeNona,
    Downtown,
    Online,
}

impl Campus {
    pub const ALL: [Campus; 8] = [
        Campus::West,
        Campus::East,
        Campus::WinterPark,
        Campus::Osceola,
        Campus::Poinciana,
        Campus::LakeNona,
        Campus::Downtown,
        Campus::Online,
    ];

    /// Display name, also the persisted and wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Campus::West => "West",
            Campus::East => "East",
            Campus::WinterPark => "Winter Park",
            Campus::Osceola => "Osceola",
            Campus::Poinciana => "Poinciana",
            Campus::LakeNona => "Lake Nona",
            Campus::Downtown => "Downtown",
            Campus::Online => "Online",
        }
    }
}

impl fmt::Display for Campus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Campus {
    type Err = ValidationError;

    /// Case-insensitive; tolerates surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Campus::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::UnknownCampus(s.to_string()))
    }
}
