use std::fmt;

use serde::{Deserialize, Serialize};

/// The two schools this calendar serves. Everything school-scoped is keyed
/// by one of these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum School {
    Wlhs,
    Wvhs,
}

impl School {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "wlhs" => Some(School::Wlhs),
            "wvhs" => Some(School::Wvhs),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            School::Wlhs => "wlhs",
            School::Wvhs => "wvhs",
        }
    }
}

impl fmt::Display for School {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
