use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a user touched a movie
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InteractionType {
    View,
    Select,
    Recommend,
    Rate,
}

impl InteractionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionType::View => "view",
            InteractionType::Select => "select",
            InteractionType::Recommend => "recommend",
            InteractionType::Rate => "rate",
        }
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(InteractionType::View),
            "select" => Ok(InteractionType::Select),
            "recommend" => Ok(InteractionType::Recommend),
            "rate" => Ok(InteractionType::Rate),
            other => Err(format!(
                "interaction_type must be one of [view, select, recommend, rate], got '{other}'"
            )),
        }
    }
}

/// A durable user-movie interaction record
///
/// At most one record exists per (user_id, movie_id); a later write for the
/// same pair updates the record in place rather than duplicating it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Interaction {
    pub user_id: i64,
    pub movie_id: i64,
    pub interaction_type: InteractionType,
    pub rating: Option<f64>,
    /// Unix epoch seconds
    pub timestamp: i64,
}
