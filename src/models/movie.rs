use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Release date wire format, e.g. `2024-Jan-05`.
///
/// Compatibility contract with existing clients; do not change.
pub const DATE_FORMAT: &str = "%Y-%b-%d";

/// A catalog movie, read-only to the serving pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, sqlx::FromRow)]
pub struct Movie {
    /// Catalog identifier, shared with the trained models' item space
    pub id: i64,
    pub title: String,
    pub genre: String,
    /// Release date; absent for some catalog entries
    pub date: Option<NaiveDate>,
}

impl Movie {
    /// Formats the release date for the wire, `None` when unknown
    pub fn formatted_date(&self) -> Option<String> {
        self.date.map(|d| d.format(DATE_FORMAT).to_string())
    }
}
