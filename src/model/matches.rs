use chrono::{DateTime, Utc};
use serde::Serialize;
use strum_macros::EnumString;

/// A list of upcoming and ongoing matches, in listing order.
pub type MatchList = Vec<Match>;

/// A single upcoming or ongoing match from the matches listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub team_one: Team,
    pub team_two: Team,
    /// Series length, `0` when the listing shows no usable "BoN" label.
    pub best_of: u32,
    pub status: MatchStatus,
    pub start_time: DateTime<Utc>,
    /// Canonical stream URL, empty when the match has no resolvable stream.
    pub stream: String,
    pub tournament_name: String,
}

/// Team info as shown on either side of a match row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Team {
    pub short_name: String,
    pub full_name: String,
}

/// Where a match stands relative to the time it was scraped.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumString, strum_macros::Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum MatchStatus {
    Upcoming,
    Ongoing,
    Complete,
}
