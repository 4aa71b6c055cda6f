use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::EnumString;

/// All tournaments from the portal: upcoming first, then ongoing, then complete.
pub type TournamentList = Vec<Tournament>;

/// A single tournament row from the tournaments portal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tournament {
    pub name: String,
    pub status: TournamentStatus,
    pub tier: u32,
    /// `None` when the portal shows no parseable date range.
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub prize_pool: String,
    pub participants: u32,
    pub location: String,
}

/// The portal section a tournament was listed under.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TournamentStatus {
    Upcoming,
    Ongoing,
    Complete,
}
