use serde::Deserialize;

use crate::model::TournamentStatus;

pub(crate) const DEFAULT_USER_AGENT: &str = concat!("liquipedia-scraper/", env!("CARGO_PKG_VERSION"));
const DEFAULT_HORIZON_DAYS: i64 = 365;

/// Settings for a [`LiquipediaClient`](crate::LiquipediaClient).
///
/// Every field has a default, so a partial config file deserializes fine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Sent as `User-Agent` on every request. Liquipedia asks API consumers
    /// to identify themselves with a project name and contact.
    pub user_agent: String,
    /// How far ahead [`get_matches`](crate::LiquipediaClient::get_matches) looks.
    pub default_horizon_days: i64,
    pub layout: PageLayout,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            default_horizon_days: DEFAULT_HORIZON_DAYS,
            layout: PageLayout::default(),
        }
    }
}

impl ClientConfig {
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_layout(mut self, layout: PageLayout) -> Self {
        self.layout = layout;
        self
    }
}

/// Maps the positional structure of the wiki pages onto categories.
///
/// The matches listing groups rows by tier filter and the tournaments portal
/// renders one table per status; both are only distinguishable by position.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    /// Index of the unfiltered group in the matches listing.
    pub match_group_index: usize,
    /// Status assigned to each portal section, by position.
    pub tournament_sections: Vec<TournamentStatus>,
    /// Fail with [`LayoutMismatch`](crate::LiquipediaError::LayoutMismatch)
    /// instead of returning fewer records when a page has fewer groups or
    /// sections than configured.
    pub strict: bool,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            match_group_index: 0,
            tournament_sections: vec![
                TournamentStatus::Upcoming,
                TournamentStatus::Ongoing,
                TournamentStatus::Complete,
            ],
            strict: false,
        }
    }
}
