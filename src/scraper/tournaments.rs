use ::scraper::{ElementRef, Selector};
use chrono::{Datelike, NaiveDate};
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::config::PageLayout;
use crate::error::{LiquipediaError, Result};
use crate::model::{Tournament, TournamentList, TournamentStatus};
use crate::scraper::{self, element_text, select_text, Html};
use crate::transport::Transport;

const DATE_FORMAT: &str = "%b %d, %Y";
const DATE_FORMAT_ALT: &str = "%B %d, %Y";

#[instrument(skip(transport, layout))]
pub(crate) async fn get_tournaments<T: Transport>(
    transport: &T,
    layout: &PageLayout,
) -> Result<TournamentList> {
    let document = scraper::get_wiki_document(transport, scraper::TOURNAMENTS_URL).await?;
    let tournaments = parse_tournaments(&document, layout)?;
    debug!(count = tournaments.len(), "parsed tournaments portal");
    Ok(tournaments)
}

/// Read every portal section, tagging rows with the status configured for
/// the section's position. Sections past the configured ones are ignored.
pub(crate) fn parse_tournaments(document: &Html, layout: &PageLayout) -> Result<TournamentList> {
    let section_selector = Selector::parse(".divTable")?;
    let sections = document.select(&section_selector).collect_vec();

    if layout.strict && sections.len() < layout.tournament_sections.len() {
        return Err(LiquipediaError::LayoutMismatch {
            page: "tournaments",
            expected: layout.tournament_sections.len(),
            found: sections.len(),
        });
    }

    let row_selector = Selector::parse(".divRow")?;
    let mut tournaments = vec![];
    for (section, status) in sections.iter().zip(&layout.tournament_sections) {
        for row in section.select(&row_selector) {
            tournaments.push(parse_tournament(&row, *status)?);
        }
    }
    Ok(tournaments)
}

fn parse_tournament(row: &ElementRef, status: TournamentStatus) -> Result<Tournament> {
    let tier_selector = Selector::parse(".Tier a")?;
    let tier_text: String = row
        .select(&tier_selector)
        .map(|a| element_text(&a))
        .collect();
    let tier = parse_tier(&tier_text);

    let name_selector = Selector::parse(".Tournament b a")?;
    let name = select_text(row, &name_selector);

    let date_selector = Selector::parse(".Date")?;
    let (start_date, end_date) = parse_date_range(&select_text(row, &date_selector));

    let prize_selector = Selector::parse(".Prize")?;
    let prize_pool = select_text(row, &prize_selector);

    let participants_selector = Selector::parse(".PlayerNumber")?;
    let participants = parse_participants(&select_text(row, &participants_selector));

    let location_selector = Selector::parse(".Location")?;
    let location = select_text(row, &location_selector);

    Ok(Tournament {
        name,
        status,
        tier,
        start_date,
        end_date,
        prize_pool,
        participants,
        location,
    })
}

/// `"Tier 1"` -> 1. The number is the second word; anything else is 0.
pub(crate) fn parse_tier(text: &str) -> u32 {
    text.split_whitespace()
        .nth(1)
        .and_then(|t| t.parse().ok())
        .unwrap_or(0)
}

/// `"16\u{a0}teams"` -> 16.
pub(crate) fn parse_participants(text: &str) -> u32 {
    text.replace('\u{a0}', " ")
        .split_whitespace()
        .next()
        .and_then(|t| t.parse().ok())
        .unwrap_or(0)
}

/// Parse the portal's date column into a start and end date.
///
/// Handles `Oct 20 - 27, 2024`, `Sep 30 - Oct 06, 2024`,
/// `Dec 28, 2024 - Jan 05, 2025` and single days like `Oct 20, 2024`.
/// Anything else (`TBA`, month-only dates) yields `(None, None)`.
pub(crate) fn parse_date_range(text: &str) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let text = text.replace('\u{a0}', " ");
    let text = text.trim();

    let Some((start, end)) = text.split_once(" - ") else {
        let date = parse_date(text);
        return (date, date);
    };
    let (start, end) = (start.trim(), end.trim());

    // Same-month ranges drop the month from the end date.
    let end_date = parse_date(end).or_else(|| {
        let (day, year) = end.split_once(',')?;
        let month = start.split_whitespace().next()?;
        parse_date(&format!("{month} {}, {}", day.trim(), year.trim()))
    });
    let Some(end_date) = end_date else {
        return (None, None);
    };

    let start_date = parse_date(start).or_else(|| {
        let date = parse_date(&format!("{start}, {}", end_date.year()))?;
        if date > end_date {
            date.with_year(end_date.year() - 1)
        } else {
            Some(date)
        }
    });
    (start_date, Some(end_date))
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(text, DATE_FORMAT_ALT))
        .ok()
}
