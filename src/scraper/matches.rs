use ::scraper::{ElementRef, Selector};
use chrono::{DateTime, Utc};
use itertools::Itertools;
use tracing::{debug, instrument, warn};

use crate::cache::StreamCache;
use crate::config::PageLayout;
use crate::error::{LiquipediaError, Result};
use crate::model::{Match, MatchList, MatchStatus, Team};
use crate::scraper::{self, child_elements, select_text, streams, twitch_stream_page, Html};
use crate::transport::Transport;

/// A match row as read from the listing, before its stream is resolved.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct MatchRow {
    pub team_one: Team,
    pub team_two: Team,
    pub best_of: u32,
    pub status: MatchStatus,
    pub start_time: DateTime<Utc>,
    pub twitch_channel: Option<String>,
    pub tournament_name: String,
}

impl MatchRow {
    fn into_match(self, stream: String) -> Match {
        Match {
            team_one: self.team_one,
            team_two: self.team_two,
            best_of: self.best_of,
            status: self.status,
            start_time: self.start_time,
            stream,
            tournament_name: self.tournament_name,
        }
    }
}

#[instrument(skip(transport, cache, layout))]
pub(crate) async fn get_matches<T: Transport>(
    transport: &T,
    cache: &StreamCache,
    layout: &PageLayout,
    max_start_time: DateTime<Utc>,
) -> Result<MatchList> {
    let now = Utc::now();
    let rows = {
        let document = scraper::get_wiki_document(transport, scraper::MATCHES_URL).await?;
        parse_match_rows(&document, layout, max_start_time, now)?
    };

    let mut matches = Vec::with_capacity(rows.len());
    for mut row in rows {
        let stream = match row.twitch_channel.take() {
            Some(channel) => resolve_stream(transport, cache, &channel).await,
            None => String::new(),
        };
        matches.push(row.into_match(stream));
    }

    debug!(count = matches.len(), "parsed match list");
    Ok(matches)
}

async fn resolve_stream<T: Transport>(transport: &T, cache: &StreamCache, channel: &str) -> String {
    let reference = twitch_stream_page(channel);
    match streams::get_stream_url(transport, cache, &reference).await {
        Ok(url) => url,
        Err(e) => {
            warn!(channel, error = %e, "leaving stream empty");
            String::new()
        }
    }
}

/// Read every row of the configured listing group that starts no later than
/// `max_start_time`, in document order.
pub(crate) fn parse_match_rows(
    document: &Html,
    layout: &PageLayout,
    max_start_time: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<Vec<MatchRow>> {
    let list_selector = Selector::parse(".matches-list")?;
    let groups = document
        .select(&list_selector)
        .last()
        .and_then(|list| child_elements(&list).last())
        .map(|container| child_elements(&container).collect_vec())
        .unwrap_or_default();

    let Some(group) = groups.get(layout.match_group_index) else {
        if layout.strict {
            return Err(LiquipediaError::LayoutMismatch {
                page: "matches",
                expected: layout.match_group_index + 1,
                found: groups.len(),
            });
        }
        debug!(groups = groups.len(), "match group not present");
        return Ok(vec![]);
    };

    let row_selector = Selector::parse(".infobox_matches_content")?;
    let mut rows = vec![];
    for element in group.select(&row_selector) {
        if let Some(row) = parse_match_row(&element, max_start_time, now)? {
            rows.push(row);
        }
    }
    Ok(rows)
}

/// Rows without a usable start time, or starting after `max_start_time`,
/// yield `None`.
fn parse_match_row(
    element: &ElementRef,
    max_start_time: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<Option<MatchRow>> {
    let timer_selector = Selector::parse(".timer-object")?;
    let timer = element.select(&timer_selector).next();

    let start_time = timer
        .and_then(|t| t.value().attr("data-timestamp"))
        .and_then(|ts| ts.trim().parse::<i64>().ok())
        .and_then(|ts| DateTime::from_timestamp(ts, 0));
    let Some(start_time) = start_time else {
        debug!("skipping match row without timestamp");
        return Ok(None);
    };
    if start_time > max_start_time {
        return Ok(None);
    }
    let status = if start_time < now {
        MatchStatus::Ongoing
    } else {
        MatchStatus::Upcoming
    };

    let twitch_channel = timer
        .and_then(|t| t.value().attr("data-stream-twitch"))
        .map(|c| c.to_string());

    let team_left_selector = Selector::parse(".team-left")?;
    let team_right_selector = Selector::parse(".team-right")?;
    let team_one = parse_team(element.select(&team_left_selector).next())?;
    let team_two = parse_team(element.select(&team_right_selector).next())?;

    let best_of_selector = Selector::parse(".versus abbr")?;
    let best_of = parse_best_of(&select_text(element, &best_of_selector));

    let tournament_selector = Selector::parse(".league-icon-small-image > a")?;
    let tournament_name = element
        .select(&tournament_selector)
        .next()
        .and_then(|a| a.value().attr("title"))
        .unwrap_or_default()
        .to_string();

    Ok(Some(MatchRow {
        team_one,
        team_two,
        best_of,
        status,
        start_time,
        twitch_channel,
        tournament_name,
    }))
}

fn parse_team(side: Option<ElementRef>) -> Result<Team> {
    let name_selector = Selector::parse(".team-template-text > a")?;
    let container = side.and_then(|s| child_elements(&s).next());
    let short_name = container
        .map(|c| select_text(&c, &name_selector))
        .unwrap_or_default();
    let full_name = container
        .and_then(|c| c.value().attr("data-highlightingclass"))
        .map(|n| n.to_string())
        .unwrap_or_else(|| short_name.clone());
    Ok(Team {
        short_name,
        full_name,
    })
}

/// `"Bo3"` -> 3. Anything unparseable is 0.
pub(crate) fn parse_best_of(text: &str) -> u32 {
    let text = text.trim();
    text.strip_prefix("Bo")
        .unwrap_or(text)
        .trim()
        .parse()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::scraper::testing::FixtureTransport;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
    }

    fn row(
        left: (&str, Option<&str>),
        right: (&str, Option<&str>),
        timer_attrs: &str,
        best_of: &str,
        tournament: &str,
    ) -> String {
        let team = |side: &str, (short, full): (&str, Option<&str>)| {
            let full = full
                .map(|f| format!(r#" data-highlightingclass="{f}""#))
                .unwrap_or_default();
            format!(
                r#"<td class="{side}"><span class="team-template-team-short"{full}><span class="team-template-image-icon"></span><span class="team-template-text"><a href="/dota2/{short}" title="{short}">{short}</a></span></span></td>"#
            )
        };
        format!(
            r#"<table class="wikitable wikitable-striped infobox_matches_content"><tbody>
                <tr>{}<td class="versus"><div>vs</div><div><abbr title="Best of">{best_of}</abbr></div></td>{}</tr>
                <tr><td colspan="3" class="match-filler"><div>
                    <span class="match-countdown"><span class="timer-object timer-object-countdown-only"{timer_attrs}>October 18, 2026</span></span>
                    <div class="league-icon-small-image"><a href="/dota2/Event" title="{tournament}"><img src="/icon.png"></a></div>
                </div></td></tr>
            </tbody></table>"#,
            team("team-left", left),
            team("team-right", right),
        )
    }

    fn timed_row(start: DateTime<Utc>, name: &str) -> String {
        row(
            (name, Some(name)),
            ("OG", None),
            &format!(r#" data-timestamp="{}""#, start.timestamp()),
            "Bo3",
            "Fixture Cup",
        )
    }

    fn listing(groups: &[Vec<String>]) -> String {
        let groups = groups
            .iter()
            .map(|rows| format!("<div>{}</div>", rows.concat()))
            .join("");
        format!(
            r#"<div class="mw-parser-output"><div class="matches-list"><div class="switch-pill-container">filters</div><div>{groups}</div></div></div>"#
        )
    }

    #[test]
    fn test_row_fields() {
        let html = listing(&[vec![row(
            ("TS", Some("Team Spirit")),
            ("OG", None),
            r#" data-timestamp="1792324800" data-stream-twitch="dota2ti""#,
            "Bo5",
            "The International 2026",
        )]]);
        let document = Html::parse_document(&html);
        let rows = parse_match_rows(&document, &PageLayout::default(), now() + Duration::days(365), now())
            .unwrap();

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(
            row.team_one,
            Team {
                short_name: "TS".to_string(),
                full_name: "Team Spirit".to_string()
            }
        );
        assert_eq!(row.team_two.short_name, "OG");
        assert_eq!(row.team_two.full_name, "OG");
        assert_eq!(row.best_of, 5);
        assert_eq!(row.start_time, DateTime::from_timestamp(1792324800, 0).unwrap());
        assert_eq!(row.twitch_channel.as_deref(), Some("dota2ti"));
        assert_eq!(row.tournament_name, "The International 2026");
    }

    #[test]
    fn test_horizon_filter_keeps_order() {
        let t1 = now() + Duration::hours(1);
        let t2 = now() + Duration::hours(2);
        let t3 = now() + Duration::hours(3);
        let html = listing(&[vec![
            timed_row(t3, "C"),
            timed_row(t1, "A"),
            timed_row(t2, "B"),
        ]]);
        let document = Html::parse_document(&html);
        let rows = parse_match_rows(&document, &PageLayout::default(), t2, now()).unwrap();

        let names = rows.iter().map(|r| r.team_one.short_name.as_str()).collect_vec();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_status_from_start_time() {
        let html = listing(&[vec![
            timed_row(now() - Duration::minutes(30), "Live"),
            timed_row(now() + Duration::minutes(30), "Soon"),
        ]]);
        let document = Html::parse_document(&html);
        let rows = parse_match_rows(&document, &PageLayout::default(), now() + Duration::days(1), now())
            .unwrap();

        assert_eq!(rows[0].status, MatchStatus::Ongoing);
        assert_eq!(rows[1].status, MatchStatus::Upcoming);
        assert!(rows.iter().all(|r| r.status != MatchStatus::Complete));
    }

    #[test]
    fn test_row_without_timestamp_is_dropped() {
        let html = listing(&[vec![
            timed_row(now(), "A"),
            row(("X", None), ("Y", None), "", "Bo1", "TBD Cup"),
            row(("Z", None), ("W", None), r#" data-timestamp="soon""#, "Bo1", "TBD Cup"),
            timed_row(now(), "B"),
        ]]);
        let document = Html::parse_document(&html);
        let rows = parse_match_rows(&document, &PageLayout::default(), now() + Duration::days(1), now())
            .unwrap();

        let names = rows.iter().map(|r| r.team_one.short_name.as_str()).collect_vec();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_only_configured_group_is_read() {
        let html = listing(&[
            vec![timed_row(now(), "All")],
            vec![timed_row(now(), "Tier1")],
        ]);
        let document = Html::parse_document(&html);
        let max = now() + Duration::days(1);

        let rows = parse_match_rows(&document, &PageLayout::default(), max, now()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].team_one.short_name, "All");

        let layout = PageLayout {
            match_group_index: 1,
            ..PageLayout::default()
        };
        let rows = parse_match_rows(&document, &layout, max, now()).unwrap();
        assert_eq!(rows[0].team_one.short_name, "Tier1");
    }

    #[test]
    fn test_missing_group() {
        let document = Html::parse_document("<div class=\"mw-parser-output\"><p>No matches</p></div>");
        let max = now() + Duration::days(1);
        let rows = parse_match_rows(&document, &PageLayout::default(), max, now()).unwrap();
        assert!(rows.is_empty());

        let strict = PageLayout {
            strict: true,
            ..PageLayout::default()
        };
        let err = parse_match_rows(&document, &strict, max, now()).unwrap_err();
        assert!(matches!(
            err,
            LiquipediaError::LayoutMismatch {
                page: "matches",
                expected: 1,
                found: 0
            }
        ));
    }

    #[test]
    fn test_parse_best_of() {
        assert_eq!(parse_best_of("Bo3"), 3);
        assert_eq!(parse_best_of(" Bo1 "), 1);
        assert_eq!(parse_best_of(""), 0);
        assert_eq!(parse_best_of("Best of three"), 0);
        assert_eq!(parse_best_of("Bo"), 0);
    }

    #[tokio::test]
    async fn test_stream_failure_leaves_stream_empty() {
        let start = Utc::now() + Duration::hours(2);
        let html = listing(&[vec![
            row(
                ("TS", None),
                ("OG", None),
                &format!(r#" data-timestamp="{}" data-stream-twitch="offline""#, start.timestamp()),
                "Bo3",
                "Fixture Cup",
            ),
            row(
                ("LGD", None),
                ("EG", None),
                &format!(r#" data-timestamp="{}" data-stream-twitch="live""#, start.timestamp()),
                "Bo3",
                "Fixture Cup",
            ),
        ]]);
        let transport = FixtureTransport::default()
            .with_wiki_page(scraper::MATCHES_URL, &html)
            .with_page(twitch_stream_page("offline"), "<html><body>offline</body></html>")
            .with_page(
                twitch_stream_page("live"),
                r#"<iframe src="https://player.twitch.tv/?channel=live_channel"></iframe>"#,
            );
        let cache = StreamCache::new();

        let matches = get_matches(
            &transport,
            &cache,
            &PageLayout::default(),
            Utc::now() + Duration::days(1),
        )
        .await
        .unwrap();

        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].stream, "");
        assert_eq!(matches[1].stream, "https://twitch.tv/live_channel");
        assert_eq!(matches[1].status, MatchStatus::Upcoming);
    }

    #[tokio::test]
    async fn test_listing_fetch_failure_aborts() {
        let transport = FixtureTransport::default();
        let cache = StreamCache::new();
        let err = get_matches(&transport, &cache, &PageLayout::default(), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, LiquipediaError::UnexpectedStatus { .. }));
    }
}
