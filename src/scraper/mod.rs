pub(crate) mod matches;
pub(crate) mod streams;
pub(crate) mod tournaments;

pub(crate) use ::scraper::Html;
use ::scraper::{ElementRef, Selector};
use serde::Deserialize;
use tracing::debug;

use crate::error::{LiquipediaError, Result};
use crate::transport::{PageRequest, Transport};

pub(crate) const BASE_URL: &str = "https://liquipedia.net/dota2";

pub(crate) const MATCHES_URL: &str = "https://liquipedia.net/dota2/api.php?action=parse&origin=*&format=json&page=Liquipedia:Upcoming_and_ongoing_matches";
pub(crate) const TOURNAMENTS_URL: &str =
    "https://liquipedia.net/dota2/api.php?action=parse&origin=*&format=json&page=Portal:Tournaments";

/// Address of the wiki page that embeds the player for a Twitch channel.
pub(crate) fn twitch_stream_page(channel: &str) -> String {
    format!("{BASE_URL}/Special:Stream/twitch/{channel}")
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    parse: Option<ParsedPage>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ParsedPage {
    text: PageText,
}

#[derive(Debug, Deserialize)]
struct PageText {
    #[serde(rename = "*")]
    markup: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: String,
    #[serde(default)]
    info: String,
}

/// Fetch a page through the wiki's `action=parse` API and parse the rendered
/// markup it carries.
pub(crate) async fn get_wiki_document<T: Transport>(transport: &T, url: &str) -> Result<Html> {
    let body = transport.fetch(PageRequest::get(url)).await?;
    let markup = decode_envelope(url, &body)?;
    Ok(Html::parse_document(&markup))
}

fn decode_envelope(url: &str, body: &[u8]) -> Result<String> {
    let response: ApiResponse =
        serde_json::from_slice(body).map_err(|e| LiquipediaError::Envelope {
            url: url.to_owned(),
            source: e,
        })?;

    match (response.parse, response.error) {
        (Some(page), _) => Ok(page.text.markup),
        (None, Some(error)) => Err(LiquipediaError::Api {
            code: error.code,
            info: error.info,
        }),
        (None, None) => Err(LiquipediaError::Envelope {
            url: url.to_owned(),
            source: <serde_json::Error as serde::de::Error>::missing_field("parse"),
        }),
    }
}

/// Fetch a regular (non-API) wiki page and parse it as an HTML document.
pub(crate) async fn get_page<T: Transport>(transport: &T, url: &str) -> Result<Html> {
    let body = transport.fetch(PageRequest::get(url)).await?;
    let body = String::from_utf8(body).map_err(|e| LiquipediaError::Encoding {
        url: url.to_owned(),
        source: e,
    })?;
    debug!(url, bytes = body.len(), "parsed page");
    Ok(Html::parse_document(&body))
}

/// Concatenated text of `element` and all its descendants.
pub(crate) fn element_text(element: &ElementRef) -> String {
    element.text().collect()
}

/// Text of the first element matching `selector` inside `element`, with
/// surrounding whitespace trimmed. Returns an empty string if nothing matches.
pub(crate) fn select_text(element: &ElementRef, selector: &Selector) -> String {
    element
        .select(selector)
        .next()
        .map(|e| element_text(&e).trim().to_string())
        .unwrap_or_default()
}

pub(crate) fn child_elements<'a>(element: &ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}
