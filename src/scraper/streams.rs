use ::scraper::Selector;
use tracing::{debug, instrument};
use url::Url;

use crate::cache::StreamCache;
use crate::error::{LiquipediaError, Result};
use crate::scraper::{self, Html};
use crate::transport::Transport;

const TWITCH_URL: &str = "https://twitch.tv";

/// Resolve a wiki stream page to the Twitch channel it embeds.
///
/// Cached references are answered without touching the network.
#[instrument(skip(transport, cache))]
pub(crate) async fn get_stream_url<T: Transport>(
    transport: &T,
    cache: &StreamCache,
    reference: &str,
) -> Result<String> {
    if let Some(url) = cache.get(reference) {
        debug!("stream url served from cache");
        return Ok(url);
    }

    let document = scraper::get_page(transport, reference).await?;
    let resolved = parse_stream_url(&document)?;
    Ok(cache.insert(reference, resolved))
}

fn parse_stream_url(document: &Html) -> Result<String> {
    let frame_selector = Selector::parse("iframe")?;
    let src = document
        .select(&frame_selector)
        .next()
        .and_then(|frame| frame.value().attr("src"))
        .ok_or(LiquipediaError::NotFound {
            context: "no stream frame present",
        })?;

    // Relative and protocol-relative sources resolve against the wiki.
    let embed = Url::parse(scraper::BASE_URL)
        .and_then(|base| base.join(src))
        .map_err(|e| LiquipediaError::InvalidReference {
            reference: src.to_string(),
            source: e,
        })?;
    let channel = embed
        .query_pairs()
        .find(|(key, _)| key == "channel")
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default();

    Ok(format!("{TWITCH_URL}/{channel}"))
}
