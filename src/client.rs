use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::instrument;

use crate::cache::StreamCache;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::model::*;
use crate::scraper;
use crate::transport::{HeaderInjector, HttpTransport, Transport};

/// The main entry point for reading esports data from Liquipedia.
///
/// `LiquipediaClient` wraps a [`Transport`] (by default a [`reqwest::Client`]
/// that sends the configured `User-Agent`) and a [`StreamCache`] shared by all
/// of its calls.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> liquipedia_scraper::Result<()> {
/// use liquipedia_scraper::{ClientConfig, LiquipediaClient};
///
/// let config = ClientConfig::default().with_user_agent("my-bot/1.0 (me@example.org)");
/// let client = LiquipediaClient::with_config(config);
/// let matches = client.get_matches().await?;
/// println!("Found {} matches", matches.len());
/// # Ok(())
/// # }
/// ```
pub struct LiquipediaClient<T = HeaderInjector<HttpTransport>> {
    transport: T,
    cache: Arc<StreamCache>,
    config: ClientConfig,
}

impl LiquipediaClient {
    /// Create a new client with default settings.
    pub fn new() -> Self {
        Self::with_config(ClientConfig::default())
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create a new client using the provided [`reqwest::Client`].
    ///
    /// Use this when you need to configure timeouts, proxies, etc. The
    /// configured `User-Agent` is still set on every request.
    pub fn with_client(client: reqwest::Client, config: ClientConfig) -> Self {
        let transport = HeaderInjector::wiki_defaults(HttpTransport::new(client), &config.user_agent);
        Self::with_transport(transport, config)
    }
}

impl<T: Transport> LiquipediaClient<T> {
    /// Create a client over any [`Transport`], with its own empty cache.
    pub fn with_transport(transport: T, config: ClientConfig) -> Self {
        Self {
            transport,
            cache: Arc::new(StreamCache::new()),
            config,
        }
    }

    /// Share `cache` with this client in place of its own.
    pub fn with_cache(mut self, cache: Arc<StreamCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &Arc<StreamCache> {
        &self.cache
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Fetch upcoming and ongoing matches starting within the configured
    /// default horizon (a year unless changed).
    #[instrument(skip(self))]
    pub async fn get_matches(&self) -> Result<MatchList> {
        let max_start_time = horizon_end(Utc::now(), self.config.default_horizon_days);
        self.get_matches_until(max_start_time).await
    }

    /// Fetch upcoming and ongoing matches starting no later than `max_start_time`.
    ///
    /// Only a failure to fetch or decode the listing is an error. Rows without
    /// a start time are skipped, and a stream that cannot be resolved is left
    /// empty.
    #[instrument(skip(self))]
    pub async fn get_matches_until(&self, max_start_time: DateTime<Utc>) -> Result<MatchList> {
        scraper::matches::get_matches(
            &self.transport,
            &self.cache,
            &self.config.layout,
            max_start_time,
        )
        .await
    }

    /// Fetch the tournaments portal: upcoming, then ongoing, then complete.
    #[instrument(skip(self))]
    pub async fn get_tournaments(&self) -> Result<TournamentList> {
        scraper::tournaments::get_tournaments(&self.transport, &self.config.layout).await
    }

    /// Resolve a wiki stream page to its canonical `https://twitch.tv/<channel>` URL.
    #[instrument(skip(self))]
    pub async fn get_stream_url(&self, stream_page: &str) -> Result<String> {
        scraper::streams::get_stream_url(&self.transport, &self.cache, stream_page).await
    }
}

/// `now` plus `days`, saturating at the representable range.
fn horizon_end(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    Duration::try_days(days)
        .and_then(|horizon| now.checked_add_signed(horizon))
        .unwrap_or(if days < 0 {
            DateTime::<Utc>::MIN_UTC
        } else {
            DateTime::<Utc>::MAX_UTC
        })
}

impl Default for LiquipediaClient {
    fn default() -> Self {
        Self::new()
    }
}
