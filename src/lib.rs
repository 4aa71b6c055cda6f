//! Scrape Dota 2 esports data (matches, tournaments, live streams) from
//! [Liquipedia](https://liquipedia.net/dota2).
//!
//! Start with [`LiquipediaClient`].

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub(crate) mod scraper;
pub mod transport;

pub use cache::StreamCache;
pub use client::LiquipediaClient;
pub use config::{ClientConfig, PageLayout};
pub use error::{LiquipediaError, Result};
pub use model::*;
pub use transport::{HeaderInjector, HttpTransport, PageRequest, Transport};
