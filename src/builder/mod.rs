//! Builder API for assembling a calculator from its parts.
//!
//! `CalculatorBuilder` takes an arithmetic provider and a history ledger,
//! or derives both from `Settings`. `rate_feed` does the same for the
//! optional live rate feed.

pub mod calculator;
pub mod error;

pub use calculator::CalculatorBuilder;
pub use error::BuildError;

use crate::config::Settings;
use crate::feed::{RateFeed, WebSocketSource};

/// Create the rate feed described by `settings`, if a feed URL is set.
///
/// # Example
///
/// ```
/// use keycalc::builder::rate_feed;
/// use keycalc::config::Settings;
///
/// assert!(rate_feed(&Settings::default()).is_none());
///
/// let settings = Settings {
///     rate_feed_url: Some("ws://localhost:12668/".to_string()),
///     ..Settings::default()
/// };
/// let (feed, source) = rate_feed(&settings).unwrap();
/// assert_eq!(source.url(), "ws://localhost:12668/");
/// assert_eq!(feed.latest(), None);
/// ```
pub fn rate_feed(settings: &Settings) -> Option<(RateFeed, WebSocketSource)> {
    let url = settings.rate_feed_url.as_deref()?;
    Some((
        RateFeed::new(settings.reconnect_delay()),
        WebSocketSource::new(url),
    ))
}
