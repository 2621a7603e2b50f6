//! Live exchange-rate feed.
//!
//! A `QuoteSource` yields raw text messages. `RateFeed` reads them,
//! keeps the latest bid price in a `watch` channel and reconnects after
//! a fixed delay whenever the connection ends. Messages that do not
//! carry a usable bid are skipped.

mod websocket;

pub use websocket::WebSocketSource;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Default pause between a lost connection and the next attempt.
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FeedError {
    #[error("Could not connect to rate feed: {0}")]
    Connect(String),

    #[error("Rate feed connection failed: {0}")]
    Stream(String),
}

/// Raw messages from one connection. The stream ends when the connection closes.
pub type QuoteStream = BoxStream<'static, Result<String, FeedError>>;

/// Something that can open a quote connection.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    async fn connect(&self) -> Result<QuoteStream, FeedError>;
}

/// Extract the bid price from a quote message.
///
/// The message must be a JSON array whose first element has a non-zero
/// `Bid`, given either as a number or a numeric string.
///
/// # Example
///
/// ```rust
/// use keycalc::feed::parse_bid;
///
/// assert_eq!(parse_bid(r#"[{"Bid": 34.12, "Ask": 34.15}]"#), Some(34.12));
/// assert_eq!(parse_bid(r#"[{"Bid": "34.12"}]"#), Some(34.12));
/// assert_eq!(parse_bid(r#"{"Bid": 34.12}"#), None);
/// ```
pub fn parse_bid(text: &str) -> Option<f64> {
    let value: Value = serde_json::from_str(text).ok()?;
    let bid = value.as_array()?.first()?.get("Bid")?;

    let price = match bid {
        Value::Number(number) => number.as_f64()?,
        Value::String(raw) => raw.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    (price.is_finite() && price != 0.0).then_some(price)
}

/// Latest bid price from a live feed.
#[derive(Debug)]
pub struct RateFeed {
    updates: watch::Sender<Option<f64>>,
    reconnect_delay: Duration,
}

impl Default for RateFeed {
    fn default() -> Self {
        Self::new(DEFAULT_RECONNECT_DELAY)
    }
}

impl RateFeed {
    pub fn new(reconnect_delay: Duration) -> Self {
        let (updates, _) = watch::channel(None);
        Self {
            updates,
            reconnect_delay,
        }
    }

    /// `None` until the first quote arrives, and again after a connection error.
    pub fn latest(&self) -> Option<f64> {
        *self.updates.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<f64>> {
        self.updates.subscribe()
    }

    /// Consume `source` forever, reconnecting after every disconnect.
    ///
    /// There is no backoff and no attempt limit. Run it on its own task
    /// and abort the task to stop.
    pub async fn run(&self, source: &dyn QuoteSource) {
        loop {
            if let Err(e) = self.run_once(source).await {
                warn!(error = %e, "rate feed error");
                self.updates.send_replace(None);
            }
            debug!(delay = ?self.reconnect_delay, "rate feed reconnecting");
            tokio::time::sleep(self.reconnect_delay).await;
        }
    }

    /// Read one connection until it closes.
    pub async fn run_once(&self, source: &dyn QuoteSource) -> Result<(), FeedError> {
        let mut messages = source.connect().await?;

        while let Some(message) = messages.next().await {
            match parse_bid(&message?) {
                Some(bid) => {
                    self.updates.send_replace(Some(bid));
                }
                None => debug!("ignoring rate message without a bid"),
            }
        }
        Ok(())
    }
}
