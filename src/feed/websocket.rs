//! WebSocket quote source.

use crate::feed::{FeedError, QuoteSource, QuoteStream};
use async_trait::async_trait;
use futures_util::StreamExt;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::info;

/// Reads quote messages from a `ws://` or `wss://` endpoint.
#[derive(Clone, Debug)]
pub struct WebSocketSource {
    url: String,
}

impl WebSocketSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl QuoteSource for WebSocketSource {
    async fn connect(&self) -> Result<QuoteStream, FeedError> {
        let (socket, _response) = connect_async(self.url.as_str())
            .await
            .map_err(|e| FeedError::Connect(e.to_string()))?;
        info!(url = %self.url, "rate feed connected");

        // Only text frames carry quotes; pings and binary frames are dropped.
        let messages = socket.filter_map(|message| async move {
            match message {
                Ok(Message::Text(text)) => Some(Ok(text)),
                Ok(_) => None,
                Err(e) => Some(Err(FeedError::Stream(e.to_string()))),
            }
        });
        Ok(messages.boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_endpoint_fails_to_connect() {
        let source = WebSocketSource::new("ws://127.0.0.1:1/");
        let result = source.connect().await;
        assert!(matches!(result, Err(FeedError::Connect(_))));
    }
}
