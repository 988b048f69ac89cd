//! Deriv tick-history client
//!
//! Fetches OHLC candles over the Deriv WebSocket API. Each fetch opens a
//! fresh connection, sends one `ticks_history` request in candle style, and
//! waits for the matching reply; there is no subscription.

use crate::models::market::{Candle, DerivReply, TicksHistoryRequest};
use crate::upstream::UpstreamError;
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{debug, warn};

/// Deriv WebSocket client
pub struct DerivClient {
    endpoint: String,
    app_id: String,
    timeout: Duration,
}

impl DerivClient {
    /// Create a new Deriv client
    ///
    /// # Arguments
    ///
    /// * `endpoint` - WebSocket endpoint, e.g. "wss://ws.derivws.com/websockets/v3"
    /// * `app_id` - Deriv application id appended to the connection URL
    /// * `timeout` - Overall fetch timeout in seconds
    pub fn new(endpoint: String, app_id: String, timeout: u64) -> Self {
        Self {
            endpoint,
            app_id,
            timeout: Duration::from_secs(timeout),
        }
    }

    fn connection_url(&self) -> String {
        format!("{}?app_id={}", self.endpoint, self.app_id)
    }

    /// Fetch the most recent `count` candles for a symbol
    ///
    /// # Errors
    ///
    /// Returns UpstreamError when the connection fails, the API reports an
    /// error (e.g. an invalid symbol), the socket closes before a candles
    /// reply arrives, or the whole exchange exceeds the configured timeout.
    pub async fn fetch_candles(
        &self,
        symbol: &str,
        granularity: u32,
        count: usize,
    ) -> Result<Vec<Candle>, UpstreamError> {
        match tokio::time::timeout(self.timeout, self.fetch_candles_inner(symbol, granularity, count))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(UpstreamError::Protocol(format!(
                "Deriv request timed out after {}s",
                self.timeout.as_secs()
            ))),
        }
    }

    async fn fetch_candles_inner(
        &self,
        symbol: &str,
        granularity: u32,
        count: usize,
    ) -> Result<Vec<Candle>, UpstreamError> {
        let url = self.connection_url();
        debug!("Connecting to Deriv at {}", self.endpoint);

        let (socket, _response) = connect_async(&url)
            .await
            .map_err(|e| UpstreamError::Connect(e.to_string()))?;
        let (mut sink, mut stream) = socket.split();

        const REQ_ID: u32 = 1;
        let request = TicksHistoryRequest::candles(symbol, granularity, count, REQ_ID);
        let payload = serde_json::to_string(&request)
            .map_err(|e| UpstreamError::Protocol(e.to_string()))?;
        sink.send(Message::Text(payload.into()))
            .await
            .map_err(|e| UpstreamError::Protocol(e.to_string()))?;

        while let Some(frame) = stream.next().await {
            let message = frame.map_err(|e| UpstreamError::Protocol(e.to_string()))?;
            match message {
                Message::Text(text) => {
                    let reply: DerivReply = serde_json::from_str(text.as_str())
                        .map_err(|e| UpstreamError::Decode(e.to_string()))?;

                    // a frame for some other request; keep waiting
                    if reply.req_id.is_some_and(|id| id != REQ_ID) {
                        debug!(
                            "Ignoring unrelated frame: msg_type={:?}",
                            reply.msg_type
                        );
                        continue;
                    }

                    if let Some(error) = reply.error {
                        warn!("Deriv API error {}: {}", error.code, error.message);
                        return Err(if error.code == "AuthorizationRequired" {
                            UpstreamError::Auth(error.message)
                        } else {
                            UpstreamError::Api(format!("{}: {}", error.code, error.message))
                        });
                    }

                    if let Some(rows) = reply.candles {
                        let _ = sink.send(Message::Close(None)).await;
                        if rows.is_empty() {
                            return Err(UpstreamError::Empty);
                        }
                        debug!("Fetched {} candles for {}", rows.len(), symbol);
                        return Ok(rows.into_iter().map(Candle::from).collect());
                    }

                    // unrelated frame (e.g. a ping reply); keep waiting
                }
                Message::Ping(_) | Message::Pong(_) => {}
                Message::Close(_) => {
                    return Err(UpstreamError::Protocol(
                        "connection closed before a candles reply arrived".to_string(),
                    ));
                }
                _ => {}
            }
        }

        Err(UpstreamError::Protocol(
            "connection ended without a candles reply".to_string(),
        ))
    }
}
