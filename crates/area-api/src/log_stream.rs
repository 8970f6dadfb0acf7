//! Live applet log stream over WebSocket.
//!
//! The server publishes each applet's output on `ws(s)://<host>/logs/{id}`.
//! [`LogStream::connect`] opens the socket and spawns a read loop that
//! forwards text frames as [`LogStreamEvent`]s until the server closes the
//! connection or the stream is dropped.

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use url::Url;

use area_core::prelude::*;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Capacity of the event channel between the read loop and the consumer.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// What the read loop reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogStreamEvent {
    /// One text frame; may contain several newline-separated lines.
    Message(String),
    /// The server closed the stream.
    Closed,
    /// The connection failed while reading.
    Error(String),
}

/// WebSocket URL of an applet's log stream.
///
/// With `override_base` set (e.g. `ws://logs.example.com`) the applet id is
/// appended to it. Otherwise the URL is derived from the API base: same host,
/// `http` becomes `ws`, `https` becomes `wss`, and the path is `/logs/{id}`
/// at the root.
pub fn logs_url(api_base: &Url, override_base: Option<&str>, applet_id: &str) -> Result<String> {
    if let Some(base) = override_base.filter(|base| !base.trim().is_empty()) {
        let base = base.trim().trim_end_matches('/');
        Url::parse(base).map_err(|_| Error::invalid_url(base))?;
        return Ok(format!("{base}/{applet_id}"));
    }

    let scheme = match api_base.scheme() {
        "https" | "wss" => "wss",
        _ => "ws",
    };
    let host = api_base
        .host_str()
        .ok_or_else(|| Error::invalid_url(api_base.as_str()))?;
    let host = if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]")
    } else {
        host.to_string()
    };
    let authority = match api_base.port() {
        Some(port) => format!("{host}:{port}"),
        None => host,
    };
    Ok(format!("{scheme}://{authority}/logs/{applet_id}"))
}

/// An open log stream.
///
/// Dropping it closes the socket.
pub struct LogStream {
    url: String,
    events: mpsc::Receiver<LogStreamEvent>,
    close_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for LogStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogStream").field("url", &self.url).finish()
    }
}

impl LogStream {
    /// Connect to `url` and start forwarding frames.
    pub async fn connect(url: &str) -> Result<Self> {
        let (ws_stream, _response) = connect_async(url)
            .await
            .map_err(|e| Error::log_stream(format!("failed to connect to {url}: {e}")))?;
        info!("Log stream connected: {}", url);

        let (event_tx, events) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (close_tx, close_rx) = oneshot::channel();
        let handle = tokio::spawn(run_read_loop(ws_stream, event_tx, close_rx));

        Ok(Self {
            url: url.to_string(),
            events,
            close_tx: Some(close_tx),
            handle: Some(handle),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Next event, or `None` once the read loop has exited.
    pub async fn recv(&mut self) -> Option<LogStreamEvent> {
        self.events.recv().await
    }

    /// Send a Close frame and stop the read loop.
    pub async fn close(mut self) {
        self.request_close();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                debug!("Log stream task ended abnormally: {}", e);
            }
        }
    }

    fn request_close(&mut self) {
        if let Some(tx) = self.close_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for LogStream {
    fn drop(&mut self) {
        self.request_close();
    }
}

async fn run_read_loop(
    ws_stream: WsStream,
    event_tx: mpsc::Sender<LogStreamEvent>,
    mut close_rx: oneshot::Receiver<()>,
) {
    let (mut ws_sink, mut ws_stream) = ws_stream.split();

    loop {
        tokio::select! {
            frame = ws_stream.next() => {
                let event = match frame {
                    Some(Ok(WsMessage::Text(text))) => LogStreamEvent::Message(text.as_str().to_string()),
                    Some(Ok(WsMessage::Binary(bytes))) => {
                        LogStreamEvent::Message(String::from_utf8_lossy(&bytes).into_owned())
                    }
                    Some(Ok(WsMessage::Close(_))) | None => {
                        debug!("Log stream closed by server");
                        let _ = event_tx.send(LogStreamEvent::Closed).await;
                        return;
                    }
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => {
                        warn!("Log stream read error: {}", e);
                        let _ = event_tx.send(LogStreamEvent::Error(e.to_string())).await;
                        return;
                    }
                };
                if event_tx.send(event).await.is_err() {
                    send_close(&mut ws_sink).await;
                    return;
                }
            }

            _ = &mut close_rx => {
                debug!("Log stream closing");
                send_close(&mut ws_sink).await;
                return;
            }
        }
    }
}

async fn send_close(ws_sink: &mut SplitSink<WsStream, WsMessage>) {
    let _ = ws_sink.send(WsMessage::Close(None)).await;
    let _ = ws_sink.close().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    #[test]
    fn test_logs_url_derived_from_api_base() {
        assert_eq!(
            logs_url(&base("http://localhost:8080/api"), None, "42").unwrap(),
            "ws://localhost:8080/logs/42"
        );
        assert_eq!(
            logs_url(&base("https://area.example.com/api"), None, "a1").unwrap(),
            "wss://area.example.com/logs/a1"
        );
    }

    #[test]
    fn test_logs_url_override() {
        assert_eq!(
            logs_url(&base("http://localhost:8080/api"), Some("ws://logs:9000/logs/"), "7").unwrap(),
            "ws://logs:9000/logs/7"
        );
        // Blank override falls back to derivation
        assert_eq!(
            logs_url(&base("http://localhost:8080/api"), Some("  "), "7").unwrap(),
            "ws://localhost:8080/logs/7"
        );
        assert!(logs_url(&base("http://localhost:8080"), Some("not a url"), "7").is_err());
    }

    #[tokio::test]
    async fn test_connect_refused_is_log_stream_error() {
        // Port 9 (discard) is essentially never listening locally
        let result = LogStream::connect("ws://127.0.0.1:9/logs/1").await;
        assert!(matches!(result, Err(Error::LogStream { .. })));
    }
}
