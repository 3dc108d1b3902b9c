//! Push channel carrying task status events.

use async_trait::async_trait;
use futures::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::{header::COOKIE, HeaderValue};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::error::{Error, Result};
use crate::session::Session;

/// Source of raw event messages.
///
/// The channel multiplexes events for every task of the project; filtering
/// is the watcher's job.
#[async_trait]
pub trait TaskChannel: Send {
    /// Next message, or `Ok(None)` once the peer closed the channel.
    async fn recv(&mut self) -> Result<Option<String>>;

    /// Close the channel. Closing an already closed channel is not an error.
    async fn close(&mut self) -> Result<()>;
}

/// [`TaskChannel`] over a WebSocket authorised with a session cookie.
#[derive(Debug)]
pub struct WebSocketChannel {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WebSocketChannel {
    /// Open the channel at `url`, sending the session cookie in the handshake.
    pub async fn connect(url: &str, session: &Session) -> Result<Self> {
        let mut request = url
            .into_client_request()
            .map_err(|e| Error::channel(format!("invalid channel URL '{url}': {e}")))?;
        let cookie = HeaderValue::from_str(&session.cookie_header())
            .map_err(|e| Error::channel(format!("invalid session cookie: {e}")))?;
        request.headers_mut().insert(COOKIE, cookie);

        let (stream, _response) = connect_async(request)
            .await
            .map_err(|e| Error::channel(format!("handshake with {url} failed: {e}")))?;
        tracing::debug!(url, "Push channel open");
        Ok(Self { stream })
    }
}

#[async_trait]
impl TaskChannel for WebSocketChannel {
    async fn recv(&mut self) -> Result<Option<String>> {
        while let Some(message) = self.stream.next().await {
            match message.map_err(|e| Error::channel(e.to_string()))? {
                Message::Text(text) => return Ok(Some(text.as_str().to_string())),
                Message::Binary(bytes) => {
                    return Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
                },
                Message::Close(_) => return Ok(None),
                // ping/pong are answered by tungstenite itself
                _ => continue,
            }
        }
        Ok(None)
    }

    async fn close(&mut self) -> Result<()> {
        match self.stream.close(None).await {
            Ok(())
            | Err(tokio_tungstenite::tungstenite::Error::ConnectionClosed)
            | Err(tokio_tungstenite::tungstenite::Error::AlreadyClosed) => Ok(()),
            Err(e) => Err(Error::channel(format!("close failed: {e}"))),
        }
    }
}
