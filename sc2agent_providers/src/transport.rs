use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::error::TransportError;

/// Status and raw body of an HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Sends an authenticated JSON POST and hands back whatever the server said.
///
/// Only failures below HTTP (connect, TLS, timeouts, broken streams) are
/// errors here; interpreting the status code is the caller's job.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &Value,
    ) -> Result<HttpReply, TransportError>;
}

#[async_trait]
impl<T: ChatTransport + ?Sized> ChatTransport for Arc<T> {
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &Value,
    ) -> Result<HttpReply, TransportError> {
        (**self).post_json(url, api_key, body).await
    }
}

/// `reqwest`-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Option<Duration>,
}

impl HttpTransport {
    /// Without a timeout, requests wait as long as the underlying client allows.
    pub fn new(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            timeout,
        })
    }

    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        api_key: &str,
        body: &Value,
    ) -> Result<HttpReply, TransportError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dify::{ClientConfig, DifyMultiTurnClient, Example};
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Same client as [`HttpTransport::new`], minus any proxy from the environment.
    fn local_transport(timeout: Option<Duration>) -> HttpTransport {
        let mut builder = Client::builder().no_proxy();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        HttpTransport {
            client: builder.build().unwrap(),
            timeout,
        }
    }

    /// Answers one request with `status` and `body`, yielding the raw request text.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}/v1", listener.local_addr().unwrap());

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\n\
                 content-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            request
        });
        (base, server)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let read = socket.read(&mut chunk).await.unwrap();
            if read == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..read]);

            let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let length = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + length {
                break;
            }
        }
        String::from_utf8(buf).unwrap()
    }

    /// Lowercased request line and headers, plus the parsed JSON body.
    fn split(request: &str) -> (Vec<String>, Value) {
        let (head, body) = request.split_once("\r\n\r\n").unwrap();
        let lines = head.lines().map(str::to_lowercase).collect();
        (lines, serde_json::from_str(body).unwrap())
    }

    const DIFY_REPLY: &str = r#"{"answer": "Pylon", "conversation_id": "c9"}"#;
    const BUSY: &str = r#"{"code": "busy"}"#;

    #[tokio::test]
    async fn posts_json_with_bearer_auth() {
        let (base, server) = serve_once("200 OK", r#"{"answer": "hi"}"#).await;
        let transport = local_transport(None);

        let url = format!("{base}/chat-messages");
        let reply = transport
            .post_json(&url, "app-k", &json!({ "query": "q" }))
            .await
            .unwrap();
        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, r#"{"answer": "hi"}"#);
        assert!(reply.is_ok());

        let (head, body) = split(&server.await.unwrap());
        assert_eq!(head[0], "post /v1/chat-messages http/1.1");
        assert!(head.iter().any(|h| h == "authorization: bearer app-k"));
        assert!(head.iter().any(|h| h == "content-type: application/json"));
        assert_eq!(body, json!({ "query": "q" }));
    }

    #[tokio::test]
    async fn error_status_is_returned_not_raised() {
        let (base, server) = serve_once("503 Service Unavailable", BUSY).await;
        let transport = local_transport(None);

        let url = format!("{base}/chat-messages");
        let reply = transport
            .post_json(&url, "app-k", &json!({}))
            .await
            .unwrap();
        assert_eq!(reply.status, 503);
        assert_eq!(reply.body, BUSY);
        assert!(!reply.is_ok());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn dify_client_request_reaches_chat_messages() {
        let (base, server) = serve_once("200 OK", DIFY_REPLY).await;
        let config = ClientConfig::new(
            "gpt-4o-mini",
            "app-live",
            base,
            0.0,
            "You are a StarCraft II commander",
            Example::new("Status?", "All units ready"),
        );
        let mut client = DifyMultiTurnClient::with_transport(config, local_transport(None));

        assert_eq!(client.query("Minerals: 400").await.unwrap(), "Pylon");
        assert_eq!(client.conversation_id(), Some("c9"));

        let (head, body) = split(&server.await.unwrap());
        assert!(head[0].starts_with("post /v1/chat-messages "));
        assert!(head.iter().any(|h| h == "authorization: bearer app-live"));
        assert_eq!(body["query"], "Minerals: 400");
        assert_eq!(body["response_mode"], "blocking");
        assert_eq!(body["inputs"]["system"], "You are a StarCraft II commander");
    }

    #[tokio::test]
    async fn timeout_surfaces_as_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/v1/chat-messages", listener.local_addr().unwrap());
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });

        let transport = local_transport(Some(Duration::from_millis(100)));
        let err = transport
            .post_json(&url, "app-k", &json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Http(ref e) if e.is_timeout()));
        assert_eq!(transport.timeout(), Some(Duration::from_millis(100)));
        server.abort();
    }

    #[test]
    fn new_keeps_configured_timeout() {
        let transport = HttpTransport::new(Some(Duration::from_secs(30))).unwrap();
        assert_eq!(transport.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(HttpTransport::new(None).unwrap().timeout(), None);
    }
}
