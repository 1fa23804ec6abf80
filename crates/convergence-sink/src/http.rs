use std::time::Duration;

use async_trait::async_trait;
use convergence_core::{config::DashboardConfig, DashboardEvent};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{error::SinkError, sink::DashboardSink};

/// Pushes events to a Dashing-compatible dashboard.
///
/// Wire: `POST {base_url}/widgets/{event}` with body
/// `{ "auth_token": "...", "points": [...], "updatedAt": ... }`.
pub struct HttpSink {
    client: reqwest::Client,
    base_url: String,
    auth_token: String,
}

impl HttpSink {
    pub fn new(config: &DashboardConfig) -> Result<Self, SinkError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            auth_token: config.auth_token.clone(),
        })
    }

    fn widget_url(&self, event: &str) -> String {
        format!("{}/widgets/{}", self.base_url, event)
    }
}

/// Event payload with the dashboard auth token folded in.
fn build_body(event: &DashboardEvent, auth_token: &str) -> Result<Value, SinkError> {
    let mut body = event.payload()?;
    if let Value::Object(ref mut map) = body {
        map.insert(
            "auth_token".to_string(),
            Value::String(auth_token.to_string()),
        );
    }
    Ok(body)
}

#[async_trait]
impl DashboardSink for HttpSink {
    fn name(&self) -> &str {
        "http"
    }

    async fn send(&self, event: &DashboardEvent) -> Result<(), SinkError> {
        let url = self.widget_url(&event.name);
        let body = build_body(event, &self.auth_token)?;

        debug!(%url, points = event.points.len(), "pushing dashboard event");

        let resp = self.client.post(&url).json(&body).send().await?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            let text = resp.text().await.unwrap_or_default();
            warn!(status, body = %text, "dashboard API error");
            return Err(SinkError::Api {
                status,
                message: text,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convergence_core::Point;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// One-shot HTTP server: captures the raw request and answers with `status_line`.
    async fn serve_once(status_line: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = sock.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                let text = String::from_utf8_lossy(&buf).to_string();
                if let Some(head_end) = text.find("\r\n\r\n") {
                    let content_length = text[..head_end]
                        .lines()
                        .find_map(|l| {
                            let lower = l.to_ascii_lowercase();
                            lower
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap_or(0))
                        })
                        .unwrap_or(0);
                    if buf.len() >= head_end + 4 + content_length {
                        break;
                    }
                }
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-length: 6\r\nconnection: close\r\n\r\nnope!!"
            );
            sock.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&buf).to_string()
        });
        (format!("http://{addr}"), handle)
    }

    fn config(url: String) -> DashboardConfig {
        DashboardConfig {
            url,
            auth_token: "tok-123".to_string(),
            timeout_secs: 5,
        }
    }

    #[test]
    fn body_carries_token_and_points() {
        let ev = DashboardEvent::new("convergence", vec![Point::new(7, 1.25)]);
        let body = build_body(&ev, "tok-123").unwrap();
        assert_eq!(body["auth_token"], "tok-123");
        assert_eq!(body["points"][0]["x"], 7);
        assert_eq!(body["points"][0]["y"], 1.25);
    }

    #[test]
    fn widget_url_strips_trailing_slash() {
        let sink = HttpSink::new(&config("http://dash:3030/".to_string())).unwrap();
        assert_eq!(sink.widget_url("convergence"), "http://dash:3030/widgets/convergence");
    }

    #[tokio::test]
    async fn posts_event_to_widget_endpoint() {
        let (url, server) = serve_once("200 OK").await;
        let sink = HttpSink::new(&config(url)).unwrap();
        let ev = DashboardEvent::new("convergence", vec![Point::new(1, 0.5)]);

        sink.send(&ev).await.unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /widgets/convergence HTTP/1.1"));
        assert!(request.contains(r#""auth_token":"tok-123""#));
        assert!(request.contains(r#""points":[{"x":1,"y":0.5}]"#));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let (url, server) = serve_once("401 Unauthorized").await;
        let sink = HttpSink::new(&config(url)).unwrap();
        let ev = DashboardEvent::new("convergence", Vec::new());

        let err = sink.send(&ev).await.unwrap_err();
        assert!(matches!(err, SinkError::Api { status: 401, .. }));
        server.await.unwrap();
    }
}
