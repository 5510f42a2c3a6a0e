use crate::{
    delivery::config::DeliveryOptions,
    error::{MirrorError, Result},
};
use log::{error, info, warn};
use reqwest::{Url, header::CONTENT_TYPE};
use std::{fmt, time::Duration};
use tokio::task::JoinHandle;

/// Outcome of one delivery attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryReport {
    /// The collector answered with a success status
    Delivered { status: u16 },
    /// The collector answered with a non-success status
    Rejected { status: u16 },
    /// The request never got a response (refused, DNS, reset, ...)
    Failed { reason: String },
    /// No outcome within the grace period; the request was abandoned
    TimedOut { grace_ms: u64 },
}

impl DeliveryReport {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryReport::Delivered { .. })
    }
}

impl fmt::Display for DeliveryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryReport::Delivered { status } => write!(f, "delivered (HTTP {})", status),
            DeliveryReport::Rejected { status } => write!(f, "rejected (HTTP {})", status),
            DeliveryReport::Failed { reason } => write!(f, "failed: {}", reason),
            DeliveryReport::TimedOut { grace_ms } => write!(f, "no response within {} ms", grace_ms),
        }
    }
}

/// HTTP client posting mirrors to the collector
#[derive(Debug, Clone)]
pub struct DeliveryClient {
    client: reqwest::Client,
    endpoint: Url,
    grace_period: Duration,
}

impl DeliveryClient {
    /// Create a client, validating the configured endpoint
    pub fn new(options: DeliveryOptions) -> Result<Self> {
        let endpoint = Url::parse(&options.endpoint).map_err(|e| MirrorError::InvalidEndpoint {
            endpoint: options.endpoint.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(MirrorError::InvalidEndpoint {
                endpoint: options.endpoint,
                reason: format!("unsupported scheme '{}'", endpoint.scheme()),
            });
        }

        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            grace_period: options.grace_period,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// POST `body` once and report the outcome
    ///
    /// Only the status line is read; the response body is discarded.
    pub async fn deliver(&self, body: String) -> DeliveryReport {
        let bytes = body.len();
        let result = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await;

        match result {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    info!("Mirror sent to {} ({} bytes): {}", self.endpoint, bytes, status);
                    DeliveryReport::Delivered { status: status.as_u16() }
                } else {
                    warn!("Collector {} rejected mirror: {}", self.endpoint, status);
                    DeliveryReport::Rejected { status: status.as_u16() }
                }
            }
            Err(e) => {
                error!("Error sending mirror to {}: {}", self.endpoint, e);
                DeliveryReport::Failed { reason: e.to_string() }
            }
        }
    }

    /// Start delivering `body` in the background
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, body: String) -> DeliveryHandle {
        let client = self.clone();
        let task = tokio::spawn(async move { client.deliver(body).await });
        DeliveryHandle {
            task,
            grace_period: self.grace_period,
        }
    }
}

/// In-flight delivery started by [`DeliveryClient::dispatch`]
#[derive(Debug)]
pub struct DeliveryHandle {
    task: JoinHandle<DeliveryReport>,
    grace_period: Duration,
}

impl DeliveryHandle {
    /// Wait for the outcome, at most for the grace period
    pub async fn settle(mut self) -> DeliveryReport {
        let outcome = tokio::time::timeout(self.grace_period, &mut self.task).await;
        match outcome {
            Ok(Ok(report)) => report,
            Ok(Err(e)) => {
                error!("Delivery task failed: {}", e);
                DeliveryReport::Failed { reason: e.to_string() }
            }
            Err(_) => {
                warn!("Delivery still pending after {:?}, abandoning it", self.grace_period);
                self.task.abort();
                DeliveryReport::TimedOut {
                    grace_ms: u64::try_from(self.grace_period.as_millis()).unwrap_or(u64::MAX),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        sync::oneshot,
    };

    /// Accept one request, answer with `status` and hand back the raw request text
    async fn one_shot_server(status: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
                if request_complete(&buf) {
                    break;
                }
            }
            let response = format!("HTTP/1.1 {}\r\ncontent-length: 0\r\nconnection: close\r\n\r\n", status);
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = tx.send(String::from_utf8_lossy(&buf).into_owned());
        });

        (format!("http://{}/receive", addr), rx)
    }

    fn request_complete(buf: &[u8]) -> bool {
        let text = String::from_utf8_lossy(buf);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let length = text[..header_end]
            .lines()
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("content-length")
                    .then(|| value.trim().parse::<usize>().ok())
                    .flatten()
            })
            .unwrap_or(0);
        buf.len() >= header_end + 4 + length
    }

    fn client_for(endpoint: &str) -> DeliveryClient {
        DeliveryClient::new(DeliveryOptions::new().endpoint(endpoint).grace_period(Duration::from_secs(2))).unwrap()
    }

    #[tokio::test]
    async fn test_deliver_posts_json_once() {
        let (endpoint, request) = one_shot_server("200 OK").await;
        let body = r#"{"id":"1","name":"Root","type":"FRAME"}"#.to_string();

        let report = client_for(&endpoint).deliver(body.clone()).await;
        assert_eq!(report, DeliveryReport::Delivered { status: 200 });

        let request = request.await.unwrap();
        let lower = request.to_lowercase();
        assert!(request.starts_with("POST /receive HTTP/1.1"));
        assert!(lower.contains("content-type: application/json"));
        assert!(request.ends_with(&body));
    }

    #[tokio::test]
    async fn test_non_success_status_is_rejected() {
        let (endpoint, _request) = one_shot_server("500 Internal Server Error").await;
        let report = client_for(&endpoint).deliver("{}".to_string()).await;
        assert_eq!(report, DeliveryReport::Rejected { status: 500 });
        assert!(!report.is_delivered());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_reported() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(&format!("http://{}/receive", addr));
        let report = client.dispatch("{}".to_string()).settle().await;
        assert!(matches!(report, DeliveryReport::Failed { .. }), "got {:?}", report);
    }

    #[tokio::test]
    async fn test_settle_is_bounded_by_grace_period() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            // Accept and never answer
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(60)).await;
        });

        let client = DeliveryClient::new(
            DeliveryOptions::new()
                .endpoint(format!("http://{}/receive", addr))
                .grace_period(Duration::from_millis(200)),
        )
        .unwrap();

        let started = Instant::now();
        let report = client.dispatch("{}".to_string()).settle().await;
        assert_eq!(report, DeliveryReport::TimedOut { grace_ms: 200 });
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_endpoint() {
        let err = DeliveryClient::new(DeliveryOptions::new().endpoint("not a url")).unwrap_err();
        assert!(matches!(err, MirrorError::InvalidEndpoint { .. }));

        let err = DeliveryClient::new(DeliveryOptions::new().endpoint("ftp://localhost/receive")).unwrap_err();
        assert!(matches!(err, MirrorError::InvalidEndpoint { .. }));
    }

    #[test]
    fn test_report_display() {
        assert_eq!(DeliveryReport::Delivered { status: 200 }.to_string(), "delivered (HTTP 200)");
        assert_eq!(
            DeliveryReport::TimedOut { grace_ms: 5000 }.to_string(),
            "no response within 5000 ms"
        );
    }
}
