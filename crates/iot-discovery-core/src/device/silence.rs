//! Best-effort silence callbacks to announcing devices.

use std::time::Duration;

use reqwest::Client;

use crate::error::{CoreError, DiscoveryError};

/// Tells a device to stop repeating its announcement.
///
/// Implementations must return immediately and swallow their own failures;
/// the receive path never waits on them.
pub trait SilenceNotifier: Send + Sync {
    /// `callback_address` is host plus path, without a scheme.
    fn silence(&self, callback_address: &str);
}

/// No-op notifier for when devices should keep announcing.
pub struct NoopSilencer;

impl SilenceNotifier for NoopSilencer {
    fn silence(&self, _callback_address: &str) {}
}

/// Fire-and-forget HTTP GET silencer.
#[derive(Debug, Clone)]
pub struct HttpSilencer {
    client: Client,
}

impl HttpSilencer {
    pub fn new(request_timeout: Duration) -> Result<Self, CoreError> {
        Ok(Self {
            client: build_client(request_timeout)?,
        })
    }
}

impl SilenceNotifier for HttpSilencer {
    fn silence(&self, callback_address: &str) {
        let url = format!("http://{}", callback_address);
        log::info!("Discovery System: Silencing device >>> {}", url);

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                log::warn!("Discovery System: No runtime to silence {}", url);
                return;
            }
        };

        let client = self.client.clone();
        handle.spawn(async move {
            if let Err(e) = send_silence(&client, &url).await {
                log::warn!("Discovery System: {}", e);
            }
        });
    }
}

fn build_client(request_timeout: Duration) -> Result<Client, CoreError> {
    // Devices sit on the local segment; never route them through a proxy.
    Client::builder()
        .timeout(request_timeout)
        .no_proxy()
        .build()
        .map_err(|e| CoreError::Other(format!("HTTP client error: {}", e)))
}

async fn send_silence(client: &Client, url: &str) -> Result<(), DiscoveryError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| DiscoveryError::Silence(format!("GET {} failed: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(DiscoveryError::Silence(format!(
            "GET {} returned HTTP {}",
            url,
            response.status()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_http_silencer_sends_get() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 1024];
            let len = stream.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..len]).to_string();
            let _ = stream
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n")
                .await;
            let _ = tx.send(request);
        });

        let silencer = HttpSilencer::new(Duration::from_secs(2)).unwrap();
        silencer.silence(&format!("127.0.0.1:{}/silence", port));

        let request = timeout(Duration::from_secs(5), rx).await.unwrap().unwrap();
        assert!(request.starts_with("GET /silence HTTP/1.1"), "got: {}", request);
    }

    #[tokio::test]
    async fn test_send_silence_reports_http_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 1024];
            let _ = stream.read(&mut buf).await;
            let _ = stream
                .write_all(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n")
                .await;
        });

        let client = build_client(Duration::from_secs(2)).unwrap();
        let result = send_silence(&client, &format!("http://127.0.0.1:{}/silence", port)).await;
        assert!(matches!(result, Err(DiscoveryError::Silence(_))));
    }

    #[tokio::test]
    async fn test_unreachable_device_does_not_panic() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = build_client(Duration::from_millis(500)).unwrap();
        let result = send_silence(&client, &format!("http://127.0.0.1:{}/silence", port)).await;
        assert!(result.is_err());

        let silencer = HttpSilencer::new(Duration::from_millis(500)).unwrap();
        silencer.silence(&format!("127.0.0.1:{}/silence", port));
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[test]
    fn test_silence_outside_runtime_is_ignored() {
        let silencer = HttpSilencer::new(Duration::from_secs(1)).unwrap();
        silencer.silence("10.0.0.1/silence");
        NoopSilencer.silence("10.0.0.1/silence");
    }
}
