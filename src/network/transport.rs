//! Transport seam - the only place a request leaves the process

use std::future::Future;

use crate::error::TransportError;
use crate::models::RequestSpec;

/// What came back from the server, whatever the status
#[derive(Clone, Debug, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

/// Sends a composed request and returns the raw response.
///
/// Implementations must not retry.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: &RequestSpec,
    ) -> impl Future<Output = Result<TransportResponse, TransportError>> + Send;
}

#[cfg(test)]
pub(crate) mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use super::*;

    /// Scripted reply of a [`MockTransport`]
    #[derive(Clone, Debug)]
    pub enum Reply {
        Status(u16, &'static str, String),
        /// 200 OK with the requested URL as a JSON string body
        EchoUrl,
        Fail(TransportError),
    }

    /// Transport double that records every request it receives
    pub struct MockTransport {
        reply: Reply,
        delay: Duration,
        calls: AtomicUsize,
        seen: Mutex<Vec<RequestSpec>>,
    }

    impl MockTransport {
        pub fn new(reply: Reply) -> Self {
            MockTransport {
                reply,
                delay: Duration::ZERO,
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            }
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        pub fn seen(&self) -> Vec<RequestSpec> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl Transport for MockTransport {
        async fn send(&self, request: &RequestSpec) -> Result<TransportResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen.lock().unwrap().push(request.clone());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match &self.reply {
                Reply::Status(status, text, body) => Ok(TransportResponse {
                    status: *status,
                    status_text: text.to_string(),
                    body: body.clone(),
                }),
                Reply::EchoUrl => Ok(TransportResponse {
                    status: 200,
                    status_text: "OK".to_string(),
                    body: serde_json::Value::String(request.url().to_string()).to_string(),
                }),
                Reply::Fail(err) => Err(err.clone()),
            }
        }
    }
}
