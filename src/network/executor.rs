//! Request executor - compose, send, and normalize every outcome into a `ResponseRecord`

use std::sync::Arc;
use std::time::Instant;

use crate::compose::RequestComposer;
use crate::models::{Bindings, EndpointDescriptor, HeaderSet, RequestSpec, ResponseRecord};
use crate::network::transport::Transport;

/// Completion summary handed to a [`Notifier`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub success: bool,
    pub status_code: Option<u16>,
}

impl From<&ResponseRecord> for Outcome {
    fn from(record: &ResponseRecord) -> Self {
        Outcome {
            success: !record.is_error,
            status_code: record.status_code,
        }
    }
}

/// Observer informed after each execution
pub trait Notifier: Send + Sync {
    fn notify(&self, outcome: &Outcome);
}

/// Notifier that writes outcomes to the log
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, outcome: &Outcome) {
        if outcome.success {
            tracing::info!(status = ?outcome.status_code, "Request completed");
        } else {
            tracing::warn!(status = ?outcome.status_code, "Request failed");
        }
    }
}

pub struct RequestExecutor<T> {
    composer: RequestComposer,
    transport: T,
    notifier: Option<Arc<dyn Notifier>>,
}

impl<T: Transport> RequestExecutor<T> {
    pub fn new(composer: RequestComposer, transport: T) -> Self {
        RequestExecutor {
            composer,
            transport,
            notifier: None,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn composer(&self) -> &RequestComposer {
        &self.composer
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn compose_url(&self, descriptor: &EndpointDescriptor, bindings: &Bindings) -> String {
        self.composer.compose_url(descriptor, bindings)
    }

    /// Runs the full pipeline. Always yields a record; a composition failure
    /// returns before the transport is called.
    pub async fn execute(
        &self,
        descriptor: &EndpointDescriptor,
        bindings: &Bindings,
        headers: &HeaderSet,
        body_text: &str,
    ) -> ResponseRecord {
        let record = match self.composer.compose(descriptor, bindings, headers, body_text) {
            Ok(request) => self.send(&request).await,
            Err(e) => {
                tracing::warn!(path = %descriptor.path, error = %e, "Request rejected before sending");
                ResponseRecord::failure(e.to_string())
            }
        };

        if let Some(notifier) = &self.notifier {
            notifier.notify(&Outcome::from(&record));
        }

        record
    }

    async fn send(&self, request: &RequestSpec) -> ResponseRecord {
        let start = Instant::now();
        tracing::info!(url = %request.url(), method = %request.method(), "Executing request");

        match self.transport.send(request).await {
            Ok(resp) => {
                tracing::debug!(
                    status = resp.status,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Response received"
                );
                ResponseRecord::from_status(resp.status, resp.status_text, resp.body)
            }
            Err(e) => {
                tracing::debug!(
                    error = %e,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Transport failed"
                );
                ResponseRecord::failure(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::TransportError;
    use crate::format::format_record;
    use crate::models::HttpMethod;
    use crate::network::transport::mock::{MockTransport, Reply};

    #[derive(Default)]
    struct RecordingNotifier {
        outcomes: Mutex<Vec<Outcome>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, outcome: &Outcome) {
            self.outcomes.lock().unwrap().push(*outcome);
        }
    }

    fn create_client() -> EndpointDescriptor {
        EndpointDescriptor {
            method: HttpMethod::POST,
            path: "/api/Client".to_string(),
            description: "Crea un nuevo cliente".to_string(),
            parameters: Vec::new(),
            body: Some("{}".to_string()),
        }
    }

    #[tokio::test]
    async fn test_invalid_body_never_reaches_transport() {
        let notifier = Arc::new(RecordingNotifier::default());
        let executor = RequestExecutor::new(
            RequestComposer::default(),
            MockTransport::new(Reply::Status(200, "OK", String::new())),
        )
        .with_notifier(notifier.clone());

        let record = executor
            .execute(&create_client(), &Bindings::new(), &HeaderSet::default(), "{invalid")
            .await;

        assert!(record.is_error);
        assert!(!record.has_status());
        assert_eq!(executor.transport().calls(), 0);
        assert!(format_record(&record).starts_with("Error: Invalid JSON in request body"));
        assert_eq!(
            notifier.outcomes.lock().unwrap().as_slice(),
            &[Outcome { success: false, status_code: None }]
        );
    }

    #[tokio::test]
    async fn test_success_sends_exactly_once() {
        let executor = RequestExecutor::new(
            RequestComposer::default(),
            MockTransport::new(Reply::Status(201, "Created", r#"{"Id":"abc"}"#.to_string())),
        );
        let body = r#"{"Name":"Cliente de Prueba"}"#;

        let record = executor
            .execute(&create_client(), &Bindings::new(), &HeaderSet::default(), body)
            .await;

        assert_eq!(executor.transport().calls(), 1);
        assert_eq!(record.status_code, Some(201));
        assert_eq!(record.status_text.as_deref(), Some("Created"));
        assert!(!record.is_error);

        let sent = executor.transport().seen();
        assert_eq!(sent[0].url(), "https://apisandbox.facturama.mx/api/Client");
        assert_eq!(sent[0].body(), Some(body));
    }

    #[tokio::test]
    async fn test_upstream_error_keeps_body() {
        let executor = RequestExecutor::new(
            RequestComposer::default(),
            MockTransport::new(Reply::Status(401, "Unauthorized", r#"{"Message":"denied"}"#.to_string())),
        );

        let record = executor
            .execute(&create_client(), &Bindings::new(), &HeaderSet::default(), "")
            .await;

        assert!(record.is_error);
        assert_eq!(record.body_text, r#"{"Message":"denied"}"#);
        assert_eq!(
            format_record(&record),
            "Status: 401 Unauthorized\n\n{\n  \"Message\": \"denied\"\n}"
        );
    }

    #[tokio::test]
    async fn test_transport_failure_has_no_status() {
        let notifier = Arc::new(RecordingNotifier::default());
        let executor = RequestExecutor::new(
            RequestComposer::default(),
            MockTransport::new(Reply::Fail(TransportError::Other("network down".to_string()))),
        )
        .with_notifier(notifier.clone());

        let record = executor
            .execute(&create_client(), &Bindings::new(), &HeaderSet::default(), "{}")
            .await;

        assert_eq!(executor.transport().calls(), 1);
        assert_eq!(format_record(&record), "Error: network down");
        assert!(!notifier.outcomes.lock().unwrap()[0].success);
    }

    #[tokio::test]
    async fn test_get_body_is_dropped_before_sending() {
        let executor = RequestExecutor::new(
            RequestComposer::default(),
            MockTransport::new(Reply::EchoUrl),
        );
        let descriptor = EndpointDescriptor {
            method: HttpMethod::GET,
            ..create_client()
        };

        executor
            .execute(&descriptor, &Bindings::new(), &HeaderSet::default(), "{invalid")
            .await;

        assert_eq!(executor.transport().seen()[0].body(), None);
    }
}
