//! HTTP client wrapper - sends composed requests through reqwest

use std::time::Duration;

use crate::error::TransportError;
use crate::models::{HttpMethod, RequestSpec};
use crate::network::transport::{Transport, TransportResponse};

/// Build a reqwest request from a composed `RequestSpec`
fn build_request(client: &reqwest::Client, request: &RequestSpec) -> reqwest::RequestBuilder {
    let url = request.url();

    let mut req_builder = match request.method() {
        HttpMethod::GET => client.get(url),
        HttpMethod::POST => client.post(url),
        HttpMethod::PUT => client.put(url),
        HttpMethod::DELETE => client.delete(url),
    };

    // Header values go through verbatim
    for header in request.headers().iter() {
        req_builder = req_builder.header(&header.key, &header.value);
    }

    if let Some(body) = request.body() {
        req_builder = req_builder.body(body.to_string());
    }

    req_builder
}

fn classify_error(err: &reqwest::Error, timeout: Duration) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(timeout)
    } else if err.is_connect() {
        TransportError::Connect(err.to_string())
    } else {
        TransportError::Request(err.to_string())
    }
}

/// Create an HTTP client with the given timeout
pub fn create_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Transport backed by a shared reqwest client
#[derive(Clone, Debug)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Self {
        ReqwestTransport {
            client: create_client(timeout),
            timeout,
        }
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: &RequestSpec) -> Result<TransportResponse, TransportError> {
        let resp = build_request(&self.client, request)
            .send()
            .await
            .map_err(|e| classify_error(&e, self.timeout))?;

        let status = resp.status();
        // reqwest does not expose the server's reason phrase, so the registered one stands in
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(TransportResponse {
            status: status.as_u16(),
            status_text,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::RequestComposer;
    use crate::models::{Bindings, EndpointDescriptor, HeaderSet};

    fn spec(base: &str, method: HttpMethod, body: &str) -> RequestSpec {
        let descriptor = EndpointDescriptor {
            method,
            path: "/api/Client".to_string(),
            description: String::new(),
            parameters: Vec::new(),
            body: None,
        };
        RequestComposer::new(base)
            .compose(&descriptor, &Bindings::new(), &HeaderSet::default(), body)
            .unwrap()
    }

    #[test]
    fn test_build_request_carries_headers_and_body() {
        let client = create_client(Duration::from_secs(5));
        let request = build_request(&client, &spec("http://localhost", HttpMethod::POST, r#"{"a":1}"#))
            .build()
            .unwrap();
        assert_eq!(request.method(), reqwest::Method::POST);
        assert_eq!(request.url().as_str(), "http://localhost/api/Client");
        assert_eq!(request.headers()["content-type"], "application/json");
        assert_eq!(
            request.headers()["authorization"],
            "Basic [Base64(username:password)]"
        );
        let body = request.body().and_then(|b| b.as_bytes()).unwrap();
        assert_eq!(body, br#"{"a":1}"#);
    }

    #[tokio::test]
    async fn test_status_text_is_the_registered_reason() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await.unwrap();
            socket
                .write_all(b"HTTP/1.1 201 Cliente Creado\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}")
                .await
                .unwrap();
        });

        let transport = ReqwestTransport::new(Duration::from_secs(5));
        let base = format!("http://127.0.0.1:{}", port);
        let response = transport
            .send(&spec(&base, HttpMethod::POST, r#"{"Name":"x"}"#))
            .await
            .unwrap();
        server.await.unwrap();

        assert_eq!(response.status, 201);
        assert_eq!(response.status_text, "Created");
        assert_eq!(response.body, "{}");
    }

    #[tokio::test]
    async fn test_refused_connection_is_a_transport_error() {
        // Bind then drop to get a port nothing listens on
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let transport = ReqwestTransport::new(Duration::from_secs(5));
        let base = format!("http://127.0.0.1:{}", port);
        let err = transport
            .send(&spec(&base, HttpMethod::GET, ""))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Connect(_)), "got {:?}", err);
        assert!(err.to_string().starts_with("Connection failed"));
    }
}
