//! Request composer - turns a descriptor plus user input into a `RequestSpec`
//!
//! Composition is synchronous and never touches the network.

use crate::compose::binder;
use crate::constants::{DEFAULT_BASE_URL, JSON_CONTENT_TYPE};
use crate::error::ComposeError;
use crate::models::{Bindings, EndpointDescriptor, HeaderSet, RequestSpec};

#[derive(Clone, Debug)]
pub struct RequestComposer {
    base_url: String,
}

impl Default for RequestComposer {
    fn default() -> Self {
        RequestComposer::new(DEFAULT_BASE_URL)
    }
}

impl RequestComposer {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        RequestComposer {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for the current bindings, usable as a live preview
    pub fn compose_url(&self, descriptor: &EndpointDescriptor, bindings: &Bindings) -> String {
        let bound = binder::bind(&descriptor.path, bindings);
        let mut url = format!("{}{}", self.base_url, bound.path);
        if let Some(query) = bound.query_string() {
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    /// Builds the request that would be sent.
    ///
    /// `Content-Type` is always `application/json`. GET never carries a body;
    /// for other methods a non-blank body must be valid JSON and is sent as typed.
    pub fn compose(
        &self,
        descriptor: &EndpointDescriptor,
        bindings: &Bindings,
        headers: &HeaderSet,
        body_text: &str,
    ) -> Result<RequestSpec, ComposeError> {
        let url = self.compose_url(descriptor, bindings);

        let mut merged = headers.clone();
        merged.set("Content-Type", JSON_CONTENT_TYPE);

        let body = if !descriptor.method.has_body() || body_text.trim().is_empty() {
            None
        } else {
            serde_json::from_str::<serde_json::Value>(body_text)
                .map_err(ComposeError::InvalidRequestBody)?;
            Some(body_text.to_string())
        };

        Ok(RequestSpec::new(url, descriptor.method, merged, body))
    }
}
