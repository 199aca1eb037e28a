//! # Facturama Sandbox
//!
//! A terminal explorer for the Facturama REST API sandbox.
//!
//! ## Features
//! - Built-in catalog of Facturama endpoints, grouped by category
//! - Path and query parameter binding with a live URL preview
//! - Editable Authorization header and JSON request body
//! - Independent request state per endpoint
//! - JSON pretty-printing and syntax highlighting of responses
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod models;
pub mod constants;
pub mod error;
pub mod compose;
pub mod format;
pub mod catalog;
pub mod config;
pub mod session;
pub mod ui;
pub mod messages;
pub mod app;
pub mod network;

// Re-export commonly used types
pub use models::{Bindings, EndpointDescriptor, Header, HeaderSet, HttpMethod, RequestSpec, ResponseRecord};
pub use error::{ComposeError, TransportError};
pub use compose::{bind, RequestComposer};
pub use format::format_record;
pub use catalog::Catalog;
pub use session::{EndpointSession, ExecutionState};
pub use messages::{UiEvent, NetworkCommand, NetworkResponse, RenderState};
pub use app::{AppState, AppActor};
pub use network::{NetworkActor, RequestExecutor, Transport};
