//! Network layer - transport, request execution and the network actor
//!
//! The Network actor receives execution commands and sends back records.

pub mod actor;
pub mod client;
pub mod executor;
pub mod transport;

pub use actor::NetworkActor;
pub use client::ReqwestTransport;
pub use executor::{LogNotifier, Notifier, Outcome, RequestExecutor};
pub use transport::{Transport, TransportResponse};
