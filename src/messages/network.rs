//! Network messages - communication between App and Network layers

use crate::models::ResponseRecord;
use crate::session::ExecutionTicket;

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Run one execution for the session that issued the ticket
    Execute { id: u64, ticket: ExecutionTicket },
    /// Shutdown the network actor
    Shutdown,
}

/// Completed execution sent back from Network layer to App layer
#[derive(Debug, Clone)]
pub struct NetworkResponse {
    pub id: u64,
    pub record: ResponseRecord,
    pub time_ms: u64,
}
