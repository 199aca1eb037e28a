//! Endpoint session - the per-endpoint interactive state and its request lifecycle
//!
//! Each open endpoint owns one session. Sessions never share mutable state, so
//! any number of them can execute at the same time against one shared executor.

use std::sync::Arc;

use crate::compose::RequestComposer;
use crate::format::format_record;
use crate::models::{Bindings, EndpointDescriptor, HeaderSet, ResponseRecord};
use crate::network::executor::RequestExecutor;
use crate::network::transport::Transport;

/// Lifecycle of a session: `Idle -> Sending -> Succeeded | Failed -> Idle`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ExecutionState {
    #[default]
    Idle,
    Sending,
    Succeeded,
    Failed,
}

impl ExecutionState {
    pub fn is_sending(&self) -> bool {
        matches!(self, ExecutionState::Sending)
    }
}

/// Snapshot of a session's inputs taken when an execution starts.
///
/// Edits made while the request is in flight do not affect it.
#[derive(Clone, Debug)]
pub struct ExecutionTicket {
    pub generation: u64,
    pub descriptor: Arc<EndpointDescriptor>,
    pub bindings: Bindings,
    pub headers: HeaderSet,
    pub body: String,
}

impl ExecutionTicket {
    pub async fn run<T: Transport>(&self, executor: &RequestExecutor<T>) -> ResponseRecord {
        executor
            .execute(&self.descriptor, &self.bindings, &self.headers, &self.body)
            .await
    }
}

#[derive(Clone, Debug)]
pub struct EndpointSession {
    descriptor: Arc<EndpointDescriptor>,
    initial_headers: HeaderSet,
    pub bindings: Bindings,
    pub headers: HeaderSet,
    pub body: String,
    state: ExecutionState,
    generation: u64,
    last_record: Option<ResponseRecord>,
}

impl EndpointSession {
    pub fn new(descriptor: Arc<EndpointDescriptor>, headers: HeaderSet) -> Self {
        let body = descriptor.body.clone().unwrap_or_default();
        EndpointSession {
            descriptor,
            initial_headers: headers.clone(),
            bindings: Bindings::new(),
            headers,
            body,
            state: ExecutionState::Idle,
            generation: 0,
            last_record: None,
        }
    }

    pub fn descriptor(&self) -> &Arc<EndpointDescriptor> {
        &self.descriptor
    }

    pub fn state(&self) -> ExecutionState {
        self.state
    }

    pub fn last_record(&self) -> Option<&ResponseRecord> {
        self.last_record.as_ref()
    }

    /// Display text of the last record
    pub fn formatted_response(&self) -> Option<String> {
        self.last_record.as_ref().map(format_record)
    }

    pub fn preview_url(&self, composer: &RequestComposer) -> String {
        composer.compose_url(&self.descriptor, &self.bindings)
    }

    /// Moves to `Sending` and snapshots the inputs. Returns `None` while a
    /// request is already in flight.
    pub fn begin(&mut self) -> Option<ExecutionTicket> {
        if self.state.is_sending() {
            return None;
        }
        self.generation += 1;
        self.state = ExecutionState::Sending;
        Some(ExecutionTicket {
            generation: self.generation,
            descriptor: Arc::clone(&self.descriptor),
            bindings: self.bindings.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
        })
    }

    /// Stores the record of the in-flight execution. Records from any other
    /// generation are ignored and `false` is returned.
    pub fn complete(&mut self, generation: u64, record: ResponseRecord) -> bool {
        if !self.state.is_sending() || generation != self.generation {
            return false;
        }
        self.state = if record.is_error {
            ExecutionState::Failed
        } else {
            ExecutionState::Succeeded
        };
        self.last_record = Some(record);
        true
    }

    /// Returns a finished session to `Idle`, keeping the last record on display
    pub fn settle(&mut self) {
        if matches!(self.state, ExecutionState::Succeeded | ExecutionState::Failed) {
            self.state = ExecutionState::Idle;
        }
    }

    /// Restores the initial inputs and clears the last record.
    ///
    /// An execution already in flight is left alone and still completes.
    pub fn reset(&mut self) {
        self.bindings.clear();
        self.headers = self.initial_headers.clone();
        self.body = self.descriptor.body.clone().unwrap_or_default();
        self.last_record = None;
        self.settle();
    }

    /// Begin, run and complete in one call
    pub async fn execute<T: Transport>(
        &mut self,
        executor: &RequestExecutor<T>,
    ) -> Option<ResponseRecord> {
        let ticket = self.begin()?;
        let record = ticket.run(executor).await;
        self.complete(ticket.generation, record.clone());
        self.settle();
        Some(record)
    }
}
