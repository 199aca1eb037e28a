//! Network actor - runs executions in the Tokio runtime

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::executor::RequestExecutor;
use crate::network::transport::Transport;

/// Network actor that processes execution commands
pub struct NetworkActor<T> {
    executor: Arc<RequestExecutor<T>>,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl<T: Transport + 'static> NetworkActor<T> {
    pub fn new(
        executor: Arc<RequestExecutor<T>>,
        response_tx: mpsc::UnboundedSender<NetworkResponse>,
    ) -> Self {
        NetworkActor {
            executor,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Execute { id, ticket }) => {
                            let response_tx = self.response_tx.clone();
                            let executor = Arc::clone(&self.executor);

                            self.active_requests.spawn(async move {
                                tracing::debug!(id, generation = ticket.generation, "Execution started");
                                let start = Instant::now();
                                let record = ticket.run(&executor).await;
                                let time_ms = start.elapsed().as_millis() as u64;
                                tracing::debug!(id, time_ms, is_error = record.is_error, "Execution finished");
                                let _ = response_tx.send(NetworkResponse { id, record, time_ms });
                            });
                        }

                        Some(NetworkCommand::Shutdown) | None => {
                            tracing::info!(pending = self.active_requests.len(), "Network actor stopping");
                            self.active_requests.abort_all();
                            break;
                        }
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {}
            }
        }
    }
}
