use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

use livesearch_logging::{search_debug, search_trace};
use tokio_util::sync::CancellationToken;

use crate::client::{ReqwestSearchClient, SearchClient, SearchSettings};
use crate::{EngineEvent, EventToken, FailureKind, RequestId, SearchError};

enum EngineCommand {
    ScheduleCheck {
        token: EventToken,
        text: String,
        delay: Duration,
    },
    IssueQuery {
        request_id: RequestId,
        query: String,
    },
    CancelQuery {
        request_id: RequestId,
    },
}

type InFlight = Arc<Mutex<HashMap<RequestId, CancellationToken>>>;

/// Owns the async runtime that runs timers and requests on behalf of the UI thread.
///
/// Dropping the handle closes the command channel, which stops the runtime and
/// abandons whatever is still pending.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: SearchSettings) -> Result<Self, SearchError> {
        let client = ReqwestSearchClient::new(settings)?;
        Ok(Self::with_client(Arc::new(client)))
    }

    pub fn with_client(client: Arc<dyn SearchClient>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let in_flight: InFlight = Arc::new(Mutex::new(HashMap::new()));
            while let Ok(command) = cmd_rx.recv() {
                handle_command(&runtime, &client, &in_flight, command, &event_tx);
            }
        });

        Self { cmd_tx, event_rx }
    }

    /// Emits `EngineEvent::CheckDue` once `delay` has elapsed. Not cancellable.
    pub fn schedule_check(&self, token: EventToken, text: impl Into<String>, delay: Duration) {
        let _ = self.cmd_tx.send(EngineCommand::ScheduleCheck {
            token,
            text: text.into(),
            delay,
        });
    }

    pub fn issue_query(&self, request_id: RequestId, query: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::IssueQuery {
            request_id,
            query: query.into(),
        });
    }

    /// The request, if still running, completes with `FailureKind::Cancelled`.
    pub fn cancel_query(&self, request_id: RequestId) {
        let _ = self.cmd_tx.send(EngineCommand::CancelQuery { request_id });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

fn handle_command(
    runtime: &tokio::runtime::Runtime,
    client: &Arc<dyn SearchClient>,
    in_flight: &InFlight,
    command: EngineCommand,
    event_tx: &mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::ScheduleCheck { token, text, delay } => {
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                tokio::time::sleep(delay).await;
                search_trace!("check due token={}", token);
                let _ = event_tx.send(EngineEvent::CheckDue { token, text });
            });
        }
        EngineCommand::IssueQuery { request_id, query } => {
            let cancel = CancellationToken::new();
            if let Ok(mut guard) = in_flight.lock() {
                guard.insert(request_id, cancel.clone());
            }
            let client = client.clone();
            let in_flight = in_flight.clone();
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                let result = cancel
                    .run_until_cancelled(client.search(&query))
                    .await
                    .unwrap_or_else(|| {
                        Err(SearchError::new(
                            FailureKind::Cancelled,
                            "superseded by a newer query",
                        ))
                    });
                if let Ok(mut guard) = in_flight.lock() {
                    guard.remove(&request_id);
                }
                let _ = event_tx.send(EngineEvent::QueryCompleted { request_id, result });
            });
        }
        EngineCommand::CancelQuery { request_id } => {
            let cancel = in_flight
                .lock()
                .ok()
                .and_then(|mut guard| guard.remove(&request_id));
            match cancel {
                Some(cancel) => {
                    search_debug!("cancelling request_id={}", request_id);
                    cancel.cancel();
                }
                None => search_trace!("request_id={} already settled", request_id),
            }
        }
    }
}
