use livesearch_core::{Effect, Msg};
use livesearch_engine::{EngineEvent, EngineHandle, FailureKind};
use livesearch_logging::{search_debug, search_info, search_trace, search_warn};

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::FocusInput => {
                    // no-op; focus is part of the view model
                }
                Effect::ScheduleCheck { token, text, delay } => {
                    search_trace!("ScheduleCheck token={} delay={:?}", token, delay);
                    self.engine.schedule_check(token, text, delay);
                }
                Effect::IssueQuery { request_id, query } => {
                    // The engine logs the resolved request URL.
                    search_info!("IssueQuery request_id={} query={:?}", request_id, query);
                    self.engine.issue_query(request_id, query);
                }
                Effect::CancelQuery { request_id } => {
                    search_debug!("CancelQuery request_id={}", request_id);
                    self.engine.cancel_query(request_id);
                }
            }
        }
    }

    /// Everything the engine reported since the last call, as core messages.
    pub fn drain_messages(&self) -> Vec<Msg> {
        let mut inbox = Vec::new();
        while let Some(event) = self.engine.try_recv() {
            inbox.push(map_event(event));
        }
        inbox
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::CheckDue { token, text } => Msg::DeferredCheck { token, text },
        EngineEvent::QueryCompleted {
            request_id,
            result: Ok(output),
        } => {
            search_debug!(
                "Query {} answered status={} bytes={}",
                request_id,
                output.metadata.status,
                output.metadata.byte_len
            );
            Msg::QueryCompleted {
                request_id,
                payload: output.payload,
            }
        }
        EngineEvent::QueryCompleted {
            request_id,
            result: Err(err),
        } => {
            if err.kind == FailureKind::Cancelled {
                search_debug!("Query {} cancelled", request_id);
            } else {
                search_warn!("Query {} failed: {}", request_id, err);
            }
            Msg::QueryFailed {
                request_id,
                reason: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::map_event;
    use livesearch_core::Msg;
    use livesearch_engine::{EngineEvent, ResponseMetadata, SearchOutput};
    use serde_json::json;

    #[test]
    fn check_due_becomes_deferred_check() {
        let msg = map_event(EngineEvent::CheckDue {
            token: 9,
            text: "cat".to_string(),
        });
        assert_eq!(
            msg,
            Msg::DeferredCheck {
                token: 9,
                text: "cat".to_string(),
            }
        );
    }

    #[test]
    fn completion_carries_payload() {
        let msg = map_event(EngineEvent::QueryCompleted {
            request_id: 4,
            result: Ok(SearchOutput {
                payload: json!({"results": []}),
                metadata: ResponseMetadata {
                    url: "http://localhost/db/obj/search?q=cat".to_string(),
                    status: 200,
                    content_type: Some("application/json".to_string()),
                    byte_len: 14,
                },
            }),
        });
        assert_eq!(
            msg,
            Msg::QueryCompleted {
                request_id: 4,
                payload: json!({"results": []}),
            }
        );
    }
}
