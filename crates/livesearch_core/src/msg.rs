use serde_json::Value;

use crate::{EventToken, RequestId};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// The search box was shown for the first time.
    Loaded,
    /// A key was released in the query field; `text` is the field content after the edit.
    KeyUp { token: EventToken, text: String },
    /// A previously scheduled check fired.
    DeferredCheck { token: EventToken, text: String },
    /// The endpoint answered with a decodable payload.
    QueryCompleted { request_id: RequestId, payload: Value },
    /// The request failed (network, status, decode, cancellation).
    QueryFailed { request_id: RequestId, reason: String },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
