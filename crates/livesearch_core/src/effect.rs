use std::time::Duration;

use crate::{EventToken, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Move input focus to the query field.
    FocusInput,
    /// Deliver `Msg::DeferredCheck { token, text }` after `delay`.
    ScheduleCheck {
        token: EventToken,
        text: String,
        delay: Duration,
    },
    /// Send one search request for the already trimmed `query`.
    IssueQuery { request_id: RequestId, query: String },
    /// Abandon an in-flight request that a newer one has superseded.
    CancelQuery { request_id: RequestId },
}
