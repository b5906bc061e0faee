use std::collections::BTreeSet;
use std::time::Duration;

use serde_json::Value;

use crate::view_model::AppViewModel;

/// Freshness comparator of a keystroke (event timestamp or monotonic counter).
pub type EventToken = u64;
/// Generation number of an issued search request.
pub type RequestId = u64;

/// Quiet period after the last keystroke before a query is sent.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(250);

/// Which responses may replace the results display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseOrdering {
    /// Whatever arrives last wins, even if it answers an older query.
    #[default]
    LastArrival,
    /// Only the most recently issued request may update the display;
    /// superseded requests are cancelled.
    LatestRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    #[default]
    Compact,
    Pretty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    pub debounce: Duration,
    pub ordering: ResponseOrdering,
    pub json_style: JsonStyle,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            debounce: DEBOUNCE_DELAY,
            ordering: ResponseOrdering::default(),
            json_style: JsonStyle::default(),
        }
    }
}

/// Content of the results container.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultsDisplay {
    #[default]
    Cleared,
    Json(String),
}

impl ResultsDisplay {
    pub fn text(&self) -> &str {
        match self {
            ResultsDisplay::Cleared => "",
            ResultsDisplay::Json(text) => text,
        }
    }

    /// The container's markup: empty, or the JSON text as preformatted text.
    pub fn markup(&self) -> String {
        match self {
            ResultsDisplay::Cleared => String::new(),
            ResultsDisplay::Json(text) => format!("<pre>{text}</pre>"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    config: DispatcherConfig,
    input_text: String,
    input_focused: bool,
    last_event: Option<EventToken>,
    pending_checks: usize,
    in_flight: BTreeSet<RequestId>,
    next_request_id: RequestId,
    latest_request: Option<RequestId>,
    last_query: Option<String>,
    display: ResultsDisplay,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DispatcherConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            input_text: self.input_text.clone(),
            input_focused: self.input_focused,
            pending_checks: self.pending_checks,
            in_flight: self.in_flight.len(),
            last_query: self.last_query.clone(),
            results: self.display.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything visible changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn focus_input(&mut self) {
        if !self.input_focused {
            self.input_focused = true;
            self.mark_dirty();
        }
    }

    pub(crate) fn record_keyup(&mut self, token: EventToken, text: String) {
        self.last_event = Some(token);
        self.input_text = text;
        self.pending_checks += 1;
        self.mark_dirty();
    }

    pub(crate) fn check_fired(&mut self) {
        self.pending_checks = self.pending_checks.saturating_sub(1);
        self.mark_dirty();
    }

    /// Equal tokens count as current, so two keystrokes sharing a timestamp
    /// both pass this test.
    pub(crate) fn is_current(&self, token: EventToken) -> bool {
        self.last_event == Some(token)
    }

    pub(crate) fn clear_display(&mut self) {
        if self.display != ResultsDisplay::Cleared {
            self.display = ResultsDisplay::Cleared;
            self.mark_dirty();
        }
    }

    /// Drops the claim of every in-flight request on the display.
    /// Returns the requests to cancel; empty unless ordering is `LatestRequest`.
    pub(crate) fn supersede_in_flight(&mut self) -> Vec<RequestId> {
        match self.config.ordering {
            ResponseOrdering::LastArrival => Vec::new(),
            ResponseOrdering::LatestRequest => {
                self.latest_request = None;
                let superseded: Vec<RequestId> = self.in_flight.iter().copied().collect();
                if !superseded.is_empty() {
                    self.in_flight.clear();
                    self.mark_dirty();
                }
                superseded
            }
        }
    }

    pub(crate) fn begin_query(&mut self, query: &str) -> RequestId {
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        self.in_flight.insert(request_id);
        self.latest_request = Some(request_id);
        self.last_query = Some(query.to_owned());
        self.mark_dirty();
        request_id
    }

    /// Settles `request_id` and reports whether its response may touch the display.
    pub(crate) fn settle(&mut self, request_id: RequestId) -> bool {
        let was_in_flight = self.in_flight.remove(&request_id);
        if was_in_flight {
            self.mark_dirty();
        }
        match self.config.ordering {
            ResponseOrdering::LastArrival => true,
            ResponseOrdering::LatestRequest => {
                was_in_flight && self.latest_request == Some(request_id)
            }
        }
    }

    pub(crate) fn show_payload(&mut self, payload: &Value) {
        let text = match self.config.json_style {
            JsonStyle::Compact => payload.to_string(),
            JsonStyle::Pretty => format!("{payload:#}"),
        };
        self.display = ResultsDisplay::Json(text);
        self.mark_dirty();
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
