//! Drives the state machine against a virtual clock, playing the role of the
//! timer queue: every `ScheduleCheck` is delivered back `delay` later.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use livesearch_core::{update, AppState, Effect, Msg};
use pretty_assertions::assert_eq;

struct Timeline {
    state: Option<AppState>,
    now_ms: u64,
    timers: BinaryHeap<Reverse<(u64, u64, String)>>,
    issued: Vec<String>,
}

impl Timeline {
    fn new() -> Self {
        Self {
            state: Some(AppState::new()),
            now_ms: 0,
            timers: BinaryHeap::new(),
            issued: Vec::new(),
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = self.state.take().unwrap();
        let (state, effects) = update(state, msg);
        self.state = Some(state);
        for effect in effects {
            match effect {
                Effect::ScheduleCheck { token, text, delay } => {
                    let due = self.now_ms + delay.as_millis() as u64;
                    self.timers.push(Reverse((due, token, text)));
                }
                Effect::IssueQuery { query, .. } => self.issued.push(query),
                Effect::FocusInput | Effect::CancelQuery { .. } => {}
            }
        }
    }

    /// Types `text` at `at_ms`; the event timestamp doubles as the token.
    fn type_at(&mut self, at_ms: u64, text: &str) {
        self.advance_to(at_ms);
        self.dispatch(Msg::KeyUp {
            token: at_ms,
            text: text.to_string(),
        });
    }

    fn advance_to(&mut self, until_ms: u64) {
        while let Some(Reverse((due, _, _))) = self.timers.peek() {
            if *due > until_ms {
                break;
            }
            let Reverse((due, token, text)) = self.timers.pop().unwrap();
            self.now_ms = due;
            self.dispatch(Msg::DeferredCheck { token, text });
        }
        self.now_ms = until_ms;
    }
}

#[test]
fn burst_issues_one_query_with_last_value() {
    let mut timeline = Timeline::new();
    timeline.type_at(1000, "c");
    timeline.type_at(1080, "ca");
    timeline.type_at(1160, "cat");
    timeline.advance_to(5000);

    assert_eq!(timeline.issued, vec!["cat".to_string()]);
}

#[test]
fn keystrokes_fifty_ms_apart_only_second_check_works() {
    let mut timeline = Timeline::new();
    timeline.type_at(1000, "ca");
    timeline.type_at(1050, "cat");

    timeline.advance_to(1250);
    assert!(timeline.issued.is_empty());

    timeline.advance_to(1300);
    assert_eq!(timeline.issued, vec!["cat".to_string()]);
}

#[test]
fn pauses_longer_than_delay_issue_separate_queries() {
    let mut timeline = Timeline::new();
    timeline.type_at(1000, "ca");
    timeline.type_at(1400, "cat");
    timeline.advance_to(2000);

    assert_eq!(timeline.issued, vec!["ca".to_string(), "cat".to_string()]);
}

#[test]
fn erasing_to_whitespace_sends_nothing() {
    let mut timeline = Timeline::new();
    timeline.type_at(1000, " ");
    timeline.type_at(1100, "  ");
    timeline.advance_to(2000);

    assert!(timeline.issued.is_empty());
    let view = timeline.state.as_ref().unwrap().view();
    assert_eq!(view.results_markup(), "");
    assert_eq!(view.pending_checks, 0);
}
