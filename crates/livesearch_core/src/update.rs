use crate::{normalize_query, AppState, Effect, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Loaded => {
            state.focus_input();
            vec![Effect::FocusInput]
        }
        Msg::KeyUp { token, text } => {
            // Earlier checks stay scheduled; they fail the token test when they fire.
            state.record_keyup(token, text.clone());
            vec![Effect::ScheduleCheck {
                token,
                text,
                delay: state.config().debounce,
            }]
        }
        Msg::DeferredCheck { token, text } => {
            state.check_fired();
            if !state.is_current(token) {
                return (state, Vec::new());
            }

            let Some(query) = normalize_query(&text) else {
                let cancelled = state.supersede_in_flight();
                state.clear_display();
                return (state, cancel_effects(cancelled));
            };

            let cancelled = state.supersede_in_flight();
            let request_id = state.begin_query(query);
            let mut effects = cancel_effects(cancelled);
            effects.push(Effect::IssueQuery {
                request_id,
                query: query.to_owned(),
            });
            effects
        }
        Msg::QueryCompleted {
            request_id,
            payload,
        } => {
            if state.settle(request_id) {
                state.show_payload(&payload);
            }
            Vec::new()
        }
        Msg::QueryFailed { request_id, .. } => {
            // No retry and no error state: the display keeps whatever it had.
            state.settle(request_id);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn cancel_effects(request_ids: Vec<crate::RequestId>) -> Vec<Effect> {
    request_ids
        .into_iter()
        .map(|request_id| Effect::CancelQuery { request_id })
        .collect()
}
