//! Live-search core: pure debounce state machine and view-model helpers.
mod effect;
mod msg;
mod query;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use query::{normalize_query, QUERY_PARAM, SEARCH_ENDPOINT};
pub use state::{
    AppState, DispatcherConfig, EventToken, JsonStyle, RequestId, ResponseOrdering,
    ResultsDisplay, DEBOUNCE_DELAY,
};
pub use update::update;
pub use view_model::AppViewModel;
