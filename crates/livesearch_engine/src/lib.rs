//! Live-search engine: debounce timers, the HTTP search client and effect execution.
mod client;
mod engine;
mod types;

pub use client::{ReqwestSearchClient, SearchClient, SearchSettings};
pub use engine::EngineHandle;
pub use types::{
    EngineEvent, EventToken, FailureKind, RequestId, ResponseMetadata, SearchError, SearchOutput,
};
