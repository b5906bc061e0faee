use crate::ResultsDisplay;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub input_text: String,
    pub input_focused: bool,
    /// Scheduled checks that have not fired yet.
    pub pending_checks: usize,
    /// Issued queries still waiting for an answer.
    pub in_flight: usize,
    pub last_query: Option<String>,
    pub results: ResultsDisplay,
    pub dirty: bool,
}

impl AppViewModel {
    pub fn is_idle(&self) -> bool {
        self.pending_checks == 0 && self.in_flight == 0
    }

    pub fn results_markup(&self) -> String {
        self.results.markup()
    }
}
