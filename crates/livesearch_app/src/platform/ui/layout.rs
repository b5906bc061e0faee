use ratatui::layout::{Constraint, Direction, Layout, Margin, Rect};

use super::constants::{INPUT_HEIGHT, STATUS_HEIGHT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub input: Rect,
    pub status: Rect,
    pub results: Rect,
}

/// Input box on top, one status line, results below.
pub fn split(area: Rect) -> AppLayout {
    let area = area.inner(Margin {
        vertical: 0,
        horizontal: 1,
    });
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
            Constraint::Min(1),
        ])
        .split(area);

    AppLayout {
        input: chunks[0],
        status: chunks[1],
        results: chunks[2],
    }
}
