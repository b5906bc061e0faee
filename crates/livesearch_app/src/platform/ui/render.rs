use livesearch_core::AppViewModel;
use ratatui::{
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::constants::{HELP_TEXT, INPUT_TITLE, RESULTS_TITLE};
use super::input::TextInput;
use super::layout;

pub struct RenderContext<'a> {
    pub view: &'a AppViewModel,
    pub input: &'a TextInput,
    pub results_scroll: u16,
}

pub fn draw(frame: &mut Frame, ctx: &RenderContext<'_>) {
    let layout = layout::split(frame.area());

    let input_block = Block::default().borders(Borders::ALL).title(INPUT_TITLE);
    let input_inner = input_block.inner(layout.input);
    let column = ctx.input.cursor_column();
    let offset = input_scroll(column, input_inner.width);
    frame.render_widget(
        Paragraph::new(ctx.input.text())
            .block(input_block)
            .scroll((0, offset)),
        layout.input,
    );
    if ctx.view.input_focused && input_inner.width > 0 {
        let visible = (column - offset).min(input_inner.width - 1);
        frame.set_cursor_position((input_inner.x + visible, input_inner.y));
    }

    frame.render_widget(
        Paragraph::new(status_text(ctx.view)).style(Style::default().fg(Color::DarkGray)),
        layout.status,
    );

    // Raw dump of whatever the endpoint returned; no formatting beyond the JSON text.
    let results = Paragraph::new(ctx.view.results.text())
        .block(Block::default().borders(Borders::ALL).title(RESULTS_TITLE))
        .wrap(Wrap { trim: false })
        .scroll((ctx.results_scroll, 0));
    frame.render_widget(results, layout.results);
}

/// Columns to hide on the left so the cursor stays inside a field `width` wide.
pub fn input_scroll(cursor_column: u16, width: u16) -> u16 {
    cursor_column.saturating_sub(width.saturating_sub(1))
}

pub fn status_text(view: &AppViewModel) -> String {
    let activity = if view.in_flight > 0 {
        "searching"
    } else if view.pending_checks > 0 {
        "waiting"
    } else {
        "idle"
    };
    match &view.last_query {
        Some(query) => format!("{activity} | last query: {query} | {HELP_TEXT}"),
        None => format!("{activity} | {HELP_TEXT}"),
    }
}
