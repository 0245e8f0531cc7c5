// Status bar widget: player count, active sort field, key hints.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::protocol::ModalSnapshot;
use crate::tui::ViewState;

/// Render the status bar into the given area.
///
/// Layout: [count and sort] | [key hints for the active mode]
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let mut spans = Vec::new();

    spans.push(Span::styled(
        format!(
            " {} players | sort: {} ",
            state.snapshot.players.len(),
            state.snapshot.sort_field.label()
        ),
        Style::default().fg(Color::White),
    ));

    if state.snapshot.loading {
        spans.push(Span::styled(
            "[refreshing] ",
            Style::default().fg(Color::Yellow),
        ));
    }

    spans.push(Span::styled("| ", Style::default().fg(Color::Gray)));
    spans.push(Span::styled(
        key_hints(&state.snapshot.modal),
        Style::default().fg(Color::Gray),
    ));

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
    frame.render_widget(paragraph, area);
}

/// Key hints for the active mode.
pub fn key_hints(modal: &ModalSnapshot) -> &'static str {
    match modal {
        ModalSnapshot::Closed => "up/down select  Enter bio  e edit  s sort  r refresh  q quit",
        ModalSnapshot::Description { .. } => "Esc close",
        ModalSnapshot::Edit { .. } => "Tab field  Enter save  Esc cancel",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
