// Description overlay widget.
//
// Centered modal showing the generated free-text description for one
// player. While the fetch is in flight the body shows a loading line;
// fetch failures arrive as cached "Error: ..." text and render the same
// way as any other description.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::protocol::ModalSnapshot;
use crate::tui::widgets::centered_rect;
use crate::tui::ViewState;

const DIALOG_WIDTH: u16 = 70;
const DIALOG_HEIGHT: u16 = 14;

/// Render the description overlay centered on the screen.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let ModalSnapshot::Description { player_name, text, .. } = &state.snapshot.modal else {
        return;
    };

    let dialog_area = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Span::styled(
            format!(" {player_name} "),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let body = match text {
        Some(text) => text.clone(),
        None => "Loading...".to_string(),
    };

    let paragraph = Paragraph::new(body)
        .block(block)
        .wrap(Wrap { trim: true })
        .style(Style::default().bg(Color::Black));

    frame.render_widget(paragraph, dialog_area);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{UiUpdate, ViewSnapshot};

    fn state_with_modal(text: Option<String>) -> ViewState {
        let mut state = ViewState::default();
        state.apply_update(UiUpdate::Snapshot(Box::new(ViewSnapshot {
            players: Vec::new(),
            loading: false,
            load_error: None,
            sort_field: Default::default(),
            modal: ModalSnapshot::Description {
                id: 1,
                player_name: "Tony Gwynn".to_string(),
                text,
            },
        })));
        state
    }

    #[test]
    fn render_does_not_panic_while_loading() {
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = state_with_modal(None);
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }

    #[test]
    fn render_does_not_panic_with_text() {
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = state_with_modal(Some("A contact hitter with elite bat control.".to_string()));
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }

    #[test]
    fn render_is_inert_without_the_modal() {
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }
}
