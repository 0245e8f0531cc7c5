// Edit form overlay widget.
//
// Centered modal listing one input line per editable field, with the
// focused field highlighted. Server validation errors render in red
// below the fields; a saving indicator shows while the PUT is in
// flight.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::player::{int_bounds, rate_bounds, ALLOWED_POSITIONS, EDITABLE_FIELDS};
use crate::protocol::ModalSnapshot;
use crate::tui::widgets::centered_rect;
use crate::tui::ViewState;

const DIALOG_WIDTH: u16 = 46;
// 15 field lines + range hint + error/status line + key line + borders.
const DIALOG_HEIGHT: u16 = 21;

/// Render the edit form overlay centered on the screen.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let ModalSnapshot::Edit { player_name, draft, error, saving, .. } = &state.snapshot.modal
    else {
        return;
    };

    let dialog_area = centered_rect(DIALOG_WIDTH, DIALOG_HEIGHT, area);
    frame.render_widget(Clear, dialog_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(Span::styled(
            format!(" Edit {player_name} "),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));

    let mut lines: Vec<Line> = Vec::new();
    for (i, name) in EDITABLE_FIELDS.iter().enumerate() {
        let value = draft.field(name).unwrap_or_default();
        let focused = i == state.edit_field;
        let value_style = if focused {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!(" {:<16}", field_label(name)),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(format!("{value} "), value_style),
        ]));
    }

    // Accepted-range hint for the focused field.
    let focused = EDITABLE_FIELDS[state.edit_field.min(EDITABLE_FIELDS.len() - 1)];
    match bound_hint(focused) {
        Some(hint) => lines.push(Line::from(Span::styled(
            format!(" {}: {hint}", field_label(focused)),
            Style::default().fg(Color::DarkGray),
        ))),
        None => lines.push(Line::from("")),
    }

    if *saving {
        lines.push(Line::from(Span::styled(
            " Saving...",
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(error) = error {
        lines.push(Line::from(Span::styled(
            format!(" {error}"),
            Style::default().fg(Color::Red),
        )));
    } else {
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        " Enter save | Esc cancel | Tab next field",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(Color::Black));

    frame.render_widget(paragraph, dialog_area);
}

/// Inline hint describing what the backend accepts for a field.
pub fn bound_hint(name: &str) -> Option<String> {
    if name == "position" {
        let abbrevs: Vec<&str> = ALLOWED_POSITIONS.iter().map(|p| p.as_str()).collect();
        return Some(format!("one of {}", abbrevs.join(" ")));
    }
    if let Some((lo, hi)) = int_bounds(name) {
        return Some(format!("{lo}-{hi}"));
    }
    if let Some((lo, hi)) = rate_bounds(name) {
        return Some(format!("{lo}-{hi}"));
    }
    None
}

/// Display label for an editable field name.
pub fn field_label(name: &str) -> &'static str {
    match name {
        "position" => "Position",
        "games" => "Games",
        "at_bat" => "At Bats",
        "hits" => "Hits",
        "doubles" => "Doubles",
        "triples" => "Triples",
        "home_runs" => "Home Runs",
        "rbi" => "RBI",
        "walks" => "Walks",
        "strikeouts" => "Strikeouts",
        "stolen_bases" => "Stolen Bases",
        "caught_stealing" => "Caught Stealing",
        "batting_average" => "AVG",
        "slugging_percentage" => "SLG",
        "on_base_plus_slugging" => "OPS",
        _ => "?",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::EditDraft;
    use crate::protocol::{UiUpdate, ViewSnapshot};

    fn state_with_edit(error: Option<String>, saving: bool) -> ViewState {
        let mut draft = EditDraft::default();
        draft.set_field("hits", "165".to_string());
        let mut state = ViewState::default();
        state.apply_update(UiUpdate::Snapshot(Box::new(ViewSnapshot {
            players: Vec::new(),
            loading: false,
            load_error: None,
            sort_field: Default::default(),
            modal: ModalSnapshot::Edit {
                id: 1,
                player_name: "Tony Gwynn".to_string(),
                draft,
                error,
                saving,
            },
        })));
        state
    }

    #[test]
    fn every_editable_field_has_a_label() {
        for name in EDITABLE_FIELDS {
            assert_ne!(field_label(name), "?", "missing label for {name}");
        }
    }

    #[test]
    fn every_editable_field_has_a_range_hint() {
        for name in EDITABLE_FIELDS {
            assert!(bound_hint(name).is_some(), "missing hint for {name}");
        }
        assert!(bound_hint("name").is_none());
    }

    #[test]
    fn bound_hints_show_backend_ranges() {
        assert_eq!(bound_hint("hits").as_deref(), Some("0-4256"));
        assert_eq!(bound_hint("batting_average").as_deref(), Some("0.231-0.43"));
        assert_eq!(
            bound_hint("position").as_deref(),
            Some("one of C 1B 2B 3B SS LF CF RF DH P OF")
        );
    }

    #[test]
    fn render_does_not_panic_idle() {
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = state_with_edit(None, false);
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
    }

    #[test]
    fn render_does_not_panic_with_error_and_saving() {
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = state_with_edit(Some("hits: must be an integer".to_string()), false);
        terminal
            .draw(|frame| render(frame, frame.area(), &state))
            .unwrap();
        let state = state_with_edit(None, true);
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
