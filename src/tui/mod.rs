// TUI: stats table, modal overlays, input handling.
//
// The TUI owns a `ViewState` holding the latest snapshot from the
// controller plus presentation-local state (row selection, focused form
// field). The controller pushes `UiUpdate` messages over an mpsc channel;
// the TUI applies them and re-renders at ~30 fps.

pub mod input;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use tokio::sync::mpsc;
use tracing::warn;

use crate::player::{Player, EDITABLE_FIELDS};
use crate::protocol::{ModalSnapshot, UiUpdate, UserCommand, ViewSnapshot};

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state: the last controller snapshot plus what the renderer
/// needs that is purely presentational.
pub struct ViewState {
    /// Latest snapshot from the controller.
    pub snapshot: ViewSnapshot,
    /// Selected row in the players table.
    pub selected: usize,
    /// Focused field index in the edit form (into `EDITABLE_FIELDS`).
    pub edit_field: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            snapshot: ViewSnapshot {
                players: Vec::new(),
                loading: true,
                load_error: None,
                sort_field: Default::default(),
                modal: ModalSnapshot::Closed,
            },
            selected: 0,
            edit_field: 0,
        }
    }
}

impl ViewState {
    /// The player under the table cursor, if any.
    pub fn selected_player(&self) -> Option<&Player> {
        self.snapshot.players.get(self.selected)
    }

    /// Apply a controller update, keeping local cursors in range.
    pub fn apply_update(&mut self, update: UiUpdate) {
        let UiUpdate::Snapshot(snapshot) = update;

        // Reset the form cursor when the edit modal opens or retargets.
        let was_editing = matches!(self.snapshot.modal, ModalSnapshot::Edit { .. });
        let edit_target = match &snapshot.modal {
            ModalSnapshot::Edit { id, .. } => Some(*id),
            _ => None,
        };
        let old_target = match &self.snapshot.modal {
            ModalSnapshot::Edit { id, .. } => Some(*id),
            _ => None,
        };
        if edit_target.is_some() && (!was_editing || edit_target != old_target) {
            self.edit_field = 0;
        }

        self.snapshot = *snapshot;

        if !self.snapshot.players.is_empty() && self.selected >= self.snapshot.players.len() {
            self.selected = self.snapshot.players.len() - 1;
        }
        if self.edit_field >= EDITABLE_FIELDS.len() {
            self.edit_field = 0;
        }
    }
}

// ---------------------------------------------------------------------------
// Render loop
// ---------------------------------------------------------------------------

/// Frame interval (~30 fps).
const TICK: Duration = Duration::from_millis(33);

/// Run the TUI until the user quits.
///
/// Consumes snapshots from `ui_rx` and sends commands through `cmd_tx`.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();
    let mut view_state = ViewState::default();
    let mut events = EventStream::new();
    let mut tick = tokio::time::interval(TICK);

    let result: anyhow::Result<()> = loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(update) => view_state.apply_update(update),
                    None => break Ok(()), // controller gone
                }
            }
            event = events.next() => {
                match event {
                    Some(Ok(Event::Key(key))) => {
                        if let Some(cmd) = input::handle_key(key, &mut view_state) {
                            let quitting = cmd == UserCommand::Quit;
                            if cmd_tx.send(cmd).await.is_err() || quitting {
                                break Ok(());
                            }
                        }
                    }
                    Some(Ok(_)) => {} // resize handled by redraw
                    Some(Err(e)) => {
                        warn!("terminal event error: {e}");
                    }
                    None => break Ok(()),
                }
            }
            _ = tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(e.into());
                }
            }
        }
    };

    ratatui::restore();
    result
}

/// Draw the full frame from the view state.
pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let [main_area, status_area] =
        Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

    if let Some(error) = &state.snapshot.load_error {
        // List load failed: page-level error instead of the table.
        let msg = Paragraph::new(format!("Error: {error}"))
            .style(Style::default().fg(Color::Red));
        frame.render_widget(msg, main_area);
    } else if state.snapshot.loading && state.snapshot.players.is_empty() {
        frame.render_widget(Paragraph::new("Loading..."), main_area);
    } else {
        widgets::players_table::render(frame, main_area, state);
    }

    widgets::status_bar::render(frame, status_area, state);

    match &state.snapshot.modal {
        ModalSnapshot::Closed => {}
        ModalSnapshot::Description { .. } => {
            widgets::description_modal::render(frame, frame.area(), state);
        }
        ModalSnapshot::Edit { .. } => {
            widgets::edit_modal::render(frame, frame.area(), state);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::EditDraft;

    fn snapshot_with_players(n: usize) -> ViewSnapshot {
        let players = (0..n)
            .map(|i| Player {
                id: Some(i as u64 + 1),
                name: format!("P{i}"),
                position: None,
                games: None,
                at_bat: None,
                runs: None,
                hits: Some(100 - i as u32),
                doubles: None,
                triples: None,
                home_runs: None,
                rbi: None,
                walks: None,
                strikeouts: None,
                stolen_bases: None,
                caught_stealing: None,
                batting_average: None,
                on_base_percentage: None,
                slugging_percentage: None,
                on_base_plus_slugging: None,
            })
            .collect();
        ViewSnapshot {
            players,
            loading: false,
            load_error: None,
            sort_field: Default::default(),
            modal: ModalSnapshot::Closed,
        }
    }

    #[test]
    fn apply_update_clamps_selection() {
        let mut state = ViewState::default();
        state.selected = 10;
        state.apply_update(UiUpdate::Snapshot(Box::new(snapshot_with_players(3))));
        assert_eq!(state.selected, 2);
    }

    #[test]
    fn apply_update_resets_form_cursor_on_new_edit_target() {
        let mut state = ViewState::default();
        state.edit_field = 5;

        let mut snapshot = snapshot_with_players(2);
        snapshot.modal = ModalSnapshot::Edit {
            id: 1,
            player_name: "P0".to_string(),
            draft: EditDraft::default(),
            error: None,
            saving: false,
        };
        state.apply_update(UiUpdate::Snapshot(Box::new(snapshot.clone())));
        assert_eq!(state.edit_field, 0);

        // Same target: cursor position survives subsequent snapshots.
        state.edit_field = 3;
        state.apply_update(UiUpdate::Snapshot(Box::new(snapshot)));
        assert_eq!(state.edit_field, 3);
    }

    #[test]
    fn render_frame_loading_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let state = ViewState::default();
        terminal.draw(|f| render_frame(f, &state)).unwrap();
    }

    #[test]
    fn render_frame_error_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.snapshot.load_error = Some("connection refused".to_string());
        state.snapshot.loading = false;
        terminal.draw(|f| render_frame(f, &state)).unwrap();
    }

    #[test]
    fn render_frame_with_table_and_modals_does_not_panic() {
        let backend = ratatui::backend::TestBackend::new(100, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut state = ViewState::default();
        state.apply_update(UiUpdate::Snapshot(Box::new(snapshot_with_players(5))));
        terminal.draw(|f| render_frame(f, &state)).unwrap();

        state.snapshot.modal = ModalSnapshot::Description {
            id: 1,
            player_name: "P0".to_string(),
            text: None,
        };
        terminal.draw(|f| render_frame(f, &state)).unwrap();

        state.snapshot.modal = ModalSnapshot::Edit {
            id: 1,
            player_name: "P0".to_string(),
            draft: EditDraft::default(),
            error: Some("hits: must be an integer".to_string()),
            saving: true,
        };
        terminal.draw(|f| render_frame(f, &state)).unwrap();
    }
}
