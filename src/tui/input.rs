// Key input translation.
//
// Keys either mutate presentation-local state (row selection, focused
// form field) directly on the `ViewState`, or translate into a
// `UserCommand` for the controller. Which keys apply depends on the
// active modal in the latest snapshot.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::player::{Position, ALLOWED_POSITIONS, EDITABLE_FIELDS};
use crate::protocol::{ModalSnapshot, UserCommand};
use crate::tui::ViewState;

/// Translate one key event. Returns a command for the controller, or
/// None when the key only moved a local cursor (or meant nothing).
pub fn handle_key(key: KeyEvent, state: &mut ViewState) -> Option<UserCommand> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    // Ctrl+C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(UserCommand::Quit);
    }

    if matches!(state.snapshot.modal, ModalSnapshot::Description { .. }) {
        return handle_description_key(key);
    }
    if matches!(state.snapshot.modal, ModalSnapshot::Edit { .. }) {
        return handle_edit_key(key, state);
    }
    handle_table_key(key, state)
}

// ---------------------------------------------------------------------------
// Table mode
// ---------------------------------------------------------------------------

fn handle_table_key(key: KeyEvent, state: &mut ViewState) -> Option<UserCommand> {
    let row_count = state.snapshot.players.len();
    match key.code {
        KeyCode::Char('q') => Some(UserCommand::Quit),
        KeyCode::Up | KeyCode::Char('k') => {
            state.selected = state.selected.saturating_sub(1);
            None
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if row_count > 0 && state.selected + 1 < row_count {
                state.selected += 1;
            }
            None
        }
        KeyCode::Home => {
            state.selected = 0;
            None
        }
        KeyCode::End => {
            state.selected = row_count.saturating_sub(1);
            None
        }
        // Players without a server id have no description endpoint to hit.
        KeyCode::Enter | KeyCode::Char('d') => state
            .selected_player()
            .and_then(|p| p.id)
            .map(UserCommand::ShowDescription),
        KeyCode::Char('e') => state
            .selected_player()
            .and_then(|p| p.id)
            .map(UserCommand::OpenEdit),
        KeyCode::Char('s') => Some(UserCommand::SetSort(state.snapshot.sort_field.next())),
        KeyCode::Char('r') => Some(UserCommand::Refresh),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Description modal
// ---------------------------------------------------------------------------

fn handle_description_key(key: KeyEvent) -> Option<UserCommand> {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Some(UserCommand::CloseModal),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Edit modal
// ---------------------------------------------------------------------------

fn handle_edit_key(key: KeyEvent, state: &mut ViewState) -> Option<UserCommand> {
    let field_count = EDITABLE_FIELDS.len();
    match key.code {
        KeyCode::Esc => Some(UserCommand::CloseModal),
        KeyCode::Enter => Some(UserCommand::Save),
        KeyCode::Down | KeyCode::Tab => {
            state.edit_field = (state.edit_field + 1) % field_count;
            None
        }
        KeyCode::Up | KeyCode::BackTab => {
            state.edit_field = (state.edit_field + field_count - 1) % field_count;
            None
        }
        KeyCode::Left | KeyCode::Right => cycle_position(state, key.code),
        KeyCode::Backspace => edit_focused_field(state, |text| {
            text.pop();
        }),
        KeyCode::Char(c) => edit_focused_field(state, |text| {
            text.push(c);
        }),
        _ => None,
    }
}

/// Left/Right on the position field steps through the abbreviations the
/// backend accepts. Inert on any other field.
fn cycle_position(state: &ViewState, code: KeyCode) -> Option<UserCommand> {
    if EDITABLE_FIELDS[state.edit_field] != "position" {
        return None;
    }
    let ModalSnapshot::Edit { draft, .. } = &state.snapshot.modal else {
        return None;
    };

    let len = ALLOWED_POSITIONS.len();
    let current = Position::from_abbrev(&draft.position)
        .and_then(|p| ALLOWED_POSITIONS.iter().position(|a| *a == p));
    let next = match (current, code) {
        // Unset or unrecognized text starts at the first abbreviation.
        (None, _) => 0,
        (Some(i), KeyCode::Right) => (i + 1) % len,
        (Some(i), _) => (i + len - 1) % len,
    };

    Some(UserCommand::EditField {
        name: "position".to_string(),
        value: ALLOWED_POSITIONS[next].as_str().to_string(),
    })
}

/// Build an `EditField` command by applying `mutate` to the focused
/// field's current text from the snapshot draft.
fn edit_focused_field(
    state: &ViewState,
    mutate: impl FnOnce(&mut String),
) -> Option<UserCommand> {
    let ModalSnapshot::Edit { draft, .. } = &state.snapshot.modal else {
        return None;
    };
    let name = EDITABLE_FIELDS[state.edit_field];
    let mut value = draft.field(name)?.to_string();
    mutate(&mut value);
    Some(UserCommand::EditField {
        name: name.to_string(),
        value,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{EditDraft, Player, SortField};
    use crate::protocol::{UiUpdate, ViewSnapshot};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn player(id: u64, name: &str) -> Player {
        Player {
            id: Some(id),
            name: name.to_string(),
            position: None,
            games: None,
            at_bat: None,
            runs: None,
            hits: None,
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
        }
    }

    fn state_with(players: Vec<Player>, modal: ModalSnapshot) -> ViewState {
        let mut state = ViewState::default();
        state.apply_update(UiUpdate::Snapshot(Box::new(ViewSnapshot {
            players,
            loading: false,
            load_error: None,
            sort_field: SortField::Hits,
            modal,
        })));
        state
    }

    #[test]
    fn ctrl_c_quits_in_any_mode() {
        let mut state = state_with(
            vec![player(1, "A")],
            ModalSnapshot::Description {
                id: 1,
                player_name: "A".to_string(),
                text: None,
            },
        );
        let ev = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handle_key(ev, &mut state), Some(UserCommand::Quit));
    }

    #[test]
    fn release_events_are_ignored() {
        let mut state = state_with(vec![player(1, "A")], ModalSnapshot::Closed);
        let mut ev = key(KeyCode::Char('q'));
        ev.kind = KeyEventKind::Release;
        assert_eq!(handle_key(ev, &mut state), None);
    }

    #[test]
    fn arrows_move_selection_within_bounds() {
        let mut state = state_with(
            vec![player(1, "A"), player(2, "B")],
            ModalSnapshot::Closed,
        );
        assert_eq!(handle_key(key(KeyCode::Down), &mut state), None);
        assert_eq!(state.selected, 1);
        assert_eq!(handle_key(key(KeyCode::Down), &mut state), None);
        assert_eq!(state.selected, 1);
        handle_key(key(KeyCode::Up), &mut state);
        assert_eq!(state.selected, 0);
        handle_key(key(KeyCode::Up), &mut state);
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn enter_requests_description_for_selected_row() {
        let mut state = state_with(
            vec![player(7, "A"), player(9, "B")],
            ModalSnapshot::Closed,
        );
        state.selected = 1;
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut state),
            Some(UserCommand::ShowDescription(9))
        );
    }

    #[test]
    fn enter_is_inert_without_a_server_id() {
        let mut local = player(0, "A");
        local.id = None;
        let mut state = state_with(vec![local], ModalSnapshot::Closed);
        assert_eq!(handle_key(key(KeyCode::Enter), &mut state), None);
        assert_eq!(handle_key(key(KeyCode::Char('e')), &mut state), None);
    }

    #[test]
    fn e_opens_edit_for_selected_row() {
        let mut state = state_with(vec![player(7, "A")], ModalSnapshot::Closed);
        assert_eq!(
            handle_key(key(KeyCode::Char('e')), &mut state),
            Some(UserCommand::OpenEdit(7))
        );
    }

    #[test]
    fn s_cycles_the_sort_field() {
        let mut state = state_with(vec![player(1, "A")], ModalSnapshot::Closed);
        assert_eq!(
            handle_key(key(KeyCode::Char('s')), &mut state),
            Some(UserCommand::SetSort(SortField::Hits.next()))
        );
    }

    #[test]
    fn r_refreshes_the_list() {
        let mut state = state_with(Vec::new(), ModalSnapshot::Closed);
        assert_eq!(
            handle_key(key(KeyCode::Char('r')), &mut state),
            Some(UserCommand::Refresh)
        );
    }

    #[test]
    fn description_modal_closes_on_esc_and_enter() {
        let modal = ModalSnapshot::Description {
            id: 1,
            player_name: "A".to_string(),
            text: Some("bio".to_string()),
        };
        let mut state = state_with(vec![player(1, "A")], modal);
        assert_eq!(
            handle_key(key(KeyCode::Esc), &mut state),
            Some(UserCommand::CloseModal)
        );
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut state),
            Some(UserCommand::CloseModal)
        );
        // Table keys are swallowed while the modal is up.
        assert_eq!(handle_key(key(KeyCode::Char('e')), &mut state), None);
    }

    fn edit_state() -> ViewState {
        let mut draft = EditDraft::default();
        draft.set_field("hits", "20".to_string());
        state_with(
            vec![player(1, "A")],
            ModalSnapshot::Edit {
                id: 1,
                player_name: "A".to_string(),
                draft,
                error: None,
                saving: false,
            },
        )
    }

    #[test]
    fn edit_modal_tab_cycles_fields() {
        let mut state = edit_state();
        assert_eq!(handle_key(key(KeyCode::Tab), &mut state), None);
        assert_eq!(state.edit_field, 1);
        assert_eq!(handle_key(key(KeyCode::BackTab), &mut state), None);
        assert_eq!(state.edit_field, 0);
        handle_key(key(KeyCode::BackTab), &mut state);
        assert_eq!(state.edit_field, EDITABLE_FIELDS.len() - 1);
    }

    #[test]
    fn edit_modal_typing_emits_field_updates() {
        let mut state = edit_state();
        // Focus the hits field (index 3 in EDITABLE_FIELDS).
        state.edit_field = EDITABLE_FIELDS.iter().position(|f| *f == "hits").unwrap();
        assert_eq!(
            handle_key(key(KeyCode::Char('5')), &mut state),
            Some(UserCommand::EditField {
                name: "hits".to_string(),
                value: "205".to_string(),
            })
        );
        assert_eq!(
            handle_key(key(KeyCode::Backspace), &mut state),
            Some(UserCommand::EditField {
                name: "hits".to_string(),
                value: "2".to_string(),
            })
        );
    }

    #[test]
    fn arrows_cycle_position_when_focused() {
        let mut state = edit_state();
        // Position is the first field, focused by default. The draft is
        // unset, so the first step lands on the first abbreviation.
        assert_eq!(
            handle_key(key(KeyCode::Right), &mut state),
            Some(UserCommand::EditField {
                name: "position".to_string(),
                value: "C".to_string(),
            })
        );

        // With a known abbreviation in the draft, Right steps forward and
        // Left wraps backward.
        if let ModalSnapshot::Edit { draft, .. } = &mut state.snapshot.modal {
            draft.set_field("position", "C".to_string());
        }
        assert_eq!(
            handle_key(key(KeyCode::Right), &mut state),
            Some(UserCommand::EditField {
                name: "position".to_string(),
                value: "1B".to_string(),
            })
        );
        assert_eq!(
            handle_key(key(KeyCode::Left), &mut state),
            Some(UserCommand::EditField {
                name: "position".to_string(),
                value: "OF".to_string(),
            })
        );
    }

    #[test]
    fn arrows_are_inert_on_stat_fields() {
        let mut state = edit_state();
        state.edit_field = EDITABLE_FIELDS.iter().position(|f| *f == "hits").unwrap();
        assert_eq!(handle_key(key(KeyCode::Left), &mut state), None);
        assert_eq!(handle_key(key(KeyCode::Right), &mut state), None);
    }

    #[test]
    fn edit_modal_enter_saves_and_esc_closes() {
        let mut state = edit_state();
        assert_eq!(
            handle_key(key(KeyCode::Enter), &mut state),
            Some(UserCommand::Save)
        );
        assert_eq!(
            handle_key(key(KeyCode::Esc), &mut state),
            Some(UserCommand::CloseModal)
        );
    }
}
