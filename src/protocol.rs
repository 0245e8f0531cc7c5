// Channel message types shared between the controller, the network tasks,
// and the TUI render loop.

use crate::player::{EditDraft, Player, SortField};

// ---------------------------------------------------------------------------
// User commands (TUI -> controller)
// ---------------------------------------------------------------------------

/// A user action, translated from key input by the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// Open the description modal for a player.
    ShowDescription(u64),
    /// Open the edit form for a player.
    OpenEdit(u64),
    /// Dismiss whichever modal is open.
    CloseModal,
    /// Update one field of the current edit draft.
    EditField { name: String, value: String },
    /// Submit the current edit draft.
    Save,
    /// Re-sort the table by a different statistic.
    SetSort(SortField),
    /// Re-fetch the player list.
    Refresh,
    /// Shut down.
    Quit,
}

// ---------------------------------------------------------------------------
// Network completions (spawned tasks -> controller)
// ---------------------------------------------------------------------------

/// Completion of a backend request, delivered to the control loop.
///
/// Errors travel as display strings: by the time a failure reaches the
/// controller it is only ever shown, never matched on.
#[derive(Debug, Clone, PartialEq)]
pub enum NetEvent {
    /// Initial or refreshed list load finished. `generation` identifies the
    /// load request; results from superseded generations are discarded.
    PlayersLoaded {
        result: Result<Vec<Player>, String>,
        generation: u64,
    },
    /// Description fetch for one player finished.
    DescriptionLoaded {
        id: u64,
        result: Result<String, String>,
    },
    /// Edit save finished. Carries the draft that was submitted so the
    /// success handler patches the right values even if the edit state has
    /// since moved to another player.
    SaveCompleted {
        id: u64,
        draft: EditDraft,
        result: Result<(), String>,
    },
}

// ---------------------------------------------------------------------------
// View snapshots (controller -> TUI)
// ---------------------------------------------------------------------------

/// Update pushed to the render loop after every state change.
#[derive(Debug, Clone)]
pub enum UiUpdate {
    Snapshot(Box<ViewSnapshot>),
}

/// Which overlay the snapshot wants rendered. At most one is ever active.
#[derive(Debug, Clone, PartialEq)]
pub enum ModalSnapshot {
    Closed,
    /// Description overlay; `text` is None while the fetch is in flight.
    Description {
        id: u64,
        player_name: String,
        text: Option<String>,
    },
    /// Edit form overlay.
    Edit {
        id: u64,
        player_name: String,
        draft: EditDraft,
        error: Option<String>,
        saving: bool,
    },
}

/// Complete render input. The TUI is a pure function of this plus its own
/// presentation-local state (row selection, focused form field).
#[derive(Debug, Clone)]
pub struct ViewSnapshot {
    /// Players in display order (sorted descending by `sort_field`).
    pub players: Vec<Player>,
    /// True while the list load is in flight.
    pub loading: bool,
    /// Page-level error from a failed list load.
    pub load_error: Option<String>,
    /// Statistic the table is ordered by.
    pub sort_field: SortField,
    /// Active overlay, if any.
    pub modal: ModalSnapshot,
}
