// Application state and orchestration logic.
//
// One controller owns every piece of semantic state: the player list, the
// per-player description cache, the modal, the edit draft, and the sort
// field. User commands and network completions arrive over mpsc channels
// and are applied on a single control loop; after every change a full view
// snapshot is pushed to the TUI render loop.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::player::{EditDraft, Player, SortField};
use crate::protocol::{ModalSnapshot, NetEvent, UiUpdate, UserCommand, ViewSnapshot};

// ---------------------------------------------------------------------------
// Modal
// ---------------------------------------------------------------------------

/// The active overlay. A single tagged variant makes the description/edit
/// mutual exclusion structural: opening one necessarily closes the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    Closed,
    Description(u64),
    Edit(u64),
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// The complete application state.
pub struct AppState {
    /// Source of truth for the table. Patched in place by id after a
    /// successful edit save; never re-fetched post-edit.
    pub players: Vec<Player>,
    /// True while a list load is in flight.
    pub loading: bool,
    /// Page-level error from a failed list load.
    pub load_error: Option<String>,
    /// Session cache of fetched descriptions, keyed by player id. Failed
    /// fetches are cached too (as display text), so they are not retried.
    pub descriptions: HashMap<u64, String>,
    /// Ids with a description fetch in flight. Doubles as the request
    /// de-duplication guard.
    pub description_loading: HashSet<u64>,
    /// The active overlay.
    pub modal: Modal,
    /// Working copy of the edited player's fields. Present exactly while
    /// `modal` is `Edit`.
    pub draft: Option<EditDraft>,
    /// Error from the last failed save, shown inside the edit form.
    pub edit_error: Option<String>,
    /// True while a save is in flight (the form's save action is inert).
    pub edit_saving: bool,
    /// Statistic the table is ordered by.
    pub sort_field: SortField,
    /// Identifies the current list-load request. Results tagged with an
    /// older generation are discarded, so a superseded or torn-down load
    /// never mutates state.
    pub list_generation: u64,
    /// Backend client, shared with spawned request tasks.
    pub api: Arc<ApiClient>,
    /// Sender for network completions; request tasks use a clone to report
    /// back to the control loop.
    pub net_tx: mpsc::Sender<NetEvent>,
}

impl AppState {
    pub fn new(api: ApiClient, net_tx: mpsc::Sender<NetEvent>) -> Self {
        AppState {
            players: Vec::new(),
            loading: false,
            load_error: None,
            descriptions: HashMap::new(),
            description_loading: HashSet::new(),
            modal: Modal::Closed,
            draft: None,
            edit_error: None,
            edit_saving: false,
            sort_field: SortField::default(),
            list_generation: 0,
            api: Arc::new(api),
            net_tx,
        }
    }

    // -- List load ----------------------------------------------------------

    /// Start (or restart) the player list load.
    pub fn load_players(&mut self) {
        self.list_generation += 1;
        let generation = self.list_generation;
        self.loading = true;
        self.load_error = None;

        let api = Arc::clone(&self.api);
        let tx = self.net_tx.clone();
        tokio::spawn(async move {
            let result = api
                .list_players()
                .await
                .map_err(|e| e.display_message());
            let _ = tx.send(NetEvent::PlayersLoaded { result, generation }).await;
        });
        info!(generation, "player list load started");
    }

    // -- Description lookup -------------------------------------------------

    /// Open the description modal for a player, fetching the text if this
    /// session has not seen it yet.
    ///
    /// No-op for a player without an id. A fetch already in flight for the
    /// same id is not duplicated; the modal just re-opens over it.
    pub fn show_description(&mut self, id: Option<u64>) {
        let Some(id) = id else { return };

        // Structural mutual exclusion: replacing the modal closes the edit
        // form, so its working state must go with it.
        self.clear_edit_state();
        self.modal = Modal::Description(id);

        if self.descriptions.contains_key(&id) {
            debug!(id, "description cache hit");
            return;
        }
        if self.description_loading.contains(&id) {
            debug!(id, "description fetch already in flight");
            return;
        }

        self.description_loading.insert(id);
        let api = Arc::clone(&self.api);
        let tx = self.net_tx.clone();
        tokio::spawn(async move {
            let result = api
                .fetch_description(id)
                .await
                .map_err(|e| e.display_message());
            let _ = tx.send(NetEvent::DescriptionLoaded { id, result }).await;
        });
        info!(id, "description fetch started");
    }

    // -- Edit lifecycle -----------------------------------------------------

    /// Open the edit form for a player, seeding the draft from its current
    /// values. No-op for an id not in the list.
    pub fn open_edit(&mut self, id: Option<u64>) {
        let Some(id) = id else { return };
        let Some(player) = self.players.iter().find(|p| p.id == Some(id)) else {
            warn!(id, "open_edit for unknown player id");
            return;
        };

        self.draft = Some(EditDraft::from_player(player));
        self.edit_error = None;
        self.edit_saving = false;
        self.modal = Modal::Edit(id);
    }

    /// Dismiss whichever modal is open. Always safe to call.
    pub fn close_modal(&mut self) {
        self.modal = Modal::Closed;
        self.clear_edit_state();
    }

    /// Update one field of the current draft. No validation here: ranges
    /// are enforced by the form's hints and by the server on save.
    pub fn change_field(&mut self, name: &str, value: String) {
        if let Some(draft) = &mut self.draft {
            if !draft.set_field(name, value) {
                warn!(field = name, "change_field for unknown field");
            }
        }
    }

    /// Submit the current draft as a full update. The draft always goes
    /// over the wire; range enforcement is the server's, and a rejected
    /// save surfaces the server's parsed error message.
    ///
    /// Inert unless the edit modal is open with no save already in flight.
    pub fn save(&mut self) {
        let Modal::Edit(id) = self.modal else { return };
        if self.edit_saving {
            return;
        }
        let Some(draft) = self.draft.clone() else { return };

        self.edit_saving = true;
        self.edit_error = None;

        let api = Arc::clone(&self.api);
        let tx = self.net_tx.clone();
        tokio::spawn(async move {
            let result = api
                .update_player(id, &draft)
                .await
                .map_err(|e| e.display_message());
            let _ = tx.send(NetEvent::SaveCompleted { id, draft, result }).await;
        });
        info!(id, "edit save started");
    }

    fn clear_edit_state(&mut self) {
        self.draft = None;
        self.edit_error = None;
        self.edit_saving = false;
    }

    // -- Sorting ------------------------------------------------------------

    pub fn set_sort_field(&mut self, field: SortField) {
        self.sort_field = field;
    }

    /// The display order: players sorted descending by the current sort
    /// field, absent values as zero. Stable, so ties keep list order.
    pub fn sorted_players(&self) -> Vec<&Player> {
        let field = self.sort_field;
        let mut view: Vec<&Player> = self.players.iter().collect();
        view.sort_by(|a, b| b.sort_value(field).total_cmp(&a.sort_value(field)));
        view
    }

    // -- Network completions ------------------------------------------------

    /// Apply one network completion to the state.
    pub fn handle_net_event(&mut self, event: NetEvent) {
        match event {
            NetEvent::PlayersLoaded { result, generation } => {
                if generation != self.list_generation {
                    debug!(
                        generation,
                        current = self.list_generation,
                        "discarding stale list load"
                    );
                    return;
                }
                self.loading = false;
                match result {
                    Ok(players) => {
                        info!(count = players.len(), "player list loaded");
                        self.players = players;
                        self.load_error = None;
                    }
                    Err(message) => {
                        warn!(%message, "player list load failed");
                        self.load_error = Some(message);
                    }
                }
            }

            NetEvent::DescriptionLoaded { id, result } => {
                self.description_loading.remove(&id);
                let text = match result {
                    Ok(text) => text,
                    // Failures are cached as display text; a repeated open
                    // shows the cached error instead of retrying.
                    Err(message) => {
                        warn!(id, %message, "description fetch failed");
                        format!("Error: {message}")
                    }
                };
                self.descriptions.insert(id, text);
            }

            NetEvent::SaveCompleted { id, draft, result } => match result {
                Ok(()) => {
                    info!(id, "edit save succeeded");
                    if let Some(player) = self.players.iter_mut().find(|p| p.id == Some(id)) {
                        draft.apply_to(player);
                    }
                    // Close the form only if it still targets the saved
                    // player; a newer edit keeps its own state.
                    if self.modal == Modal::Edit(id) {
                        self.close_modal();
                    }
                }
                Err(message) => {
                    warn!(id, %message, "edit save failed");
                    if self.modal == Modal::Edit(id) {
                        self.edit_error = Some(message);
                        self.edit_saving = false;
                    }
                }
            },
        }
    }

    // -- Snapshots ----------------------------------------------------------

    /// Capture everything the render loop needs into one snapshot.
    pub fn build_snapshot(&self) -> ViewSnapshot {
        let modal = match self.modal {
            Modal::Closed => ModalSnapshot::Closed,
            Modal::Description(id) => ModalSnapshot::Description {
                id,
                player_name: self.player_name(id),
                text: self.descriptions.get(&id).cloned(),
            },
            Modal::Edit(id) => ModalSnapshot::Edit {
                id,
                player_name: self.player_name(id),
                draft: self.draft.clone().unwrap_or_default(),
                error: self.edit_error.clone(),
                saving: self.edit_saving,
            },
        };

        ViewSnapshot {
            players: self.sorted_players().into_iter().cloned().collect(),
            loading: self.loading,
            load_error: self.load_error.clone(),
            sort_field: self.sort_field,
            modal,
        }
    }

    fn player_name(&self, id: u64) -> String {
        self.players
            .iter()
            .find(|p| p.id == Some(id))
            .map(|p| p.name.clone())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Control loop
// ---------------------------------------------------------------------------

/// Run the control loop until the user quits or the channels close.
///
/// Listens on two channels with `tokio::select!`: user commands from the
/// TUI and network completions from spawned request tasks. Every handled
/// event is followed by a snapshot push so the view never goes stale.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut net_rx: mpsc::Receiver<NetEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("control loop started");

    // Paint the initial state (usually "loading") before any event lands.
    let _ = ui_tx
        .send(UiUpdate::Snapshot(Box::new(state.build_snapshot())))
        .await;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("quit command received");
                        break;
                    }
                    Some(cmd) => handle_user_command(&mut state, cmd),
                    None => {
                        info!("command channel closed, shutting down");
                        break;
                    }
                }
            }
            event = net_rx.recv() => {
                match event {
                    Some(event) => state.handle_net_event(event),
                    None => {
                        info!("network channel closed, shutting down");
                        break;
                    }
                }
            }
        }

        let _ = ui_tx
            .send(UiUpdate::Snapshot(Box::new(state.build_snapshot())))
            .await;
    }

    info!("control loop exiting");
    Ok(())
}

fn handle_user_command(state: &mut AppState, cmd: UserCommand) {
    match cmd {
        UserCommand::ShowDescription(id) => state.show_description(Some(id)),
        UserCommand::OpenEdit(id) => state.open_edit(Some(id)),
        UserCommand::CloseModal => state.close_modal(),
        UserCommand::EditField { name, value } => state.change_field(&name, value),
        UserCommand::Save => state.save(),
        UserCommand::SetSort(field) => state.set_sort_field(field),
        UserCommand::Refresh => state.load_players(),
        UserCommand::Quit => {}
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
