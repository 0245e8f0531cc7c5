// Players table widget: the full stat line for every player, ordered by
// the active sort field.
//
// The column matching the sort field is highlighted so the current
// ordering is visible at a glance.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Row, Table, TableState};
use ratatui::Frame;

use crate::player::{Player, SortField, SORT_FIELDS};
use crate::tui::ViewState;

/// Render the players table into the given area.
pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let sort_field = state.snapshot.sort_field;

    let mut header_cells = vec![
        Cell::from("Name"),
        Cell::from("Pos"),
    ];
    for field in SORT_FIELDS {
        let style = if field == sort_field {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        header_cells.push(Cell::from(field.label()).style(style));
    }
    let header = Row::new(header_cells)
        .style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(0);

    let rows: Vec<Row> = state
        .snapshot
        .players
        .iter()
        .map(|p| {
            let mut cells = vec![
                Cell::from(p.name.clone()),
                Cell::from(p.position.clone().unwrap_or_else(|| "--".to_string())),
            ];
            for field in SORT_FIELDS {
                cells.push(Cell::from(stat_cell(p, field)));
            }
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Min(16), Constraint::Length(4)];
    widths.extend(SORT_FIELDS.iter().map(|f| {
        // Rate columns need room for "0.338"; counting stats fit in 4.
        if is_rate(*f) {
            Constraint::Length(6)
        } else {
            Constraint::Length(4)
        }
    }));

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(build_title(state)),
        )
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(">> ");

    let mut table_state = TableState::default();
    if !state.snapshot.players.is_empty() {
        table_state.select(Some(state.selected));
    }
    frame.render_stateful_widget(table, area, &mut table_state);
}

/// Format one stat cell; absent stats render as "--".
pub fn stat_cell(player: &Player, field: SortField) -> String {
    if is_rate(field) {
        let value = match field {
            SortField::BattingAverage => player.batting_average,
            SortField::OnBasePercentage => player.on_base_percentage,
            SortField::SluggingPercentage => player.slugging_percentage,
            SortField::Ops => player.on_base_plus_slugging,
            _ => unreachable!(),
        };
        match value {
            Some(v) => format!("{v:.3}"),
            None => "--".to_string(),
        }
    } else {
        let value = match field {
            SortField::Games => player.games,
            SortField::AtBats => player.at_bat,
            SortField::Runs => player.runs,
            SortField::Hits => player.hits,
            SortField::Doubles => player.doubles,
            SortField::Triples => player.triples,
            SortField::HomeRuns => player.home_runs,
            SortField::Rbi => player.rbi,
            SortField::Walks => player.walks,
            SortField::Strikeouts => player.strikeouts,
            SortField::StolenBases => player.stolen_bases,
            SortField::CaughtStealing => player.caught_stealing,
            _ => unreachable!(),
        };
        match value {
            Some(v) => v.to_string(),
            None => "--".to_string(),
        }
    }
}

fn is_rate(field: SortField) -> bool {
    matches!(
        field,
        SortField::BattingAverage
            | SortField::OnBasePercentage
            | SortField::SluggingPercentage
            | SortField::Ops
    )
}

/// Build the title with the active sort field and player count.
fn build_title(state: &ViewState) -> Line<'static> {
    let mut title = format!(
        "Players by {} ({})",
        state.snapshot.sort_field.label(),
        state.snapshot.players.len()
    );
    if state.snapshot.loading {
        title.push_str(" [refreshing]");
    }
    Line::from(title)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
