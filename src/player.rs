// Player record, sortable statistics, and the edit-form draft.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

/// Defensive positions accepted by the update endpoint.
///
/// The list endpoint serves `position` as free text, so `Player` keeps the
/// raw string; this enum constrains only the edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Catcher,
    FirstBase,
    SecondBase,
    ThirdBase,
    ShortStop,
    LeftField,
    CenterField,
    RightField,
    DesignatedHitter,
    Pitcher,
    Outfield,
}

/// All positions the backend accepts, in edit-form cycle order.
pub const ALLOWED_POSITIONS: [Position; 11] = [
    Position::Catcher,
    Position::FirstBase,
    Position::SecondBase,
    Position::ThirdBase,
    Position::ShortStop,
    Position::LeftField,
    Position::CenterField,
    Position::RightField,
    Position::DesignatedHitter,
    Position::Pitcher,
    Position::Outfield,
];

impl Position {
    /// Parse a position abbreviation (case-insensitive).
    pub fn from_abbrev(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "C" => Some(Position::Catcher),
            "1B" => Some(Position::FirstBase),
            "2B" => Some(Position::SecondBase),
            "3B" => Some(Position::ThirdBase),
            "SS" => Some(Position::ShortStop),
            "LF" => Some(Position::LeftField),
            "CF" => Some(Position::CenterField),
            "RF" => Some(Position::RightField),
            "DH" => Some(Position::DesignatedHitter),
            "P" => Some(Position::Pitcher),
            "OF" => Some(Position::Outfield),
            _ => None,
        }
    }

    /// The abbreviation as the backend stores it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Catcher => "C",
            Position::FirstBase => "1B",
            Position::SecondBase => "2B",
            Position::ThirdBase => "3B",
            Position::ShortStop => "SS",
            Position::LeftField => "LF",
            Position::CenterField => "CF",
            Position::RightField => "RF",
            Position::DesignatedHitter => "DH",
            Position::Pitcher => "P",
            Position::Outfield => "OF",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// One athlete's identity plus career batting statistics.
///
/// Every stat is optional: the backend stores them as nullable columns, and
/// the table renders absent values as a placeholder and sorts them as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    #[serde(default)]
    pub id: Option<u64>,
    pub name: String,
    #[serde(default)]
    pub position: Option<String>,

    #[serde(default)]
    pub games: Option<u32>,
    #[serde(default)]
    pub at_bat: Option<u32>,
    #[serde(default)]
    pub runs: Option<u32>,
    #[serde(default)]
    pub hits: Option<u32>,
    #[serde(default)]
    pub doubles: Option<u32>,
    #[serde(default)]
    pub triples: Option<u32>,
    #[serde(default)]
    pub home_runs: Option<u32>,
    #[serde(default)]
    pub rbi: Option<u32>,
    #[serde(default)]
    pub walks: Option<u32>,
    #[serde(default)]
    pub strikeouts: Option<u32>,
    #[serde(default)]
    pub stolen_bases: Option<u32>,
    #[serde(default)]
    pub caught_stealing: Option<u32>,

    #[serde(default)]
    pub batting_average: Option<f64>,
    #[serde(default)]
    pub on_base_percentage: Option<f64>,
    #[serde(default)]
    pub slugging_percentage: Option<f64>,
    #[serde(default)]
    pub on_base_plus_slugging: Option<f64>,
}

impl Player {
    /// Numeric value used when ordering the table by `field`.
    ///
    /// Absent stats sort as zero so players with missing data sink to the
    /// bottom instead of raising.
    pub fn sort_value(&self, field: SortField) -> f64 {
        fn count(v: Option<u32>) -> f64 {
            v.map_or(0.0, f64::from)
        }
        match field {
            SortField::Games => count(self.games),
            SortField::AtBats => count(self.at_bat),
            SortField::Runs => count(self.runs),
            SortField::Hits => count(self.hits),
            SortField::Doubles => count(self.doubles),
            SortField::Triples => count(self.triples),
            SortField::HomeRuns => count(self.home_runs),
            SortField::Rbi => count(self.rbi),
            SortField::Walks => count(self.walks),
            SortField::Strikeouts => count(self.strikeouts),
            SortField::StolenBases => count(self.stolen_bases),
            SortField::CaughtStealing => count(self.caught_stealing),
            SortField::BattingAverage => self.batting_average.unwrap_or(0.0),
            SortField::OnBasePercentage => self.on_base_percentage.unwrap_or(0.0),
            SortField::SluggingPercentage => self.slugging_percentage.unwrap_or(0.0),
            SortField::Ops => self.on_base_plus_slugging.unwrap_or(0.0),
        }
    }
}

// ---------------------------------------------------------------------------
// SortField
// ---------------------------------------------------------------------------

/// The statistic currently used to order the table, descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
    Games,
    AtBats,
    Runs,
    Hits,
    Doubles,
    Triples,
    HomeRuns,
    Rbi,
    Walks,
    Strikeouts,
    StolenBases,
    CaughtStealing,
    BattingAverage,
    OnBasePercentage,
    SluggingPercentage,
    Ops,
}

impl Default for SortField {
    fn default() -> Self {
        SortField::Hits
    }
}

/// Cycle order for the sort hotkey, mirroring the table column order.
pub const SORT_FIELDS: [SortField; 16] = [
    SortField::Hits,
    SortField::Games,
    SortField::AtBats,
    SortField::Runs,
    SortField::Doubles,
    SortField::Triples,
    SortField::HomeRuns,
    SortField::Rbi,
    SortField::Walks,
    SortField::Strikeouts,
    SortField::StolenBases,
    SortField::CaughtStealing,
    SortField::BattingAverage,
    SortField::OnBasePercentage,
    SortField::SluggingPercentage,
    SortField::Ops,
];

impl SortField {
    /// Short label for headers and the status bar.
    pub fn label(&self) -> &'static str {
        match self {
            SortField::Games => "G",
            SortField::AtBats => "AB",
            SortField::Runs => "R",
            SortField::Hits => "H",
            SortField::Doubles => "2B",
            SortField::Triples => "3B",
            SortField::HomeRuns => "HR",
            SortField::Rbi => "RBI",
            SortField::Walks => "BB",
            SortField::Strikeouts => "SO",
            SortField::StolenBases => "SB",
            SortField::CaughtStealing => "CS",
            SortField::BattingAverage => "AVG",
            SortField::OnBasePercentage => "OBP",
            SortField::SluggingPercentage => "SLG",
            SortField::Ops => "OPS",
        }
    }

    /// The next field in cycle order, wrapping.
    pub fn next(&self) -> SortField {
        let idx = SORT_FIELDS.iter().position(|f| f == self).unwrap_or(0);
        SORT_FIELDS[(idx + 1) % SORT_FIELDS.len()]
    }
}

// ---------------------------------------------------------------------------
// Stat bounds
// ---------------------------------------------------------------------------

/// Historical min/max for integer stat fields, matching the ranges the
/// backend's update validation enforces. Shown as inline hints in the
/// edit form; enforcement itself stays server-side.
pub const INT_BOUNDS: [(&str, u32, u32); 11] = [
    ("games", 0, 3500),
    ("at_bat", 0, 14053),
    ("hits", 0, 4256),
    ("doubles", 8, 746),
    ("triples", 4, 177),
    ("home_runs", 117, 762),
    ("rbi", 418, 2499),
    ("walks", 183, 2558),
    ("strikeouts", 183, 2597),
    ("stolen_bases", 1, 808),
    ("caught_stealing", 0, 149),
];

/// Historical min/max for rate stat fields.
pub const RATE_BOUNDS: [(&str, f64, f64); 3] = [
    ("batting_average", 0.231, 0.43),
    ("slugging_percentage", 0.34, 0.69),
    ("on_base_plus_slugging", 0.671, 1.164),
];

/// Bounds for an integer field, if it is bounded.
pub fn int_bounds(field: &str) -> Option<(u32, u32)> {
    INT_BOUNDS
        .iter()
        .find(|(name, _, _)| *name == field)
        .map(|(_, lo, hi)| (*lo, *hi))
}

/// Bounds for a rate field, if it is bounded.
pub fn rate_bounds(field: &str) -> Option<(f64, f64)> {
    RATE_BOUNDS
        .iter()
        .find(|(name, _, _)| *name == field)
        .map(|(_, lo, hi)| (*lo, *hi))
}

// ---------------------------------------------------------------------------
// EditDraft
// ---------------------------------------------------------------------------

/// Field names the edit form exposes, in display order. `id`, `name`,
/// `runs`, and `on_base_percentage` are not editable on the backend.
pub const EDITABLE_FIELDS: [&str; 15] = [
    "position",
    "games",
    "at_bat",
    "hits",
    "doubles",
    "triples",
    "home_runs",
    "rbi",
    "walks",
    "strikeouts",
    "stolen_bases",
    "caught_stealing",
    "batting_average",
    "slugging_percentage",
    "on_base_plus_slugging",
];

/// Mutable working copy of one player's editable fields.
///
/// Values are kept as form text: seeded from the player with absent stats
/// becoming empty strings, discarded on cancel or successful save, and
/// never partially persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditDraft {
    pub position: String,
    pub games: String,
    pub at_bat: String,
    pub hits: String,
    pub doubles: String,
    pub triples: String,
    pub home_runs: String,
    pub rbi: String,
    pub walks: String,
    pub strikeouts: String,
    pub stolen_bases: String,
    pub caught_stealing: String,
    pub batting_average: String,
    pub slugging_percentage: String,
    pub on_base_plus_slugging: String,
}

fn count_text(v: Option<u32>) -> String {
    v.map(|n| n.to_string()).unwrap_or_default()
}

fn rate_text(v: Option<f64>) -> String {
    v.map(|r| format!("{r}")).unwrap_or_default()
}

impl EditDraft {
    /// Seed a draft from the player's current values.
    pub fn from_player(player: &Player) -> Self {
        EditDraft {
            position: player.position.clone().unwrap_or_default(),
            games: count_text(player.games),
            at_bat: count_text(player.at_bat),
            hits: count_text(player.hits),
            doubles: count_text(player.doubles),
            triples: count_text(player.triples),
            home_runs: count_text(player.home_runs),
            rbi: count_text(player.rbi),
            walks: count_text(player.walks),
            strikeouts: count_text(player.strikeouts),
            stolen_bases: count_text(player.stolen_bases),
            caught_stealing: count_text(player.caught_stealing),
            batting_average: rate_text(player.batting_average),
            slugging_percentage: rate_text(player.slugging_percentage),
            on_base_plus_slugging: rate_text(player.on_base_plus_slugging),
        }
    }

    /// Read one field by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        let v = match name {
            "position" => &self.position,
            "games" => &self.games,
            "at_bat" => &self.at_bat,
            "hits" => &self.hits,
            "doubles" => &self.doubles,
            "triples" => &self.triples,
            "home_runs" => &self.home_runs,
            "rbi" => &self.rbi,
            "walks" => &self.walks,
            "strikeouts" => &self.strikeouts,
            "stolen_bases" => &self.stolen_bases,
            "caught_stealing" => &self.caught_stealing,
            "batting_average" => &self.batting_average,
            "slugging_percentage" => &self.slugging_percentage,
            "on_base_plus_slugging" => &self.on_base_plus_slugging,
            _ => return None,
        };
        Some(v.as_str())
    }

    /// Update exactly one field. Returns false for an unknown field name.
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        let slot = match name {
            "position" => &mut self.position,
            "games" => &mut self.games,
            "at_bat" => &mut self.at_bat,
            "hits" => &mut self.hits,
            "doubles" => &mut self.doubles,
            "triples" => &mut self.triples,
            "home_runs" => &mut self.home_runs,
            "rbi" => &mut self.rbi,
            "walks" => &mut self.walks,
            "strikeouts" => &mut self.strikeouts,
            "stolen_bases" => &mut self.stolen_bases,
            "caught_stealing" => &mut self.caught_stealing,
            "batting_average" => &mut self.batting_average,
            "slugging_percentage" => &mut self.slugging_percentage,
            "on_base_plus_slugging" => &mut self.on_base_plus_slugging,
            _ => return false,
        };
        *slot = value;
        true
    }

    /// Build the PUT request body: every editable field, empty text sent as
    /// null so the backend clears the column.
    pub fn to_update_body(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for name in EDITABLE_FIELDS {
            let text = self.field(name).unwrap_or_default();
            let value = if text.is_empty() {
                serde_json::Value::Null
            } else {
                serde_json::Value::String(text.to_string())
            };
            map.insert(name.to_string(), value);
        }
        serde_json::Value::Object(map)
    }

    /// Shallow-merge the draft over `player` after a successful save.
    ///
    /// Identity and name are untouched. Empty text clears the stat;
    /// unparsable text (which the backend would have rejected) leaves the
    /// existing value in place.
    pub fn apply_to(&self, player: &mut Player) {
        player.position = if self.position.is_empty() {
            None
        } else {
            Some(self.position.clone())
        };

        fn merge_count(slot: &mut Option<u32>, text: &str) {
            if text.is_empty() {
                *slot = None;
            } else if let Ok(v) = text.parse::<u32>() {
                *slot = Some(v);
            }
        }
        fn merge_rate(slot: &mut Option<f64>, text: &str) {
            if text.is_empty() {
                *slot = None;
            } else if let Ok(v) = text.parse::<f64>() {
                *slot = Some(v);
            }
        }

        merge_count(&mut player.games, &self.games);
        merge_count(&mut player.at_bat, &self.at_bat);
        merge_count(&mut player.hits, &self.hits);
        merge_count(&mut player.doubles, &self.doubles);
        merge_count(&mut player.triples, &self.triples);
        merge_count(&mut player.home_runs, &self.home_runs);
        merge_count(&mut player.rbi, &self.rbi);
        merge_count(&mut player.walks, &self.walks);
        merge_count(&mut player.stolen_bases, &self.stolen_bases);
        merge_count(&mut player.caught_stealing, &self.caught_stealing);
        merge_count(&mut player.strikeouts, &self.strikeouts);
        merge_rate(&mut player.batting_average, &self.batting_average);
        merge_rate(&mut player.slugging_percentage, &self.slugging_percentage);
        merge_rate(&mut player.on_base_plus_slugging, &self.on_base_plus_slugging);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
