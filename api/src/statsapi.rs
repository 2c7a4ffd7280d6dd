/// MLB StatsAPI raw wire types — serde shapes for deserializing StatsAPI responses.
/// Every field is optional: the upstream omits keys freely depending on hydration,
/// season, and game state. These map to the clean domain types in client.rs.
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Schedule  (/api/v1/schedule, hydrated with broadcasts + media epg)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleResponse {
    pub dates: Option<Vec<ScheduleDate>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ScheduleDate {
    /// "YYYY-MM-DD" — used as the game-time fallback when gameDate is missing.
    pub date: Option<String>,
    pub games: Option<Vec<ScheduleGame>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleGame {
    /// ISO 8601 UTC, e.g. "2024-05-20T23:10:00Z".
    pub game_date: Option<String>,
    pub status: Option<GameState>,
    pub teams: Option<GameTeams>,
    /// Flat broadcast list from hydrate=broadcasts(all).
    pub broadcasts: Option<Vec<Broadcast>>,
    /// Nested programming guide from hydrate=game(content(media(epg))).
    pub content: Option<GameContent>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// "Preview" | "Live" | "Final" — coarse state used only as a filter.
    pub abstract_game_state: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct GameTeams {
    pub home: Option<GameTeamSide>,
    pub away: Option<GameTeamSide>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct GameTeamSide {
    pub team: Option<TeamInfo>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct TeamInfo {
    pub id: Option<u32>,
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// Broadcasts — one record shape shared by the flat list and the epg items
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Broadcast {
    /// Free-text call type: "TV" | "AM" | "FM" | "MLBTV" | absent.
    #[serde(rename = "type")]
    pub call_type: Option<String>,
    pub name: Option<String>,
    /// Some epg items carry only a description instead of a name.
    pub description: Option<String>,
    pub call_sign: Option<String>,
    pub is_national: Option<bool>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct GameContent {
    pub media: Option<GameMedia>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct GameMedia {
    pub epg: Option<Vec<EpgGroup>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct EpgGroup {
    /// Group title, e.g. "MLBTV", "TV", "Radio". Matched case-insensitively.
    pub title: Option<String>,
    pub items: Option<Vec<Broadcast>>,
}

// ---------------------------------------------------------------------------
// Standings  (/api/v1/standings)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
pub struct StandingsResponse {
    pub records: Option<Vec<StandingsRecord>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct StandingsRecord {
    pub division: Option<GroupName>,
    pub league: Option<GroupName>,
    pub team_records: Option<Vec<TeamRecord>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GroupName {
    pub name_short: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TeamRecord {
    pub team: Option<TeamInfo>,
    pub league_record: Option<WinLossRecord>,
    /// Ranks arrive as strings ("1", "T2"), not numbers.
    pub division_rank: Option<String>,
    pub league_rank: Option<String>,
    /// "-" for the division leader, otherwise a decimal string like "3.5".
    pub games_back: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct WinLossRecord {
    pub wins: Option<u32>,
    pub losses: Option<u32>,
}
