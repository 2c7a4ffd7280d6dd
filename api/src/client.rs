use crate::broadcasts::normalize_broadcasts;
use crate::gametime::format_game_time;
use crate::statsapi::{
    ScheduleGame, ScheduleResponse, StandingsResponse, TeamInfo, TeamRecord,
};
use crate::{HomeAway, Standings, UpcomingGame};
use chrono::{Datelike, Days, Utc};
use chrono_tz::Tz;
use log::debug;
use reqwest::Client;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const STATSAPI_BASE: &str = "https://statsapi.mlb.com";

/// Hydration flags embedding broadcasts, linescore, and the media epg in the
/// schedule response. Field names are upstream-defined; matched literally.
const SCHEDULE_HYDRATE: &str =
    "team,broadcasts(all),linescore,game(content(media(epg))),series(content),venue";

/// Coarse game states excluded from the card.
const TERMINAL_STATES: [&str; 4] = ["Final", "Game Over", "Completed Early", "Cancelled"];

/// MLB StatsAPI client backed by the public statsapi.mlb.com endpoints.
#[derive(Debug, Clone)]
pub struct MlbApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for MlbApi {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .user_agent("trmnl-mlb/0.1 (e-ink schedule card)")
                .build()
                .unwrap_or_default(),
            base_url: STATSAPI_BASE.to_owned(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    Api(reqwest::Error, String),
    Parsing(reqwest::Error, String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Api(e, url) => write!(f, "API error for {url}: {e}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl MlbApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Client pointed at a different host. Used by tests against a mock server.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Fetch the team's non-final games in `[today, today + days - 1]`,
    /// already filtered, normalized, and formatted for display.
    ///
    /// At most `days` games are returned; doubleheaders beyond that are cut.
    pub async fn fetch_upcoming_games(
        &self,
        team_id: u32,
        days: u32,
        tz: Tz,
    ) -> ApiResult<Vec<UpcomingGame>> {
        let start = Utc::now().date_naive();
        let end = start
            .checked_add_days(Days::new(u64::from(days.saturating_sub(1))))
            .unwrap_or(start);
        let url = format!(
            "{}/api/v1/schedule?sportId=1&teamId={team_id}&startDate={start}&endDate={end}&hydrate={SCHEDULE_HYDRATE}",
            self.base_url
        );
        debug!("fetching schedule: {url}");
        let raw: ScheduleResponse = self.get(&url).await?;
        Ok(map_schedule(raw, team_id, days as usize, tz))
    }

    /// Fetch the current regular-season standings line for the team.
    /// Returns all-"N/A" sentinels when the team is absent from the response.
    pub async fn fetch_standings(&self, team_id: u32) -> ApiResult<Standings> {
        let season = Utc::now().year();
        let url = format!(
            "{}/api/v1/standings?leagueId=103,104&season={season}&standingsTypes=regularSeason",
            self.base_url
        );
        debug!("fetching standings: {url}");
        let raw: StandingsResponse = self.get(&url).await?;
        Ok(map_standings(raw, team_id))
    }

    async fn get<T: Default + serde::de::DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        match response.error_for_status() {
            Ok(res) => res
                .json::<T>()
                .await
                .map_err(|e| ApiError::Parsing(e, url.to_owned())),
            Err(e) => {
                if e.status().map(|s| s.is_client_error()).unwrap_or(false) {
                    Ok(T::default())
                } else {
                    Err(ApiError::Api(e, url.to_owned()))
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Mapping: StatsAPI wire types → clean domain types
// ---------------------------------------------------------------------------

fn map_schedule(raw: ScheduleResponse, team_id: u32, limit: usize, tz: Tz) -> Vec<UpcomingGame> {
    let mut games = Vec::new();
    for date in raw.dates.unwrap_or_default() {
        let fallback_date = date.date;
        for game in date.games.unwrap_or_default() {
            if games.len() >= limit {
                return games;
            }
            let status = game
                .status
                .as_ref()
                .and_then(|s| s.abstract_game_state.clone())
                .unwrap_or_else(|| "Unknown".to_owned());
            if TERMINAL_STATES.contains(&status.as_str()) {
                continue;
            }
            // Neither side matching the target id should be unreachable given
            // the teamId query param, but a malformed record is just skipped.
            let Some((opponent, home_away)) = resolve_opponent(&game, team_id) else {
                continue;
            };
            let broadcasts = normalize_broadcasts(&game);
            let raw_time = game.game_date.as_deref().or(fallback_date.as_deref());
            let game_time = format_game_time(raw_time, tz);
            games.push(UpcomingGame {
                opponent,
                game_time,
                broadcasts,
                status,
                home_away,
            });
        }
    }
    games
}

fn resolve_opponent(game: &ScheduleGame, team_id: u32) -> Option<(String, HomeAway)> {
    let teams = game.teams.as_ref()?;
    let home = teams.home.as_ref().and_then(|s| s.team.as_ref());
    let away = teams.away.as_ref().and_then(|s| s.team.as_ref());

    let name_of = |team: Option<&TeamInfo>| {
        team.and_then(|t| t.name.clone())
            .unwrap_or_else(|| "Opponent".to_owned())
    };

    if home.and_then(|t| t.id) == Some(team_id) {
        Some((format!("vs {}", name_of(away)), HomeAway::Home))
    } else if away.and_then(|t| t.id) == Some(team_id) {
        Some((format!("@ {}", name_of(home)), HomeAway::Away))
    } else {
        None
    }
}

fn map_standings(raw: StandingsResponse, team_id: u32) -> Standings {
    for record in raw.records.unwrap_or_default() {
        let group = record
            .division
            .as_ref()
            .and_then(|d| d.name_short.clone())
            .or_else(|| record.league.as_ref().and_then(|l| l.name_short.clone()))
            .unwrap_or_else(|| "League".to_owned());
        for team_record in record.team_records.unwrap_or_default() {
            if team_record.team.as_ref().and_then(|t| t.id) == Some(team_id) {
                return build_standings(&team_record, &group);
            }
        }
    }
    Standings::default()
}

fn build_standings(team_record: &TeamRecord, group: &str) -> Standings {
    let wins = team_record
        .league_record
        .as_ref()
        .and_then(|r| r.wins)
        .unwrap_or(0);
    let losses = team_record
        .league_record
        .as_ref()
        .and_then(|r| r.losses)
        .unwrap_or(0);
    let rank = team_record
        .division_rank
        .clone()
        .or_else(|| team_record.league_rank.clone())
        .unwrap_or_else(|| "N/A".to_owned());
    let games_back = match team_record.games_back.as_deref() {
        Some("-") => "0.0".to_owned(), // division leader
        Some(value) => value.to_owned(),
        None => "N/A".to_owned(),
    };
    Standings {
        record: format!("{wins}-{losses}"),
        rank: format!("{rank} in {group}"),
        games_back: format!("{games_back} GB"),
    }
}
