pub mod broadcasts;
pub mod client;
pub mod gametime;
pub mod statsapi;

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of the StatsAPI wire format
// ---------------------------------------------------------------------------

/// Which side of the matchup the target team is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeAway {
    Home,
    Away,
}

impl HomeAway {
    pub fn label(self) -> &'static str {
        match self {
            HomeAway::Home => "Home",
            HomeAway::Away => "Away",
        }
    }
}

/// One upcoming game, already formatted for display. Exists only for the
/// duration of a single pipeline run.
#[derive(Debug, Clone)]
pub struct UpcomingGame {
    /// "vs Chicago Cubs" or "@ Chicago Cubs", direction from the target team.
    pub opponent: String,
    /// Localized display time, or a "(Time TBD)" placeholder.
    pub game_time: String,
    /// Never empty — `["TBD"]` when nothing resolves.
    pub broadcasts: Vec<String>,
    pub status: String,
    pub home_away: HomeAway,
}

impl UpcomingGame {
    /// Opponent line as rendered on the card: "vs Chicago Cubs (Home)".
    pub fn opponent_display(&self) -> String {
        format!("{} ({})", self.opponent, self.home_away.label())
    }
}

/// The target team's standings line. Fields keep the "N/A" sentinel when the
/// upstream data never resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standings {
    /// "W-L", e.g. "10-5".
    pub record: String,
    /// "<rank> in <division>", e.g. "1 in NL Central".
    pub rank: String,
    /// "<value> GB", upstream "-" normalized to "0.0".
    pub games_back: String,
}

impl Default for Standings {
    fn default() -> Self {
        Self {
            record: "N/A".to_owned(),
            rank: "N/A".to_owned(),
            games_back: "N/A".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opponent_display_appends_direction() {
        let game = UpcomingGame {
            opponent: "@ Chicago Cubs".into(),
            game_time: "Time TBD".into(),
            broadcasts: vec!["TBD".into()],
            status: "Preview".into(),
            home_away: HomeAway::Away,
        };
        assert_eq!(game.opponent_display(), "@ Chicago Cubs (Away)");
    }

    #[test]
    fn standings_default_is_all_sentinels() {
        let standings = Standings::default();
        assert_eq!(standings.record, "N/A");
        assert_eq!(standings.rank, "N/A");
        assert_eq!(standings.games_back, "N/A");
    }
}
