//! NBA live-data CDN wire types.
//! Scoreboard: https://cdn.nba.com/static/json/liveData/scoreboard/scoreboard_{YYYYMMDD}.json
//! Box score:  https://cdn.nba.com/static/json/liveData/boxscore/boxscore_{gameId}.json

use crate::lenient;
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Scoreboard
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default)]
pub struct ScoreboardResponse {
    pub scoreboard: Option<Scoreboard>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Scoreboard {
    /// Games that fail to decode are dropped one by one.
    #[serde(default, deserialize_with = "lenient::each")]
    pub games: Vec<CdnGame>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CdnGame {
    #[serde(default, deserialize_with = "lenient::string")]
    pub game_id: Option<String>,
    /// 1 = scheduled, 2 = live, 3 = final
    #[serde(default, deserialize_with = "lenient::int")]
    pub game_status: Option<i64>,
    #[serde(rename = "gameTimeUTC", default, deserialize_with = "lenient::string")]
    pub game_time_utc: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub home_team: Option<CdnTeam>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub away_team: Option<CdnTeam>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub arena: Option<CdnArena>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub game_leaders: Option<CdnGameLeaders>,
    /// Rarely embedded in the scoreboard; usually needs the dedicated box score request.
    #[serde(default, deserialize_with = "lenient::optional")]
    pub box_score: Option<CdnBoxScoreTeams>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CdnTeam {
    #[serde(default, deserialize_with = "lenient::int")]
    pub team_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub team_city: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub team_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::int")]
    pub score: Option<i64>,
}

impl CdnTeam {
    /// "New York Knicks" from city + nickname, when both are present.
    pub fn full_name(&self) -> Option<String> {
        match (&self.team_city, &self.team_name) {
            (Some(city), Some(name)) => Some(format!("{city} {name}")),
            (None, Some(name)) => Some(name.clone()),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CdnArena {
    #[serde(default, deserialize_with = "lenient::string")]
    pub arena_name: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CdnGameLeaders {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub home_leaders: Option<CdnLeader>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub away_leaders: Option<CdnLeader>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CdnLeader {
    #[serde(default, deserialize_with = "lenient::int")]
    pub person_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::int")]
    pub points: Option<i64>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CdnBoxScoreTeams {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub home_team: Option<CdnTeam>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub away_team: Option<CdnTeam>,
}

// ---------------------------------------------------------------------------
// Box score
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default)]
pub struct BoxScoreResponse {
    pub game: Option<BoxScoreGame>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BoxScoreGame {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub home_team: Option<BoxScoreTeam>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub away_team: Option<BoxScoreTeam>,
}

#[derive(Debug, Deserialize, Default)]
pub struct BoxScoreTeam {
    #[serde(default, deserialize_with = "lenient::each")]
    pub players: Vec<BoxScorePlayer>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BoxScorePlayer {
    #[serde(default, deserialize_with = "lenient::string")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub family_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub statistics: Option<BoxScoreStatistics>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BoxScoreStatistics {
    #[serde(default, deserialize_with = "lenient::int")]
    pub points: Option<i64>,
    #[serde(default, deserialize_with = "lenient::int")]
    pub rebounds_total: Option<i64>,
    #[serde(default, deserialize_with = "lenient::int")]
    pub assists: Option<i64>,
    /// ISO-8601 duration, e.g. "PT25M01.00S"
    #[serde(default, deserialize_with = "lenient::string")]
    pub minutes: Option<String>,
}
