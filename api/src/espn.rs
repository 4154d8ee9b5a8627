//! ESPN API raw wire types: serde shapes for the NBA scoreboard, which carries
//! per-competitor statistical leaders for every game on a date.
//! Endpoint: https://site.web.api.espn.com/apis/site/v2/sports/basketball/nba/scoreboard?dates={YYYYMMDD}

use crate::lenient;
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct ScoreboardResponse {
    #[serde(default, deserialize_with = "lenient::each")]
    pub events: Vec<EspnEvent>,
}

#[derive(Debug, Deserialize, Default)]
pub struct EspnEvent {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::each")]
    pub competitions: Vec<EspnCompetition>,
}

#[derive(Debug, Deserialize, Default)]
pub struct EspnCompetition {
    #[serde(default, deserialize_with = "lenient::each")]
    pub competitors: Vec<EspnCompetitor>,
}

#[derive(Debug, Deserialize, Default)]
pub struct EspnCompetitor {
    #[serde(rename = "homeAway", default, deserialize_with = "lenient::string")]
    pub home_away: Option<String>, // "home" | "away"
    #[serde(default, deserialize_with = "lenient::optional")]
    pub team: Option<EspnTeam>,
    #[serde(default, deserialize_with = "lenient::each")]
    pub leaders: Vec<EspnLeaderCategory>,
}

#[derive(Debug, Deserialize, Default)]
pub struct EspnTeam {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(rename = "displayName", default, deserialize_with = "lenient::string")]
    pub display_name: Option<String>,
}

/// One statistical category ("points", "rebounds", "assists", "rating", ...).
#[derive(Debug, Deserialize, Default)]
pub struct EspnLeaderCategory {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::each")]
    pub leaders: Vec<EspnLeader>,
}

#[derive(Debug, Deserialize, Default)]
pub struct EspnLeader {
    /// ESPN sends this as a float, e.g. 31.0
    #[serde(default, deserialize_with = "lenient::int")]
    pub value: Option<i64>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub athlete: Option<EspnAthlete>,
}

#[derive(Debug, Deserialize, Default)]
pub struct EspnAthlete {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(rename = "displayName", default, deserialize_with = "lenient::string")]
    pub display_name: Option<String>,
    /// Usually `{"href": "..."}`; anything else is ignored.
    #[serde(default, deserialize_with = "lenient::optional")]
    pub headshot: Option<EspnHeadshot>,
}

#[derive(Debug, Deserialize, Default)]
pub struct EspnHeadshot {
    #[serde(default, deserialize_with = "lenient::string")]
    pub href: Option<String>,
}
