//! Box scores and per-team statistical leaders.
//!
//! Both box-score sources (the CDN and stats.nba.com) are reduced to
//! [`PlayerLine`]s first, so leader selection is written once.

use crate::client::{ApiError, ApiResult, espn_headshot_url};
use crate::stats::StatsResponse;
use crate::{GameLeaders, PlayerStat, Side, StatCategory, cdn, espn, lenient, teams};
use std::collections::HashMap;

/// Leaders for every game on one ESPN scoreboard, keyed by (home, away) canonical team names.
pub type DayLeaders = HashMap<(String, String), GameLeaders>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerLine {
    pub name: String,
    pub points: Option<i64>,
    pub rebounds: Option<i64>,
    pub assists: Option<i64>,
    /// As recorded upstream: "25:30", "PT25M30.00S", "" ...
    pub minutes: String,
}

impl PlayerLine {
    pub fn stat(&self, category: StatCategory) -> Option<i64> {
        match category {
            StatCategory::Points => self.points,
            StatCategory::Rebounds => self.rebounds,
            StatCategory::Assists => self.assists,
        }
    }

    /// Rows with empty or zero playing time are DNPs. Unreadable times count as played.
    pub fn has_played(&self) -> bool {
        lenient::playing_seconds(&self.minutes).is_none_or(|secs| secs > 0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxScore {
    pub home: Vec<PlayerLine>,
    pub away: Vec<PlayerLine>,
}

impl BoxScore {
    pub fn players(&self, side: Side) -> &[PlayerLine] {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub fn leaders(&self) -> GameLeaders {
        let mut leaders = GameLeaders::default();
        for side in Side::BOTH {
            for category in StatCategory::ALL {
                *leaders.slot_mut(side, category) = stat_leader(self.players(side), category);
            }
        }
        leaders
    }
}

/// Highest value of `category` among players who took the floor.
///
/// Linear scan; on a tie the player listed first keeps the lead. A missing value
/// counts as zero for the comparison but is reported as missing.
pub fn stat_leader(players: &[PlayerLine], category: StatCategory) -> Option<PlayerStat> {
    let mut best: Option<(&PlayerLine, i64)> = None;
    for player in players.iter().filter(|p| p.has_played() && !p.name.is_empty()) {
        let value = player.stat(category).unwrap_or(0);
        if best.is_none_or(|(_, top)| value > top) {
            best = Some((player, value));
        }
    }
    best.map(|(player, _)| PlayerStat::new(player.name.clone(), category, player.stat(category)))
}

// ---------------------------------------------------------------------------
// CDN box score
// ---------------------------------------------------------------------------

pub fn map_cdn_box_score(raw: cdn::BoxScoreResponse) -> ApiResult<BoxScore> {
    let game = raw
        .game
        .ok_or_else(|| ApiError::Format("box score without a game object".into()))?;
    let lines = |team: Option<cdn::BoxScoreTeam>| -> Vec<PlayerLine> {
        team.map(|t| t.players.iter().map(map_cdn_player).collect())
            .unwrap_or_default()
    };
    Ok(BoxScore { home: lines(game.home_team), away: lines(game.away_team) })
}

fn map_cdn_player(p: &cdn::BoxScorePlayer) -> PlayerLine {
    let full_name = format!(
        "{} {}",
        p.first_name.as_deref().unwrap_or_default(),
        p.family_name.as_deref().unwrap_or_default()
    )
    .trim()
    .to_owned();
    let name = if full_name.is_empty() {
        p.name.as_deref().unwrap_or_default().trim().to_owned()
    } else {
        full_name
    };

    let stats = p.statistics.as_ref();
    PlayerLine {
        name,
        points: stats.and_then(|s| s.points),
        rebounds: stats.and_then(|s| s.rebounds_total),
        assists: stats.and_then(|s| s.assists),
        minutes: stats.and_then(|s| s.minutes.clone()).unwrap_or_default(),
    }
}

// ---------------------------------------------------------------------------
// stats.nba.com boxscoretraditionalv2
// ---------------------------------------------------------------------------

/// Split the `PlayerStats` result set into home and away rows by `TEAM_ID`.
pub fn map_stats_box_score(raw: &StatsResponse, home_id: i64, away_id: i64) -> ApiResult<BoxScore> {
    let players = raw
        .result_set("PlayerStats")
        .ok_or_else(|| ApiError::Format("box score without a PlayerStats result set".into()))?;
    if players.column("TEAM_ID").is_none() || players.column("PLAYER_NAME").is_none() {
        return Err(ApiError::Format("PlayerStats lacks TEAM_ID or PLAYER_NAME".into()));
    }
    // Without a MIN column every row is assumed to have played.
    let has_minutes = players.column("MIN").is_some();

    let mut box_score = BoxScore::default();
    for row in players.rows() {
        let line = PlayerLine {
            name: row.text("PLAYER_NAME").unwrap_or_default(),
            points: row.int("PTS"),
            rebounds: row.int("REB"),
            assists: row.int("AST"),
            minutes: if has_minutes { row.text("MIN").unwrap_or_default() } else { "played".into() },
        };
        match row.int("TEAM_ID") {
            Some(id) if id == home_id => box_score.home.push(line),
            Some(id) if id == away_id => box_score.away.push(line),
            _ => {}
        }
    }
    Ok(box_score)
}

// ---------------------------------------------------------------------------
// ESPN scoreboard leaders
// ---------------------------------------------------------------------------

pub fn map_espn_day_leaders(raw: espn::ScoreboardResponse) -> DayLeaders {
    let mut out = DayLeaders::new();
    for event in &raw.events {
        let Some(competition) = event.competitions.first() else {
            continue;
        };
        let side = |which: &str| {
            competition
                .competitors
                .iter()
                .find(|c| c.home_away.as_deref() == Some(which))
        };
        let (Some(home), Some(away)) = (side("home"), side("away")) else {
            continue;
        };

        let mut leaders = GameLeaders::default();
        for category in StatCategory::ALL {
            *leaders.slot_mut(Side::Home, category) = espn_leader(home, category);
            *leaders.slot_mut(Side::Away, category) = espn_leader(away, category);
        }
        out.insert((espn_team_name(home), espn_team_name(away)), leaders);
    }
    out
}

fn espn_team_name(competitor: &espn::EspnCompetitor) -> String {
    let name = competitor.team.as_ref().and_then(|t| t.display_name.as_deref());
    teams::resolve(None, name)
}

/// First-listed leader of the matching category, with a headshot when one can be found.
fn espn_leader(competitor: &espn::EspnCompetitor, category: StatCategory) -> Option<PlayerStat> {
    let entry = competitor
        .leaders
        .iter()
        .find(|l| l.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(category.key())))?
        .leaders
        .first()?;
    let athlete = entry.athlete.as_ref()?;
    let name = athlete.display_name.as_deref().map(str::trim).filter(|n| !n.is_empty())?;

    let avatar = athlete
        .headshot
        .as_ref()
        .and_then(|h| h.href.clone())
        .filter(|href| !href.is_empty())
        .or_else(|| {
            athlete
                .id
                .as_deref()
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(espn_headshot_url)
        });

    Some(PlayerStat::new(name, category, entry.value).with_avatar(avatar))
}
