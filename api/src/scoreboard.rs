use crate::cdn::{self, CdnGame, CdnLeader};
use crate::client::{ApiError, ApiResult, NbaApi};
use crate::stats::{ResultSet, Row, StatsResponse};
use crate::{
    Game, GameLeaders, GameStatus, PlayerStat, REFERENCE_TZ, StatCategory, TIME_TBD, UNKNOWN_VENUE,
    teams,
};
use chrono::{DateTime, NaiveDate};
use log::{info, warn};

/// One upstream that can list a day's games.
///
/// `fetch` never fails: transport errors, non-2xx responses and malformed
/// payloads all come back as an empty list.
#[allow(async_fn_in_trait)]
pub trait ScoreboardProvider {
    fn name(&self) -> &'static str;
    async fn fetch(&self, date: NaiveDate) -> Vec<Game>;
}

/// Tries the primary provider first and only asks the secondary when the primary
/// has nothing for that date. The two are never merged.
#[derive(Debug, Clone)]
pub struct CascadingFetcher<P, S> {
    primary: P,
    secondary: S,
}

impl<P: ScoreboardProvider, S: ScoreboardProvider> CascadingFetcher<P, S> {
    pub fn new(primary: P, secondary: S) -> Self {
        Self { primary, secondary }
    }

    pub async fn fetch(&self, date: NaiveDate) -> Vec<Game> {
        let games = self.primary.fetch(date).await;
        if !games.is_empty() {
            info!("{}: {} games on {date}", self.primary.name(), games.len());
            return games;
        }

        info!("{} has nothing for {date}, trying {}", self.primary.name(), self.secondary.name());
        let games = self.secondary.fetch(date).await;
        info!("{}: {} games on {date}", self.secondary.name(), games.len());
        games
    }
}

/// Logs the failure and yields no games.
fn games_or_empty(provider: &str, date: NaiveDate, result: ApiResult<Vec<Game>>) -> Vec<Game> {
    result.unwrap_or_else(|e| {
        info!("{provider} scoreboard for {date} unavailable: {e}");
        Vec::new()
    })
}

fn warn_missing_scores(games: &[Game]) {
    for game in games {
        if game.status.has_stats() && (game.home_score.is_none() || game.away_score.is_none()) {
            warn!(
                "game {} ({} vs {}) is {:?} but has no score",
                game.id, game.home_team, game.away_team, game.status
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Primary: NBA live-data CDN
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct CdnScoreboard {
    api: NbaApi,
}

impl CdnScoreboard {
    pub fn new(api: NbaApi) -> Self {
        Self { api }
    }
}

impl ScoreboardProvider for CdnScoreboard {
    fn name(&self) -> &'static str {
        "cdn.nba.com"
    }

    async fn fetch(&self, date: NaiveDate) -> Vec<Game> {
        let result = self.api.fetch_cdn_scoreboard(date).await.map(|raw| map_cdn_scoreboard(raw, date));
        let games = games_or_empty(self.name(), date, result);
        warn_missing_scores(&games);
        games
    }
}

pub fn map_cdn_scoreboard(raw: cdn::ScoreboardResponse, date: NaiveDate) -> Vec<Game> {
    raw.scoreboard
        .map(|board| board.games)
        .unwrap_or_default()
        .iter()
        .filter_map(|g| map_cdn_game(g, date))
        .collect()
}

/// Map one CDN scoreboard entry. Entries without a game id are skipped.
pub fn map_cdn_game(g: &CdnGame, query_date: NaiveDate) -> Option<Game> {
    let id = g.game_id.as_deref().map(str::trim).filter(|id| !id.is_empty())?;
    let mut game = Game::new(id, query_date);

    game.status = g.game_status.and_then(GameStatus::from_code).unwrap_or_default();

    if let Some((date, time)) = g.game_time_utc.as_deref().and_then(kickoff_in_reference_tz) {
        game.date = date;
        game.time = time;
    }

    let home = g.home_team.clone().unwrap_or_default();
    let away = g.away_team.clone().unwrap_or_default();
    game.home_team = teams::resolve(home.team_id, home.full_name().as_deref());
    game.away_team = teams::resolve(away.team_id, away.full_name().as_deref());
    game.home_team_id = home.team_id;
    game.away_team_id = away.team_id;

    let leaders = g.game_leaders.as_ref();
    let home_leader = leaders.and_then(|l| l.home_leaders.as_ref());
    let away_leader = leaders.and_then(|l| l.away_leaders.as_ref());
    let boxed = g.box_score.as_ref();
    let boxed_home = boxed.and_then(|b| b.home_team.as_ref());
    let boxed_away = boxed.and_then(|b| b.away_team.as_ref());

    game.home_score = first_score([
        home.score,
        home_leader.and_then(|l| l.points),
        boxed_home.and_then(|t| t.score),
    ]);
    game.away_score = first_score([
        away.score,
        away_leader.and_then(|l| l.points),
        boxed_away.and_then(|t| t.score),
    ]);

    game.venue = g
        .arena
        .as_ref()
        .and_then(|a| a.arena_name.clone())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_VENUE.to_owned());

    game.inline_leaders = GameLeaders {
        home_top_scorer: home_leader.and_then(inline_scorer),
        away_top_scorer: away_leader.and_then(inline_scorer),
        ..Default::default()
    };

    Some(game)
}

/// The scoreboard's per-side leader block names the game's top scorer.
fn inline_scorer(leader: &CdnLeader) -> Option<PlayerStat> {
    let name = leader
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_owned)
        .or_else(|| leader.person_id.map(|id| format!("Player {id}")))?;
    Some(PlayerStat::new(name, StatCategory::Points, leader.points))
}

/// First candidate that is present wins.
fn first_score<const N: usize>(candidates: [Option<i64>; N]) -> Option<i64> {
    candidates.into_iter().flatten().next()
}

/// Convert a UTC kickoff such as `2024-10-23T00:30:00Z` into the reference
/// timezone's calendar date and `HH:MM` time.
pub fn kickoff_in_reference_tz(utc: &str) -> Option<(NaiveDate, String)> {
    let kickoff = DateTime::parse_from_rfc3339(utc.trim()).ok()?.with_timezone(&REFERENCE_TZ);
    Some((kickoff.date_naive(), kickoff.format("%H:%M").to_string()))
}

// ---------------------------------------------------------------------------
// Secondary: stats.nba.com scoreboardV2
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct StatsScoreboard {
    api: NbaApi,
}

impl StatsScoreboard {
    pub fn new(api: NbaApi) -> Self {
        Self { api }
    }
}

impl ScoreboardProvider for StatsScoreboard {
    fn name(&self) -> &'static str {
        "stats.nba.com"
    }

    async fn fetch(&self, date: NaiveDate) -> Vec<Game> {
        let result = self
            .api
            .fetch_stats_scoreboard(date)
            .await
            .and_then(|raw| map_stats_scoreboard(&raw, date));
        let games = games_or_empty(self.name(), date, result);
        warn_missing_scores(&games);
        games
    }
}

pub fn map_stats_scoreboard(raw: &StatsResponse, query_date: NaiveDate) -> ApiResult<Vec<Game>> {
    let header = raw
        .result_set("GameHeader")
        .ok_or_else(|| ApiError::Format("scoreboardV2 without a GameHeader result set".into()))?;
    let line_score = raw
        .result_set("LineScore")
        .ok_or_else(|| ApiError::Format("scoreboardV2 without a LineScore result set".into()))?;

    if header.column("GAME_ID").is_none() {
        return Err(ApiError::Format("GameHeader has no GAME_ID column".into()));
    }

    Ok(header
        .rows()
        .filter_map(|row| map_stats_game(row, line_score, query_date))
        .collect())
}

fn map_stats_game(row: Row<'_>, line_score: &ResultSet, query_date: NaiveDate) -> Option<Game> {
    let id = row.text("GAME_ID")?;
    let date = row
        .text("GAME_DATE_EST")
        .and_then(|d| NaiveDate::parse_from_str(d.get(..10)?, "%Y-%m-%d").ok())
        .unwrap_or(query_date);
    let mut game = Game::new(id, date);

    let status_text = row.text("GAME_STATUS_TEXT");
    game.status =
        GameStatus::resolve(row.int("GAME_STATUS_ID"), Some(status_text.as_deref().unwrap_or_default()));
    game.time = status_text.unwrap_or_else(|| TIME_TBD.to_owned());

    game.home_team_id = row.int("HOME_TEAM_ID");
    game.away_team_id = row.int("VISITOR_TEAM_ID");
    game.home_team = teams::resolve(game.home_team_id, None);
    game.away_team = teams::resolve(game.away_team_id, None);
    game.home_score = team_points(line_score, &game.id, game.home_team_id);
    game.away_score = team_points(line_score, &game.id, game.away_team_id);
    game.venue = row.text("ARENA_NAME").unwrap_or_else(|| UNKNOWN_VENUE.to_owned());

    Some(game)
}

/// PTS from the LineScore row of `(game_id, team_id)`.
fn team_points(line_score: &ResultSet, game_id: &str, team_id: Option<i64>) -> Option<i64> {
    let team_id = team_id?;
    line_score
        .rows()
        .find(|r| r.text("GAME_ID").as_deref() == Some(game_id) && r.int("TEAM_ID") == Some(team_id))
        .and_then(|r| r.int("PTS"))
}
