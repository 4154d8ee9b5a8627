//! Leader enrichment: fill a game's six leader slots from progressively more
//! expensive sources, stopping as soon as every slot is set.

use crate::client::{ApiResult, NbaApi};
use crate::leaders::{self, BoxScore, DayLeaders};
use crate::{Game, GameLeaders, teams};
use chrono::NaiveDate;
use log::debug;
use std::collections::HashMap;

/// Where leader data can come from, in the order it is consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderSource {
    /// Hints already present in the scoreboard payload.
    Inline,
    /// Per-game box score on the live-data CDN.
    CdnBoxScore,
    /// ESPN's scoreboard, one request per day.
    EspnDayLeaders,
    /// Per-game box score on stats.nba.com.
    StatsBoxScore,
}

impl LeaderSource {
    pub const CASCADE: [LeaderSource; 4] = [
        LeaderSource::Inline,
        LeaderSource::CdnBoxScore,
        LeaderSource::EspnDayLeaders,
        LeaderSource::StatsBoxScore,
    ];
}

/// Remote lookups used by the cascade.
#[allow(async_fn_in_trait)]
pub trait LeaderFeeds {
    async fn box_score(&self, game_id: &str) -> ApiResult<BoxScore>;
    async fn day_leaders(&self, date: NaiveDate) -> ApiResult<DayLeaders>;
    async fn stats_box_score(&self, game_id: &str, home_id: i64, away_id: i64) -> ApiResult<BoxScore>;
}

impl LeaderFeeds for NbaApi {
    async fn box_score(&self, game_id: &str) -> ApiResult<BoxScore> {
        self.fetch_cdn_box_score(game_id)
            .await
            .and_then(leaders::map_cdn_box_score)
    }

    async fn day_leaders(&self, date: NaiveDate) -> ApiResult<DayLeaders> {
        self.fetch_espn_scoreboard(date)
            .await
            .map(leaders::map_espn_day_leaders)
    }

    async fn stats_box_score(&self, game_id: &str, home_id: i64, away_id: i64) -> ApiResult<BoxScore> {
        self.fetch_stats_box_score(game_id)
            .await
            .and_then(|raw| leaders::map_stats_box_score(&raw, home_id, away_id))
    }
}

/// Per-day memo shared by every game of one date.
#[derive(Debug, Default)]
pub struct DayContext {
    pub date: NaiveDate,
    /// `None` until ESPN has been asked once; a failed request is remembered as empty.
    day_leaders: Option<DayLeaders>,
    stats_boxes: HashMap<String, GameLeaders>,
}

impl DayContext {
    pub fn new(date: NaiveDate) -> Self {
        Self { date, ..Default::default() }
    }
}

#[derive(Debug, Clone)]
pub struct EnrichmentCascade<F> {
    feeds: F,
}

impl<F: LeaderFeeds> EnrichmentCascade<F> {
    pub fn new(feeds: F) -> Self {
        Self { feeds }
    }

    /// Fill unset leader slots of a live or finished game. Never fails; a source
    /// that errors is skipped.
    pub async fn enrich(&self, game: &mut Game, ctx: &mut DayContext) {
        if !game.status.has_stats() {
            return;
        }

        for source in LeaderSource::CASCADE {
            if game.leaders.is_complete() {
                break;
            }
            let found = self.lookup(source, game, ctx).await;
            let filled = game.leaders.fill_missing(found);
            if filled > 0 {
                debug!("game {}: {filled} leader slots from {source:?}", game.id);
            }
        }
    }

    async fn lookup(&self, source: LeaderSource, game: &Game, ctx: &mut DayContext) -> GameLeaders {
        match source {
            LeaderSource::Inline => game.inline_leaders.clone(),
            LeaderSource::CdnBoxScore => match self.feeds.box_score(&game.id).await {
                Ok(box_score) => box_score.leaders(),
                Err(e) => {
                    debug!("cdn box score for {} unavailable: {e}", game.id);
                    GameLeaders::default()
                }
            },
            LeaderSource::EspnDayLeaders => {
                if ctx.day_leaders.is_none() {
                    let fetched = self.feeds.day_leaders(ctx.date).await.unwrap_or_else(|e| {
                        debug!("espn leaders for {} unavailable: {e}", ctx.date);
                        DayLeaders::new()
                    });
                    ctx.day_leaders = Some(fetched);
                }
                let key = espn_key(game);
                ctx.day_leaders
                    .as_ref()
                    .and_then(|day| day.get(&key))
                    .cloned()
                    .unwrap_or_default()
            }
            LeaderSource::StatsBoxScore => {
                let (Some(home_id), Some(away_id)) = (game.home_team_id, game.away_team_id) else {
                    return GameLeaders::default();
                };
                if let Some(cached) = ctx.stats_boxes.get(&game.id) {
                    return cached.clone();
                }
                let found = match self.feeds.stats_box_score(&game.id, home_id, away_id).await {
                    Ok(box_score) => box_score.leaders(),
                    Err(e) => {
                        debug!("stats box score for {} unavailable: {e}", game.id);
                        GameLeaders::default()
                    }
                };
                ctx.stats_boxes.insert(game.id.clone(), found.clone());
                found
            }
        }
    }
}

/// Games are matched to ESPN events by canonical team names, since ESPN uses its own ids.
fn espn_key(game: &Game) -> (String, String) {
    (
        teams::resolve(None, Some(&game.home_team)),
        teams::resolve(None, Some(&game.away_team)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiError;
    use crate::leaders::PlayerLine;
    use crate::{GameStatus, PlayerStat, StatCategory};
    use std::cell::Cell;

    #[derive(Default)]
    struct FakeFeeds {
        box_score: Option<BoxScore>,
        day: Option<DayLeaders>,
        stats: Option<BoxScore>,
        box_calls: Cell<u32>,
        day_calls: Cell<u32>,
        stats_calls: Cell<u32>,
    }

    fn unavailable() -> ApiError {
        ApiError::Format("unavailable".into())
    }

    impl LeaderFeeds for FakeFeeds {
        async fn box_score(&self, _game_id: &str) -> ApiResult<BoxScore> {
            self.box_calls.set(self.box_calls.get() + 1);
            self.box_score.clone().ok_or_else(unavailable)
        }

        async fn day_leaders(&self, _date: NaiveDate) -> ApiResult<DayLeaders> {
            self.day_calls.set(self.day_calls.get() + 1);
            self.day.clone().ok_or_else(unavailable)
        }

        async fn stats_box_score(&self, _game_id: &str, _home: i64, _away: i64) -> ApiResult<BoxScore> {
            self.stats_calls.set(self.stats_calls.get() + 1);
            self.stats.clone().ok_or_else(unavailable)
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn finished_game(id: &str) -> Game {
        let mut game = Game::new(id, date());
        game.status = GameStatus::Finished;
        game.home_team = "洛杉矶湖人".into();
        game.away_team = "菲尼克斯太阳".into();
        game.home_team_id = Some(1610612747);
        game.away_team_id = Some(1610612756);
        game
    }

    fn player(name: &str, pts: i64, reb: i64, ast: i64) -> PlayerLine {
        PlayerLine {
            name: name.into(),
            points: Some(pts),
            rebounds: Some(reb),
            assists: Some(ast),
            minutes: "30:00".into(),
        }
    }

    fn full_box() -> BoxScore {
        BoxScore {
            home: vec![player("Home Guy", 30, 10, 8)],
            away: vec![player("Away Guy", 25, 9, 7)],
        }
    }

    #[tokio::test]
    async fn upcoming_games_are_left_alone() {
        let cascade = EnrichmentCascade::new(FakeFeeds { box_score: Some(full_box()), ..Default::default() });
        let mut game = finished_game("1");
        game.status = GameStatus::Upcoming;
        cascade.enrich(&mut game, &mut DayContext::new(date())).await;

        assert!(game.leaders.is_empty());
        assert_eq!(cascade.feeds.box_calls.get(), 0);
    }

    #[tokio::test]
    async fn inline_hints_win_over_box_score() {
        let cascade = EnrichmentCascade::new(FakeFeeds { box_score: Some(full_box()), ..Default::default() });
        let mut game = finished_game("1");
        game.inline_leaders.home_top_scorer = Some(PlayerStat::new("Inline Star", StatCategory::Points, Some(44)));
        cascade.enrich(&mut game, &mut DayContext::new(date())).await;

        assert_eq!(game.leaders.home_top_scorer.as_ref().unwrap().name, "Inline Star");
        assert_eq!(game.leaders.away_top_scorer.as_ref().unwrap().name, "Away Guy");
        assert!(game.leaders.is_complete());
        assert_eq!(cascade.feeds.day_calls.get(), 0);
        assert_eq!(cascade.feeds.stats_calls.get(), 0);
    }

    #[tokio::test]
    async fn espn_is_asked_once_per_day_even_when_it_fails() {
        let cascade = EnrichmentCascade::new(FakeFeeds::default());
        let mut ctx = DayContext::new(date());
        for id in ["1", "2", "3"] {
            let mut game = finished_game(id);
            cascade.enrich(&mut game, &mut ctx).await;
            assert!(game.leaders.is_empty());
        }
        assert_eq!(cascade.feeds.box_calls.get(), 3);
        assert_eq!(cascade.feeds.day_calls.get(), 1);
        assert_eq!(cascade.feeds.stats_calls.get(), 3);
    }

    #[tokio::test]
    async fn espn_fills_what_the_box_score_left_empty() {
        let partial = BoxScore { home: vec![player("Home Guy", 30, 10, 8)], away: vec![] };
        let mut day = DayLeaders::new();
        day.insert(
            ("洛杉矶湖人".to_owned(), "菲尼克斯太阳".to_owned()),
            BoxScore { home: vec![player("Espn Home", 1, 1, 1)], away: vec![player("Espn Away", 20, 5, 5)] }
                .leaders(),
        );
        let cascade = EnrichmentCascade::new(FakeFeeds {
            box_score: Some(partial),
            day: Some(day),
            ..Default::default()
        });

        let mut game = finished_game("1");
        cascade.enrich(&mut game, &mut DayContext::new(date())).await;

        assert_eq!(game.leaders.home_top_scorer.as_ref().unwrap().name, "Home Guy");
        assert_eq!(game.leaders.away_top_assister.as_ref().unwrap().name, "Espn Away");
        assert_eq!(cascade.feeds.stats_calls.get(), 0);
    }

    #[tokio::test]
    async fn stats_box_score_is_last_and_needs_team_ids() {
        let cascade = EnrichmentCascade::new(FakeFeeds { stats: Some(full_box()), ..Default::default() });

        let mut game = finished_game("1");
        game.away_team_id = None;
        cascade.enrich(&mut game, &mut DayContext::new(date())).await;
        assert!(game.leaders.is_empty());
        assert_eq!(cascade.feeds.stats_calls.get(), 0);

        let mut game = finished_game("2");
        game.status = GameStatus::Live;
        cascade.enrich(&mut game, &mut DayContext::new(date())).await;
        assert!(game.leaders.is_complete());
        assert_eq!(cascade.feeds.stats_calls.get(), 1);
    }

    #[tokio::test]
    async fn stats_box_scores_are_cached_per_game() {
        let cascade = EnrichmentCascade::new(FakeFeeds::default());
        let mut ctx = DayContext::new(date());
        for _ in 0..2 {
            let mut game = finished_game("same");
            cascade.enrich(&mut game, &mut ctx).await;
        }
        assert_eq!(cascade.feeds.stats_calls.get(), 1);
    }
}
