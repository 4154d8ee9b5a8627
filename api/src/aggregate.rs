//! Multi-day aggregation around "today" in the league's timezone.

use crate::config::DayWindow;
use crate::enrich::{DayContext, EnrichmentCascade, LeaderFeeds};
use crate::scoreboard::{CascadingFetcher, ScoreboardProvider};
use crate::{Game, REFERENCE_TZ};
use chrono::{Days, NaiveDate, Utc};
use futures_util::FutureExt;
use futures_util::stream::{self, StreamExt};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;

/// Produces the fully processed games of one date. Infallible: failures are empty days.
#[allow(async_fn_in_trait)]
pub trait DayFetcher {
    async fn fetch_day(&self, date: NaiveDate) -> Vec<Game>;
}

/// Scoreboard cascade followed by leader enrichment, one date at a time.
#[derive(Debug, Clone)]
pub struct DayPipeline<P, S, F> {
    scoreboards: CascadingFetcher<P, S>,
    enrichment: EnrichmentCascade<F>,
}

impl<P, S, F> DayPipeline<P, S, F>
where
    P: ScoreboardProvider,
    S: ScoreboardProvider,
    F: LeaderFeeds,
{
    pub fn new(scoreboards: CascadingFetcher<P, S>, enrichment: EnrichmentCascade<F>) -> Self {
        Self { scoreboards, enrichment }
    }
}

impl<P, S, F> DayFetcher for DayPipeline<P, S, F>
where
    P: ScoreboardProvider,
    S: ScoreboardProvider,
    F: LeaderFeeds,
{
    async fn fetch_day(&self, date: NaiveDate) -> Vec<Game> {
        let mut games = self.scoreboards.fetch(date).await;
        let mut ctx = DayContext::new(date);
        for game in games.iter_mut() {
            self.enrichment.enrich(game, &mut ctx).await;
        }
        games
    }
}

#[derive(Debug, Clone)]
pub struct Aggregator<F> {
    fetcher: F,
    window: DayWindow,
    concurrency: usize,
}

impl<F: DayFetcher> Aggregator<F> {
    pub fn new(fetcher: F, window: DayWindow, concurrency: usize) -> Self {
        Self { fetcher, window, concurrency: concurrency.max(1) }
    }

    pub async fn aggregate(&self) -> Vec<Game> {
        let today = Utc::now().with_timezone(&REFERENCE_TZ).date_naive();
        self.aggregate_from(today).await
    }

    /// Fetch every date of the window around `today`, at most `concurrency` at a time.
    /// A day that panics contributes no games; the other days are kept.
    pub async fn aggregate_from(&self, today: NaiveDate) -> Vec<Game> {
        let dates: Vec<NaiveDate> = self
            .window
            .offsets()
            .filter_map(|offset| shift(today, offset))
            .collect();
        info!("fetching {} days around {today}", dates.len());

        // `buffered` yields in window order, so "first seen" below is deterministic.
        let batches: Vec<Vec<Game>> = stream::iter(dates)
            .map(|date| self.fetch_isolated(date))
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut games = merge_unique(batches);
        games.sort_by(|a, b| (a.date, &a.time, &a.id).cmp(&(b.date, &b.time, &b.id)));
        info!("{} games in window", games.len());
        games
    }

    async fn fetch_isolated(&self, date: NaiveDate) -> Vec<Game> {
        match AssertUnwindSafe(self.fetcher.fetch_day(date)).catch_unwind().await {
            Ok(games) => games,
            Err(_) => {
                warn!("day {date} panicked, counting it as empty");
                Vec::new()
            }
        }
    }
}

fn shift(date: NaiveDate, offset: i64) -> Option<NaiveDate> {
    let days = Days::new(offset.unsigned_abs());
    if offset < 0 { date.checked_sub_days(days) } else { date.checked_add_days(days) }
}

/// Flatten day batches, keeping the first occurrence of each game id.
pub fn merge_unique(batches: Vec<Vec<Game>>) -> Vec<Game> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for game in batches.into_iter().flatten() {
        if seen.insert(game.id.clone()) {
            out.push(game);
        } else {
            debug!("dropping duplicate game {}", game.id);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn game(id: &str, date: NaiveDate, time: &str) -> Game {
        let mut game = Game::new(id, date);
        game.time = time.into();
        game
    }

    #[derive(Default)]
    struct FakeDays {
        games: HashMap<NaiveDate, Vec<Game>>,
        asked: RefCell<Vec<NaiveDate>>,
    }

    impl DayFetcher for FakeDays {
        async fn fetch_day(&self, date: NaiveDate) -> Vec<Game> {
            self.asked.borrow_mut().push(date);
            self.games.get(&date).cloned().unwrap_or_default()
        }
    }

    #[tokio::test]
    async fn window_covers_seven_days() {
        let aggregator = Aggregator::new(FakeDays::default(), DayWindow::default(), 3);
        let games = aggregator.aggregate_from(day(2025, 3, 1)).await;
        assert!(games.is_empty());

        let mut asked = aggregator.fetcher.asked.borrow().clone();
        asked.sort();
        assert_eq!(asked.first(), Some(&day(2025, 2, 26)));
        assert_eq!(asked.last(), Some(&day(2025, 3, 4)));
        assert_eq!(asked.len(), 7);
    }

    #[tokio::test]
    async fn duplicates_keep_the_earliest_day_and_output_is_sorted() {
        let today = day(2025, 1, 10);
        let mut games = HashMap::new();
        games.insert(day(2025, 1, 9), vec![game("late", day(2025, 1, 9), "22:00"), game("dup", day(2025, 1, 9), "19:00")]);
        games.insert(today, vec![game("dup", today, "19:00"), game("b", today, "19:00"), game("a", today, "19:00")]);

        let window = DayWindow { days_back: 1, days_forward: 0 };
        let aggregator = Aggregator::new(FakeDays { games, ..Default::default() }, window, 2);
        let out = aggregator.aggregate_from(today).await;

        let ids: Vec<&str> = out.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["dup", "late", "a", "b"]);
        assert_eq!(out[0].date, day(2025, 1, 9));
    }

    struct PanicsOn {
        bad_day: NaiveDate,
    }

    impl DayFetcher for PanicsOn {
        async fn fetch_day(&self, date: NaiveDate) -> Vec<Game> {
            if date == self.bad_day {
                panic!("scoreboard for {date} blew up");
            }
            vec![game(&format!("g{}", date.format("%d")), date, "19:00")]
        }
    }

    #[tokio::test]
    async fn a_panicking_day_does_not_sink_the_window() {
        let today = day(2025, 4, 10);
        let window = DayWindow { days_back: 1, days_forward: 1 };
        let aggregator = Aggregator::new(PanicsOn { bad_day: today }, window, 3);

        let out = aggregator.aggregate_from(today).await;
        let ids: Vec<&str> = out.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["g09", "g11"]);
    }

    #[test]
    fn merge_unique_is_first_seen() {
        let d = day(2024, 12, 25);
        let mut first = game("x", d, "12:00");
        first.venue = "Madison Square Garden".into();
        let merged = merge_unique(vec![vec![first], vec![game("x", d, "20:00"), game("y", d, "20:00")]]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].venue, "Madison Square Garden");
    }

    #[test]
    fn shift_handles_month_boundaries() {
        assert_eq!(shift(day(2025, 3, 1), -1), Some(day(2025, 2, 28)));
        assert_eq!(shift(day(2024, 12, 31), 1), Some(day(2025, 1, 1)));
        assert_eq!(shift(day(2024, 12, 31), 0), Some(day(2024, 12, 31)));
    }
}
