use crate::cdn;
use crate::config::{Endpoints, FeedConfig};
use crate::espn;
use crate::stats::StatsResponse;
use chrono::NaiveDate;
use log::debug;
use reqwest::Client;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONNECTION, HeaderMap, HeaderName, HeaderValue, ORIGIN,
    REFERER, USER_AGENT,
};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

const CDN_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";
const STATS_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const ESPN_HEADSHOT: &str = "https://a.espncdn.com/i/headshots/nba/players/full";

/// Client for the NBA CDN, stats.nba.com and ESPN endpoints.
#[derive(Debug, Clone)]
pub struct NbaApi {
    client: Client,
    endpoints: Endpoints,
    request_timeout: Duration,
    box_score_timeout: Duration,
}

#[derive(Debug)]
pub enum ApiError {
    /// Connection failure or timeout.
    Network(reqwest::Error, String),
    /// Non-2xx response.
    Status(reqwest::StatusCode, String),
    /// Body is not the JSON shape we expect.
    Parsing(reqwest::Error, String),
    /// Body decoded but lacks a required structure.
    Format(String),
    /// The HTTP client itself could not be built.
    Client(reqwest::Error),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::Status(status, url) => write!(f, "HTTP {status} for {url}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Format(msg) => write!(f, "Unexpected payload: {msg}"),
            ApiError::Client(e) => write!(f, "Could not build HTTP client: {e}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl NbaApi {
    pub fn new(config: &FeedConfig) -> ApiResult<Self> {
        let client = Client::builder().build().map_err(ApiError::Client)?;
        Ok(Self {
            client,
            endpoints: config.endpoints.clone(),
            request_timeout: config.request_timeout,
            box_score_timeout: config.box_score_timeout,
        })
    }

    /// One day's games from the live-data CDN.
    pub async fn fetch_cdn_scoreboard(&self, date: NaiveDate) -> ApiResult<cdn::ScoreboardResponse> {
        let url = format!(
            "{}/static/json/liveData/scoreboard/scoreboard_{}.json",
            self.endpoints.cdn,
            compact_date(date)
        );
        self.get(&url, cdn_headers(), self.request_timeout).await
    }

    /// Per-player box score for one game from the live-data CDN.
    pub async fn fetch_cdn_box_score(&self, game_id: &str) -> ApiResult<cdn::BoxScoreResponse> {
        let url = format!(
            "{}/static/json/liveData/boxscore/boxscore_{game_id}.json",
            self.endpoints.cdn
        );
        self.get(&url, cdn_headers(), self.box_score_timeout).await
    }

    /// One day's games from stats.nba.com. DayOffset stays 0 so gameDate alone picks the day.
    pub async fn fetch_stats_scoreboard(&self, date: NaiveDate) -> ApiResult<StatsResponse> {
        let url = format!(
            "{}/stats/scoreboardV2?DayOffset=0&LeagueID=00&gameDate={}",
            self.endpoints.stats,
            slash_date(date)
        );
        self.get(&url, stats_headers(), self.request_timeout).await
    }

    pub async fn fetch_stats_box_score(&self, game_id: &str) -> ApiResult<StatsResponse> {
        let url = format!(
            "{}/stats/boxscoretraditionalv2?GameID={game_id}&StartPeriod=0&EndPeriod=10&RangeType=0&StartRange=0&EndRange=0",
            self.endpoints.stats
        );
        self.get(&url, stats_headers(), self.request_timeout).await
    }

    /// ESPN's scoreboard for a date, which lists each competitor's stat leaders.
    pub async fn fetch_espn_scoreboard(&self, date: NaiveDate) -> ApiResult<espn::ScoreboardResponse> {
        let url = format!(
            "{}/apis/site/v2/sports/basketball/nba/scoreboard?dates={}",
            self.endpoints.espn,
            compact_date(date)
        );
        self.get(&url, espn_headers(), self.request_timeout).await
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: &str,
        headers: HeaderMap,
        timeout: Duration,
    ) -> ApiResult<T> {
        debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .headers(headers)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status, url.to_owned()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Parsing(e, url.to_owned()))
    }
}

/// `20241022`
pub fn compact_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// `10/22/2024`
pub fn slash_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

/// ESPN's CDN keeps a headshot for every athlete id.
pub fn espn_headshot_url(athlete_id: &str) -> String {
    format!("{ESPN_HEADSHOT}/{athlete_id}.png")
}

// ---------------------------------------------------------------------------
// Request headers
// ---------------------------------------------------------------------------

fn browser_headers(user_agent: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(user_agent));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers
}

fn cdn_headers() -> HeaderMap {
    let mut headers = browser_headers(CDN_USER_AGENT);
    headers.insert(ORIGIN, HeaderValue::from_static("https://www.nba.com"));
    headers.insert(REFERER, HeaderValue::from_static("https://www.nba.com/games"));
    headers
}

fn stats_headers() -> HeaderMap {
    let mut headers = browser_headers(STATS_USER_AGENT);
    headers.insert(ORIGIN, HeaderValue::from_static("https://www.nba.com"));
    headers.insert(REFERER, HeaderValue::from_static("https://www.nba.com/"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    let fetch_metadata = [
        ("sec-ch-ua", r#""Not_A Brand";v="8", "Chromium";v="120", "Google Chrome";v="120""#),
        ("sec-ch-ua-mobile", "?0"),
        ("sec-ch-ua-platform", r#""Windows""#),
        ("sec-fetch-dest", "empty"),
        ("sec-fetch-mode", "cors"),
        ("sec-fetch-site", "same-site"),
    ];
    for (name, value) in fetch_metadata {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }
    headers
}

fn espn_headers() -> HeaderMap {
    browser_headers(CDN_USER_AGENT)
}
