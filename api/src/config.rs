use std::time::Duration;

pub const NBA_CDN: &str = "https://cdn.nba.com";
pub const NBA_STATS: &str = "https://stats.nba.com";
pub const ESPN_SITE_WEB: &str = "https://site.web.api.espn.com";

/// Base URLs of the upstream feeds. Paths are appended by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub cdn: String,
    pub stats: String,
    pub espn: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            cdn: NBA_CDN.to_owned(),
            stats: NBA_STATS.to_owned(),
            espn: ESPN_SITE_WEB.to_owned(),
        }
    }
}

impl Endpoints {
    /// Point every feed at one host, e.g. a local mock server.
    pub fn all(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_owned();
        Self { cdn: base.clone(), stats: base.clone(), espn: base }
    }
}

/// Day offsets around "today": `days_back` before through `days_forward` after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub days_back: u32,
    pub days_forward: u32,
}

impl Default for DayWindow {
    fn default() -> Self {
        // Three days either side also covers viewers far ahead of US Eastern time.
        Self { days_back: 3, days_forward: 3 }
    }
}

impl DayWindow {
    pub fn offsets(&self) -> impl Iterator<Item = i64> {
        -i64::from(self.days_back)..=i64::from(self.days_forward)
    }
}

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub endpoints: Endpoints,
    pub window: DayWindow,
    /// How many days are fetched at once.
    pub concurrency: usize,
    /// Scoreboards, ESPN leaders and stats box scores.
    pub request_timeout: Duration,
    /// CDN box score.
    pub box_score_timeout: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            window: DayWindow::default(),
            concurrency: 3,
            request_timeout: Duration::from_secs(20),
            box_score_timeout: Duration::from_secs(15),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_seven_days() {
        let offsets: Vec<i64> = DayWindow::default().offsets().collect();
        assert_eq!(offsets, vec![-3, -2, -1, 0, 1, 2, 3]);
    }

    #[test]
    fn endpoints_all_strips_trailing_slash() {
        let endpoints = Endpoints::all("http://127.0.0.1:1234/");
        assert_eq!(endpoints.cdn, "http://127.0.0.1:1234");
        assert_eq!(endpoints.espn, endpoints.stats);
    }
}
