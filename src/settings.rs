use log::LevelFilter;
use nba_api::config::FeedConfig;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub feed: FeedConfig,
    pub log_level: LevelFilter,
}

impl AppSettings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults with any overrides found through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut feed = FeedConfig::default();
        let base_url = |key: &str| {
            lookup(key)
                .map(|url| url.trim().trim_end_matches('/').to_owned())
                .filter(|url| !url.is_empty())
        };
        if let Some(url) = base_url("NBA_CDN_URL") {
            feed.endpoints.cdn = url;
        }
        if let Some(url) = base_url("NBA_STATS_URL") {
            feed.endpoints.stats = url;
        }
        if let Some(url) = base_url("NBA_ESPN_URL") {
            feed.endpoints.espn = url;
        }

        let debug = lookup("NBA_DEBUG").is_some_and(|v| is_truthy(&v));
        let log_level = if debug { LevelFilter::Debug } else { LevelFilter::Info };

        Self { feed, log_level }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "TRUE" | "yes" | "YES")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> AppSettings {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppSettings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_point_at_production() {
        let s = settings(&[]);
        assert_eq!(s.log_level, LevelFilter::Info);
        assert_eq!(s.feed.endpoints.cdn, "https://cdn.nba.com");
        assert_eq!(s.feed.concurrency, 3);
    }

    #[test]
    fn debug_toggle() {
        assert_eq!(settings(&[("NBA_DEBUG", "yes")]).log_level, LevelFilter::Debug);
        assert_eq!(settings(&[("NBA_DEBUG", "1")]).log_level, LevelFilter::Debug);
        assert_eq!(settings(&[("NBA_DEBUG", "0")]).log_level, LevelFilter::Info);
        assert_eq!(settings(&[("NBA_DEBUG", "True")]).log_level, LevelFilter::Info);
    }

    #[test]
    fn endpoint_overrides() {
        let s = settings(&[("NBA_STATS_URL", "http://localhost:9000/"), ("NBA_ESPN_URL", "  ")]);
        assert_eq!(s.feed.endpoints.stats, "http://localhost:9000");
        assert_eq!(s.feed.endpoints.espn, "https://site.web.api.espn.com");
    }
}
