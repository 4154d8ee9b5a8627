mod settings;

use crate::settings::AppSettings;
use anyhow::{Context, anyhow};
use env_logger::Env;
use futures_util::FutureExt;
use log::error;
use nba_api::Game;
use nba_api::feed::NbaFeed;
use nba_api::report::Report;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    if handle_cli_args() {
        return ExitCode::SUCCESS;
    }

    better_panic::install();

    let settings = AppSettings::load();
    env_logger::Builder::from_env(Env::default().default_filter_or(settings.log_level.as_str()))
        .target(env_logger::Target::Stderr)
        .init();

    let report = into_report(run(settings).await);
    match emit(&report) {
        Ok(()) if !report.is_error() => ExitCode::SUCCESS,
        Ok(()) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            let fallback = Report::failure(format!("{e:#}"));
            if let Ok(json) = serde_json::to_string(&fallback) {
                eprintln!("{json}");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(settings: AppSettings) -> anyhow::Result<Vec<Game>> {
    let feed = NbaFeed::new(settings.feed).context("could not set up the NBA feed")?;
    guarded(feed.aggregate()).await
}

/// Turns a panic inside `games` into an error so the run still ends with an envelope.
async fn guarded(games: impl Future<Output = Vec<Game>>) -> anyhow::Result<Vec<Game>> {
    AssertUnwindSafe(games)
        .catch_unwind()
        .await
        .map_err(|payload| anyhow!("aggregation panicked: {}", panic_message(payload.as_ref())))
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

fn into_report(result: anyhow::Result<Vec<Game>>) -> Report {
    Report::from_result(result.map_err(|e| {
        error!("{e:#}");
        format!("{e:#}")
    }))
}

/// Successful reports go to stdout, error envelopes to stderr.
fn emit(report: &Report) -> anyhow::Result<()> {
    let json = serde_json::to_string(report).context("could not serialise the report")?;
    if report.is_error() {
        eprintln!("{json}");
    } else {
        println!("{json}");
    }
    Ok(())
}

fn handle_cli_args() -> bool {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return false;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            true
        }
        "-V" | "--version" => {
            println!("nbafeed {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "nbafeed - NBA games from three days back to three days ahead, as JSON

Usage:
  nbafeed
  nbafeed --help
  nbafeed --version

Environment:
  NBA_DEBUG       Verbose logging on stderr (1, true, yes)
  RUST_LOG        Full log filter, overrides NBA_DEBUG
  NBA_CDN_URL     Base URL of the NBA live-data CDN (default https://cdn.nba.com)
  NBA_STATS_URL   Base URL of stats.nba.com (default https://stats.nba.com)
  NBA_ESPN_URL    Base URL of the ESPN site API (default https://site.web.api.espn.com)"
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn exploding_window() -> Vec<Game> {
        panic!("scoreboard exploded")
    }

    #[tokio::test]
    async fn panic_during_aggregation_becomes_error_envelope() {
        let report = into_report(guarded(exploding_window()).await);
        assert!(report.is_error());

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["matches"], json!([]));
        assert_eq!(value["count"], 0);
        assert_eq!(value["error"], true);
        assert_eq!(value["message"], "aggregation panicked: scoreboard exploded");
    }

    #[test]
    fn setup_failure_keeps_its_context() {
        let failed: anyhow::Result<Vec<Game>> =
            Err(anyhow!("builder refused")).context("could not set up the NBA feed");
        let report = into_report(failed);
        assert_eq!(report.message.as_deref(), Some("could not set up the NBA feed: builder refused"));
        assert_eq!(report.count, 0);
    }

    #[tokio::test]
    async fn guarded_passes_games_through() {
        let report = into_report(guarded(async { Vec::<Game>::new() }).await);
        assert!(!report.is_error());
        assert_eq!(serde_json::to_value(&report).unwrap(), json!({"matches": [], "count": 0, "error": false}));
    }
}
