use crate::Game;
use serde::Serialize;
use std::fmt::Display;

/// The document printed for consumers: the games, or an error envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub matches: Vec<Game>,
    pub count: usize,
    pub error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Report {
    pub fn success(matches: Vec<Game>) -> Self {
        Self { count: matches.len(), matches, error: false, message: None }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { matches: Vec::new(), count: 0, error: true, message: Some(message.into()) }
    }

    pub fn from_result<E: Display>(result: Result<Vec<Game>, E>) -> Self {
        match result {
            Ok(games) => Self::success(games),
            Err(e) => Self::failure(e.to_string()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error
    }
}
