pub mod aggregate;
pub mod cdn;
pub mod client;
pub mod config;
pub mod enrich;
pub mod espn;
pub mod feed;
pub mod leaders;
pub mod lenient;
pub mod report;
pub mod scoreboard;
pub mod stats;
pub mod teams;

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// League tag stamped on every game.
pub const LEAGUE: &str = "NBA";

/// Dates and wall-clock times are always expressed in the league's home timezone.
pub const REFERENCE_TZ: Tz = chrono_tz::America::New_York;

pub const UNKNOWN_VENUE: &str = "未知场馆";
pub const TIME_TBD: &str = "TBD";

// ---------------------------------------------------------------------------
// Domain types shared by every upstream
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    pub home_team_id: Option<i64>,
    pub away_team_id: Option<i64>,
    pub home_score: Option<i64>,
    pub away_score: Option<i64>,
    pub status: GameStatus,
    pub date: NaiveDate,
    pub time: String,
    pub league: &'static str,
    pub venue: String,
    #[serde(flatten)]
    pub leaders: GameLeaders,
    /// Leader hint carried by the scoreboard payload itself, consumed by enrichment.
    #[serde(skip)]
    pub inline_leaders: GameLeaders,
}

impl Game {
    pub fn new(id: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            date,
            time: TIME_TBD.to_owned(),
            league: LEAGUE,
            venue: UNKNOWN_VENUE.to_owned(),
            ..Default::default()
        }
    }

    pub fn team_id(&self, side: Side) -> Option<i64> {
        match side {
            Side::Home => self.home_team_id,
            Side::Away => self.away_team_id,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Upcoming,
    Live,
    Finished,
}

impl GameStatus {
    /// Upstream numeric codes: 1 = scheduled, 2 = in progress, 3 = final.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(GameStatus::Upcoming),
            2 => Some(GameStatus::Live),
            3 => Some(GameStatus::Finished),
            _ => None,
        }
    }

    /// Keyword scan over a free-text status such as "Final", "7:30 pm ET" or "Q3 4:12".
    pub fn from_text(text: &str) -> Self {
        let upper = text.trim().to_uppercase();
        if upper.is_empty() {
            return GameStatus::Upcoming;
        }
        let mut tokens = upper.split(|c: char| !c.is_ascii_alphanumeric()).filter(|t| !t.is_empty());
        if upper.contains("FINAL") {
            GameStatus::Finished
        } else if tokens.any(|t| matches!(t, "AM" | "PM" | "ET")) {
            GameStatus::Upcoming
        } else {
            GameStatus::Live
        }
    }

    /// The numeric code wins whenever it is recognised; text is only a fallback.
    pub fn resolve(code: Option<i64>, text: Option<&str>) -> Self {
        code.and_then(Self::from_code)
            .or_else(|| text.map(Self::from_text))
            .unwrap_or_default()
    }

    /// Only games that have tipped off have player statistics worth looking up.
    pub fn has_stats(&self) -> bool {
        matches!(self, GameStatus::Live | GameStatus::Finished)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Home, Side::Away];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatCategory {
    Points,
    Rebounds,
    Assists,
}

impl StatCategory {
    pub const ALL: [StatCategory; 3] =
        [StatCategory::Points, StatCategory::Rebounds, StatCategory::Assists];

    /// Key under which the value is published, and the category name ESPN uses.
    pub fn key(&self) -> &'static str {
        match self {
            StatCategory::Points => "points",
            StatCategory::Rebounds => "rebounds",
            StatCategory::Assists => "assists",
        }
    }
}

/// One statistical leader. Serialises as `{name, <category key>: value, avatar?}`.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStat {
    pub name: String,
    pub category: StatCategory,
    pub value: Option<i64>,
    pub avatar: Option<String>,
}

impl PlayerStat {
    pub fn new(name: impl Into<String>, category: StatCategory, value: Option<i64>) -> Self {
        Self { name: name.into(), category, value, avatar: None }
    }

    pub fn with_avatar(mut self, avatar: Option<String>) -> Self {
        self.avatar = avatar;
        self
    }
}

impl Serialize for PlayerStat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.avatar.is_some() { 3 } else { 2 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("name", &self.name)?;
        map.serialize_entry(self.category.key(), &self.value)?;
        if let Some(avatar) = &self.avatar {
            map.serialize_entry("avatar", avatar)?;
        }
        map.end()
    }
}

/// The six leader slots of a game.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameLeaders {
    pub home_top_scorer: Option<PlayerStat>,
    pub home_top_rebounder: Option<PlayerStat>,
    pub home_top_assister: Option<PlayerStat>,
    pub away_top_scorer: Option<PlayerStat>,
    pub away_top_rebounder: Option<PlayerStat>,
    pub away_top_assister: Option<PlayerStat>,
}

impl GameLeaders {
    pub fn slot(&self, side: Side, category: StatCategory) -> &Option<PlayerStat> {
        match (side, category) {
            (Side::Home, StatCategory::Points) => &self.home_top_scorer,
            (Side::Home, StatCategory::Rebounds) => &self.home_top_rebounder,
            (Side::Home, StatCategory::Assists) => &self.home_top_assister,
            (Side::Away, StatCategory::Points) => &self.away_top_scorer,
            (Side::Away, StatCategory::Rebounds) => &self.away_top_rebounder,
            (Side::Away, StatCategory::Assists) => &self.away_top_assister,
        }
    }

    pub fn slot_mut(&mut self, side: Side, category: StatCategory) -> &mut Option<PlayerStat> {
        match (side, category) {
            (Side::Home, StatCategory::Points) => &mut self.home_top_scorer,
            (Side::Home, StatCategory::Rebounds) => &mut self.home_top_rebounder,
            (Side::Home, StatCategory::Assists) => &mut self.home_top_assister,
            (Side::Away, StatCategory::Points) => &mut self.away_top_scorer,
            (Side::Away, StatCategory::Rebounds) => &mut self.away_top_rebounder,
            (Side::Away, StatCategory::Assists) => &mut self.away_top_assister,
        }
    }

    fn slots() -> impl Iterator<Item = (Side, StatCategory)> {
        Side::BOTH
            .into_iter()
            .flat_map(|side| StatCategory::ALL.into_iter().map(move |cat| (side, cat)))
    }

    pub fn filled(&self) -> usize {
        Self::slots().filter(|&(side, cat)| self.slot(side, cat).is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.filled() == 0
    }

    pub fn is_complete(&self) -> bool {
        self.filled() == 6
    }

    /// Copy leaders from `other` into slots that are still unset. Returns how many were filled.
    pub fn fill_missing(&mut self, mut other: GameLeaders) -> usize {
        let mut filled = 0;
        for (side, cat) in Self::slots() {
            let slot = self.slot_mut(side, cat);
            if slot.is_none()
                && let Some(stat) = other.slot_mut(side, cat).take()
            {
                *slot = Some(stat);
                filled += 1;
            }
        }
        filled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_status_code_overrides_text() {
        assert_eq!(GameStatus::resolve(Some(1), Some("Final")), GameStatus::Upcoming);
        assert_eq!(GameStatus::resolve(Some(2), Some("Final")), GameStatus::Live);
        assert_eq!(GameStatus::resolve(Some(3), Some("7:30 pm ET")), GameStatus::Finished);
    }

    #[test]
    fn status_text_fallback_when_code_absent() {
        assert_eq!(GameStatus::resolve(None, Some("Final/OT")), GameStatus::Finished);
        assert_eq!(GameStatus::resolve(None, Some("7:30 pm ET")), GameStatus::Upcoming);
        assert_eq!(GameStatus::resolve(None, Some("")), GameStatus::Upcoming);
        assert_eq!(GameStatus::resolve(None, Some("Q3 4:12")), GameStatus::Live);
        assert_eq!(GameStatus::resolve(None, Some("Halftime")), GameStatus::Live);
        assert_eq!(GameStatus::resolve(None, None), GameStatus::Upcoming);
    }

    #[test]
    fn unrecognised_code_falls_back_to_text() {
        assert_eq!(GameStatus::resolve(Some(7), Some("Final")), GameStatus::Finished);
        assert_eq!(GameStatus::resolve(Some(0), None), GameStatus::Upcoming);
    }

    #[test]
    fn player_stat_serialises_under_category_key() {
        let stat = PlayerStat::new("Jalen Brunson", StatCategory::Points, Some(41));
        assert_eq!(serde_json::to_value(&stat).unwrap(), json!({"name": "Jalen Brunson", "points": 41}));

        let stat = PlayerStat::new("Josh Hart", StatCategory::Rebounds, None)
            .with_avatar(Some("https://example.test/hart.png".into()));
        assert_eq!(
            serde_json::to_value(&stat).unwrap(),
            json!({"name": "Josh Hart", "rebounds": null, "avatar": "https://example.test/hart.png"})
        );
    }

    #[test]
    fn game_serialises_flat_leader_slots() {
        let mut game = Game::new("0022400001", NaiveDate::from_ymd_opt(2024, 10, 22).unwrap());
        game.status = GameStatus::Finished;
        game.leaders.home_top_assister = Some(PlayerStat::new("Tyrese Haliburton", StatCategory::Assists, Some(12)));
        game.inline_leaders.away_top_scorer = Some(PlayerStat::new("Hidden", StatCategory::Points, Some(1)));

        let value = serde_json::to_value(&game).unwrap();
        assert_eq!(value["id"], "0022400001");
        assert_eq!(value["status"], "finished");
        assert_eq!(value["date"], "2024-10-22");
        assert_eq!(value["time"], "TBD");
        assert_eq!(value["league"], "NBA");
        assert_eq!(value["homeScore"], serde_json::Value::Null);
        assert_eq!(value["homeTopAssister"]["assists"], 12);
        assert_eq!(value["awayTopScorer"], serde_json::Value::Null);
        assert!(value.get("inlineLeaders").is_none());
    }

    #[test]
    fn fill_missing_only_touches_empty_slots() {
        let mut leaders = GameLeaders {
            home_top_scorer: Some(PlayerStat::new("Kept", StatCategory::Points, Some(30))),
            ..Default::default()
        };
        let incoming = GameLeaders {
            home_top_scorer: Some(PlayerStat::new("Ignored", StatCategory::Points, Some(40))),
            away_top_rebounder: Some(PlayerStat::new("New", StatCategory::Rebounds, Some(11))),
            ..Default::default()
        };

        assert_eq!(leaders.fill_missing(incoming), 1);
        assert_eq!(leaders.home_top_scorer.as_ref().unwrap().name, "Kept");
        assert_eq!(leaders.away_top_rebounder.as_ref().unwrap().name, "New");
        assert_eq!(leaders.filled(), 2);
        assert!(!leaders.is_complete());
    }
}
