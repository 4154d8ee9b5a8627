//! stats.nba.com wire types. Every endpoint answers with named tabular result sets:
//! `{"resultSets": [{"name": "GameHeader", "headers": [...], "rowSet": [[...], ...]}]}`

use crate::lenient;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(default, deserialize_with = "lenient::each")]
    pub result_sets: Vec<ResultSet>,
}

impl StatsResponse {
    pub fn result_set(&self, name: &str) -> Option<&ResultSet> {
        self.result_sets.iter().find(|rs| rs.name == name)
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResultSet {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default, deserialize_with = "lenient::each")]
    pub row_set: Vec<Vec<Value>>,
}

impl ResultSet {
    /// Index of a named column, if this result set has it.
    pub fn column(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.row_set.iter().map(move |cells| Row { set: self, cells: cells.as_slice() })
    }
}

/// One row of a result set, addressed by column name.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    set: &'a ResultSet,
    cells: &'a [Value],
}

impl<'a> Row<'a> {
    pub fn get(&self, header: &str) -> Option<&'a Value> {
        self.set.column(header).and_then(|i| self.cells.get(i))
    }

    pub fn int(&self, header: &str) -> Option<i64> {
        self.get(header).and_then(lenient::int_from_value)
    }

    /// Trimmed text cell; empty text counts as absent.
    pub fn text(&self, header: &str) -> Option<String> {
        self.get(header)
            .and_then(lenient::string_from_value)
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rows_are_addressed_by_header() {
        let raw: StatsResponse = serde_json::from_value(json!({
            "resultSets": [
                {"name": "Other", "headers": [], "rowSet": []},
                {"name": "LineScore", "headers": ["GAME_ID", "TEAM_ID", "PTS"],
                 "rowSet": [["0022400001", 1610612752, "109"], ["0022400001", 1610612738, null]]}
            ]
        }))
        .unwrap();

        let set = raw.result_set("LineScore").unwrap();
        let rows: Vec<_> = set.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].text("GAME_ID").as_deref(), Some("0022400001"));
        assert_eq!(rows[0].int("PTS"), Some(109));
        assert_eq!(rows[1].int("PTS"), None);
        assert_eq!(rows[1].int("MISSING"), None);
        assert!(raw.result_set("GameHeader").is_none());
    }

    #[test]
    fn short_rows_do_not_panic() {
        let raw: StatsResponse = serde_json::from_value(json!({
            "resultSets": [{"name": "PlayerStats", "headers": ["TEAM_ID", "PTS"], "rowSet": [[1]]}]
        }))
        .unwrap();
        let row = raw.result_set("PlayerStats").unwrap().rows().next().unwrap();
        assert_eq!(row.int("TEAM_ID"), Some(1));
        assert_eq!(row.int("PTS"), None);
    }
}
