//! Football-statistics API data models
//!
//! Shapes follow the api-football v3 wire format, trimmed to the fields the
//! prompt builders embed. Everything arrives wrapped in a `response` array.

use serde::{Deserialize, Serialize};

/// Generic envelope around every football API reply
#[derive(Debug, Clone, Deserialize)]
pub struct FootballEnvelope<T> {
    #[serde(default)]
    pub errors: serde_json::Value,
    #[serde(default = "Vec::new")]
    pub response: Vec<T>,
}

impl<T> FootballEnvelope<T> {
    /// The API reports errors as a non-empty object or array
    pub fn has_errors(&self) -> bool {
        match &self.errors {
            serde_json::Value::Array(items) => !items.is_empty(),
            serde_json::Value::Object(map) => !map.is_empty(),
            serde_json::Value::Null => false,
            _ => true,
        }
    }

    /// Human-readable rendering of the error payload
    pub fn error_text(&self) -> String {
        self.errors.to_string()
    }
}

/// A team reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub winner: Option<bool>,
}

/// One row of a league table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingRow {
    pub rank: u32,
    pub team: TeamRef,
    pub points: i32,
    #[serde(rename = "goalsDiff")]
    pub goals_diff: i32,
    #[serde(default)]
    pub form: Option<String>,
    pub all: StandingRecord,
}

/// Played/won/drawn/lost record within a standings row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandingRecord {
    pub played: u32,
    pub win: u32,
    pub draw: u32,
    pub lose: u32,
    pub goals: GoalRecord,
}

/// Goals for/against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalRecord {
    #[serde(rename = "for")]
    pub scored: i32,
    pub against: i32,
}

/// Standings reply row: league -> standings (list of groups, each a table)
#[derive(Debug, Clone, Deserialize)]
pub struct StandingsEntry {
    pub league: StandingsLeague,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StandingsLeague {
    #[serde(default)]
    pub standings: Vec<Vec<StandingRow>>,
}

/// Fixture header (id, kickoff, teams)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureHeader {
    pub id: u64,
    #[serde(default)]
    pub date: Option<String>,
}

/// Final or current score of a fixture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureGoals {
    #[serde(default)]
    pub home: Option<i32>,
    #[serde(default)]
    pub away: Option<i32>,
}

/// Home/away team pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureTeams {
    pub home: TeamRef,
    pub away: TeamRef,
}

/// One fixture row, used for both fixture lookup and head-to-head history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureRow {
    pub fixture: FixtureHeader,
    pub teams: FixtureTeams,
    #[serde(default)]
    pub goals: Option<FixtureGoals>,
}

/// A starting-eleven entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineupPlayerEntry {
    pub player: LineupPlayer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineupPlayer {
    pub name: String,
    #[serde(default)]
    pub pos: Option<String>,
}

/// Coach reference inside a lineup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineupCoach {
    #[serde(default)]
    pub name: Option<String>,
}

/// Announced lineup for one team
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamLineup {
    pub team: TeamRef,
    #[serde(default)]
    pub formation: Option<String>,
    #[serde(default)]
    pub coach: Option<LineupCoach>,
    #[serde(rename = "startXI", default)]
    pub start_eleven: Vec<LineupPlayerEntry>,
}

/// Everything a fixture-analysis prompt embeds, fetched per request
#[derive(Debug, Clone, Serialize)]
pub struct FixtureContext {
    pub fixture: FixtureRow,
    pub standings: Vec<StandingRow>,
    pub head_to_head: Vec<FixtureRow>,
    pub lineups: Vec<TeamLineup>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standings_row_parses() {
        let json = r#"{
            "rank": 1,
            "team": {"id": 50, "name": "Manchester City"},
            "points": 63,
            "goalsDiff": 39,
            "form": "WWDWW",
            "all": {
                "played": 27,
                "win": 19,
                "draw": 6,
                "lose": 2,
                "goals": {"for": 63, "against": 24}
            }
        }"#;
        let row: StandingRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.rank, 1);
        assert_eq!(row.team.name, "Manchester City");
        assert_eq!(row.all.goals.scored, 63);
    }

    #[test]
    fn test_envelope_error_detection() {
        let empty: FootballEnvelope<StandingRow> = serde_json::from_str(
            r#"{"errors": [], "response": []}"#,
        )
        .unwrap();
        assert!(!empty.has_errors());

        let failed: FootballEnvelope<StandingRow> = serde_json::from_str(
            r#"{"errors": {"token": "Invalid API key"}, "response": []}"#,
        )
        .unwrap();
        assert!(failed.has_errors());
        assert!(failed.error_text().contains("Invalid API key"));
    }

    #[test]
    fn test_lineup_parses() {
        let json = r#"{
            "team": {"id": 33, "name": "Manchester United"},
            "formation": "4-2-3-1",
            "coach": {"name": "Erik ten Hag"},
            "startXI": [
                {"player": {"name": "Onana", "pos": "G"}},
                {"player": {"name": "Dalot", "pos": "D"}}
            ]
        }"#;
        let lineup: TeamLineup = serde_json::from_str(json).unwrap();
        assert_eq!(lineup.formation.as_deref(), Some("4-2-3-1"));
        assert_eq!(lineup.start_eleven.len(), 2);
        assert_eq!(lineup.start_eleven[0].player.name, "Onana");
    }
}
