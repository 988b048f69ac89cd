//! Fixture preview prompt builder
//!
//! Embeds the league table, head-to-head history, and announced lineups for
//! one fixture, and pins the reply to a fixed JSON shape.

use crate::models::football::{FixtureContext, FixtureRow};
use std::fmt::Write;

fn format_h2h_row(row: &FixtureRow) -> String {
    let date = row.fixture.date.as_deref().unwrap_or("unknown date");
    match &row.goals {
        Some(goals) => format!(
            "{date}: {} {} - {} {}",
            row.teams.home.name,
            goals.home.map_or("?".to_string(), |g| g.to_string()),
            goals.away.map_or("?".to_string(), |g| g.to_string()),
            row.teams.away.name,
        ),
        None => format!(
            "{date}: {} vs {} (no score recorded)",
            row.teams.home.name, row.teams.away.name
        ),
    }
}

/// Build the fixture preview prompt
pub fn build(context: &FixtureContext) -> String {
    let home = &context.fixture.teams.home;
    let away = &context.fixture.teams.away;

    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "You are a football analyst. Preview the fixture {} vs {}.",
        home.name, away.name
    );
    if let Some(date) = &context.fixture.fixture.date {
        let _ = writeln!(prompt, "Kick-off: {date}");
    }

    if !context.standings.is_empty() {
        let _ = writeln!(prompt, "\nLeague table (rank, team, played, points, goal diff, form):");
        for row in &context.standings {
            let _ = writeln!(
                prompt,
                "{:>2}. {} | P{} | {} pts | GD {:+} | form {}",
                row.rank,
                row.team.name,
                row.all.played,
                row.points,
                row.goals_diff,
                row.form.as_deref().unwrap_or("-"),
            );
        }
    }

    if !context.head_to_head.is_empty() {
        let _ = writeln!(prompt, "\nRecent head-to-head meetings:");
        for row in &context.head_to_head {
            let _ = writeln!(prompt, "- {}", format_h2h_row(row));
        }
    }

    for lineup in &context.lineups {
        let _ = writeln!(
            prompt,
            "\n{} lineup ({}), coach {}:",
            lineup.team.name,
            lineup.formation.as_deref().unwrap_or("formation TBC"),
            lineup
                .coach
                .as_ref()
                .and_then(|c| c.name.as_deref())
                .unwrap_or("unknown"),
        );
        let starters: Vec<&str> = lineup
            .start_eleven
            .iter()
            .map(|entry| entry.player.name.as_str())
            .collect();
        let _ = writeln!(prompt, "{}", starters.join(", "));
    }

    let _ = writeln!(
        prompt,
        "\nReply with a single JSON object, no markdown, no commentary outside it:"
    );
    let _ = writeln!(
        prompt,
        r#"{{"prediction": "<one sentence>", "probabilities": {{"home": <0-1>, "draw": <0-1>, "away": <0-1>}}, "predicted_score": "<h-a>", "rationale": "<three sentences>"}}"#
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::football::{
        FixtureGoals, FixtureHeader, FixtureTeams, GoalRecord, StandingRecord, StandingRow,
        TeamRef,
    };

    fn team(id: u32, name: &str) -> TeamRef {
        TeamRef {
            id,
            name: name.to_string(),
            winner: None,
        }
    }

    fn standing(rank: u32, name: &str, points: i32) -> StandingRow {
        StandingRow {
            rank,
            team: team(rank, name),
            points,
            goals_diff: 10,
            form: Some("WWDLW".to_string()),
            all: StandingRecord {
                played: 20,
                win: 12,
                draw: 4,
                lose: 4,
                goals: GoalRecord {
                    scored: 40,
                    against: 30,
                },
            },
        }
    }

    fn context() -> FixtureContext {
        FixtureContext {
            fixture: FixtureRow {
                fixture: FixtureHeader {
                    id: 1100,
                    date: Some("2026-08-29T14:00:00Z".to_string()),
                },
                teams: FixtureTeams {
                    home: team(42, "Arsenal"),
                    away: team(49, "Chelsea"),
                },
                goals: None,
            },
            standings: vec![standing(1, "Arsenal", 50), standing(5, "Chelsea", 38)],
            head_to_head: vec![FixtureRow {
                fixture: FixtureHeader {
                    id: 900,
                    date: Some("2026-03-01T16:30:00Z".to_string()),
                },
                teams: FixtureTeams {
                    home: team(49, "Chelsea"),
                    away: team(42, "Arsenal"),
                },
                goals: Some(FixtureGoals {
                    home: Some(0),
                    away: Some(2),
                }),
            }],
            lineups: vec![],
        }
    }

    #[test]
    fn test_prompt_embeds_teams_and_table() {
        let prompt = build(&context());
        assert!(prompt.contains("Arsenal vs Chelsea"));
        assert!(prompt.contains("50 pts"));
        assert!(prompt.contains("Chelsea 0 - 2 Arsenal"));
        assert!(prompt.contains(r#""probabilities""#));
    }

    #[test]
    fn test_prompt_skips_empty_sections() {
        let mut ctx = context();
        ctx.standings.clear();
        ctx.head_to_head.clear();
        let prompt = build(&ctx);
        assert!(!prompt.contains("League table"));
        assert!(!prompt.contains("head-to-head"));
    }
}
