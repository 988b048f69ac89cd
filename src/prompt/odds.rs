//! Odds value prompt builder
//!
//! Embeds the bookmaker price table for one event and pins the reply to a
//! fixed JSON shape.

use crate::models::odds::OddsEvent;
use std::fmt::Write;

/// Build the odds analysis prompt
pub fn build(event: &OddsEvent) -> String {
    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "You are a betting-market analyst. Assess the odds for {} vs {} ({}, kick-off {}).",
        event.home_team,
        event.away_team,
        event.sport_title.as_deref().unwrap_or(&event.sport_key),
        event.commence_time
    );

    let _ = writeln!(prompt, "\nBookmaker prices (decimal odds):");
    for bookmaker in &event.bookmakers {
        for market in &bookmaker.markets {
            let outcomes: Vec<String> = market
                .outcomes
                .iter()
                .map(|o| match o.point {
                    Some(point) => format!("{} {:+} @ {:.2}", o.name, point, o.price),
                    None => format!("{} @ {:.2}", o.name, o.price),
                })
                .collect();
            let _ = writeln!(
                prompt,
                "- {} [{}]: {}",
                bookmaker.title,
                market.key,
                outcomes.join(", ")
            );
        }
    }

    let _ = writeln!(
        prompt,
        "\nCompare prices across bookmakers, derive implied probabilities, and flag the best value."
    );
    let _ = writeln!(
        prompt,
        "Reply with a single JSON object, no markdown, no commentary outside it:"
    );
    let _ = writeln!(
        prompt,
        r#"{{"best_value": {{"outcome": "<name>", "bookmaker": "<title>", "price": <number>}}, "implied_probabilities": {{"<outcome>": <0-1>}}, "rationale": "<two sentences>"}}"#
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::odds::{Bookmaker, MarketOutcome, OddsMarket};

    fn event() -> OddsEvent {
        OddsEvent {
            id: "abc123".to_string(),
            sport_key: "soccer_epl".to_string(),
            sport_title: Some("EPL".to_string()),
            commence_time: "2026-08-29T14:00:00Z".to_string(),
            home_team: "Arsenal".to_string(),
            away_team: "Chelsea".to_string(),
            bookmakers: vec![Bookmaker {
                key: "pinnacle".to_string(),
                title: "Pinnacle".to_string(),
                markets: vec![OddsMarket {
                    key: "h2h".to_string(),
                    outcomes: vec![
                        MarketOutcome {
                            name: "Arsenal".to_string(),
                            price: 1.85,
                            point: None,
                        },
                        MarketOutcome {
                            name: "Draw".to_string(),
                            price: 3.6,
                            point: None,
                        },
                    ],
                }],
            }],
        }
    }

    #[test]
    fn test_prompt_embeds_prices() {
        let prompt = build(&event());
        assert!(prompt.contains("Arsenal vs Chelsea"));
        assert!(prompt.contains("Pinnacle [h2h]"));
        assert!(prompt.contains("Arsenal @ 1.85"));
        assert!(prompt.contains(r#""best_value""#));
    }

    #[test]
    fn test_prompt_formats_spread_points() {
        let mut e = event();
        e.bookmakers[0].markets[0].key = "spreads".to_string();
        e.bookmakers[0].markets[0].outcomes[0].point = Some(-1.5);
        let prompt = build(&e);
        assert!(prompt.contains("Arsenal -1.5 @ 1.85"));
    }
}
