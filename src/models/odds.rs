//! Odds-comparison API data models
//!
//! Shapes follow the-odds-api v4 event-odds wire format.

use serde::{Deserialize, Serialize};

/// A single event with its bookmaker odds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OddsEvent {
    pub id: String,
    pub sport_key: String,
    #[serde(default)]
    pub sport_title: Option<String>,
    pub commence_time: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub bookmakers: Vec<Bookmaker>,
}

/// One bookmaker's markets for the event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmaker {
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub markets: Vec<OddsMarket>,
}

/// A market (h2h, spreads, totals) with its outcomes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OddsMarket {
    pub key: String,
    #[serde(default)]
    pub outcomes: Vec<MarketOutcome>,
}

/// A priced outcome within a market
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketOutcome {
    pub name: String,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_odds_parse() {
        let json = r#"{
            "id": "e912304de2b2ce35b473ce2ecd3d1502",
            "sport_key": "soccer_epl",
            "sport_title": "EPL",
            "commence_time": "2026-08-29T14:00:00Z",
            "home_team": "Arsenal",
            "away_team": "Chelsea",
            "bookmakers": [{
                "key": "pinnacle",
                "title": "Pinnacle",
                "markets": [{
                    "key": "h2h",
                    "outcomes": [
                        {"name": "Arsenal", "price": 1.85},
                        {"name": "Chelsea", "price": 4.2},
                        {"name": "Draw", "price": 3.6}
                    ]
                }]
            }]
        }"#;
        let event: OddsEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.home_team, "Arsenal");
        assert_eq!(event.bookmakers.len(), 1);
        assert_eq!(event.bookmakers[0].markets[0].outcomes[1].price, 4.2);
        assert!(event.bookmakers[0].markets[0].outcomes[0].point.is_none());
    }
}
