use serde::{Deserialize, Serialize};

/// Run values a batter can score off the bat in one delivery.
pub const VALID_RUN_VALUES: [u8; 6] = [0, 1, 2, 3, 4, 6];

/// A single ball outcome submitted by the scorer.
///
/// `Runs` and `Wicket` are legal deliveries and advance the over; wides,
/// no-balls, and byes do not. The serde form matches the JSON api:
/// `{"kind": "runs", "value": 4}`, `{"kind": "wicket"}`, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BallEvent {
    Runs { value: u8 },
    Wicket,
    Wide,
    NoBall,
    Bye { value: u8 },
}

impl BallEvent {
    pub fn is_legal_delivery(&self) -> bool {
        matches!(self, BallEvent::Runs { .. } | BallEvent::Wicket)
    }

    /// Short display token for the over strip and the ball log:
    /// "0".."6", "W", "WD", "NB", "B{n}".
    pub fn token(&self) -> String {
        match self {
            BallEvent::Runs { value } => value.to_string(),
            BallEvent::Wicket => "W".to_string(),
            BallEvent::Wide => "WD".to_string(),
            BallEvent::NoBall => "NB".to_string(),
            BallEvent::Bye { value } => format!("B{}", value),
        }
    }

    /// Parse scorer shorthand, case-insensitive: a bare run value, `w`
    /// (wicket), `wd` (wide), `nb` (no-ball), or `b<n>` (byes).
    pub fn parse(input: &str) -> Option<Self> {
        let token = input.trim().to_ascii_lowercase();
        match token.as_str() {
            "w" => Some(BallEvent::Wicket),
            "wd" => Some(BallEvent::Wide),
            "nb" => Some(BallEvent::NoBall),
            _ => {
                if let Some(rest) = token.strip_prefix('b') {
                    rest.parse::<u8>().ok().map(|value| BallEvent::Bye { value })
                } else {
                    token.parse::<u8>().ok().map(|value| BallEvent::Runs { value })
                }
            }
        }
    }
}
