use crate::SolverError;
use explorer_core::{Card, Rank, Seat, Strain, Suit};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A request written to the solver as one line of JSON.
///
/// Cards are rank-then-suit codes ("5D"), strains and seats single letters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SolverRequest {
    NextPlays {
        board: String,
        trump: char,
        declarer: char,
        plays: Vec<String>,
    },
    DdTable {
        board: String,
    },
}

/// Tricks already taken by each side, as reported by the solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrickCounts {
    pub ns: u8,
    pub ew: u8,
}

/// One candidate card for the player on turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayOption {
    pub card: Card,
    /// Other ranks in the same suit that lead to the same result
    pub equals: Vec<Rank>,
    /// Tricks the player's side can still take after playing this card
    pub score: u8,
}

/// The solver's view of every candidate play in a position
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextPlays {
    pub player: Seat,
    pub tricks: TrickCounts,
    pub plays: Vec<PlayOption>,
}

impl NextPlays {
    /// Highest score on offer
    pub fn best_score(&self) -> Option<u8> {
        self.plays.iter().map(|p| p.score).max()
    }

    /// Option for `card`, whether listed directly or as an equal of another
    pub fn option_for(&self, card: Card) -> Option<&PlayOption> {
        self.plays.iter().find(|p| {
            p.card == card || (p.card.suit == card.suit && p.equals.contains(&card.rank))
        })
    }
}

/// Makeable tricks for every strain and declarer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DdTable {
    tricks: [[u8; 4]; 5],
}

impl DdTable {
    pub fn tricks(&self, strain: Strain, declarer: Seat) -> u8 {
        self.tricks[strain as usize][declarer.index()]
    }
}

#[derive(Debug, Deserialize)]
struct RawNextPlays {
    player: String,
    tricks: TrickCounts,
    plays: Vec<RawPlay>,
}

#[derive(Debug, Deserialize)]
struct RawPlay {
    suit: String,
    rank: String,
    #[serde(default)]
    equals: Vec<String>,
    score: u8,
}

pub(crate) fn parse_next_plays(value: serde_json::Value) -> Result<NextPlays, SolverError> {
    let raw: RawNextPlays =
        serde_json::from_value(value).map_err(|err| SolverError::Protocol(err.to_string()))?;

    let player = parse_seat(&raw.player)?;
    let plays = raw
        .plays
        .iter()
        .map(|play| {
            let suit = single_char(&play.suit)
                .and_then(Suit::from_char)
                .ok_or_else(|| protocol("suit", &play.suit))?;
            let equals = play
                .equals
                .iter()
                .map(|r| parse_rank(r))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(PlayOption {
                card: Card::new(suit, parse_rank(&play.rank)?),
                equals,
                score: play.score,
            })
        })
        .collect::<Result<Vec<_>, SolverError>>()?;

    Ok(NextPlays {
        player,
        tricks: raw.tricks,
        plays,
    })
}

pub(crate) fn parse_dd_table(value: serde_json::Value) -> Result<DdTable, SolverError> {
    let raw: BTreeMap<String, BTreeMap<String, u8>> =
        serde_json::from_value(value).map_err(|err| SolverError::Protocol(err.to_string()))?;

    let mut tricks = [[0u8; 4]; 5];
    for strain in Strain::ALL {
        let key = strain.to_char().to_string();
        let row = raw.get(&key).ok_or_else(|| protocol("missing strain", &key))?;
        for seat in Seat::ALL {
            let seat_key = seat.to_char().to_string();
            let count = row
                .get(&seat_key)
                .ok_or_else(|| protocol("missing seat", &format!("{key}/{seat_key}")))?;
            if *count > 13 {
                return Err(protocol("trick count", &count.to_string()));
            }
            tricks[strain as usize][seat.index()] = *count;
        }
    }
    Ok(DdTable { tricks })
}

fn parse_seat(text: &str) -> Result<Seat, SolverError> {
    single_char(text)
        .and_then(Seat::from_char)
        .ok_or_else(|| protocol("seat", text))
}

/// Ranks arrive as "2".."9", "T".."A"; "10" is tolerated
fn parse_rank(text: &str) -> Result<Rank, SolverError> {
    if text == "10" {
        return Ok(Rank::Ten);
    }
    single_char(text)
        .and_then(Rank::from_char)
        .ok_or_else(|| protocol("rank", text))
}

fn single_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn protocol(what: &str, value: &str) -> SolverError {
    SolverError::Protocol(format!("unrecognised {what}: {value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_shape() {
        let request = SolverRequest::NextPlays {
            board: "N:A... ... ... ...".into(),
            trump: 'N',
            declarer: 'W',
            plays: vec!["5D".into()],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "action": "next_plays",
                "board": "N:A... ... ... ...",
                "trump": "N",
                "declarer": "W",
                "plays": ["5D"],
            })
        );
        assert_eq!(
            serde_json::to_value(SolverRequest::DdTable { board: "x".into() }).unwrap(),
            json!({"action": "dd_table", "board": "x"})
        );
    }

    #[test]
    fn test_parse_next_plays() {
        let parsed = parse_next_plays(json!({
            "player": "E",
            "tricks": {"ns": 0, "ew": 0},
            "plays": [
                {"suit": "D", "rank": "6", "equals": [], "score": 4},
                {"suit": "D", "rank": "4", "equals": ["2"], "score": 5},
                {"suit": "D", "rank": "10", "score": 3},
            ]
        }))
        .unwrap();

        assert_eq!(parsed.player, Seat::East);
        assert_eq!(parsed.plays.len(), 3);
        assert_eq!(parsed.plays[1].card, Card::new(Suit::Diamonds, Rank::Four));
        assert_eq!(parsed.plays[1].equals, vec![Rank::Two]);
        assert_eq!(parsed.plays[2].card.rank, Rank::Ten);
        assert!(parsed.plays[2].equals.is_empty());
        assert_eq!(parsed.best_score(), Some(5));

        let two = Card::new(Suit::Diamonds, Rank::Two);
        assert_eq!(parsed.option_for(two).map(|p| p.score), Some(5));
    }

    #[test]
    fn test_malformed_responses() {
        for bad in [
            json!({"player": "X", "tricks": {"ns": 0, "ew": 0}, "plays": []}),
            json!({"player": "N", "tricks": {"ns": 0, "ew": 0},
                   "plays": [{"suit": "Z", "rank": "2", "score": 1}]}),
            json!({"player": "N", "tricks": {"ns": 0, "ew": 0},
                   "plays": [{"suit": "S", "rank": "1", "score": 1}]}),
            json!({"player": "N"}),
            json!("not an object"),
        ] {
            assert!(
                matches!(parse_next_plays(bad.clone()), Err(SolverError::Protocol(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_parse_dd_table() {
        let mut rows = serde_json::Map::new();
        for (i, strain) in ["C", "D", "H", "S", "N"].iter().enumerate() {
            rows.insert(
                strain.to_string(),
                json!({"N": i, "E": 13 - i, "S": i + 1, "W": 12 - i}),
            );
        }
        let table = parse_dd_table(serde_json::Value::Object(rows)).unwrap();
        assert_eq!(table.tricks(Strain::Clubs, Seat::North), 0);
        assert_eq!(table.tricks(Strain::NoTrump, Seat::North), 4);
        assert_eq!(table.tricks(Strain::Hearts, Seat::East), 11);
        assert_eq!(table.tricks(Strain::Spades, Seat::West), 9);

        let partial = json!({"N": {"N": 1, "E": 2, "S": 3, "W": 4}});
        assert!(matches!(parse_dd_table(partial), Err(SolverError::Protocol(_))));
    }
}
