use crate::{CardMatch, Position};
use explorer_core::{Card, Rank, Seat, Suit};
use explorer_pbn::encode_runs;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Something wrong with a set of recognised cards.
///
/// These are findings, not failures: a read with problems is still worth
/// showing to whoever has to fix it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ConsistencyError {
    /// No position was read as this card
    Missing(Card),
    /// Several positions were read as the same card
    Duplicate { card: Card, positions: Vec<Position> },
    /// A card is followed by a higher card of the same suit
    OutOfOrder { seat: Seat, earlier: Card, later: Card },
    /// A suit appears in two separate groups within one hand
    SplitSuit { seat: Seat, suit: Suit },
}

impl fmt::Display for ConsistencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsistencyError::Missing(card) => write!(f, "Missing {card}"),
            ConsistencyError::Duplicate { card, positions } => {
                let holders: Vec<String> = positions.iter().map(Position::to_string).collect();
                write!(f, "Multiple matches of {card} ({})", holders.join(", "))
            }
            ConsistencyError::OutOfOrder {
                seat,
                earlier,
                later,
            } => write!(f, "{} is out of order: {earlier} < {later}", seat.to_char()),
            ConsistencyError::SplitSuit { seat, suit } => {
                write!(f, "{} has {suit} in more than one group", seat.to_char())
            }
        }
    }
}

/// Check that the matches name every card exactly once and that each
/// displayed hand looks sorted.
///
/// Hands on screen may order their suits in any way (trumps are often
/// hoisted to the front), so only suit grouping and descending ranks within
/// a suit are checked.
pub fn check(matches: &[CardMatch]) -> Vec<ConsistencyError> {
    let mut errors = Vec::new();

    let mut holders: BTreeMap<Card, Vec<Position>> = Card::deck().map(|c| (c, Vec::new())).collect();
    for m in sorted(matches) {
        holders.entry(m.card).or_default().push(m.position);
    }
    for (card, positions) in holders {
        match positions.len() {
            0 => errors.push(ConsistencyError::Missing(card)),
            1 => {}
            _ => errors.push(ConsistencyError::Duplicate { card, positions }),
        }
    }

    for seat in Seat::ALL {
        let hand: Vec<Card> = sorted(matches)
            .into_iter()
            .filter(|m| m.position.seat == seat)
            .map(|m| m.card)
            .collect();

        let mut finished: Vec<Suit> = Vec::new();
        for pair in hand.windows(2) {
            let (earlier, later) = (pair[0], pair[1]);
            if earlier.suit == later.suit {
                if later.rank > earlier.rank {
                    errors.push(ConsistencyError::OutOfOrder {
                        seat,
                        earlier,
                        later,
                    });
                }
                continue;
            }
            finished.push(earlier.suit);
            if finished.contains(&later.suit) {
                let error = ConsistencyError::SplitSuit {
                    seat,
                    suit: later.suit,
                };
                if !errors.contains(&error) {
                    errors.push(error);
                }
            }
        }
    }

    errors
}

/// Build notation from matches, North first.
///
/// Each hand's ranks are written per suit in the order they appear on
/// screen, so a misread shows up in the notation as it was read. Missing
/// suits become voids.
pub fn matches_to_notation(matches: &[CardMatch]) -> String {
    let mut runs: [[Vec<Rank>; 4]; 4] = Default::default();
    for m in sorted(matches) {
        let slot = Suit::NOTATION_ORDER
            .iter()
            .position(|&s| s == m.card.suit)
            .unwrap_or_default();
        runs[m.position.seat.index()][slot].push(m.card.rank);
    }
    encode_runs(Seat::North, &runs)
}

fn sorted(matches: &[CardMatch]) -> Vec<&CardMatch> {
    let mut refs: Vec<&CardMatch> = matches.iter().collect();
    refs.sort_by_key(|m| m.position);
    refs
}
