use explorer_core::{Card, Seat, Suit};
use serde::Serialize;

/// One card laid down by one seat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Play {
    pub seat: Seat,
    pub card: Card,
}

impl Play {
    pub fn new(seat: Seat, card: Card) -> Self {
        Play { seat, card }
    }
}

/// A completed trick. Never modified once it is part of a board's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trick {
    pub leader: Seat,
    pub winner: Seat,
    pub plays: [Play; 4],
}

impl Trick {
    /// Resolve four plays, the first of which is the lead
    pub(crate) fn resolve(plays: [Play; 4], trump: Option<Suit>) -> Self {
        Trick {
            leader: plays[0].seat,
            winner: winning_play(&plays, trump).seat,
            plays,
        }
    }

    /// Suit of the card led
    pub fn suit_led(&self) -> Suit {
        self.plays[0].card.suit
    }
}

/// The play that takes a trick.
///
/// Scans in order, replacing the running best only when a card strictly
/// beats it: a higher card of the same suit, or a trump over a non-trump.
/// `plays` must not be empty.
pub(crate) fn winning_play(plays: &[Play], trump: Option<Suit>) -> Play {
    let mut best = plays[0];
    for &play in &plays[1..] {
        let (card, top) = (play.card, best.card);
        let beats = if card.suit == top.suit {
            card.rank > top.rank
        } else {
            Some(card.suit) == trump
        };
        if beats {
            best = play;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn play(seat: Seat, code: &str) -> Play {
        Play::new(seat, Card::from_code(code).unwrap())
    }

    fn trick(codes: [&str; 4], trump: Option<Suit>) -> Trick {
        Trick::resolve(
            [
                play(Seat::North, codes[0]),
                play(Seat::East, codes[1]),
                play(Seat::South, codes[2]),
                play(Seat::West, codes[3]),
            ],
            trump,
        )
    }

    #[test]
    fn test_highest_of_suit_led_wins() {
        let t = trick(["5D", "2D", "QD", "9D"], None);
        assert_eq!(t.leader, Seat::North);
        assert_eq!(t.winner, Seat::South);
        assert_eq!(t.suit_led(), Suit::Diamonds);
    }

    #[test]
    fn test_discards_never_win() {
        // aces of other suits are discards in no trump
        let t = trick(["3C", "AS", "AH", "2C"], None);
        assert_eq!(t.winner, Seat::North);
    }

    #[test]
    fn test_trump_beats_suit_led() {
        let t = trick(["AS", "2D", "KS", "QS"], Some(Suit::Diamonds));
        assert_eq!(t.winner, Seat::East);
    }

    #[test]
    fn test_overruff() {
        let t = trick(["AS", "2D", "5D", "3D"], Some(Suit::Diamonds));
        assert_eq!(t.winner, Seat::South);
    }

    #[test]
    fn test_trump_lead_is_ordinary() {
        let t = trick(["4H", "9H", "AS", "TH"], Some(Suit::Hearts));
        assert_eq!(t.winner, Seat::West);
    }
}
