use crate::{Card, Rank, Suit};
use serde::{Deserialize, Serialize};

/// One seat's holding: a descending run of ranks for each suit.
///
/// Runs are kept sorted high-to-low at all times, so iteration order and
/// notation output never depend on insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Holdings")]
pub struct Hand {
    holdings: [Vec<Rank>; 4],
}

/// Serialized form of a hand, clubs first. Runs may arrive in any order or
/// repeat a rank.
#[derive(Deserialize)]
struct Holdings {
    holdings: [Vec<Rank>; 4],
}

impl From<Holdings> for Hand {
    fn from(raw: Holdings) -> Self {
        Hand::from_cards(
            Suit::ALL
                .into_iter()
                .zip(raw.holdings)
                .flat_map(|(suit, ranks)| ranks.into_iter().map(move |rank| Card::new(suit, rank))),
        )
    }
}

impl Hand {
    /// Create a new empty hand
    pub fn new() -> Self {
        Hand::default()
    }

    /// Create a hand from a list of cards
    pub fn from_cards(cards: impl IntoIterator<Item = Card>) -> Self {
        let mut hand = Hand::new();
        for card in cards {
            hand.add_card(card);
        }
        hand
    }

    /// Add a card, keeping its suit sorted. Returns false if already held.
    pub fn add_card(&mut self, card: Card) -> bool {
        let run = &mut self.holdings[card.suit as usize];
        // descending, so search with reversed comparison
        match run.binary_search_by(|held| card.rank.cmp(held)) {
            Ok(_) => false,
            Err(idx) => {
                run.insert(idx, card.rank);
                true
            }
        }
    }

    /// Remove a card. Returns false if it was not held.
    pub fn remove_card(&mut self, card: Card) -> bool {
        let run = &mut self.holdings[card.suit as usize];
        match run.iter().position(|&r| r == card.rank) {
            Some(idx) => {
                run.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Check if hand contains a specific card
    pub fn has_card(&self, card: Card) -> bool {
        self.holdings[card.suit as usize].contains(&card.rank)
    }

    /// Ranks held in a suit, highest first
    pub fn holding(&self, suit: Suit) -> &[Rank] {
        &self.holdings[suit as usize]
    }

    /// All cards in notation order: spades, hearts, diamonds, clubs, each high to low
    pub fn cards(&self) -> Vec<Card> {
        Suit::NOTATION_ORDER
            .iter()
            .flat_map(|&suit| self.cards_in_suit(suit))
            .collect()
    }

    /// Get all cards of a specific suit, highest first
    pub fn cards_in_suit(&self, suit: Suit) -> Vec<Card> {
        self.holding(suit)
            .iter()
            .map(|&rank| Card::new(suit, rank))
            .collect()
    }

    /// Get the number of cards in the hand
    pub fn len(&self) -> usize {
        self.holdings.iter().map(Vec::len).sum()
    }

    /// Check if the hand is empty
    pub fn is_empty(&self) -> bool {
        self.holdings.iter().all(Vec::is_empty)
    }

    /// Count cards of a specific suit
    pub fn suit_length(&self, suit: Suit) -> usize {
        self.holding(suit).len()
    }

    /// Calculate total High Card Points (HCP)
    /// A=4, K=3, Q=2, J=1
    pub fn hcp(&self) -> u8 {
        self.holdings
            .iter()
            .flat_map(|run| run.iter())
            .map(Rank::hcp)
            .sum()
    }
}
