use crate::{Card, Hand, Seat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reasons a set of four hands cannot be a deal
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DealError {
    #[error("{card} is held by both {first} and {second}")]
    DuplicateCard { card: Card, first: Seat, second: Seat },
    #[error("hands have different lengths: {lengths:?} (N, E, S, W)")]
    UnevenHands { lengths: [usize; 4] },
}

/// Four hands, one per seat
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Deal {
    pub north: Hand,
    pub east: Hand,
    pub south: Hand,
    pub west: Hand,
}

impl Deal {
    /// Create a new empty deal
    pub fn new() -> Self {
        Deal::default()
    }

    /// Get a reference to a hand by seat
    pub fn hand(&self, seat: Seat) -> &Hand {
        match seat {
            Seat::North => &self.north,
            Seat::East => &self.east,
            Seat::South => &self.south,
            Seat::West => &self.west,
        }
    }

    /// Get a mutable reference to a hand by seat
    pub fn hand_mut(&mut self, seat: Seat) -> &mut Hand {
        match seat {
            Seat::North => &mut self.north,
            Seat::East => &mut self.east,
            Seat::South => &mut self.south,
            Seat::West => &mut self.west,
        }
    }

    /// Seat currently holding a card, if any
    pub fn holder(&self, card: Card) -> Option<Seat> {
        Seat::ALL
            .into_iter()
            .find(|&seat| self.hand(seat).has_card(card))
    }

    /// Total number of cards across all four hands
    pub fn len(&self) -> usize {
        Seat::ALL.iter().map(|&seat| self.hand(seat).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reject deals with a card in two hands
    pub fn check_distinct(&self) -> Result<(), DealError> {
        let mut seen: [Option<Seat>; 52] = [None; 52];
        for seat in Seat::ALL {
            for card in self.hand(seat).cards() {
                let slot = &mut seen[card.to_index() as usize];
                if let Some(first) = *slot {
                    return Err(DealError::DuplicateCard {
                        card,
                        first,
                        second: seat,
                    });
                }
                *slot = Some(seat);
            }
        }
        Ok(())
    }

    /// Reject deals that could not arise at the start of a trick:
    /// duplicated cards or hands of different lengths.
    pub fn validate(&self) -> Result<(), DealError> {
        self.check_distinct()?;
        let lengths = Seat::ALL.map(|seat| self.hand(seat).len());
        if lengths.iter().any(|&len| len != lengths[0]) {
            return Err(DealError::UnevenHands { lengths });
        }
        Ok(())
    }
}
