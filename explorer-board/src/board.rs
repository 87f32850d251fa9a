use crate::trick::{Play, Trick};
use explorer_core::{Card, Deal, DealError, Partnership, Rank, Seat, Strain, Suit};
use explorer_pbn::{decode, encode, FormatError, ShareState};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Reasons a board operation is refused. The board is unchanged afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("it is {expected}'s turn, not {actual}'s")]
    Turn { expected: Seat, actual: Seat },
    #[error("{seat} does not hold {card}")]
    NotHeld { seat: Seat, card: Card },
    #[error("{seat} must follow suit to {led} and cannot play {card}")]
    Revoke { seat: Seat, card: Card, led: Suit },
    #[error("{0}")]
    State(&'static str),
    #[error("{0} has not been played")]
    NotFound(Card),
    #[error("there is no play {play} in trick {trick}")]
    NoSuchPlay { trick: usize, play: usize },
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    InvalidDeal(#[from] DealError),
}

/// Where a board is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BoardState {
    AwaitingPlay(Seat),
    Complete,
}

/// A deal being played out trick by trick.
///
/// Undo never reverses a play in place: it truncates the play log and
/// replays it on the initial deal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    initial: Deal,
    first_leader: Seat,
    strain: Strain,
    declarer: Seat,

    deal: Deal,
    player: Seat,
    current: Vec<Play>,
    tricks: Vec<Trick>,
    ns_tricks: u8,
    ew_tricks: u8,
}

impl Board {
    /// Start a board from notation. The seat named by the notation's marker
    /// makes the opening lead; declarer sits on its right.
    pub fn new(notation: &str, strain: Strain) -> Result<Self, BoardError> {
        let parsed = decode(notation)?;
        Self::from_deal(parsed.deal, parsed.first_seat, strain)
    }

    /// Start a board with an explicit declarer, whose left-hand opponent
    /// makes the opening lead whatever seat the notation starts with.
    pub fn with_declarer(notation: &str, strain: Strain, declarer: Seat) -> Result<Self, BoardError> {
        let parsed = decode(notation)?;
        Self::from_deal(parsed.deal, declarer.next(), strain)
    }

    /// Start a board from an already-built deal. Declarer is the seat on
    /// `first_leader`'s right.
    pub fn from_deal(deal: Deal, first_leader: Seat, strain: Strain) -> Result<Self, BoardError> {
        deal.validate()?;
        let declarer = Seat::declarer_for_leader(first_leader);
        Ok(Board {
            initial: deal.clone(),
            first_leader,
            strain,
            declarer,
            deal,
            player: first_leader,
            current: Vec::with_capacity(4),
            tricks: Vec::new(),
            ns_tricks: 0,
            ew_tricks: 0,
        })
    }

    /// Rebuild a board from a share state by replaying its plays
    pub fn from_share_state(state: &ShareState) -> Result<Self, BoardError> {
        let mut board = match state.declarer {
            Some(declarer) => Board::with_declarer(&state.deal, state.strain, declarer)?,
            None => Board::new(&state.deal, state.strain)?,
        };
        for &card in &state.plays {
            board.play_card(card)?;
        }
        Ok(board)
    }

    /// Everything needed to recreate this board with [`Board::from_share_state`]
    pub fn share_state(&self) -> ShareState {
        ShareState {
            deal: encode(&self.initial, self.first_leader),
            strain: self.strain,
            declarer: Some(self.declarer),
            plays: self.play_log().iter().map(|p| p.card).collect(),
        }
    }

    pub fn strain(&self) -> Strain {
        self.strain
    }

    pub fn declarer(&self) -> Seat {
        self.declarer
    }

    /// Seat that made the opening lead
    pub fn first_leader(&self) -> Seat {
        self.first_leader
    }

    /// Seat due to play next
    pub fn player(&self) -> Seat {
        self.player
    }

    /// Remaining cards, by seat
    pub fn deal(&self) -> &Deal {
        &self.deal
    }

    pub fn state(&self) -> BoardState {
        if self.current.is_empty() && self.deal.is_empty() {
            BoardState::Complete
        } else {
            BoardState::AwaitingPlay(self.player)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state() == BoardState::Complete
    }

    /// Completed tricks, oldest first
    pub fn tricks(&self) -> &[Trick] {
        &self.tricks
    }

    /// Plays of the trick in progress (zero to three)
    pub fn current_plays(&self) -> &[Play] {
        &self.current
    }

    /// Seat that led (or will lead) the trick in progress
    pub fn leader(&self) -> Seat {
        self.current.first().map_or(self.player, |p| p.seat)
    }

    pub fn ns_tricks(&self) -> u8 {
        self.ns_tricks
    }

    pub fn ew_tricks(&self) -> u8 {
        self.ew_tricks
    }

    /// Tricks taken so far by one side
    pub fn tricks_won(&self, side: Partnership) -> u8 {
        match side {
            Partnership::NorthSouth => self.ns_tricks,
            Partnership::EastWest => self.ew_tricks,
        }
    }

    /// Every play so far in order: completed tricks, then the open one
    pub fn play_log(&self) -> Vec<Play> {
        self.tricks
            .iter()
            .flat_map(|t| t.plays.iter().copied())
            .chain(self.current.iter().copied())
            .collect()
    }

    /// Remaining cards of a seat, spades to clubs, each suit high to low
    pub fn cards_for(&self, seat: Seat) -> Vec<Card> {
        self.deal.hand(seat).cards()
    }

    /// Cards `seat` may legally play to the trick in progress.
    ///
    /// On lead anything goes; otherwise the seat must follow to the suit
    /// led when it can.
    pub fn legal_plays(&self, seat: Seat) -> Vec<Card> {
        let hand = self.deal.hand(seat);
        match self.current.first() {
            Some(lead) if hand.suit_length(lead.card.suit) > 0 => {
                hand.cards_in_suit(lead.card.suit)
            }
            _ => hand.cards(),
        }
    }

    /// Play a card. Completing the fourth card of a trick resolves it before
    /// this returns.
    pub fn play(&mut self, seat: Seat, card: Card) -> Result<(), BoardError> {
        if seat != self.player {
            return Err(BoardError::Turn {
                expected: self.player,
                actual: seat,
            });
        }
        let hand = self.deal.hand(seat);
        if !hand.has_card(card) {
            return Err(BoardError::NotHeld { seat, card });
        }
        if let Some(lead) = self.current.first() {
            let led = lead.card.suit;
            if card.suit != led && hand.suit_length(led) > 0 {
                return Err(BoardError::Revoke { seat, card, led });
            }
        }

        self.deal.hand_mut(seat).remove_card(card);
        self.current.push(Play::new(seat, card));
        debug!(seat = %seat, card = %card, "play");

        if self.current.len() == 4 {
            self.sweep();
        } else {
            self.player = seat.next();
        }
        Ok(())
    }

    /// Play a card for whichever seat is due to play
    pub fn play_card(&mut self, card: Card) -> Result<(), BoardError> {
        self.play(self.player, card)
    }

    /// Convenience for `play(seat, Card::new(suit, rank))`
    pub fn play_suit_rank(&mut self, seat: Seat, suit: Suit, rank: Rank) -> Result<(), BoardError> {
        self.play(seat, Card::new(suit, rank))
    }

    fn sweep(&mut self) {
        let plays: [Play; 4] = [self.current[0], self.current[1], self.current[2], self.current[3]];
        self.current.clear();

        let trick = Trick::resolve(plays, self.strain.trump());
        match trick.winner.partnership() {
            Partnership::NorthSouth => self.ns_tricks += 1,
            Partnership::EastWest => self.ew_tricks += 1,
        }
        debug!(
            winner = %trick.winner,
            ns = self.ns_tricks,
            ew = self.ew_tricks,
            "trick complete"
        );
        self.player = trick.winner;
        self.tricks.push(trick);
    }

    /// Take back the most recent play, reopening the last trick if the
    /// current one is empty.
    pub fn undo(&mut self) -> Result<(), BoardError> {
        let mut log = self.play_log();
        if log.pop().is_none() {
            return Err(BoardError::State("no plays to undo"));
        }
        self.replay(&log)
    }

    /// Rewind so that play `play` of trick `trick` (and everything after it)
    /// is taken back. Trick `tricks().len()` is the trick in progress.
    pub fn undo_to_play(&mut self, trick: usize, play: usize) -> Result<(), BoardError> {
        let mut log = self.play_log();
        let index = trick
            .checked_mul(4)
            .and_then(|i| i.checked_add(play))
            .filter(|&i| play < 4 && i < log.len())
            .ok_or(BoardError::NoSuchPlay { trick, play })?;
        log.truncate(index);
        self.replay(&log)
    }

    /// Rewind to just before `card` was played
    pub fn undo_to_card(&mut self, card: Card) -> Result<(), BoardError> {
        let (trick, play) = self.index_for_card(card)?;
        self.undo_to_play(trick, play)
    }

    /// Trick and play coordinates at which `card` was played
    pub fn index_for_card(&self, card: Card) -> Result<(usize, usize), BoardError> {
        self.tricks
            .iter()
            .map(|t| &t.plays[..])
            .chain(std::iter::once(&self.current[..]))
            .enumerate()
            .find_map(|(i, plays)| {
                plays
                    .iter()
                    .position(|p| p.card == card)
                    .map(|j| (i, j))
            })
            .ok_or(BoardError::NotFound(card))
    }

    fn replay(&mut self, log: &[Play]) -> Result<(), BoardError> {
        let mut board = Board::from_deal(self.initial.clone(), self.first_leader, self.strain)?;
        for play in log {
            board.play(play.seat, play.card)?;
        }
        debug!(plays = log.len(), "replayed");
        *self = board;
        Ok(())
    }

    /// Notation for the position at the start of the trick in progress,
    /// beginning with that trick's leader.
    pub fn to_notation(&self) -> String {
        let mut deal = self.deal.clone();
        for play in &self.current {
            deal.hand_mut(play.seat).add_card(play.card);
        }
        encode(&deal, self.leader())
    }
}
