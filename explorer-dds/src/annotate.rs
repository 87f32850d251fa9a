use crate::NextPlays;
use explorer_board::Board;
use explorer_core::{Card, Rank};
use serde::Serialize;

/// A solver option translated into whole-deal trick counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedPlay {
    pub card: Card,
    pub equals: Vec<Rank>,
    /// Tricks still to come for the player's side
    pub score: u8,
    /// Tricks the player's side ends with: already won plus `score`
    pub total: u8,
    /// Tricks declarer's side ends with if this card is played
    pub declarer_tricks: u8,
}

/// Attach absolute trick counts to each option, best first.
///
/// `next` must describe the position `board` is in.
pub fn annotate(board: &Board, next: &NextPlays) -> Vec<AnnotatedPlay> {
    let side = next.player.partnership();
    let won = board.tricks_won(side);
    let declarer_side = board.declarer().partnership();

    // tricks not yet complete, counting the open one
    let leader_cards = board.deal().hand(board.leader()).len();
    let open = usize::from(!board.current_plays().is_empty());
    let remaining = (leader_cards + open) as u8;

    let mut annotated: Vec<AnnotatedPlay> = next
        .plays
        .iter()
        .map(|option| {
            let score = option.score.min(remaining);
            let declarer_tricks = if side == declarer_side {
                won + score
            } else {
                board.tricks_won(declarer_side) + remaining - score
            };
            AnnotatedPlay {
                card: option.card,
                equals: option.equals.clone(),
                score,
                total: won + score,
                declarer_tricks,
            }
        })
        .collect();
    annotated.sort_by(|a, b| b.score.cmp(&a.score).then(b.card.cmp(&a.card)));
    annotated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PlayOption, TrickCounts};
    use explorer_core::{Seat, Strain, Suit};

    const PBN: &str = "N:T843.K4.KT853.73 J97.J763.642.KJ5 Q52.Q982.QJ.9862 AK6.AT5.A97.AQT4";

    fn option(code: &str, score: u8) -> PlayOption {
        PlayOption {
            card: Card::from_code(code).unwrap(),
            equals: Vec::new(),
            score,
        }
    }

    #[test]
    fn test_totals_for_defence_and_declarer() {
        let mut board = Board::new(PBN, Strain::NoTrump).unwrap();
        for code in ["5D", "2D", "QD", "9D"] {
            board.play_card(Card::from_code(code).unwrap()).unwrap();
        }
        // South (defence) on lead with 12 tricks left, 1 already won
        let next = NextPlays {
            player: Seat::South,
            tricks: TrickCounts { ns: 1, ew: 0 },
            plays: vec![option("2S", 3), option("JD", 5)],
        };
        let annotated = annotate(&board, &next);

        assert_eq!(annotated[0].card, Card::new(Suit::Diamonds, Rank::Jack));
        assert_eq!(annotated[0].total, 6);
        assert_eq!(annotated[0].declarer_tricks, 7);
        assert_eq!(annotated[1].total, 4);
        assert_eq!(annotated[1].declarer_tricks, 9);
    }

    #[test]
    fn test_mid_trick_counts_open_trick() {
        let mut board = Board::new(PBN, Strain::NoTrump).unwrap();
        board.play_card(Card::from_code("5D").unwrap()).unwrap();
        // East is on declarer's side; 13 tricks remain including this one
        let next = NextPlays {
            player: Seat::East,
            tricks: TrickCounts::default(),
            plays: vec![option("6D", 9)],
        };
        let annotated = annotate(&board, &next);
        assert_eq!(annotated[0].total, 9);
        assert_eq!(annotated[0].declarer_tricks, 9);
    }
}
