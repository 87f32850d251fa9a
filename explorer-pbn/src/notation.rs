use explorer_core::{Card, Deal, DealError, Rank, Seat, Suit};
use thiserror::Error;

/// Error type for notation parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("notation must have four hands separated by spaces (got {count})")]
    FieldCount { count: usize },
    #[error("notation must start with \"N:\", \"E:\", \"S:\" or \"W:\" (got {found:?})")]
    SeatMarker { found: String },
    #[error("{seat} must have four suits separated by dots, got {count}: {field}")]
    SuitCount { seat: Seat, count: usize, field: String },
    #[error("invalid card symbol {ch:?} at position {position}")]
    BadRank { ch: char, position: usize },
    #[error(transparent)]
    Deal(#[from] DealError),
}

/// A decoded notation string: the deal plus the seat named by its marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PbnDeal {
    pub first_seat: Seat,
    pub deal: Deal,
}

/// Parse a notation string such as
/// `N:T843.K4.KT853.73 J97.J763.642.KJ5 Q52.Q982.QJ.9862 AK6.AT5.A97.AQT4`.
///
/// Hands follow the marker seat clockwise; suits are in S.H.D.C order and an
/// empty run is a void. Positions in errors count characters from the start
/// of the trimmed input.
pub fn decode(input: &str) -> Result<PbnDeal, FormatError> {
    let (first_seat, fields) = split_fields(input)?;

    let mut deal = Deal::new();
    // the seat marker and colon occupy the first two characters
    let mut position = 2;

    for (i, field) in fields.iter().enumerate() {
        let seat = first_seat.rotate(i);
        let runs: Vec<&str> = field.split('.').collect();
        if runs.len() != 4 {
            return Err(FormatError::SuitCount {
                seat,
                count: runs.len(),
                field: field.to_string(),
            });
        }

        let hand = deal.hand_mut(seat);
        for (&suit, run) in Suit::NOTATION_ORDER.iter().zip(runs) {
            for ch in run.chars() {
                let rank = notation_rank(ch).ok_or(FormatError::BadRank { ch, position })?;
                let card = Card::new(suit, rank);
                if !hand.add_card(card) {
                    return Err(DealError::DuplicateCard {
                        card,
                        first: seat,
                        second: seat,
                    }
                    .into());
                }
                position += 1;
            }
            // the dot after this run, or the space after the last one
            position += 1;
        }
    }

    deal.check_distinct()?;
    Ok(PbnDeal { first_seat, deal })
}

/// Format a deal as notation, starting with `first_seat`
pub fn encode(deal: &Deal, first_seat: Seat) -> String {
    let runs: [[Vec<Rank>; 4]; 4] = std::array::from_fn(|i| {
        let hand = deal.hand(first_seat.rotate(i));
        Suit::NOTATION_ORDER.map(|suit| hand.holding(suit).to_vec())
    });
    encode_runs(first_seat, &runs)
}

/// Format raw per-seat suit runs without validating them.
///
/// `runs[i]` belongs to the seat `i` steps clockwise of `first_seat`, its
/// entries in S.H.D.C order. Ranks are written in the order given.
pub fn encode_runs(first_seat: Seat, runs: &[[Vec<Rank>; 4]; 4]) -> String {
    let mut result = String::new();
    result.push(first_seat.to_char());
    result.push(':');

    for (i, hand) in runs.iter().enumerate() {
        if i > 0 {
            result.push(' ');
        }
        let fields: Vec<String> = hand
            .iter()
            .map(|run| run.iter().map(Rank::to_char).collect())
            .collect();
        result.push_str(&fields.join("."));
    }

    result
}

/// Re-express a notation string so that `seat` holds the first field.
///
/// Suit runs are carried over verbatim.
pub fn rotate_notation(input: &str, seat: Seat) -> Result<String, FormatError> {
    decode(input)?;
    let (first_seat, fields) = split_fields(input)?;

    let offset = (seat.index() + 4 - first_seat.index()) % 4;
    let rotated: Vec<&str> = (0..4).map(|i| fields[(offset + i) % 4]).collect();
    Ok(format!("{}:{}", seat.to_char(), rotated.join(" ")))
}

/// Notation is upper case only: `t` is not a ten here
fn notation_rank(ch: char) -> Option<Rank> {
    if ch.is_ascii_lowercase() {
        None
    } else {
        Rank::from_char(ch)
    }
}

fn notation_seat(ch: char) -> Option<Seat> {
    if ch.is_ascii_lowercase() {
        None
    } else {
        Seat::from_char(ch)
    }
}

/// Split notation into its marker seat and four hand fields (marker stripped)
fn split_fields(input: &str) -> Result<(Seat, [&str; 4]), FormatError> {
    let parts: Vec<&str> = input.trim().split(' ').collect();
    if parts.len() != 4 {
        return Err(FormatError::FieldCount { count: parts.len() });
    }

    let mut chars = parts[0].chars();
    let first_seat = match (chars.next().and_then(notation_seat), chars.next()) {
        (Some(seat), Some(':')) => seat,
        _ => {
            return Err(FormatError::SeatMarker {
                found: parts[0].chars().take(2).collect(),
            })
        }
    };

    // marker and colon are both ASCII
    Ok((first_seat, [&parts[0][2..], parts[1], parts[2], parts[3]]))
}
