use crate::{binarize, Bitmap, Layout, RecognizeError, Size};
use explorer_core::{Partnership, Rank, Seat, Suit};
use image::RgbImage;
use tracing::debug;

/// Suit held by each seat (N, E, S, W) in the all-black reference screenshot
pub const BLACK_TEMPLATE_SUITS: [Suit; 4] = [Suit::Spades, Suit::Diamonds, Suit::Clubs, Suit::Hearts];

/// Suit held by each seat (N, E, S, W) in the all-red reference screenshot
pub const RED_TEMPLATE_SUITS: [Suit; 4] = [Suit::Hearts, Suit::Clubs, Suit::Diamonds, Suit::Spades];

/// A reference rank glyph with its nudged copies
#[derive(Debug, Clone)]
pub(crate) struct RankGlyph {
    pub rank: Rank,
    /// Nudged back, as cut, nudged forward
    pub variants: [Bitmap; 3],
}

#[derive(Debug, Clone)]
pub(crate) struct SuitGlyph {
    pub suit: Suit,
    pub bitmap: Bitmap,
}

/// Reference glyphs for one card orientation
#[derive(Debug, Clone, Default)]
pub(crate) struct Glyphs {
    pub ranks: Vec<RankGlyph>,
    pub suits: Vec<SuitGlyph>,
}

/// Labelled rank and suit glyphs cut from two reference screenshots.
///
/// In both screenshots each seat holds all 13 cards of a single suit, ace
/// first. Which suit each seat holds is given by [`BLACK_TEMPLATE_SUITS`]
/// and [`RED_TEMPLATE_SUITS`].
#[derive(Debug, Clone)]
pub struct ReferenceLibrary {
    north_south: Glyphs,
    east_west: Glyphs,
}

impl ReferenceLibrary {
    pub fn build(black: &RgbImage, red: &RgbImage, layout: &Layout) -> Result<Self, RecognizeError> {
        layout.validate()?;
        check_dimensions("black reference screenshot", black, layout)?;
        check_dimensions("red reference screenshot", red, layout)?;

        let mut library = ReferenceLibrary {
            north_south: Glyphs::default(),
            east_west: Glyphs::default(),
        };
        for (image, suits) in [(black, BLACK_TEMPLATE_SUITS), (red, RED_TEMPLATE_SUITS)] {
            for (position, card) in layout.card_boxes() {
                let seat = position.seat;
                let rank = Rank::from_value(14 - position.index).ok_or_else(|| {
                    RecognizeError::Layout(format!("no rank for reference position {position}"))
                })?;
                let (rank_box, suit_box) = layout.glyph_boxes(seat);

                let rank_bitmap = binarize(image, card.offset(rank_box), layout);
                let (dx, dy) = layout.shift_step(seat);
                let variants = [rank_bitmap.shift(-dx, -dy), rank_bitmap.clone(), rank_bitmap.shift(dx, dy)];

                let glyphs = library.glyphs_mut(seat);
                glyphs.ranks.push(RankGlyph { rank, variants });
                glyphs.suits.push(SuitGlyph {
                    suit: suits[seat.index()],
                    bitmap: binarize(image, card.offset(suit_box), layout),
                });
            }
        }

        debug!(
            ns_ranks = library.north_south.ranks.len(),
            ew_ranks = library.east_west.ranks.len(),
            "reference library built"
        );
        Ok(library)
    }

    pub(crate) fn glyphs(&self, seat: Seat) -> &Glyphs {
        match seat.partnership() {
            Partnership::NorthSouth => &self.north_south,
            Partnership::EastWest => &self.east_west,
        }
    }

    fn glyphs_mut(&mut self, seat: Seat) -> &mut Glyphs {
        match seat.partnership() {
            Partnership::NorthSouth => &mut self.north_south,
            Partnership::EastWest => &mut self.east_west,
        }
    }

    /// Number of rank and suit samples for a seat's orientation
    pub fn samples(&self, seat: Seat) -> (usize, usize) {
        let glyphs = self.glyphs(seat);
        (glyphs.ranks.len(), glyphs.suits.len())
    }
}

pub(crate) fn check_dimensions(
    what: &'static str,
    image: &RgbImage,
    layout: &Layout,
) -> Result<(), RecognizeError> {
    let actual = Size::new(image.width(), image.height());
    if actual == layout.screen {
        Ok(())
    } else {
        Err(RecognizeError::Dimension {
            what,
            expected: layout.screen,
            actual,
        })
    }
}
