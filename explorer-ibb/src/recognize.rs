use crate::library::check_dimensions;
use crate::{
    binarize, check, matches_to_notation, rmse, ConsistencyError, Layout, PixelBox, Position,
    RecognizeError, ReferenceLibrary,
};
use explorer_core::Card;
use image::RgbImage;
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;
use tracing::debug;

/// How well one glyph matched
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MatchStats {
    /// RMSE against the winning reference
    pub rmse: f64,
    /// `(runner_up - best) / best`, where the runner-up is the closest
    /// reference with a different label
    pub margin: f64,
}

impl MatchStats {
    /// Margin relative to the winning distance
    pub fn confidence(&self) -> f64 {
        if self.rmse > 0.0 {
            self.margin / self.rmse
        } else if self.margin > 0.0 {
            f64::INFINITY
        } else {
            0.0
        }
    }
}

/// The card read at one screen position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardMatch {
    pub position: Position,
    pub card: Card,
    pub suit: MatchStats,
    pub rank: MatchStats,
}

impl CardMatch {
    /// The weaker of the rank and suit confidences
    pub fn confidence(&self) -> f64 {
        self.suit.confidence().min(self.rank.confidence())
    }
}

/// Everything read from one screenshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recognition {
    /// Notation with North first. Suits within a hand keep screen order
    /// and are not re-sorted.
    pub notation: String,
    /// Lowest confidence over all 52 positions
    pub margin: f64,
    pub errors: Vec<ConsistencyError>,
    /// In position order: North 0-12, East, South, West
    pub matches: Vec<CardMatch>,
}

impl Recognition {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Reads screenshots against a fixed reference library
pub struct Recognizer {
    layout: Layout,
    library: ReferenceLibrary,
}

impl Recognizer {
    /// Validate `layout` and build the library from the two reference
    /// screenshots
    pub fn new(layout: Layout, black: &RgbImage, red: &RgbImage) -> Result<Self, RecognizeError> {
        layout.validate()?;
        let library = ReferenceLibrary::build(black, red, &layout)?;
        Ok(Recognizer { layout, library })
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn library(&self) -> &ReferenceLibrary {
        &self.library
    }

    /// Read all 52 cards. Screenshots of the wrong size are rejected before
    /// anything else happens; an imperfect read is reported through
    /// `errors` and `margin` rather than as an error.
    pub fn recognize(&self, screenshot: &RgbImage) -> Result<Recognition, RecognizeError> {
        check_dimensions("screenshot", screenshot, &self.layout)?;
        let start = Instant::now();

        let matches = self
            .layout
            .card_boxes()
            .par_iter()
            .map(|&(position, card)| self.match_card(screenshot, position, card))
            .collect::<Result<Vec<_>, _>>()?;

        let margin = matches
            .iter()
            .map(CardMatch::confidence)
            .fold(f64::INFINITY, f64::min);
        let errors = check(&matches);
        let notation = matches_to_notation(&matches);

        debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            margin,
            errors = errors.len(),
            "screenshot recognised"
        );
        Ok(Recognition {
            notation,
            margin,
            errors,
            matches,
        })
    }

    fn match_card(
        &self,
        image: &RgbImage,
        position: Position,
        card: PixelBox,
    ) -> Result<CardMatch, RecognizeError> {
        let (rank_box, suit_box) = self.layout.glyph_boxes(position.seat);
        let rank_bitmap = binarize(image, card.offset(rank_box), &self.layout);
        let suit_bitmap = binarize(image, card.offset(suit_box), &self.layout);
        let glyphs = self.library.glyphs(position.seat);

        let suits = best_matches(
            glyphs
                .suits
                .iter()
                .map(|g| -> Result<_, RecognizeError> {
                    Ok((g.suit, rmse(&suit_bitmap, &g.bitmap)?))
                })
                .collect::<Result<_, RecognizeError>>()?,
        );
        // a rank scores its best nudge
        let ranks = best_matches(
            glyphs
                .ranks
                .iter()
                .map(|g| -> Result<_, RecognizeError> {
                    let mut best = f64::INFINITY;
                    for variant in &g.variants {
                        best = best.min(rmse(&rank_bitmap, variant)?);
                    }
                    Ok((g.rank, best))
                })
                .collect::<Result<_, RecognizeError>>()?,
        );

        let empty = || RecognizeError::Layout("reference library is empty".into());
        let &(suit, suit_rmse) = suits.first().ok_or_else(empty)?;
        let &(rank, rank_rmse) = ranks.first().ok_or_else(empty)?;

        Ok(CardMatch {
            position,
            card: Card::new(suit, rank),
            suit: MatchStats {
                rmse: suit_rmse,
                margin: margin_by(&suits),
            },
            rank: MatchStats {
                rmse: rank_rmse,
                margin: margin_by(&ranks),
            },
        })
    }
}

/// Sort candidates by distance, keeping library order among ties
pub(crate) fn best_matches<L>(mut scores: Vec<(L, f64)>) -> Vec<(L, f64)> {
    scores.sort_by(|a, b| a.1.total_cmp(&b.1));
    scores
}

/// Relative gap between the winner and the closest candidate with another
/// label. Candidates sharing the winner's label are ignored.
///
/// With no other label present the margin is 0. A perfect winner (distance
/// 0) has an infinite margin over any imperfect runner-up.
pub(crate) fn margin_by<L: PartialEq>(sorted: &[(L, f64)]) -> f64 {
    let Some((label, best)) = sorted.first() else {
        return 0.0;
    };
    let Some((_, second)) = sorted.iter().find(|(l, _)| l != label) else {
        return 0.0;
    };
    if *best > 0.0 {
        (second - best) / best
    } else if *second > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}
