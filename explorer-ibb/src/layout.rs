use crate::{RecognizeError, Size};
use explorer_core::{Partnership, Seat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A rectangle of pixels, inclusive at both ends: `[x1, y1, x2, y2]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u32; 4]", into = "[u32; 4]")]
pub struct PixelBox {
    pub x1: u32,
    pub y1: u32,
    pub x2: u32,
    pub y2: u32,
}

impl PixelBox {
    pub const fn new(x1: u32, y1: u32, x2: u32, y2: u32) -> Self {
        PixelBox { x1, y1, x2, y2 }
    }

    pub fn width(&self) -> u32 {
        self.x2 + 1 - self.x1
    }

    pub fn height(&self) -> u32 {
        self.y2 + 1 - self.y1
    }

    /// `inner`, given relative to this box, in absolute coordinates
    pub fn offset(&self, inner: PixelBox) -> PixelBox {
        PixelBox::new(
            self.x1 + inner.x1,
            self.y1 + inner.y1,
            self.x1 + inner.x2,
            self.y1 + inner.y2,
        )
    }

    fn is_ordered(&self) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2
    }
}

impl From<[u32; 4]> for PixelBox {
    fn from([x1, y1, x2, y2]: [u32; 4]) -> Self {
        PixelBox { x1, y1, x2, y2 }
    }
}

impl From<PixelBox> for [u32; 4] {
    fn from(b: PixelBox) -> Self {
        [b.x1, b.y1, b.x2, b.y2]
    }
}

/// One card slot on screen: a seat and its index from the left (North,
/// South) or from the top (East, West)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub seat: Seat,
    pub index: u8,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.seat.to_char(), self.index)
    }
}

/// The region holding each seat's 13 cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandBoxes {
    pub north: PixelBox,
    pub east: PixelBox,
    pub south: PixelBox,
    pub west: PixelBox,
}

impl HandBoxes {
    pub fn get(&self, seat: Seat) -> PixelBox {
        match seat {
            Seat::North => self.north,
            Seat::East => self.east,
            Seat::South => self.south,
            Seat::West => self.west,
        }
    }
}

/// Screen geometry and colour rules for one device and app version.
///
/// North and South cards sit in a row and are read upright; East and West
/// cards are stacked and rotated, so their glyph sub-boxes differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub screen: Size,
    pub hands: HandBoxes,
    /// Rank and suit glyphs within a North/South card
    pub ns_rank: PixelBox,
    pub ns_suit: PixelBox,
    /// Rank and suit glyphs within an East/West card
    pub ew_rank: PixelBox,
    pub ew_suit: PixelBox,
    /// Mean channel value below which a pixel counts as black ink
    pub black_threshold: f64,
    /// Mean channel distance from `reference_red` below which a pixel counts as red ink
    pub red_threshold: f64,
    pub reference_red: [u8; 3],
    /// Side of the square cleared at each corner of a glyph
    pub corner: u32,
    /// Pixels by which reference rank glyphs are nudged either way
    pub shift: u32,
}

impl Default for Layout {
    fn default() -> Self {
        Layout::iphone6()
    }
}

impl Layout {
    /// 750x1334 screenshots from an iPhone 6
    pub fn iphone6() -> Self {
        Layout {
            screen: Size::new(750, 1334),
            hands: HandBoxes {
                north: PixelBox::new(0, 120, 732, 244),
                east: PixelBox::new(668, 338, 748, 1036),
                south: PixelBox::new(0, 1208, 732, 1332),
                west: PixelBox::new(2, 338, 80, 1036),
            },
            ns_rank: PixelBox::new(0, 0, 51, 59),
            ns_suit: PixelBox::new(0, 60, 51, 120),
            ew_rank: PixelBox::new(0, 0, 41, 50),
            ew_suit: PixelBox::new(42, 0, 73, 50),
            black_threshold: 30.0,
            red_threshold: 50.0,
            reference_red: [229, 0, 28],
            corner: 4,
            shift: 1,
        }
    }

    /// Load a layout from a JSON file and validate it
    pub fn from_path(path: &Path) -> Result<Self, RecognizeError> {
        let config_error = |message: String| RecognizeError::Config {
            path: path.to_path_buf(),
            message,
        };
        let text = std::fs::read_to_string(path).map_err(|err| config_error(err.to_string()))?;
        let layout: Layout =
            serde_json::from_str(&text).map_err(|err| config_error(err.to_string()))?;
        layout.validate()?;
        Ok(layout)
    }

    /// Rank and suit sub-boxes for a seat's cards
    pub fn glyph_boxes(&self, seat: Seat) -> (PixelBox, PixelBox) {
        match seat.partnership() {
            Partnership::NorthSouth => (self.ns_rank, self.ns_suit),
            Partnership::EastWest => (self.ew_rank, self.ew_suit),
        }
    }

    /// Direction in which rank glyphs of a seat are nudged
    pub fn shift_step(&self, seat: Seat) -> (i32, i32) {
        let step = self.shift as i32;
        match seat.partnership() {
            Partnership::NorthSouth => (step, 0),
            Partnership::EastWest => (0, step),
        }
    }

    /// All 52 card boxes, seat by seat (N, E, S, W), 13 per seat.
    ///
    /// Each hand box is divided into 13 equal slots, across for North and
    /// South and downwards for East and West, then truncated to whole
    /// pixels.
    pub fn card_boxes(&self) -> Vec<(Position, PixelBox)> {
        let mut boxes = Vec::with_capacity(52);
        for seat in Seat::ALL {
            let hand = self.hands.get(seat);
            let (x1, y1) = (hand.x1 as f64, hand.y1 as f64);
            let (span_x, span_y) = ((hand.x2 - hand.x1) as f64, (hand.y2 - hand.y1) as f64);
            let (dx, dy, w, h) = match seat.partnership() {
                Partnership::NorthSouth => (span_x / 13.0, 0.0, span_x / 13.0, span_y),
                Partnership::EastWest => (0.0, span_y / 13.0, span_x, span_y / 13.0),
            };
            for index in 0..13u8 {
                let x = x1 + dx * index as f64;
                let y = y1 + dy * index as f64;
                boxes.push((
                    Position { seat, index },
                    PixelBox::new(
                        x.floor() as u32,
                        y.floor() as u32,
                        (x + w).floor() as u32,
                        (y + h).floor() as u32,
                    ),
                ));
            }
        }
        boxes
    }

    /// Check that every glyph box fits in every card and every card fits
    /// on screen
    pub fn validate(&self) -> Result<(), RecognizeError> {
        let fail = |message: String| Err(RecognizeError::Layout(message));

        for (name, b) in [
            ("ns_rank", self.ns_rank),
            ("ns_suit", self.ns_suit),
            ("ew_rank", self.ew_rank),
            ("ew_suit", self.ew_suit),
        ] {
            if !b.is_ordered() {
                return fail(format!("{name} box {:?} is inverted", <[u32; 4]>::from(b)));
            }
        }
        for seat in Seat::ALL {
            if !self.hands.get(seat).is_ordered() {
                return fail(format!("{} hand box is inverted", seat.name()));
            }
        }
        if self.corner * 2 > self.min_glyph_side() {
            return fail(format!("corner {} is too large for the glyph boxes", self.corner));
        }

        for (position, card) in self.card_boxes() {
            if card.x2 >= self.screen.width || card.y2 >= self.screen.height {
                return fail(format!("card {position} lies outside the {} screen", self.screen));
            }
            let (rank, suit) = self.glyph_boxes(position.seat);
            for glyph in [rank, suit] {
                if glyph.x2 >= card.width() || glyph.y2 >= card.height() {
                    return fail(format!(
                        "glyph box {:?} does not fit card {position} ({}x{})",
                        <[u32; 4]>::from(glyph),
                        card.width(),
                        card.height()
                    ));
                }
            }
        }
        Ok(())
    }

    fn min_glyph_side(&self) -> u32 {
        [self.ns_rank, self.ns_suit, self.ew_rank, self.ew_suit]
            .iter()
            .map(|b| b.width().min(b.height()))
            .min()
            .unwrap_or(0)
    }
}
