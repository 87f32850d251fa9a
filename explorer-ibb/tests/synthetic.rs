//! Recognition against screenshots drawn in memory.
//!
//! Every glyph is 32 ink pixels scattered over the 8x8 interior of a 12x12
//! box, so a blank glyph is equally far from every reference.

use explorer_core::{Card, Seat, Suit};
use explorer_ibb::{
    ConsistencyError, HandBoxes, Layout, PixelBox, RecognizeError, Recognizer, Size,
    BLACK_TEMPLATE_SUITS, RED_TEMPLATE_SUITS,
};
use explorer_pbn::decode;
use image::{Rgb, RgbImage};

const PBN: &str = "N:T843.K4.KT853.73 J97.J763.642.KJ5 Q52.Q982.QJ.9862 AK6.AT5.A97.AQT4";

const BACKGROUND: Rgb<u8> = Rgb([232, 236, 196]);
const BLACK: Rgb<u8> = Rgb([13, 13, 11]);
const RED: Rgb<u8> = Rgb([229, 15, 34]);

fn layout() -> Layout {
    Layout {
        screen: Size::new(200, 220),
        hands: HandBoxes {
            north: PixelBox::new(0, 0, 169, 24),
            east: PixelBox::new(176, 30, 199, 186),
            south: PixelBox::new(0, 195, 169, 219),
            west: PixelBox::new(0, 30, 23, 186),
        },
        ns_rank: PixelBox::new(0, 0, 11, 11),
        ns_suit: PixelBox::new(0, 12, 11, 23),
        ew_rank: PixelBox::new(0, 0, 11, 11),
        ew_suit: PixelBox::new(12, 0, 23, 11),
        corner: 1,
        shift: 1,
        ..Layout::iphone6()
    }
}

/// 32 of the 64 interior cells, chosen by a shuffle seeded per glyph
fn glyph_cells(seed: u64) -> Vec<(u32, u32)> {
    let mut cells: Vec<(u32, u32)> = (2..10).flat_map(|y| (2..10).map(move |x| (x, y))).collect();
    let mut state = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1;
    for i in (1..cells.len()).rev() {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let j = (state % (i as u64 + 1)) as usize;
        cells.swap(i, j);
    }
    cells.truncate(32);
    cells
}

#[derive(Clone, Copy, Default)]
struct Distortion {
    /// Nudge rank glyphs along the card's reading direction
    shift_ranks: bool,
    /// Flip one interior pixel of every glyph
    speckle: bool,
}

fn draw_glyph(image: &mut RgbImage, area: PixelBox, cells: &[(u32, u32)], colour: Rgb<u8>, offset: (u32, u32)) {
    for &(x, y) in cells {
        image.put_pixel(area.x1 + x + offset.0, area.y1 + y + offset.1, colour);
    }
}

fn draw_card(image: &mut RgbImage, layout: &Layout, seat: Seat, card_box: PixelBox, card: Card, distortion: Distortion) {
    let (rank_box, suit_box) = layout.glyph_boxes(seat);
    let colour = if card.suit.is_red() { RED } else { BLACK };

    let mut rank_cells = glyph_cells(100 + card.rank.value() as u64);
    let mut suit_cells = glyph_cells(200 + card.suit as u64);
    if distortion.speckle {
        let unused = |cells: &[(u32, u32)]| {
            (2..10)
                .flat_map(|y| (2..10).map(move |x| (x, y)))
                .find(|c| !cells.contains(c))
                .unwrap()
        };
        let extra = unused(&rank_cells);
        rank_cells.push(extra);
        let extra = unused(&suit_cells);
        suit_cells.push(extra);
    }
    let offset = match (distortion.shift_ranks, seat) {
        (false, _) => (0, 0),
        (true, Seat::North | Seat::South) => (1, 0),
        (true, Seat::East | Seat::West) => (0, 1),
    };

    draw_glyph(image, card_box.offset(rank_box), &rank_cells, colour, offset);
    draw_glyph(image, card_box.offset(suit_box), &suit_cells, colour, (0, 0));
}

/// A reference screenshot: every seat holds one suit, ace first
fn template(layout: &Layout, suits: [Suit; 4]) -> RgbImage {
    let mut image = RgbImage::from_pixel(layout.screen.width, layout.screen.height, BACKGROUND);
    for (position, card_box) in layout.card_boxes() {
        let suit = suits[position.seat.index()];
        let card = Card::new(suit, explorer_core::Rank::from_value(14 - position.index).unwrap());
        draw_card(&mut image, layout, position.seat, card_box, card, Distortion::default());
    }
    image
}

/// A screenshot of `PBN` with each hand shown spades, hearts, diamonds, clubs
fn screenshot(layout: &Layout, distortion: Distortion, hidden: Option<Seat>) -> RgbImage {
    let deal = decode(PBN).unwrap().deal;
    let mut image = RgbImage::from_pixel(layout.screen.width, layout.screen.height, BACKGROUND);
    for (position, card_box) in layout.card_boxes() {
        if Some(position.seat) == hidden {
            continue;
        }
        let card = deal.hand(position.seat).cards()[position.index as usize];
        draw_card(&mut image, layout, position.seat, card_box, card, distortion);
    }
    image
}

fn recognizer() -> Recognizer {
    let layout = layout();
    let black = template(&layout, BLACK_TEMPLATE_SUITS);
    let red = template(&layout, RED_TEMPLATE_SUITS);
    Recognizer::new(layout, &black, &red).unwrap()
}

#[test]
fn test_clean_screenshot() {
    let recognizer = recognizer();
    let result = recognizer
        .recognize(&screenshot(recognizer.layout(), Distortion::default(), None))
        .unwrap();
    assert_eq!(result.notation, PBN);
    assert!(result.errors.is_empty(), "{:?}", result.errors);
    assert!(result.margin > 0.0);
    assert_eq!(result.matches.len(), 52);
    assert!(result.matches.iter().all(|m| m.rank.rmse == 0.0 && m.suit.rmse == 0.0));
}

#[test]
fn test_noisy_screenshot_has_finite_margin() {
    let recognizer = recognizer();
    let distortion = Distortion {
        speckle: true,
        ..Distortion::default()
    };
    let result = recognizer
        .recognize(&screenshot(recognizer.layout(), distortion, None))
        .unwrap();
    assert_eq!(result.notation, PBN);
    assert!(result.is_clean());
    assert!(result.margin.is_finite());
    assert!(result.margin > 0.0);
}

#[test]
fn test_shifted_rank_glyphs() {
    let recognizer = recognizer();
    let distortion = Distortion {
        shift_ranks: true,
        ..Distortion::default()
    };
    let result = recognizer
        .recognize(&screenshot(recognizer.layout(), distortion, None))
        .unwrap();
    assert_eq!(result.notation, PBN);
    assert!(result.is_clean());
}

#[test]
fn test_hidden_hand() {
    let recognizer = recognizer();
    let result = recognizer
        .recognize(&screenshot(recognizer.layout(), Distortion::default(), Some(Seat::North)))
        .unwrap();

    assert!(!result.errors.is_empty());
    assert!(result
        .errors
        .iter()
        .any(|e| matches!(e, ConsistencyError::Missing(_))));
    assert_eq!(result.margin, 0.0);

    // the visible hands are still read correctly
    let deal = decode(PBN).unwrap().deal;
    for m in result.matches.iter().filter(|m| m.position.seat != Seat::North) {
        let expected = deal.hand(m.position.seat).cards()[m.position.index as usize];
        assert_eq!(m.card, expected, "{}", m.position);
    }
    let fields: Vec<&str> = result.notation[2..].split(' ').collect();
    assert_eq!(fields[1..], ["J97.J763.642.KJ5", "Q52.Q982.QJ.9862", "AK6.AT5.A97.AQT4"]);
}

#[test]
fn test_wrong_size_screenshot() {
    let recognizer = recognizer();
    let err = recognizer.recognize(&RgbImage::new(750, 1334)).unwrap_err();
    assert!(matches!(
        err,
        RecognizeError::Dimension {
            what: "screenshot",
            ..
        }
    ));
}

#[test]
fn test_wrong_size_templates() {
    let small = RgbImage::new(10, 10);
    let err = Recognizer::new(layout(), &small, &small).err().unwrap();
    assert!(matches!(err, RecognizeError::Dimension { .. }));
}
