use crate::{decode, to_query, DealRecord, FormatError, ShareState};
use explorer_core::{Hand, Rank, Seat, Strain, Suit};
use std::fmt::Write;
use tracing::warn;

const PAGE_ORDER: [Seat; 4] = [Seat::North, Seat::South, Seat::East, Seat::West];

// alternating colours
const SUIT_ORDER: [(Suit, &str); 4] = [
    (Suit::Spades, "&spades;"),
    (Suit::Hearts, "<span style=\"color:red\">&hearts;</span>"),
    (Suit::Clubs, "&clubs;"),
    (Suit::Diamonds, "<span style=\"color:red\">&diams;</span>"),
];

const STYLE: &str = "h1 { margin-bottom: 0; }
      .board { display: inline-block; width: 50%; margin-top: 1em; margin-bottom: 0.5em; }
      .board a { color: black; }
      .board-inner { display: table; min-width: 275px; }
      .hand { display: flex; justify-content: space-between; }
      .hcp { float: right; font-size: small; }
      .dealer, .vulnerability { display: block; }";

/// Render one printable page per player (North, South, East, West), each
/// listing that player's hand on every board.
///
/// Each board title links to `link_base` with the deal as a share query.
/// Records without a `Deal` tag are skipped.
pub fn deals_to_html(records: &[DealRecord], link_base: &str) -> Result<String, FormatError> {
    let mut pages: Vec<String> = PAGE_ORDER
        .iter()
        .map(|seat| format!("<h1>{}</h1><div class=\"player\">", seat.name()))
        .collect();

    for record in records {
        let Some(notation) = record.deal.as_deref() else {
            warn!(board = %record.board, "board has no deal, skipped");
            continue;
        };
        let parsed = decode(notation)?;
        let link = format!(
            "{link_base}?{}",
            to_query(&ShareState {
                deal: notation.to_string(),
                strain: Strain::NoTrump,
                declarer: None,
                plays: Vec::new(),
            })
        );
        let dealer = record.dealer.map(|s| s.name()).unwrap_or("?");
        let vulnerability = record.vulnerability.as_deref().unwrap_or("?");

        for (page, &seat) in pages.iter_mut().zip(PAGE_ORDER.iter()) {
            let hand = parsed.deal.hand(seat);
            // writing to a String cannot fail
            let _ = write!(
                page,
                "<div class=\"board\"><b><a target=_blank href=\"{}\">Board {}</a></b>\
                 <div class=\"board-inner\"><span class=\"hand\">{}</span>\
                 <span class=\"dealer\">Dealer: {}</span>\
                 <span class=\"hcp\">({})</span>\
                 <span class=\"vulnerability\">Vulnerable: {}</span></div></div>",
                link.replace('&', "&amp;"),
                escape(&record.board),
                hand_html(hand),
                dealer,
                hand.hcp(),
                escape(vulnerability),
            );
        }
    }

    let body = pages
        .into_iter()
        .map(|page| page + "</div>")
        .collect::<Vec<_>>()
        .join("<p style=\"page-break-after:always;\"></p>\n");

    Ok(format!(
        "<html>\n  <head>\n    <meta charset=\"UTF-8\">\n    <style>\n      {STYLE}\n    </style>\n  </head>\n{body}\n</html>\n"
    ))
}

fn hand_html(hand: &Hand) -> String {
    SUIT_ORDER
        .iter()
        .map(|&(suit, symbol)| {
            let holding = hand.holding(suit);
            let text = if holding.is_empty() {
                "(void)".to_string()
            } else {
                holding.iter().map(Rank::face).collect::<Vec<_>>().join(" ")
            };
            format!("<span class=\"suit\">{symbol} {text}</span>")
        })
        .collect()
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load_deals;

    #[test]
    fn test_pages_per_player() {
        let records = load_deals(
            "[Board \"7\"]\n[Dealer \"S\"]\n[Vulnerable \"All\"]\n\
             [Deal \"N:AKQJ65.AT3.32.KJ T874.J42.84.9864 92.KQ98765.AQ9.A 3..KJT765.QT7532\"]\n",
        );
        let html = deals_to_html(&records, "https://example.org/bridge/").unwrap();

        let north = html.find("<h1>North</h1>").unwrap();
        let south = html.find("<h1>South</h1>").unwrap();
        let east = html.find("<h1>East</h1>").unwrap();
        let west = html.find("<h1>West</h1>").unwrap();
        assert!(north < south && south < east && east < west);
        assert_eq!(html.matches("page-break-after").count(), 3);

        assert!(html.contains("Board 7</a>"));
        assert!(html.contains("Dealer: South"));
        assert!(html.contains("Vulnerable: All"));
        // North: AKQJ65.AT3.32.KJ = 10 + 4 + 0 + 4
        assert!(html.contains("<span class=\"hcp\">(18)</span>"));
        assert!(html.contains("&spades; A K Q J 6 5</span>"));
        assert!(html.contains("A 10 3</span>"));
        // West is void in hearts
        assert!(html.contains("&hearts;</span> (void)</span>"));
        assert!(html.contains("href=\"https://example.org/bridge/?deal=N%3AAKQJ65"));
    }

    #[test]
    fn test_bad_deal_is_an_error() {
        let records = load_deals("[Board \"1\"]\n[Deal \"N:AKQ\"]\n");
        assert!(deals_to_html(&records, "/").is_err());
    }
}
