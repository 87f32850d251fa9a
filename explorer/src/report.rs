use anyhow::Result;
use explorer_board::{Board, BoardState};
use explorer_core::{Card, Rank, Seat, Strain};
use explorer_dds::{AnnotatedPlay, DdTable};
use explorer_pbn::to_query;
use serde::Serialize;

/// Everything `play` and `solve` print about a board
#[derive(Debug, Serialize)]
pub struct BoardReport {
    /// Position at the start of the trick in progress
    pub notation: String,
    pub strain: char,
    pub declarer: char,
    pub ns_tricks: u8,
    pub ew_tricks: u8,
    pub trick: usize,
    pub current_trick: Vec<String>,
    /// None once all 13 tricks are played
    pub player: Option<char>,
    pub legal_plays: Vec<String>,
    pub share: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solutions: Option<Vec<Solution>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<Vec<TableRow>>,
}

#[derive(Debug, Serialize)]
pub struct Solution {
    pub card: String,
    pub equals: String,
    pub score: u8,
    pub total: u8,
    pub declarer_tricks: u8,
}

/// Makeable tricks in one strain for N, E, S and W
#[derive(Debug, Serialize)]
pub struct TableRow {
    pub strain: char,
    pub tricks: [u8; 4],
}

fn codes(cards: impl IntoIterator<Item = Card>) -> Vec<String> {
    cards.into_iter().map(|c| c.code()).collect()
}

impl BoardReport {
    pub fn new(board: &Board) -> Self {
        let player = match board.state() {
            BoardState::AwaitingPlay(seat) => Some(seat),
            BoardState::Complete => None,
        };
        BoardReport {
            notation: board.to_notation(),
            strain: board.strain().to_char(),
            declarer: board.declarer().to_char(),
            ns_tricks: board.ns_tricks(),
            ew_tricks: board.ew_tricks(),
            trick: board.tricks().len() + 1,
            current_trick: board
                .current_plays()
                .iter()
                .map(|p| format!("{}:{}", p.seat.to_char(), p.card))
                .collect(),
            player: player.map(|s| s.to_char()),
            legal_plays: player.map_or_else(Vec::new, |s| codes(board.legal_plays(s))),
            share: to_query(&board.share_state()),
            solutions: None,
            table: None,
        }
    }

    pub fn with_solutions(mut self, plays: &[AnnotatedPlay]) -> Self {
        self.solutions = Some(
            plays
                .iter()
                .map(|p| Solution {
                    card: p.card.code(),
                    equals: p.equals.iter().map(Rank::to_char).collect(),
                    score: p.score,
                    total: p.total,
                    declarer_tricks: p.declarer_tricks,
                })
                .collect(),
        );
        self
    }

    pub fn with_table(mut self, table: &DdTable) -> Self {
        let strains = [
            Strain::NoTrump,
            Strain::Spades,
            Strain::Hearts,
            Strain::Diamonds,
            Strain::Clubs,
        ];
        self.table = Some(
            strains
                .into_iter()
                .map(|strain| TableRow {
                    strain: strain.to_char(),
                    tricks: Seat::ALL.map(|seat| table.tricks(strain, seat)),
                })
                .collect(),
        );
        self
    }

    pub fn print(&self, json: bool) -> Result<()> {
        if json {
            println!("{}", serde_json::to_string_pretty(self)?);
        } else {
            print!("{}", self.to_text());
        }
        Ok(())
    }

    fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Deal:     {}\n", self.notation));
        out.push_str(&format!("Strain:   {}  Declarer: {}\n", self.strain, self.declarer));
        out.push_str(&format!("Tricks:   NS {}  EW {}\n", self.ns_tricks, self.ew_tricks));

        match self.player {
            Some(player) => {
                if !self.current_trick.is_empty() {
                    out.push_str(&format!(
                        "Trick {}:  {}\n",
                        self.trick,
                        self.current_trick.join(" ")
                    ));
                }
                out.push_str(&format!("To play:  {player}\n"));
                out.push_str(&format!("Legal:    {}\n", self.legal_plays.join(" ")));
            }
            None => out.push_str("Complete\n"),
        }

        if let Some(solutions) = &self.solutions {
            out.push_str("Solver:\n");
            for s in solutions {
                out.push_str(&format!(
                    "  {}  +{} (side {}, declarer {})",
                    s.card, s.score, s.total, s.declarer_tricks
                ));
                if !s.equals.is_empty() {
                    out.push_str(&format!("  = {}", s.equals));
                }
                out.push('\n');
            }
        }

        if let Some(table) = &self.table {
            out.push_str("      N  E  S  W\n");
            for row in table {
                out.push_str(&format!("  {}", row.strain));
                for tricks in row.tricks {
                    out.push_str(&format!(" {tricks:>2}"));
                }
                out.push('\n');
            }
        }

        out.push_str(&format!("Share:    ?{}\n", self.share));
        out
    }
}
