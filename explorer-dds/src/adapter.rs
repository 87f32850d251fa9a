use crate::wire::{parse_dd_table, parse_next_plays};
use crate::{DdTable, NextPlays, SolverBackend, SolverError, SolverRequest};
use explorer_board::Board;
use explorer_core::{Card, Seat, Strain};
use explorer_pbn::decode;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

/// A position to analyse: the deal at the start of the current trick plus
/// the cards already played to it.
///
/// Two queries share a memo entry only if every field is equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NextPlaysQuery {
    /// Notation whose first seat leads the current trick
    pub notation: String,
    pub strain: Strain,
    pub declarer: Seat,
    /// Zero to three cards of the open trick
    pub plays: Vec<Card>,
}

impl NextPlaysQuery {
    /// Query for the position a board is in now
    pub fn for_board(board: &Board) -> Self {
        NextPlaysQuery {
            notation: board.to_notation(),
            strain: board.strain(),
            declarer: board.declarer(),
            plays: board.current_plays().iter().map(|p| p.card).collect(),
        }
    }

    fn to_request(&self) -> SolverRequest {
        SolverRequest::NextPlays {
            board: self.notation.clone(),
            trump: self.strain.to_char(),
            declarer: self.declarer.to_char(),
            plays: self.plays.iter().map(Card::code).collect(),
        }
    }

    fn validate(&self) -> Result<(), SolverError> {
        if self.plays.len() > 3 {
            return Err(SolverError::InvalidQuery(format!(
                "{} cards in the current trick",
                self.plays.len()
            )));
        }
        decode(&self.notation).map_err(|err| SolverError::InvalidQuery(err.to_string()))?;
        Ok(())
    }
}

/// Memoizing front end for a solver backend.
///
/// Answers are kept for the life of the value; the tables only ever grow.
/// Safe to share between threads.
pub struct DoubleDummy<B> {
    backend: B,
    next_plays: RwLock<FxHashMap<NextPlaysQuery, NextPlays>>,
    tables: RwLock<FxHashMap<String, DdTable>>,
}

impl<B: SolverBackend> DoubleDummy<B> {
    pub fn new(backend: B) -> Self {
        DoubleDummy {
            backend,
            next_plays: RwLock::new(FxHashMap::default()),
            tables: RwLock::new(FxHashMap::default()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Score every card the player on turn could play.
    ///
    /// Scores count only tricks from this point on; see
    /// [`crate::annotate`] for totals including tricks already won.
    pub fn next_plays(&self, query: &NextPlaysQuery) -> Result<NextPlays, SolverError> {
        if let Some(hit) = self.next_plays.read().get(query) {
            debug!(board = %query.notation, plays = query.plays.len(), "next_plays cache hit");
            return Ok(hit.clone());
        }
        query.validate()?;

        debug!(board = %query.notation, plays = query.plays.len(), "next_plays cache miss");
        let result = self
            .backend
            .solve(&query.to_request())
            .and_then(parse_next_plays)
            .inspect_err(|err| warn!(board = %query.notation, error = %err, "solver failed"))?;

        // a concurrent caller may have filled the entry meanwhile; keep theirs
        let mut table = self.next_plays.write();
        Ok(table.entry(query.clone()).or_insert(result).clone())
    }

    /// [`Self::next_plays`] for the position a board is in now
    pub fn next_plays_for(&self, board: &Board) -> Result<NextPlays, SolverError> {
        if board.is_complete() {
            return Err(SolverError::InvalidQuery("all tricks have been played".into()));
        }
        self.next_plays(&NextPlaysQuery::for_board(board))
    }

    /// Makeable tricks for every strain and declarer of a deal
    pub fn dd_table(&self, notation: &str) -> Result<DdTable, SolverError> {
        if let Some(hit) = self.tables.read().get(notation) {
            debug!(board = %notation, "dd_table cache hit");
            return Ok(hit.clone());
        }
        decode(notation).map_err(|err| SolverError::InvalidQuery(err.to_string()))?;

        debug!(board = %notation, "dd_table cache miss");
        let request = SolverRequest::DdTable {
            board: notation.to_string(),
        };
        let result = self
            .backend
            .solve(&request)
            .and_then(parse_dd_table)
            .inspect_err(|err| warn!(board = %notation, error = %err, "solver failed"))?;

        let mut tables = self.tables.write();
        Ok(tables.entry(notation.to_string()).or_insert(result).clone())
    }

    /// Number of remembered answers, both kinds together
    pub fn cached(&self) -> usize {
        self.next_plays.read().len() + self.tables.read().len()
    }
}
