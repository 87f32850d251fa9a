//! Share-state query strings.
//!
//! A board in progress is described by its deal, strain, declarer and the
//! cards played so far, e.g.
//! `deal=N%3AT843.K4.KT853.73+J97...&strain=N&declarer=W&plays=5D,2D,QD`.

use explorer_core::{Card, Seat, Strain};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("missing required parameter {0:?}")]
    Missing(&'static str),
    #[error("invalid value for {key:?}: {value:?}")]
    BadValue { key: String, value: String },
}

/// Everything needed to rebuild a board: replay `plays` on `deal`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareState {
    /// Notation of the initial deal
    pub deal: String,
    pub strain: Strain,
    pub declarer: Option<Seat>,
    pub plays: Vec<Card>,
}

/// Serialize a share state into a query string (without a leading `?`)
pub fn to_query(state: &ShareState) -> String {
    let deal: String = form_urlencoded::byte_serialize(state.deal.as_bytes()).collect();
    let mut pairs = vec![
        format!("deal={deal}"),
        format!("strain={}", state.strain.to_char()),
    ];
    if let Some(declarer) = state.declarer {
        pairs.push(format!("declarer={}", declarer.to_char()));
    }
    if !state.plays.is_empty() {
        let codes: Vec<String> = state.plays.iter().map(Card::code).collect();
        pairs.push(format!("plays={}", codes.join(",")));
    }
    pairs.join("&")
}

/// Parse a query string produced by [`to_query`]. A leading `?` is allowed;
/// unknown keys are ignored and a missing strain means no trump. Decoding is
/// `application/x-www-form-urlencoded`: a malformed escape is kept literally.
pub fn parse_query(query: &str) -> Result<ShareState, QueryError> {
    let query = query.strip_prefix('?').unwrap_or(query);

    let mut deal = None;
    let mut strain = Strain::NoTrump;
    let mut declarer = None;
    let mut plays = Vec::new();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let bad = || QueryError::BadValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key.as_ref() {
            "deal" => deal = Some(value.to_string()),
            "strain" => strain = value.parse().map_err(|_| bad())?,
            "declarer" => declarer = Some(value.parse().map_err(|_| bad())?),
            "plays" => {
                plays = value
                    .split(',')
                    .filter(|code| !code.is_empty())
                    .map(|code| Card::from_code(code).ok_or_else(bad))
                    .collect::<Result<_, _>>()?;
            }
            _ => {}
        }
    }

    Ok(ShareState {
        deal: deal.ok_or(QueryError::Missing("deal"))?,
        strain,
        declarer,
        plays,
    })
}
