use explorer_core::Seat;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\[([A-Za-z]+) "([^"]+)"\]$"#).expect("valid tag regex"));

/// One board read from a deals file
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DealRecord {
    pub board: String,
    /// Notation from the `Deal` tag
    pub deal: Option<String>,
    pub dealer: Option<Seat>,
    pub vulnerability: Option<String>,
}

/// Read `[Tag "value"]` lines from a deals file.
///
/// A `Board` tag opens a new record; `Dealer`, `Vulnerable` and `Deal` fill
/// in the most recent one. Anything else is skipped.
pub fn load_deals(text: &str) -> Vec<DealRecord> {
    let mut records: Vec<DealRecord> = Vec::new();

    for (lineno, line) in text.lines().enumerate() {
        let Some(caps) = TAG_RE.captures(line.trim()) else {
            continue;
        };
        let (key, value) = (&caps[1], &caps[2]);

        if key == "Board" {
            records.push(DealRecord {
                board: value.to_string(),
                ..DealRecord::default()
            });
            continue;
        }

        let Some(record) = records.last_mut() else {
            warn!(line = lineno + 1, tag = key, "tag before first Board, ignored");
            continue;
        };
        match key {
            "Dealer" => match value.parse::<Seat>() {
                Ok(seat) => record.dealer = Some(seat),
                Err(_) => warn!(line = lineno + 1, value, "unrecognised dealer"),
            },
            "Vulnerable" => record.vulnerability = Some(value.to_string()),
            "Deal" => record.deal = Some(value.to_string()),
            _ => {}
        }
    }

    records
}
