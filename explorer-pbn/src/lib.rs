mod html;
mod notation;
mod query;
mod records;

pub use html::deals_to_html;
pub use notation::{decode, encode, encode_runs, rotate_notation, FormatError, PbnDeal};
pub use query::{parse_query, to_query, QueryError, ShareState};
pub use records::{load_deals, DealRecord};
