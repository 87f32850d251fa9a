mod card;
mod deal;
mod hand;
mod seat;

pub use card::{Card, Rank, Strain, Suit};
pub use deal::{Deal, DealError};
pub use hand::Hand;
pub use seat::{Partnership, Seat};
