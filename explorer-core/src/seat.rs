use serde::{Deserialize, Serialize};
use std::fmt;

/// Represents the four seats at a bridge table, in clockwise order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Seat {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Seat {
    /// All seats in clockwise order starting with North
    pub const ALL: [Seat; 4] = [Seat::North, Seat::East, Seat::South, Seat::West];

    /// Convert from index (0-3)
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Seat::North),
            1 => Some(Seat::East),
            2 => Some(Seat::South),
            3 => Some(Seat::West),
            _ => None,
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Parse a seat letter (N, E, S, W), case-insensitive
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'N' => Some(Seat::North),
            'E' => Some(Seat::East),
            'S' => Some(Seat::South),
            'W' => Some(Seat::West),
            _ => None,
        }
    }

    /// Get seat as a character (N, E, S, W)
    pub fn to_char(&self) -> char {
        match self {
            Seat::North => 'N',
            Seat::East => 'E',
            Seat::South => 'S',
            Seat::West => 'W',
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Seat::North => "North",
            Seat::East => "East",
            Seat::South => "South",
            Seat::West => "West",
        }
    }

    /// Next seat clockwise (the player to the left)
    pub fn next(&self) -> Seat {
        self.rotate(1)
    }

    /// Previous seat clockwise (the player to the right)
    pub fn prev(&self) -> Seat {
        self.rotate(3)
    }

    /// Seat `steps` positions clockwise from this one
    pub fn rotate(&self, steps: usize) -> Seat {
        Seat::ALL[(self.index() + steps) % 4]
    }

    /// Get partner seat
    pub fn partner(&self) -> Seat {
        self.rotate(2)
    }

    pub fn partnership(&self) -> Partnership {
        match self {
            Seat::North | Seat::South => Partnership::NorthSouth,
            Seat::East | Seat::West => Partnership::EastWest,
        }
    }

    /// Declarer implied by an opening leader: the seat to the leader's right
    pub fn declarer_for_leader(leader: Seat) -> Seat {
        leader.prev()
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl std::str::FromStr for Seat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(seat) = Seat::ALL
            .iter()
            .find(|seat| seat.name().eq_ignore_ascii_case(trimmed))
        {
            return Ok(*seat);
        }
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Seat::from_char(c).ok_or_else(|| format!("invalid seat: {s}")),
            _ => Err(format!("invalid seat: {s}")),
        }
    }
}

/// The two sides of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Partnership {
    NorthSouth,
    EastWest,
}

impl Partnership {
    pub fn other(&self) -> Partnership {
        match self {
            Partnership::NorthSouth => Partnership::EastWest,
            Partnership::EastWest => Partnership::NorthSouth,
        }
    }
}
