use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordinal engagement grade. Variants are declared from highest (`A`) to
/// lowest (`E`), so the derived ordering sorts `A` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
}

impl Grade {
    /// All grades in display order.
    pub const ALL: [Grade; 5] = [Grade::A, Grade::B, Grade::C, Grade::D, Grade::E];

    /// Converts a like count into a grade.
    ///
    /// | Likes       | Grade |
    /// |-------------|-------|
    /// | >= 100      | A     |
    /// | >= 50       | B     |
    /// | >= 30       | C     |
    /// | >= 10       | D     |
    /// | < 10        | E     |
    pub fn from_likes(likes: u64) -> Self {
        match likes {
            n if n >= 100 => Grade::A,
            n if n >= 50 => Grade::B,
            n if n >= 30 => Grade::C,
            n if n >= 10 => Grade::D,
            _ => Grade::E,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
        }
    }

    /// True when `self` is a strictly better grade than `other`.
    pub fn is_higher_than(&self, other: Grade) -> bool {
        *self < other
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Grade::A),
            "B" => Ok(Grade::B),
            "C" => Ok(Grade::C),
            "D" => Ok(Grade::D),
            "E" => Ok(Grade::E),
            other => Err(format!("unknown grade '{other}', expected one of A-E")),
        }
    }
}
