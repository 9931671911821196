//! Shipping box tiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum occupancy of a box, in percent.
pub const BOX_CAPACITY: i64 = 100;

/// Physical box size, by the sum of its three edges in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BoxSize {
    #[serde(rename = "60")]
    Size60,
    #[serde(rename = "80")]
    Size80,
    #[serde(rename = "100")]
    Size100,
}

impl BoxSize {
    /// All sizes, smallest first.
    pub const ALL: [BoxSize; 3] = [BoxSize::Size60, BoxSize::Size80, BoxSize::Size100];

    pub fn largest() -> Self {
        BoxSize::Size100
    }
}

impl fmt::Display for BoxSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BoxSize::Size60 => "60",
            BoxSize::Size80 => "80",
            BoxSize::Size100 => "100",
        };
        write!(f, "{}", s)
    }
}

/// Temperature handling of a box. Doubles as the fulfillment's shipping method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxType {
    Normal,
    Refrigerated,
    Frozen,
}

impl BoxType {
    /// Returns true for boxes that travel in the cold chain.
    pub fn is_cold_chain(&self) -> bool {
        !matches!(self, BoxType::Normal)
    }
}
