//! The gift catalogue: fixed coin denominations a user can send to a creator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::amount::CoinAmount;
use crate::error::TypesError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gift {
    Rose,
    Heart,
    Star,
    Crown,
    Diamond,
}

impl Gift {
    pub const ALL: [Gift; 5] = [
        Gift::Rose,
        Gift::Heart,
        Gift::Star,
        Gift::Crown,
        Gift::Diamond,
    ];

    /// Catalogue price, used unless the ledger parameters override it.
    pub fn default_price(&self) -> CoinAmount {
        match self {
            Self::Rose => CoinAmount::coins(5),
            Self::Heart => CoinAmount::coins(10),
            Self::Star => CoinAmount::coins(25),
            Self::Crown => CoinAmount::coins(100),
            Self::Diamond => CoinAmount::coins(250),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Rose => "rose",
            Self::Heart => "heart",
            Self::Star => "star",
            Self::Crown => "crown",
            Self::Diamond => "diamond",
        }
    }
}

impl fmt::Display for Gift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Gift {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|g| g.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| TypesError::UnknownGift(s.to_string()))
    }
}
