//! Ledger parameters: reward amounts, costs and thresholds.
//!
//! Every field has a serde default so a partial `[params]` table in a config
//! file only overrides what it names.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::amount::CoinAmount;
use crate::error::TypesError;
use crate::gift::Gift;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerParams {
    /// Credited to a viewer who watches an ad on their own or un-owned content.
    #[serde(default = "default_solo_reward")]
    pub solo_reward: CoinAmount,

    /// Credited to a viewer who watches an ad attached to someone else's content.
    #[serde(default = "default_referred_viewer_reward")]
    pub referred_viewer_reward: CoinAmount,

    /// Credited to the content owner when another user watches their ad.
    #[serde(default = "default_content_owner_reward")]
    pub content_owner_reward: CoinAmount,

    /// Price of the one-way verification badge.
    #[serde(default = "default_verification_cost")]
    pub verification_cost: CoinAmount,

    /// Smallest withdrawal a user may request.
    #[serde(default = "default_min_withdrawal")]
    pub min_withdrawal: CoinAmount,

    /// Per-event amount used by the bulk reward simulator.
    #[serde(default = "default_simulated_reward")]
    pub simulated_reward: CoinAmount,

    /// Price overrides keyed by gift name ("rose", "crown", ...).
    #[serde(default)]
    pub gift_prices: BTreeMap<String, CoinAmount>,
}

fn default_solo_reward() -> CoinAmount {
    CoinAmount::cents(25)
}

fn default_referred_viewer_reward() -> CoinAmount {
    CoinAmount::cents(15)
}

fn default_content_owner_reward() -> CoinAmount {
    CoinAmount::cents(25)
}

fn default_verification_cost() -> CoinAmount {
    CoinAmount::coins(500)
}

fn default_min_withdrawal() -> CoinAmount {
    CoinAmount::coins(500)
}

fn default_simulated_reward() -> CoinAmount {
    CoinAmount::cents(25)
}

impl LedgerParams {
    /// Price of `gift`, honouring any configured override.
    pub fn gift_price(&self, gift: Gift) -> CoinAmount {
        self.gift_prices
            .get(gift.name())
            .copied()
            .unwrap_or_else(|| gift.default_price())
    }

    /// Reject unknown gift names and zero-priced gifts.
    pub fn validate(&self) -> Result<(), TypesError> {
        for (name, price) in &self.gift_prices {
            name.parse::<Gift>()?;
            if price.is_zero() {
                return Err(TypesError::InvalidAmount(format!("gift {name} priced at 0")));
            }
        }
        Ok(())
    }
}

impl Default for LedgerParams {
    fn default() -> Self {
        Self {
            solo_reward: default_solo_reward(),
            referred_viewer_reward: default_referred_viewer_reward(),
            content_owner_reward: default_content_owner_reward(),
            verification_cost: default_verification_cost(),
            min_withdrawal: default_min_withdrawal(),
            simulated_reward: default_simulated_reward(),
            gift_prices: BTreeMap::new(),
        }
    }
}
