//! Gifts: a user-to-user transfer at a fixed catalogue price.

use duck_store::{EntryReason, NotificationKind, TransactionalStore};
use duck_types::{AccountId, Clock, CoinAmount, ContentId, Gift, RandomSource};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;
use crate::ledger::{credit, debit, load_account, load_unrestricted, log_failure, notify, CoinLedger};
use crate::spans;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftReceipt {
    pub gift: Gift,
    pub price: CoinAmount,
    pub sender_balance: CoinAmount,
    pub recipient: AccountId,
    pub notification_id: u64,
}

impl<S: TransactionalStore, C: Clock, R: RandomSource> CoinLedger<S, C, R> {
    /// Move the gift's price from `sender` to `recipient` and notify the
    /// recipient about `content`.
    ///
    /// The sender's balance is re-read inside the unit; a cached client-side
    /// balance is never trusted.
    pub fn send_gift(
        &self,
        sender: &AccountId,
        recipient: &AccountId,
        gift: Gift,
        content: &ContentId,
    ) -> Result<GiftReceipt, LedgerError> {
        let _span = spans::operation_span("send_gift", sender).entered();
        let now = self.now();
        let price = self.params().gift_price(gift);

        let result: Result<GiftReceipt, LedgerError> = if sender == recipient {
            Err(LedgerError::SelfTransfer)
        } else {
            self.store().transact(|txn| {
                let mut from = load_unrestricted(txn, sender, now)?;
                let mut to = load_account(txn, recipient)?;
                debit(txn, &mut from, price, EntryReason::GiftSent, now)?;
                credit(txn, &mut to, price, EntryReason::GiftReceived, now)?;
                txn.put_account(&from)?;
                txn.put_account(&to)?;
                let notification_id = notify(
                    txn,
                    recipient,
                    sender,
                    NotificationKind::Gift,
                    format!("{}:{}", gift.name(), content),
                    now,
                )?;
                Ok(GiftReceipt {
                    gift,
                    price,
                    sender_balance: from.balance,
                    recipient: recipient.clone(),
                    notification_id,
                })
            })
        };

        match &result {
            Ok(receipt) => tracing::info!(
                gift = %gift,
                recipient = %recipient,
                price = %price,
                balance = %receipt.sender_balance,
                "gift sent"
            ),
            Err(err) => log_failure("send_gift", err),
        }
        result
    }
}
