//! Text of the system messages queued for display on the user's next view.

use duck_types::{CoinAmount, RequestId};

pub fn withdrawal_received(id: RequestId, amount: CoinAmount) -> String {
    format!("Your withdrawal request {id} for {amount} coins has been received and is pending review.")
}

pub fn withdrawal_approved(id: RequestId, amount: CoinAmount) -> String {
    format!("Your withdrawal request {id} for {amount} coins has been approved and processed.")
}

pub fn withdrawal_rejected(id: RequestId, amount: CoinAmount) -> String {
    format!("Your withdrawal request {id} was rejected. {amount} coins have been returned to your balance.")
}

pub fn deposit_received(id: RequestId, amount: CoinAmount) -> String {
    format!("Your deposit request {id} for {amount} coins has been received and is pending review.")
}

pub fn deposit_approved(id: RequestId, amount: CoinAmount) -> String {
    format!("Your deposit request {id} has been approved. {amount} coins have been added to your balance.")
}

pub fn deposit_rejected(id: RequestId, amount: CoinAmount) -> String {
    format!("Your deposit request {id} for {amount} coins was rejected.")
}

pub fn verification_purchased(cost: CoinAmount) -> String {
    format!("Your account is now verified. {cost} coins have been deducted.")
}

pub fn admin_credit(amount: CoinAmount) -> String {
    format!("An administrator added {amount} coins to your balance.")
}

pub fn restricted(days: u32) -> String {
    format!("Your account has been restricted for {days} day(s). Gifts, verification and funds requests are unavailable until then.")
}

pub fn banned() -> String {
    "Your account has been banned.".to_string()
}

pub fn restriction_lifted() -> String {
    "The restriction on your account has been lifted.".to_string()
}
