use rust_decimal::Decimal;

use crate::domain::Identity;

/// A confirmed outcome from one of the external collaborators, in the
/// order the user produced them.
#[derive(Debug, Clone, PartialEq)]
pub enum WalletEvent {
    Login { identity: Identity },
    Register { identity: Identity },
    Logout,
    Deposit { amount: Decimal, source: String },
    Payment {
        amount: Decimal,
        merchant: String,
        category: String,
    },
    Request {
        amount: Decimal,
        counterparty: String,
        description: Option<String>,
        resolved: bool, // true when the request was paid out immediately
    },
}

impl WalletEvent {
    pub fn name(&self) -> &'static str {
        match self {
            WalletEvent::Login { .. } => "login",
            WalletEvent::Register { .. } => "register",
            WalletEvent::Logout => "logout",
            WalletEvent::Deposit { .. } => "deposit",
            WalletEvent::Payment { .. } => "payment",
            WalletEvent::Request {
                resolved: false, ..
            } => "request",
            WalletEvent::Request { resolved: true, .. } => "request_payment",
        }
    }
}
