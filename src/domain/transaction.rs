use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::Money;

pub const STATUS_COMPLETED: &str = "completed";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct EntryId(pub u64);

impl core::fmt::Display for EntryId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Deposit,
    Payment,
    Request,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Deposit => "deposit",
            EntryKind::Payment => "payment",
            EntryKind::Request => "request",
        }
    }

    /// Signed effect of `amount` on the running balance.
    pub fn balance_effect(&self, amount: Decimal) -> Decimal {
        match self {
            EntryKind::Deposit => amount,
            EntryKind::Payment => -amount,
            EntryKind::Request => Decimal::ZERO,
        }
    }
}

/// One row of wallet activity. Entries are built once by the ledger and
/// only ever read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionEntry {
    pub id: EntryId,
    pub kind: EntryKind,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
    pub status: String,
    pub category: String,
    pub source: Option<String>, // deposits
    pub merchant: Option<String>,
    pub counterparty: Option<String>, // requests: UPI or merchant id
    pub description: Option<String>,
}

impl TransactionEntry {
    pub fn deposit(
        id: EntryId,
        amount: Decimal,
        source: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind: EntryKind::Deposit,
            amount,
            timestamp,
            status: STATUS_COMPLETED.to_string(),
            category: "Deposit".to_string(),
            source: Some(source.into()),
            merchant: Some("Self".to_string()),
            counterparty: None,
            description: None,
        }
    }

    pub fn payment(
        id: EntryId,
        amount: Decimal,
        merchant: impl Into<String>,
        category: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            kind: EntryKind::Payment,
            amount,
            timestamp,
            status: STATUS_COMPLETED.to_string(),
            category: category.into(),
            source: None,
            merchant: Some(merchant.into()),
            counterparty: None,
            description: None,
        }
    }

    pub fn balance_effect(&self) -> Decimal {
        self.kind.balance_effect(self.amount)
    }

    /// Human-readable line the history view shows for this entry.
    pub fn title(&self) -> String {
        match self.kind {
            EntryKind::Deposit => "Money Added".to_string(),
            EntryKind::Request => format!(
                "Money Request ({})",
                self.counterparty.as_deref().unwrap_or("unknown")
            ),
            EntryKind::Payment => match (&self.merchant, &self.counterparty) {
                (Some(merchant), _) => format!("Payment to {}", merchant),
                (None, Some(counterparty)) => format!("Payment to {}", counterparty),
                (None, None) => "Payment".to_string(),
            },
        }
    }
}

impl core::fmt::Display for TransactionEntry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{},id={},amount={},status={}",
            self.kind.as_str(),
            self.id,
            Money(self.amount),
            self.status
        )
    }
}

/// Confirmed outcome of a money request handed over by the
/// payment-initiation collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestOutcome {
    pub kind: RequestKind,
    pub amount: Decimal,
    pub timestamp: DateTime<Utc>,
    pub status: String,
    pub counterparty: Option<String>,
    pub description: Option<String>,
}

/// A request either stays pending or resolves into a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Request,
    Payment,
}

impl RequestKind {
    pub fn entry_kind(&self) -> EntryKind {
        match self {
            RequestKind::Request => EntryKind::Request,
            RequestKind::Payment => EntryKind::Payment,
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            RequestKind::Request => "Money Request",
            RequestKind::Payment => "Payment",
        }
    }
}

impl RequestOutcome {
    pub fn into_entry(self, id: EntryId) -> TransactionEntry {
        TransactionEntry {
            id,
            kind: self.kind.entry_kind(),
            amount: self.amount,
            timestamp: self.timestamp,
            status: self.status,
            category: self.kind.category().to_string(),
            source: None,
            merchant: None,
            counterparty: self.counterparty,
            description: self.description,
        }
    }
}
