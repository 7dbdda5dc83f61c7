use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::domain::{Clock, EntryId, RequestKind, RequestOutcome, SystemClock, TransactionEntry};

pub const DEMO_OPENING_BALANCE: i64 = 1000;
pub const DEFAULT_DEPOSIT_SOURCE: &str = "Razorpay";

/// Hands out entry ids derived from the wall clock in milliseconds, bumped
/// past the previous id whenever the clock has not moved on.
///
/// Once `u64::MAX` has been seen (only possible through seeded ids) the
/// clock value is used as is and ids are no longer guaranteed unique.
#[derive(Debug, Default, Clone)]
struct EntryIds {
    last: u64,
}

impl EntryIds {
    fn next(&mut self, now: DateTime<Utc>) -> EntryId {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        self.last = match self.last.checked_add(1) {
            Some(bumped) => millis.max(bumped),
            None => millis,
        };
        EntryId(self.last)
    }

    fn observe(&mut self, id: EntryId) {
        self.last = self.last.max(id.0);
    }
}

/// Newest-first record of wallet activity with a running balance.
///
/// This is a display cache: inputs are trusted, amounts are expected to be
/// positive and nothing is reconciled against the server.
#[derive(Debug)]
pub struct Ledger<C = SystemClock>
where
    C: Clock,
{
    clock: C,
    balance: Decimal,
    entries: VecDeque<TransactionEntry>,
    ids: EntryIds,
    seeded: bool,
}

impl Ledger<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for Ledger<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> Ledger<C>
where
    C: Clock,
{
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            balance: Decimal::ZERO,
            entries: VecDeque::new(),
            ids: EntryIds::default(),
            seeded: false,
        }
    }

    /// Installs the opening balance and history. Only the first call has any
    /// effect; `initial_entries` are expected newest-first and kept as given.
    pub fn seed(
        &mut self,
        initial_balance: Decimal,
        initial_entries: Vec<TransactionEntry>,
    ) -> bool {
        if self.seeded {
            warn!("Ledger already seeded, ignoring");
            return false;
        }

        self.balance = initial_balance;
        for entry in initial_entries {
            self.ids.observe(entry.id);
            self.entries.push_back(entry);
        }
        self.seeded = true;

        debug!(balance = %self.balance, entries = self.entries.len(), "Ledger seeded");
        true
    }

    /// Seeds the fixed demonstration history shown to every new session.
    pub fn seed_demo(&mut self) -> bool {
        let now = self.clock.now();
        let days_ago = |days: i64| now - Duration::days(days);

        let history = vec![
            TransactionEntry::deposit(
                EntryId(1),
                Decimal::from(5000),
                DEFAULT_DEPOSIT_SOURCE,
                days_ago(1),
            ),
            TransactionEntry::payment(
                EntryId(2),
                Decimal::from(1500),
                "Amazon",
                "Shopping",
                days_ago(2),
            ),
            TransactionEntry::payment(
                EntryId(3),
                Decimal::from(2000),
                "Netflix",
                "Entertainment",
                days_ago(3),
            ),
            TransactionEntry::payment(
                EntryId(4),
                Decimal::from(1000),
                "Spotify",
                "Entertainment",
                days_ago(4),
            ),
            TransactionEntry::deposit(
                EntryId(5),
                Decimal::from(3000),
                DEFAULT_DEPOSIT_SOURCE,
                days_ago(5),
            ),
        ];

        self.seed(Decimal::from(DEMO_OPENING_BALANCE), history)
    }

    pub fn record_deposit(&mut self, amount: Decimal) -> &TransactionEntry {
        self.record_deposit_from(amount, DEFAULT_DEPOSIT_SOURCE)
    }

    pub fn record_deposit_from(&mut self, amount: Decimal, source: &str) -> &TransactionEntry {
        let now = self.clock.now();
        let id = self.ids.next(now);
        self.push(TransactionEntry::deposit(id, amount, source, now))
    }

    /// Sufficiency of the balance is the caller's business.
    pub fn record_payment(
        &mut self,
        amount: Decimal,
        merchant: &str,
        category: &str,
    ) -> &TransactionEntry {
        let now = self.clock.now();
        let id = self.ids.next(now);
        self.push(TransactionEntry::payment(id, amount, merchant, category, now))
    }

    pub fn record_request(&mut self, outcome: RequestOutcome) -> &TransactionEntry {
        let id = self.ids.next(self.clock.now());
        if outcome.kind == RequestKind::Payment {
            debug!(amount = %outcome.amount, "Request resolved into a payment");
        }
        self.push(outcome.into_entry(id))
    }

    fn push(&mut self, entry: TransactionEntry) -> &TransactionEntry {
        self.balance += entry.balance_effect();
        debug!(entry = %entry, balance = %self.balance, "Recorded entry");
        self.entries.push_front(entry);
        &self.entries[0]
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Balance before the oldest entry still shown.
    pub fn opening_balance(&self) -> Decimal {
        let net: Decimal = self.entries.iter().map(TransactionEntry::balance_effect).sum();
        self.balance - net
    }

    /// What the balance was right after the entry at `index` (0 = newest),
    /// folding forward from the oldest entry.
    pub fn derived_balance_at(&self, index: usize) -> Option<Decimal> {
        if index >= self.entries.len() {
            return None;
        }

        let balance = self
            .entries
            .iter()
            .skip(index)
            .rev()
            .fold(self.opening_balance(), |running, entry| {
                running + entry.balance_effect()
            });
        Some(balance)
    }

    pub fn entries(
        &self,
    ) -> impl ExactSizeIterator<Item = &TransactionEntry> + DoubleEndedIterator {
        self.entries.iter()
    }

    pub fn get(&self, index: usize) -> Option<&TransactionEntry> {
        self.entries.get(index)
    }

    /// The newest `n` entries, as the dashboard lists them.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &TransactionEntry> {
        self.entries.iter().take(n)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_seeded(&self) -> bool {
        self.seeded
    }
}
