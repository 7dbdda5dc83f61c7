use std::io::Write;

use futures::StreamExt;
use tracing::info;

use crate::domain::{
    Clock, Error, Identity, KeyValueStore, RequestKind, RequestOutcome, STATUS_COMPLETED,
    SystemClock, WalletEvent,
    traits::{EventStream, RejectionSink},
};
use crate::ledger::Ledger;
use crate::session::{Session, SessionState};
use crate::statement::StatementWriter;

/// Caller layer around the view state: validates what the forms would
/// validate, then applies each confirmed outcome to the session and ledger.
#[derive(Debug)]
pub struct Wallet<I, S, D, C = SystemClock>
where
    I: EventStream,
    S: KeyValueStore,
    D: RejectionSink,
    C: Clock,
{
    events: I,
    session: SessionState<S>,
    ledger: Ledger<C>,
    rejections: D,
}

impl<I, S, D, C> Wallet<I, S, D, C>
where
    I: EventStream,
    S: KeyValueStore,
    D: RejectionSink,
    C: Clock,
{
    pub fn new(events: I, session: SessionState<S>, ledger: Ledger<C>, rejections: D) -> Self {
        Self {
            events,
            session,
            ledger,
            rejections,
        }
    }

    /// Restores a persisted session and, if there is one, seeds the ledger.
    pub fn start(&mut self) -> &Session {
        self.session.restore();
        if self.session.is_logged_in() {
            self.ledger.seed_demo();
        }
        self.session.session()
    }

    pub async fn process(&mut self) -> Result<(), Error> {
        let mut res = self.events.stream();
        let mut applied = 0usize;

        while let Some(event) = res.next().await {
            match event {
                Ok(event) => {
                    let name = event.name();
                    match self.apply_event(event) {
                        Ok(()) => applied += 1,
                        Err(e) => self.rejections.report(Some(name), &e),
                    }
                }
                Err(e) => self.rejections.report(None, &e),
            }
        }

        info!(applied, balance = %self.ledger.balance(), "Event script processed");
        Ok(())
    }

    fn apply_event(&mut self, event: WalletEvent) -> Result<(), Error> {
        match event {
            WalletEvent::Login { identity } => {
                let token = format!("session_{}", identity.id);
                self.sign_in(identity, &token);
                Ok(())
            }
            WalletEvent::Register { identity } => {
                // Registration hands back no credential, only the new id.
                let token = format!("mock_token_{}", identity.id);
                self.sign_in(identity, &token);
                Ok(())
            }
            WalletEvent::Logout => {
                self.session.clear();
                Ok(())
            }
            WalletEvent::Deposit { amount, source } => {
                self.require_session()?;
                self.ledger.record_deposit_from(amount, &source);
                Ok(())
            }
            WalletEvent::Payment {
                amount,
                merchant,
                category,
            } => {
                self.require_session()?;
                let available = self.ledger.balance();
                if amount > available {
                    return Err(Error::InsufficientBalance {
                        requested: amount,
                        available,
                    });
                }
                self.ledger.record_payment(amount, &merchant, &category);
                Ok(())
            }
            WalletEvent::Request {
                amount,
                counterparty,
                description,
                resolved,
            } => {
                self.session
                    .require_identity()
                    .ok_or(Error::SessionRequired)?;

                let kind = if resolved {
                    RequestKind::Payment
                } else {
                    RequestKind::Request
                };
                let outcome = RequestOutcome {
                    kind,
                    amount,
                    timestamp: self.ledger.now(),
                    status: STATUS_COMPLETED.to_string(),
                    counterparty: Some(counterparty),
                    description,
                };
                self.ledger.record_request(outcome);
                Ok(())
            }
        }
    }

    fn sign_in(&mut self, identity: Identity, token: &str) {
        self.session.establish_with_token(identity, token);
        if !self.ledger.is_seeded() {
            self.ledger.seed_demo();
        }
    }

    fn require_session(&self) -> Result<(), Error> {
        match self.session.identity() {
            Some(_) => Ok(()),
            None => Err(Error::SessionRequired),
        }
    }

    pub fn session(&self) -> &SessionState<S> {
        &self.session
    }

    pub fn ledger(&self) -> &Ledger<C> {
        &self.ledger
    }

    pub fn rejections(&self) -> &D {
        &self.rejections
    }

    pub fn flush<W: Write>(&self, out: W) -> Result<(), Error> {
        StatementWriter::new(out).write(&self.ledger)
    }
}
