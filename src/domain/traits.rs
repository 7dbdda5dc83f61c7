use chrono::{DateTime, Utc};
use futures::Stream;

use crate::domain::{Error, WalletEvent};

pub trait EventStream {
    type Events: Stream<Item = Result<WalletEvent, Error>> + Send + Unpin + 'static;
    fn stream(&mut self) -> Self::Events;
}

pub trait RejectionSink {
    /// `event` names the event that was refused, or is `None` when the input
    /// never decoded into one.
    fn report(&self, event: Option<&str>, error: &Error);
}

/// Keyed persistent storage the session mirrors itself into.
pub trait KeyValueStore {
    fn load(&self, key: &str) -> Result<Option<String>, Error>;

    fn save(&mut self, key: &str, value: &str) -> Result<(), Error>;

    fn remove(&mut self, key: &str) -> Result<(), Error>;
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
