pub mod error;
pub mod event;
pub mod identity;
pub mod money;
pub mod traits;
pub mod transaction;

pub use error::Error;
pub use event::WalletEvent;
pub use identity::{Identity, IdentityId};
pub use money::Money;
pub use traits::{Clock, EventStream, KeyValueStore, RejectionSink, SystemClock};
pub use transaction::{
    EntryId, EntryKind, RequestKind, RequestOutcome, STATUS_COMPLETED, TransactionEntry,
};
