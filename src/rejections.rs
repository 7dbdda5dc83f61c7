use tracing::warn;

use crate::domain::{Error, RejectionSink};

/// Logs every rejected event; the form layer would show the same text.
#[derive(Default, Debug)]
pub struct TracingRejections {}

impl RejectionSink for TracingRejections {
    fn report(&self, event: Option<&str>, error: &Error) {
        warn!(event = event.unwrap_or("-"), reason = %error, "Rejected event");
    }
}
