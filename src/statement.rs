use std::io::Write;

use serde::Serialize;

use crate::domain::{Clock, EntryKind, Error, Money};
use crate::ledger::Ledger;

const HEADER: [&str; 8] = [
    "id",
    "type",
    "amount",
    "timestamp",
    "status",
    "category",
    "detail",
    "balance_after",
];

#[derive(Debug, Serialize)]
struct StatementRow<'a> {
    id: String,
    #[serde(rename = "type")]
    kind: &'a str,
    amount: String,
    timestamp: String,
    status: &'a str,
    category: &'a str,
    detail: String,
    balance_after: String,
}

/// Renders the ledger as CSV, newest entry first, followed by a closing
/// `balance` row.
pub struct StatementWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> StatementWriter<W> {
    pub fn new(out: W) -> Self {
        Self {
            writer: csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(out),
        }
    }

    pub fn write<C: Clock>(mut self, ledger: &Ledger<C>) -> Result<(), Error> {
        self.writer.write_record(HEADER)?;

        for (index, entry) in ledger.entries().enumerate() {
            let balance_after = match entry.kind {
                EntryKind::Request => String::new(),
                _ => ledger
                    .derived_balance_at(index)
                    .map(|b| Money(b).to_string())
                    .unwrap_or_default(),
            };
            let detail = match &entry.description {
                Some(description) => format!("{} - {}", entry.title(), description),
                None => entry.title(),
            };

            self.writer.serialize(StatementRow {
                id: entry.id.to_string(),
                kind: entry.kind.as_str(),
                amount: Money(entry.amount).to_string(),
                timestamp: entry.timestamp.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
                status: &entry.status,
                category: &entry.category,
                detail,
                balance_after,
            })?;
        }

        let summary = Money(ledger.balance()).to_string();
        self.writer
            .write_record(["balance", "", "", "", "", "", "", summary.as_str()])?;
        self.writer.flush()?;
        Ok(())
    }
}
