use std::io::Read;
use std::pin::Pin;

use futures::stream::{self, Stream};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::traits::EventStream;
use crate::domain::{Error, Identity, IdentityId, Money, WalletEvent};
use crate::ledger::DEFAULT_DEPOSIT_SOURCE;

/// Replays collaborator outcomes from a CSV script with the header
/// `type,amount,party,detail`.
pub struct CsvReader<R: Read> {
    reader: Option<csv::Reader<R>>,
}

impl<R: Read> CsvReader<R> {
    pub fn new(reader: R) -> Self {
        let rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        Self { reader: Some(rdr) }
    }
}

/// Internal shape used only for CSV deserialization.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    amount: Option<String>,
    #[serde(default)]
    party: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

fn positive_amount(raw: Option<&str>) -> Result<Decimal, Error> {
    let raw = raw.ok_or_else(|| Error::Validation("Please enter a valid amount".to_string()))?;
    match Money::from_decimal_str(raw) {
        Some(money) if money.is_positive() => Ok(money.amount()),
        _ => Err(Error::Validation(format!(
            "Please enter a valid amount: {}",
            raw
        ))),
    }
}

fn required(field: Option<String>, message: &str) -> Result<String, Error> {
    field.ok_or_else(|| Error::Validation(message.to_string()))
}

fn identity_id(raw: String) -> IdentityId {
    match raw.parse::<u64>() {
        Ok(n) => IdentityId::Number(n),
        Err(_) => IdentityId::Text(raw),
    }
}

impl TryFrom<CsvRow> for WalletEvent {
    type Error = Error;

    fn try_from(row: CsvRow) -> Result<Self, Self::Error> {
        let CsvRow {
            kind,
            amount,
            party,
            detail,
        } = row;
        let party = party.filter(|s| !s.is_empty());
        let detail = detail.filter(|s| !s.is_empty());
        let amount = amount.filter(|s| !s.is_empty());

        let event = match kind.to_ascii_lowercase().as_str() {
            "login" => {
                let id = required(party, "Username and password are required")?;
                let name = required(detail, "Username and password are required")?;
                WalletEvent::Login {
                    identity: Identity::new(identity_id(id), name),
                }
            }
            "register" => {
                let id = required(party, "All fields are required for registration")?;
                let name = required(detail, "All fields are required for registration")?;
                WalletEvent::Register {
                    identity: Identity::new(identity_id(id), name),
                }
            }
            "logout" => WalletEvent::Logout,
            "deposit" => WalletEvent::Deposit {
                amount: positive_amount(amount.as_deref())?,
                source: party.unwrap_or_else(|| DEFAULT_DEPOSIT_SOURCE.to_string()),
            },
            "payment" => WalletEvent::Payment {
                amount: positive_amount(amount.as_deref())?,
                merchant: required(party, "Please enter a merchant ID")?,
                category: detail.unwrap_or_else(|| "Shopping".to_string()),
            },
            kind @ ("request" | "request_payment") => WalletEvent::Request {
                amount: positive_amount(amount.as_deref())?,
                counterparty: required(party, "Please enter a UPI ID")?,
                description: detail,
                resolved: kind == "request_payment",
            },
            other => {
                return Err(Error::Ingestion(format!(
                    "Invalid event type: {}",
                    other
                )));
            }
        };

        Ok(event)
    }
}

impl<R: Read + Send + 'static> EventStream for CsvReader<R> {
    type Events = Pin<Box<dyn Stream<Item = Result<WalletEvent, Error>> + Send>>;

    fn stream(&mut self) -> Self::Events {
        let reader = match self.reader.take() {
            Some(r) => r,
            None => {
                return Box::pin(stream::iter(Vec::<Result<WalletEvent, Error>>::new()));
            }
        };

        let iter = reader
            .into_deserialize::<CsvRow>()
            .map(|row_res| match row_res {
                Ok(row) => WalletEvent::try_from(row),
                Err(e) => Err(Error::Ingestion(format!(
                    "CSV deserialization error: {}",
                    e
                ))),
            });

        Box::pin(stream::iter(iter))
    }
}
