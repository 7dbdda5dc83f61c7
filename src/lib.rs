//! Session and transaction view state for the wallet client.
//!
//! [`session::SessionState`] tracks who is signed in and mirrors it into a
//! [`domain::KeyValueStore`]; [`ledger::Ledger`] keeps the newest-first
//! activity list and running balance. Neither validates its inputs: that is
//! the job of the caller layer in [`engine`] and [`ingestion`].

pub mod config;
pub mod domain;
pub mod engine;
pub mod ingestion;
pub mod ledger;
pub mod rejections;
pub mod session;
pub mod statement;
pub mod storage;
