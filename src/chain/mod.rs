//! Local execution environment
//!
//! A small in-process stand-in for the chain the wallet lives on: it keeps
//! the balances of accounts the wallet pays and records every call.

pub mod account_book;

pub use account_book::{AccountBook, CallRecord};
