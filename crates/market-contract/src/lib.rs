//! Prediction market contract boundary
//!
//! The market contract itself (accounting, settlement, resolution) lives on
//! chain. This crate defines the calls a client makes against it through
//! the [`PredictionMarket`] trait, an explicit [`MarketContext`] that owns
//! the contract handle and sending account, and a [`MarketBoard`] that keeps
//! the locally listed markets in sync.
//!
//! [`MarketContractBinding`] implements [`PredictionMarket`] against a
//! deployed contract through an alloy HTTP provider, signing with a local
//! private key when one is supplied.

pub mod binding;
pub mod board;
pub mod context;
pub mod contract;
pub mod error;
pub mod market;
pub mod units;

pub use binding::MarketContractBinding;
pub use board::MarketBoard;
pub use context::MarketContext;
pub use contract::PredictionMarket;
pub use error::{ContractError, Result};
pub use market::{Market, MarketDetails, Outcome};
pub use units::{display_ether, parse_bet_amount};
