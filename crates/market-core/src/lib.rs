//! Core domain types for market-rs
//!
//! This crate defines the value types shared by the price feed, the analysis
//! generator and the contract boundary: [`Asset`], [`PriceQuote`],
//! [`PriceSnapshot`] and [`MarketQuestion`].

pub mod asset;
pub mod error;
pub mod question;
pub mod quote;

pub use asset::Asset;
pub use error::{CoreError, Result};
pub use question::MarketQuestion;
pub use quote::{PriceQuote, PriceSnapshot, QUOTE_PRECISION};
