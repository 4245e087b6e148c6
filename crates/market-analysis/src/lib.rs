//! Market question analysis reports
//!
//! Turns a free-text market question plus the current ETH and BTC quotes
//! into a fixed seven-section plain-text report. Generation is pure: the
//! same inputs always produce byte-identical output, and nothing here
//! touches the network.
//!
//! # Quick Start
//!
//! ```
//! use market_analysis::generate_analysis;
//! use rust_decimal::Decimal;
//!
//! let report = generate_analysis(
//!     "Will BTC hit 100k?",
//!     Decimal::from(2500),
//!     Decimal::from(50000),
//! )
//! .unwrap();
//!
//! assert_eq!(report.percentage_to_target.to_string(), "100.00");
//! assert!(report.text.contains("Technical Analysis"));
//! ```

mod error;
mod generator;
mod report;
mod templates;

pub use error::{AnalysisError, Result};
pub use generator::{AnalysisGenerator, generate_analysis, milestone_price, percentage_to_target};
pub use report::{AnalysisReport, SECTION_HEADERS};
