//! Progressive tax calculations.
//!
//! [`ProgressiveTax`] evaluates one [`TaxYearConfig`](crate::TaxYearConfig):
//! the forward direction (income to tax) lives in `progressive`, the inverse
//! (monthly tax to the income that produces it) in `required_income`.

pub mod common;
mod progressive;
mod required_income;

pub use progressive::{MONTHS_PER_YEAR, ProgressiveTax, TaxBreakdown};
pub use required_income::INVERSION_TOLERANCE;
