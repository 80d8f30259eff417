//! Progressive income tax engine.
//!
//! Tax year tables are immutable [`TaxYearConfig`]s held in a
//! [`TaxYearRegistry`]. The free functions below evaluate the compiled-in
//! tables; build a registry of your own to calculate against other years.
//!
//! ```
//! use rust_decimal_macros::dec;
//!
//! assert_eq!(tax_core::calculate_tax(dec!(1200000), "2026"), Ok(dec!(6000)));
//! assert_eq!(tax_core::calculate_required_income(dec!(500), "2026"), Ok(dec!(1200000)));
//! ```

pub mod calculations;
pub mod models;
pub mod registry;

use rust_decimal::Decimal;

pub use calculations::{ProgressiveTax, TaxBreakdown};
pub use models::*;
pub use registry::{TaxError, TaxYearRegistry};

/// Tax owed on `yearly_income` under the built-in table for `year_label`.
pub fn calculate_tax(
    yearly_income: Decimal,
    year_label: &str,
) -> Result<Decimal, TaxError> {
    TaxYearRegistry::builtin().calculate_tax(yearly_income, year_label)
}

/// Forward calculation with every intermediate value.
pub fn calculate_tax_breakdown(
    yearly_income: Decimal,
    year_label: &str,
) -> Result<TaxBreakdown, TaxError> {
    TaxYearRegistry::builtin().calculate_tax_breakdown(yearly_income, year_label)
}

/// One twelfth of [`calculate_tax`], rounded to two decimal places.
pub fn calculate_monthly_tax(
    yearly_income: Decimal,
    year_label: &str,
) -> Result<Decimal, TaxError> {
    TaxYearRegistry::builtin().calculate_monthly_tax(yearly_income, year_label)
}

/// Minimum yearly income whose tax reaches `monthly_tax × 12`, rounded to a
/// whole unit. Rounding may land up to one unit below the exact income.
pub fn calculate_required_income(
    monthly_tax: Decimal,
    year_label: &str,
) -> Result<Decimal, TaxError> {
    TaxYearRegistry::builtin().calculate_required_income(monthly_tax, year_label)
}
