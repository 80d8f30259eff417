//! Forward progressive tax calculation.
//!
//! Tax for an income is found by locating the first bracket whose ceiling is
//! at or above the income and charging that bracket's marginal rate on the
//! income above its floor, on top of the bracket's precomputed base tax:
//!
//! ```text
//! tax = base_tax + rate × (income − floor)
//! ```
//!
//! Years with a [`Surcharge`] add `tax × surcharge.rate` when income strictly
//! exceeds the surcharge threshold. The surcharge is levied on the
//! bracket-derived tax only.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::ProgressiveTax;
//! use tax_core::{Surcharge, TaxBracket, TaxYearConfig};
//!
//! let config = TaxYearConfig::new(
//!     "2026",
//!     vec![
//!         TaxBracket::bounded(dec!(600000), dec!(0), dec!(0)),
//!         TaxBracket::bounded(dec!(1200000), dec!(0.01), dec!(0)),
//!         TaxBracket::unbounded(dec!(0.11), dec!(6000)),
//!     ],
//!     Some(Surcharge {
//!         threshold_income: dec!(10000000),
//!         rate: dec!(0.09),
//!     }),
//! )
//! .unwrap();
//!
//! let engine = ProgressiveTax::new(&config);
//!
//! assert_eq!(engine.tax(dec!(1200000)), dec!(6000));
//! assert_eq!(engine.tax(dec!(2200000)), dec!(116000));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::trace;

use crate::calculations::common::{max, round_half_up};
use crate::{Surcharge, TaxYearConfig};

pub const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Detail behind a single forward calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxBreakdown {
    /// Income the calculation was run for (negative input is clamped to zero).
    pub income: Decimal,

    /// Position of the selected bracket in the year's table.
    pub bracket_index: usize,

    /// Lower bound of the selected bracket.
    pub bracket_floor: Decimal,

    /// Marginal rate of the selected bracket.
    pub marginal_rate: Decimal,

    /// Tax accumulated below the selected bracket.
    pub base_tax: Decimal,

    /// Tax from the bracket table alone, before any surcharge.
    pub bracket_tax: Decimal,

    /// Surcharge levied on `bracket_tax`; zero when none applies.
    pub surcharge: Decimal,

    /// `bracket_tax + surcharge`.
    pub total_tax: Decimal,

    /// `total_tax / income`, rounded to four places; zero for zero income.
    pub effective_rate: Decimal,
}

/// Calculator for a single tax year's progressive schedule.
#[derive(Debug, Clone, Copy)]
pub struct ProgressiveTax<'a> {
    pub(super) config: &'a TaxYearConfig,
}

impl<'a> ProgressiveTax<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self { config }
    }

    /// Tax owed on `yearly_income`, rounded to two decimal places.
    pub fn tax(
        &self,
        yearly_income: Decimal,
    ) -> Decimal {
        self.breakdown(yearly_income).total_tax
    }

    /// One twelfth of the yearly tax, rounded to two decimal places.
    pub fn monthly_tax(
        &self,
        yearly_income: Decimal,
    ) -> Decimal {
        round_half_up(self.tax(yearly_income) / MONTHS_PER_YEAR)
    }

    /// Runs the forward calculation and reports every intermediate value.
    pub fn breakdown(
        &self,
        yearly_income: Decimal,
    ) -> TaxBreakdown {
        let income = max(yearly_income, Decimal::ZERO);
        let (bracket_index, raw_tax) = self.bracket_tax(income);
        let bracket_tax = round_half_up(raw_tax);

        let surcharge = self
            .config
            .surcharge()
            .filter(|s| applies(s, income))
            .map_or(Decimal::ZERO, |s| round_half_up(bracket_tax * s.rate));

        let total_tax = bracket_tax + surcharge;
        let effective_rate = if income.is_zero() {
            Decimal::ZERO
        } else {
            (total_tax / income)
                .round_dp_with_strategy(4, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
        };

        let bracket = &self.config.brackets()[bracket_index];

        TaxBreakdown {
            income,
            bracket_index,
            bracket_floor: self.config.floor(bracket_index),
            marginal_rate: bracket.rate,
            base_tax: bracket.base_tax,
            bracket_tax,
            surcharge,
            total_tax,
            effective_rate,
        }
    }

    /// Selects the bracket for `income` and returns its index together with
    /// the unrounded, surcharge-free tax.
    ///
    /// `income` must be non-negative.
    pub(super) fn bracket_tax(
        &self,
        income: Decimal,
    ) -> (usize, Decimal) {
        let brackets = self.config.brackets();

        // A validated config always ends with an unbounded bracket, so the
        // fallback only guards hand-built tables.
        let index = brackets
            .iter()
            .position(|b| b.covers(income))
            .unwrap_or(brackets.len() - 1);

        trace!(
            year = self.config.year_label(),
            %income,
            bracket = index,
            "selected tax bracket"
        );

        if index == 0 {
            return (0, Decimal::ZERO);
        }

        let bracket = &brackets[index];
        let floor = self.config.floor(index);

        (index, bracket.base_tax + bracket.rate * (income - floor))
    }
}

/// The surcharge threshold itself is excluded.
pub(super) fn applies(
    surcharge: &Surcharge,
    income: Decimal,
) -> bool {
    income > surcharge.threshold_income
}
