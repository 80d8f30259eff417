//! Inverse calculation: the smallest yearly income that produces a given
//! monthly tax.
//!
//! Inside one bracket tax is linear in income, so each bracket is inverted
//! algebraically instead of searched:
//!
//! ```text
//! income = floor + (target − base_tax) / rate
//! ```
//!
//! # Surcharge years
//!
//! The surcharge makes the forward function jump at the threshold. Targets at
//! or below the tax owed exactly at the threshold are inverted against the
//! plain brackets. Larger targets have the surcharge backed out first
//! (`target / (1 + rate)`). When that lands at or below the threshold the
//! target sits inside the jump, and the result is `threshold_income + 1`, the
//! first whole income that is surcharged.
//!
//! # Overflow
//!
//! Targets whose income cannot be represented as a [`Decimal`] saturate to
//! [`Decimal::MAX`] instead of overflowing.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use super::ProgressiveTax;
use super::common::{max, round_whole};
use super::progressive::MONTHS_PER_YEAR;
use crate::Surcharge;

/// Slack allowed when testing whether a target tax falls inside a bracket's
/// tax range.
pub const INVERSION_TOLERANCE: Decimal = dec!(0.000001);

impl ProgressiveTax<'_> {
    /// Minimum yearly income whose tax reaches `monthly_tax × 12`, rounded
    /// half away from zero to a whole unit. The rounded result may sit up to
    /// one unit below the exact solution.
    ///
    /// Zero or negative input returns zero. Out-of-range input returns
    /// [`Decimal::MAX`].
    pub fn required_income(
        &self,
        monthly_tax: Decimal,
    ) -> Decimal {
        if monthly_tax <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let Some(target) = monthly_tax.checked_mul(MONTHS_PER_YEAR) else {
            warn!(
                year = self.config.year_label(),
                %monthly_tax,
                "yearly target tax overflows; saturating required income"
            );
            return Decimal::MAX;
        };
        let income = match self.config.surcharge() {
            Some(surcharge) => self.invert_with_surcharge(target, surcharge),
            None => self.invert_brackets(target),
        };

        debug!(
            year = self.config.year_label(),
            %monthly_tax,
            %income,
            "inverted monthly tax"
        );

        max(round_whole(income), Decimal::ZERO)
    }

    fn invert_with_surcharge(
        &self,
        target: Decimal,
        surcharge: &Surcharge,
    ) -> Decimal {
        let threshold = surcharge.threshold_income;
        let (_, tax_at_threshold) = self.bracket_tax(threshold);

        if target <= tax_at_threshold + INVERSION_TOLERANCE {
            return self.invert_brackets(target);
        }

        let base_target = target / (Decimal::ONE + surcharge.rate);
        let income = self.invert_brackets(base_target);

        if income > threshold {
            income
        } else {
            warn!(
                year = self.config.year_label(),
                %target,
                %threshold,
                "target tax falls in the surcharge jump; using first surcharged income"
            );
            threshold + Decimal::ONE
        }
    }

    /// Solves the bracket table for `target`, scanning brackets in ascending
    /// order. Zero-rate brackets cannot produce tax and are skipped.
    fn invert_brackets(
        &self,
        target: Decimal,
    ) -> Decimal {
        for (index, bracket) in self.config.brackets().iter().enumerate() {
            if bracket.rate.is_zero() {
                continue;
            }

            let floor = self.config.floor(index);
            let above_floor = target >= bracket.base_tax - INVERSION_TOLERANCE;
            let below_ceiling = bracket.ceiling.is_none_or(|ceiling| {
                target <= bracket.base_tax + bracket.rate * (ceiling - floor) + INVERSION_TOLERANCE
            });

            if above_floor && below_ceiling {
                return (target - bracket.base_tax)
                    .checked_div(bracket.rate)
                    .and_then(|above| floor.checked_add(above))
                    .unwrap_or(Decimal::MAX);
            }
        }

        Decimal::ZERO
    }
}
