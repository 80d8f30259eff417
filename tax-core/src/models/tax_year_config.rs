use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;

use super::TaxBracket;

/// Largest difference tolerated between a bracket's stated base tax and the
/// tax accumulated by the brackets below it.
const BASE_TAX_TOLERANCE: Decimal = dec!(0.01);

/// Errors raised when a tax year table breaks one of its structural rules.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("tax year '{0}' has no brackets")]
    NoBrackets(String),

    #[error("first bracket must have a zero rate, got {0}")]
    FirstBracketNotZeroRate(Decimal),

    #[error("first bracket must have a zero base tax, got {0}")]
    FirstBracketBaseTax(Decimal),

    #[error("bracket {index} rate must be between 0 and 1, got {rate}")]
    InvalidRate { index: usize, rate: Decimal },

    #[error("bracket {index} ceiling {ceiling} does not exceed the previous ceiling {previous}")]
    CeilingsNotAscending {
        index: usize,
        ceiling: Decimal,
        previous: Decimal,
    },

    #[error("bracket {0} is unbounded but is not the last bracket")]
    UnboundedNotLast(usize),

    #[error("top bracket must be unbounded, got ceiling {0}")]
    TopBracketBounded(Decimal),

    #[error("bracket {index} base tax is {actual}, expected {expected}")]
    BaseTaxMismatch {
        index: usize,
        expected: Decimal,
        actual: Decimal,
    },

    #[error("surcharge rate must be between 0 and 1, got {0}")]
    InvalidSurchargeRate(Decimal),

    #[error("surcharge threshold must be non-negative, got {0}")]
    InvalidSurchargeThreshold(Decimal),
}

/// Flat extra tax charged on the bracket-derived tax once income passes a
/// threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surcharge {
    /// Income must strictly exceed this value for the surcharge to apply.
    pub threshold_income: Decimal,
    pub rate: Decimal,
}

/// The complete rule set for one tax year.
///
/// Instances can only be built through [`TaxYearConfig::new`], so every
/// config in circulation satisfies the bracket invariants:
///
/// * the first bracket has a zero rate and zero base tax;
/// * ceilings ascend strictly and only the last bracket is unbounded;
/// * each base tax equals the tax accumulated at the previous ceiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxYearConfig {
    year_label: String,
    brackets: Vec<TaxBracket>,
    surcharge: Option<Surcharge>,
}

impl TaxYearConfig {
    /// Validates and builds a tax year configuration.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found while checking the brackets
    /// in ascending order, then the surcharge.
    pub fn new(
        year_label: impl Into<String>,
        brackets: Vec<TaxBracket>,
        surcharge: Option<Surcharge>,
    ) -> Result<Self, ConfigError> {
        let year_label = year_label.into();

        let first = brackets
            .first()
            .ok_or_else(|| ConfigError::NoBrackets(year_label.clone()))?;
        if !first.rate.is_zero() {
            return Err(ConfigError::FirstBracketNotZeroRate(first.rate));
        }
        if !first.base_tax.is_zero() {
            return Err(ConfigError::FirstBracketBaseTax(first.base_tax));
        }

        let last_index = brackets.len() - 1;
        let mut floor = Decimal::ZERO;
        let mut accumulated = Decimal::ZERO;

        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(ConfigError::InvalidRate {
                    index,
                    rate: bracket.rate,
                });
            }

            if (bracket.base_tax - accumulated).abs() > BASE_TAX_TOLERANCE {
                return Err(ConfigError::BaseTaxMismatch {
                    index,
                    expected: accumulated,
                    actual: bracket.base_tax,
                });
            }

            match bracket.ceiling {
                Some(ceiling) if index == last_index => {
                    return Err(ConfigError::TopBracketBounded(ceiling));
                }
                Some(ceiling) => {
                    if ceiling <= floor {
                        return Err(ConfigError::CeilingsNotAscending {
                            index,
                            ceiling,
                            previous: floor,
                        });
                    }
                    accumulated = bracket.base_tax + bracket.rate * (ceiling - floor);
                    floor = ceiling;
                }
                None if index != last_index => {
                    return Err(ConfigError::UnboundedNotLast(index));
                }
                None => {}
            }
        }

        if let Some(surcharge) = &surcharge {
            if surcharge.rate < Decimal::ZERO || surcharge.rate > Decimal::ONE {
                return Err(ConfigError::InvalidSurchargeRate(surcharge.rate));
            }
            if surcharge.threshold_income < Decimal::ZERO {
                return Err(ConfigError::InvalidSurchargeThreshold(
                    surcharge.threshold_income,
                ));
            }
        }

        Ok(Self {
            year_label,
            brackets,
            surcharge,
        })
    }

    /// Builds a config without running the checks. Reserved for the
    /// compiled-in tables, whose validity is covered by tests.
    pub(crate) fn from_trusted(
        year_label: &str,
        brackets: Vec<TaxBracket>,
        surcharge: Option<Surcharge>,
    ) -> Self {
        Self {
            year_label: year_label.to_string(),
            brackets,
            surcharge,
        }
    }

    pub fn year_label(&self) -> &str {
        &self.year_label
    }

    /// Brackets in ascending ceiling order.
    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    pub fn surcharge(&self) -> Option<&Surcharge> {
        self.surcharge.as_ref()
    }

    /// Lower bound of the bracket at `index`: the previous ceiling, or zero.
    pub fn floor(
        &self,
        index: usize,
    ) -> Decimal {
        index
            .checked_sub(1)
            .and_then(|prev| self.brackets.get(prev))
            .and_then(|b| b.ceiling)
            .unwrap_or(Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn valid_brackets() -> Vec<TaxBracket> {
        vec![
            TaxBracket::bounded(dec!(600000), dec!(0), dec!(0)),
            TaxBracket::bounded(dec!(1200000), dec!(0.01), dec!(0)),
            TaxBracket::bounded(dec!(2200000), dec!(0.11), dec!(6000)),
            TaxBracket::unbounded(dec!(0.25), dec!(116000)),
        ]
    }

    #[test]
    fn new_accepts_consistent_table() {
        let config = TaxYearConfig::new("test", valid_brackets(), None).unwrap();

        assert_eq!(config.year_label(), "test");
        assert_eq!(config.brackets().len(), 4);
        assert_eq!(config.surcharge(), None);
    }

    #[test]
    fn new_rejects_empty_table() {
        let result = TaxYearConfig::new("empty", vec![], None);

        assert_eq!(result, Err(ConfigError::NoBrackets("empty".to_string())));
    }

    #[test]
    fn new_rejects_taxed_first_bracket() {
        let mut brackets = valid_brackets();
        brackets[0].rate = dec!(0.05);

        let result = TaxYearConfig::new("test", brackets, None);

        assert_eq!(result, Err(ConfigError::FirstBracketNotZeroRate(dec!(0.05))));
    }

    #[test]
    fn new_rejects_rate_above_one() {
        let mut brackets = valid_brackets();
        brackets[3].rate = dec!(1.5);

        let result = TaxYearConfig::new("test", brackets, None);

        assert_eq!(
            result,
            Err(ConfigError::InvalidRate {
                index: 3,
                rate: dec!(1.5)
            })
        );
    }

    #[test]
    fn new_rejects_descending_ceilings() {
        let brackets = vec![
            TaxBracket::bounded(dec!(600000), dec!(0), dec!(0)),
            TaxBracket::bounded(dec!(500000), dec!(0.01), dec!(0)),
            TaxBracket::unbounded(dec!(0.1), dec!(-1000)),
        ];

        let result = TaxYearConfig::new("test", brackets, None);

        assert_eq!(
            result,
            Err(ConfigError::CeilingsNotAscending {
                index: 1,
                ceiling: dec!(500000),
                previous: dec!(600000),
            })
        );
    }

    #[test]
    fn new_rejects_non_positive_first_ceiling() {
        let brackets = vec![
            TaxBracket::bounded(dec!(-100), dec!(0), dec!(0)),
            TaxBracket::unbounded(dec!(0.1), dec!(0)),
        ];

        let result = TaxYearConfig::new("test", brackets, None);

        assert_eq!(
            result,
            Err(ConfigError::CeilingsNotAscending {
                index: 0,
                ceiling: dec!(-100),
                previous: dec!(0),
            })
        );
    }

    #[test]
    fn new_rejects_unbounded_bracket_in_the_middle() {
        let brackets = vec![
            TaxBracket::bounded(dec!(600000), dec!(0), dec!(0)),
            TaxBracket::unbounded(dec!(0.01), dec!(0)),
            TaxBracket::unbounded(dec!(0.1), dec!(0)),
        ];

        let result = TaxYearConfig::new("test", brackets, None);

        assert_eq!(result, Err(ConfigError::UnboundedNotLast(1)));
    }

    #[test]
    fn new_rejects_bounded_top_bracket() {
        let brackets = vec![
            TaxBracket::bounded(dec!(600000), dec!(0), dec!(0)),
            TaxBracket::bounded(dec!(1200000), dec!(0.01), dec!(0)),
        ];

        let result = TaxYearConfig::new("test", brackets, None);

        assert_eq!(result, Err(ConfigError::TopBracketBounded(dec!(1200000))));
    }

    #[test]
    fn new_rejects_base_tax_gap() {
        let mut brackets = valid_brackets();
        brackets[2].base_tax = dec!(6500);

        let result = TaxYearConfig::new("test", brackets, None);

        assert_eq!(
            result,
            Err(ConfigError::BaseTaxMismatch {
                index: 2,
                expected: dec!(6000),
                actual: dec!(6500),
            })
        );
    }

    #[test]
    fn new_tolerates_sub_cent_base_tax_drift() {
        let mut brackets = valid_brackets();
        brackets[2].base_tax = dec!(6000.004);

        assert!(TaxYearConfig::new("test", brackets, None).is_ok());
    }

    #[test]
    fn new_rejects_invalid_surcharge() {
        let surcharge = Surcharge {
            threshold_income: dec!(10000000),
            rate: dec!(-0.09),
        };

        let result = TaxYearConfig::new("test", valid_brackets(), Some(surcharge));

        assert_eq!(result, Err(ConfigError::InvalidSurchargeRate(dec!(-0.09))));
    }

    #[test]
    fn new_rejects_negative_surcharge_threshold() {
        let surcharge = Surcharge {
            threshold_income: dec!(-1),
            rate: dec!(0.09),
        };

        let result = TaxYearConfig::new("test", valid_brackets(), Some(surcharge));

        assert_eq!(result, Err(ConfigError::InvalidSurchargeThreshold(dec!(-1))));
    }

    #[test]
    fn floor_is_previous_ceiling() {
        let config = TaxYearConfig::new("test", valid_brackets(), None).unwrap();

        assert_eq!(config.floor(0), dec!(0));
        assert_eq!(config.floor(1), dec!(600000));
        assert_eq!(config.floor(3), dec!(2200000));
    }
}
