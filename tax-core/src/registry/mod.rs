//! Lookup of tax year configurations by label.

pub(crate) mod builtin;

use std::collections::HashMap;
use std::sync::OnceLock;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info};

use crate::TaxYearConfig;
use crate::calculations::{ProgressiveTax, TaxBreakdown};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxError {
    #[error("unknown tax year '{0}'")]
    UnknownTaxYear(String),
}

static BUILTIN: OnceLock<TaxYearRegistry> = OnceLock::new();

/// Immutable set of [`TaxYearConfig`]s keyed by year label.
///
/// Typical lifetime:
/// 1. Build once at startup, either from [`TaxYearRegistry::builtin`] or
///    from configs loaded elsewhere via [`TaxYearRegistry::new`].
/// 2. Share by reference; every method takes `&self`.
#[derive(Debug, Clone, Default)]
pub struct TaxYearRegistry {
    years: HashMap<String, TaxYearConfig>,
}

impl TaxYearRegistry {
    /// Build a registry from `configs`.
    ///
    /// A config whose label is already present replaces the earlier one.
    pub fn new(configs: impl IntoIterator<Item = TaxYearConfig>) -> Self {
        let years: HashMap<_, _> = configs
            .into_iter()
            .map(|config| (config.year_label().to_string(), config))
            .collect();

        info!(years = years.len(), "tax year registry built");

        Self { years }
    }

    /// The process-wide registry of compiled-in tables, built on first use.
    pub fn builtin() -> &'static TaxYearRegistry {
        BUILTIN.get_or_init(|| Self::new(builtin::all()))
    }

    /// Labels of every registered year, sorted alphabetically.
    pub fn year_labels(&self) -> Vec<&str> {
        let mut labels: Vec<_> = self.years.keys().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }

    /// # Errors
    /// * [`TaxError::UnknownTaxYear`] when no config carries `year_label`.
    pub fn get(
        &self,
        year_label: &str,
    ) -> Result<&TaxYearConfig, TaxError> {
        self.years.get(year_label).ok_or_else(|| {
            debug!(
                year = year_label,
                available = ?self.year_labels(),
                "tax year lookup failed"
            );
            TaxError::UnknownTaxYear(year_label.to_string())
        })
    }

    /// Calculator bound to the config for `year_label`.
    pub fn engine(
        &self,
        year_label: &str,
    ) -> Result<ProgressiveTax<'_>, TaxError> {
        self.get(year_label).map(ProgressiveTax::new)
    }

    pub fn calculate_tax(
        &self,
        yearly_income: Decimal,
        year_label: &str,
    ) -> Result<Decimal, TaxError> {
        let tax = self.engine(year_label)?.tax(yearly_income);
        debug!(year = year_label, %yearly_income, %tax, "calculated tax");
        Ok(tax)
    }

    pub fn calculate_tax_breakdown(
        &self,
        yearly_income: Decimal,
        year_label: &str,
    ) -> Result<TaxBreakdown, TaxError> {
        Ok(self.engine(year_label)?.breakdown(yearly_income))
    }

    pub fn calculate_monthly_tax(
        &self,
        yearly_income: Decimal,
        year_label: &str,
    ) -> Result<Decimal, TaxError> {
        Ok(self.engine(year_label)?.monthly_tax(yearly_income))
    }

    /// The year is resolved before the amount is looked at, so an unknown
    /// label fails even for a zero `monthly_tax`.
    pub fn calculate_required_income(
        &self,
        monthly_tax: Decimal,
        year_label: &str,
    ) -> Result<Decimal, TaxError> {
        Ok(self.engine(year_label)?.required_income(monthly_tax))
    }
}
