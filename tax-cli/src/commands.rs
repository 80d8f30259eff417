//! Command implementations behind the `tax-calc` binary.
//!
//! Each command writes its report to the supplied writer so that tests can
//! capture it.

use std::io::Write;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tax_core::TaxYearRegistry;

use crate::utils::{format_money, format_rate};

/// Prints the forward calculation for `income`, bracket by bracket.
pub fn tax(
    registry: &TaxYearRegistry,
    year: &str,
    income: Decimal,
    out: &mut impl Write,
) -> Result<()> {
    let breakdown = registry.calculate_tax_breakdown(income, year)?;
    let monthly = registry.calculate_monthly_tax(income, year)?;

    writeln!(out, "Tax year:        {year}")?;
    writeln!(out, "Yearly income:   {}", format_money(breakdown.income))?;
    writeln!(
        out,
        "Bracket:         #{} from {} at {}",
        breakdown.bracket_index + 1,
        format_money(breakdown.bracket_floor),
        format_rate(breakdown.marginal_rate)
    )?;
    writeln!(out, "Base tax:        {}", format_money(breakdown.base_tax))?;
    writeln!(out, "Bracket tax:     {}", format_money(breakdown.bracket_tax))?;
    if !breakdown.surcharge.is_zero() {
        writeln!(out, "Surcharge:       {}", format_money(breakdown.surcharge))?;
    }
    writeln!(out, "Yearly tax:      {}", format_money(breakdown.total_tax))?;
    writeln!(out, "Monthly tax:     {}", format_money(monthly))?;
    writeln!(out, "Effective rate:  {}", format_rate(breakdown.effective_rate))?;

    Ok(())
}

/// Prints the minimum yearly income producing `monthly_tax`.
pub fn income(
    registry: &TaxYearRegistry,
    year: &str,
    monthly_tax: Decimal,
    out: &mut impl Write,
) -> Result<()> {
    let required = registry.calculate_required_income(monthly_tax, year)?;

    writeln!(out, "Tax year:        {year}")?;
    writeln!(out, "Monthly tax:     {}", format_money(monthly_tax))?;
    writeln!(out, "Yearly income:   {}", format_money(required))?;
    writeln!(out, "Monthly income:  {}", format_money(required / Decimal::from(12)))?;

    Ok(())
}

/// Lists every configured year label, one per line.
pub fn years(
    registry: &TaxYearRegistry,
    out: &mut impl Write,
) -> Result<()> {
    for label in registry.year_labels() {
        writeln!(out, "{label}")?;
    }
    Ok(())
}

/// Prints the bracket table and surcharge for `year`.
pub fn brackets(
    registry: &TaxYearRegistry,
    year: &str,
    out: &mut impl Write,
) -> Result<()> {
    let config = registry
        .get(year)
        .with_context(|| format!("cannot show brackets for '{year}'"))?;

    writeln!(out, "{:>18}  {:>18}  {:>8}  {:>16}", "from", "to", "rate", "base tax")?;
    for (index, bracket) in config.brackets().iter().enumerate() {
        let ceiling = bracket
            .ceiling
            .map_or_else(|| "and above".to_string(), format_money);
        writeln!(
            out,
            "{:>18}  {:>18}  {:>8}  {:>16}",
            format_money(config.floor(index)),
            ceiling,
            format_rate(bracket.rate),
            format_money(bracket.base_tax)
        )?;
    }

    if let Some(surcharge) = config.surcharge() {
        writeln!(
            out,
            "Surcharge of {} on tax for income above {}",
            format_rate(surcharge.rate),
            format_money(surcharge.threshold_income)
        )?;
    }

    Ok(())
}
