//! Behaviour of the built-in tables through the public API.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tax_core::{
    TaxBracket, TaxError, TaxYearConfig, TaxYearRegistry, calculate_required_income,
    calculate_tax,
};

const YEARS: [&str; 2] = ["2025", "2026"];

// =========================================================================
// Concrete scenarios
// =========================================================================

#[test]
fn income_in_zero_rate_bracket_owes_nothing() {
    assert_eq!(calculate_tax(dec!(500000), "2026"), Ok(dec!(0)));
}

#[test]
fn tax_at_second_ceiling() {
    assert_eq!(calculate_tax(dec!(1200000), "2026"), Ok(dec!(6000)));
}

#[test]
fn tax_at_third_ceiling() {
    assert_eq!(calculate_tax(dec!(2200000), "2026"), Ok(dec!(116000)));
}

#[test]
fn surcharge_applies_above_threshold() {
    assert_eq!(calculate_tax(dec!(12000000), "2026"), Ok(dec!(3685290)));
}

#[test]
fn unknown_year_is_rejected() {
    assert_eq!(
        calculate_tax(dec!(100), "unknown-year"),
        Err(TaxError::UnknownTaxYear("unknown-year".to_string()))
    );
    assert_eq!(
        calculate_required_income(dec!(100), "unknown-year"),
        Err(TaxError::UnknownTaxYear("unknown-year".to_string()))
    );
}

#[test]
fn zero_monthly_tax_needs_no_income() {
    assert_eq!(calculate_required_income(dec!(0), "2026"), Ok(dec!(0)));
}

#[test]
fn oversized_monthly_tax_saturates_instead_of_overflowing() {
    for monthly in [dec!(7000000000000000000000000000), dec!(3000000000000000000000000000)] {
        assert_eq!(calculate_required_income(monthly, "2026"), Ok(Decimal::MAX));
    }
}

#[test]
fn custom_registry_serves_its_own_years() {
    let config = TaxYearConfig::new(
        "flat",
        vec![
            TaxBracket::bounded(dec!(10000), dec!(0), dec!(0)),
            TaxBracket::unbounded(dec!(0.2), dec!(0)),
        ],
        None,
    )
    .unwrap();
    let registry = TaxYearRegistry::new([config]);

    assert_eq!(registry.calculate_tax(dec!(20000), "flat"), Ok(dec!(2000)));
    assert_eq!(registry.calculate_required_income(dec!(100), "flat"), Ok(dec!(16000)));
    assert!(registry.calculate_tax(dec!(20000), "2026").is_err());
}

// =========================================================================
// Properties
// =========================================================================

fn income() -> impl Strategy<Value = Decimal> {
    (0u64..50_000_000u64, 0u32..100u32).prop_map(|(whole, cents)| {
        Decimal::from(whole) + Decimal::new(i64::from(cents), 2)
    })
}

proptest! {
    #[test]
    fn tax_is_never_negative(income in income()) {
        for year in YEARS {
            prop_assert!(calculate_tax(income, year).unwrap() >= Decimal::ZERO);
        }
    }

    #[test]
    fn tax_is_monotonic_in_income(a in income(), b in income()) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };

        for year in YEARS {
            prop_assert!(calculate_tax(low, year).unwrap() <= calculate_tax(high, year).unwrap());
        }
    }

    #[test]
    fn required_income_round_trips_without_surcharge(whole in 600_001u64..60_000_000u64) {
        let income = Decimal::from(whole);
        let monthly = calculate_tax(income, "2025").unwrap() / dec!(12);
        let recovered = calculate_required_income(monthly, "2025").unwrap();

        prop_assert!(
            (recovered - income).abs() <= Decimal::ONE,
            "income {} recovered as {}", income, recovered
        );
    }

    #[test]
    fn required_income_is_within_one_unit_of_requested_tax(monthly in 1u64..1_000_000u64) {
        let monthly = Decimal::from(monthly);

        for year in YEARS {
            let income = calculate_required_income(monthly, year).unwrap();
            let one_unit_more = calculate_tax(income + Decimal::ONE, year).unwrap();

            prop_assert!(
                one_unit_more >= monthly * dec!(12),
                "{year}: {income} -> {one_unit_more}"
            );
        }
    }
}

#[test]
fn tax_is_continuous_at_every_ceiling() {
    let registry = TaxYearRegistry::builtin();

    for year in YEARS {
        let config = registry.get(year).unwrap();
        let engine = registry.engine(year).unwrap();

        for (index, bracket) in config.brackets().iter().enumerate() {
            let Some(ceiling) = bracket.ceiling else {
                continue;
            };
            if config.surcharge().is_some_and(|s| s.threshold_income == ceiling) {
                continue;
            }

            let next = &config.brackets()[index + 1];

            assert_eq!(engine.tax(ceiling), next.base_tax, "{year} ceiling {ceiling}");
            // a cent above the ceiling moves only by the next bracket's rate
            let step = engine.tax(ceiling + dec!(0.01)) - engine.tax(ceiling);
            assert!(step <= dec!(0.01), "{year} ceiling {ceiling} jumps by {step}");
        }
    }
}
