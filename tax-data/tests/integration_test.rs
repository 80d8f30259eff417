//! Loading the bundled CSV tables and calculating against them.

use std::path::Path;

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use tax_core::{TaxYearRegistry, calculate_tax};
use tax_data::TaxYearLoader;

const TEST_BRACKETS: &str = include_str!("../test-data/brackets.csv");
const TEST_SURCHARGES: &str = include_str!("../test-data/surcharges.csv");

fn load_test_registry() -> TaxYearRegistry {
    let brackets = TaxYearLoader::parse_brackets(TEST_BRACKETS.as_bytes())
        .expect("Failed to parse brackets");
    let surcharges = TaxYearLoader::parse_surcharges(TEST_SURCHARGES.as_bytes())
        .expect("Failed to parse surcharges");
    let configs = TaxYearLoader::build(&brackets, &surcharges).expect("Failed to build configs");

    TaxYearRegistry::new(configs)
}

#[test]
fn test_csv_tables_match_builtin_tables() {
    let registry = load_test_registry();
    let builtin = TaxYearRegistry::builtin();

    for year in ["2025", "2026"] {
        assert_eq!(registry.get(year), builtin.get(year), "year {year}");
    }
}

#[test]
fn test_csv_registry_calculates_surcharged_tax() {
    let registry = load_test_registry();

    assert_eq!(registry.calculate_tax(dec!(12000000), "2026"), Ok(dec!(3685290)));
    assert_eq!(
        registry.calculate_tax(dec!(12000000), "2026"),
        calculate_tax(dec!(12000000), "2026")
    );
}

#[test]
fn test_csv_registry_inverts_monthly_tax() {
    let registry = load_test_registry();

    assert_eq!(registry.calculate_required_income(dec!(500), "2026"), Ok(dec!(1200000)));
}

#[test]
fn test_load_registry_from_files() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data");

    let registry = TaxYearLoader::load_registry(
        &dir.join("brackets.csv"),
        Some(&dir.join("surcharges.csv")),
    )
    .expect("Failed to load registry");

    assert_eq!(registry.year_labels(), vec!["2025", "2026"]);
    assert!(registry.get("2026").unwrap().surcharge().is_some());
}

#[test]
fn test_load_registry_without_surcharges() {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data");

    let registry =
        TaxYearLoader::load_registry(&dir.join("brackets.csv"), None).expect("Failed to load");

    // same brackets, no 9% surcharge
    assert_eq!(registry.calculate_tax(dec!(12000000), "2026"), Ok(dec!(3381000)));
}
