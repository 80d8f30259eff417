//! Tax year tables compiled into the binary.
//!
//! | Year | Ceilings (rate)                                                         | Surcharge        |
//! |------|-------------------------------------------------------------------------|------------------|
//! | 2025 | 600k (0%), 1.2M (1%), 2.2M (10%), 3.6M (20%), 4.1M (25%), above (30%) | none             |
//! | 2026 | 600k (0%), 1.2M (1%), 2.2M (11%), 3.6M (25%), 4.1M (30%), above (35%) | 9% above 10M     |

use rust_decimal_macros::dec;

use crate::{Surcharge, TaxBracket, TaxYearConfig};

pub(crate) fn year_2025() -> TaxYearConfig {
    TaxYearConfig::from_trusted(
        "2025",
        vec![
            TaxBracket::bounded(dec!(600000), dec!(0), dec!(0)),
            TaxBracket::bounded(dec!(1200000), dec!(0.01), dec!(0)),
            TaxBracket::bounded(dec!(2200000), dec!(0.10), dec!(6000)),
            TaxBracket::bounded(dec!(3600000), dec!(0.20), dec!(106000)),
            TaxBracket::bounded(dec!(4100000), dec!(0.25), dec!(386000)),
            TaxBracket::unbounded(dec!(0.30), dec!(511000)),
        ],
        None,
    )
}

pub(crate) fn year_2026() -> TaxYearConfig {
    TaxYearConfig::from_trusted(
        "2026",
        vec![
            TaxBracket::bounded(dec!(600000), dec!(0), dec!(0)),
            TaxBracket::bounded(dec!(1200000), dec!(0.01), dec!(0)),
            TaxBracket::bounded(dec!(2200000), dec!(0.11), dec!(6000)),
            TaxBracket::bounded(dec!(3600000), dec!(0.25), dec!(116000)),
            TaxBracket::bounded(dec!(4100000), dec!(0.30), dec!(466000)),
            TaxBracket::unbounded(dec!(0.35), dec!(616000)),
        ],
        Some(Surcharge {
            threshold_income: dec!(10000000),
            rate: dec!(0.09),
        }),
    )
}

/// Every built-in year, oldest first.
pub(crate) fn all() -> Vec<TaxYearConfig> {
    vec![year_2025(), year_2026()]
}
