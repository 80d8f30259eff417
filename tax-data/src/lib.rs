//! CSV-backed tax year tables.

mod loader;

pub use loader::{BracketRecord, SurchargeRecord, TaxYearLoader, TaxYearLoaderError};
