mod tax_bracket;
mod tax_year_config;

pub use tax_bracket::TaxBracket;
pub use tax_year_config::{ConfigError, Surcharge, TaxYearConfig};
