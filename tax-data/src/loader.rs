use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{ConfigError, Surcharge, TaxBracket, TaxYearConfig, TaxYearRegistry};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading tax year tables.
#[derive(Debug, Error)]
pub enum TaxYearLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot open '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid table for tax year '{year_label}': {source}")]
    Config {
        year_label: String,
        #[source]
        source: ConfigError,
    },

    #[error("surcharge given for tax year '{0}' which has no brackets")]
    OrphanSurcharge(String),

    #[error("more than one surcharge given for tax year '{0}'")]
    DuplicateSurcharge(String),
}

impl From<csv::Error> for TaxYearLoaderError {
    fn from(err: csv::Error) -> Self {
        TaxYearLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of the brackets CSV file.
///
/// - `year_label`: The tax year the row belongs to (e.g., 2026)
/// - `ceiling`: Upper bound of the bracket (empty for unlimited)
/// - `rate`: The marginal tax rate as a decimal (e.g., 0.11 for 11%)
/// - `base_tax`: Tax accumulated at the bracket's floor
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub year_label: String,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub ceiling: Option<Decimal>,
    pub rate: Decimal,
    pub base_tax: Decimal,
}

/// A single row of the surcharges CSV file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SurchargeRecord {
    pub year_label: String,
    pub threshold_income: Decimal,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(reader)
}

fn open(path: &Path) -> Result<File, TaxYearLoaderError> {
    File::open(path).map_err(|source| TaxYearLoaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loader for tax year tables stored as CSV.
///
/// Brackets and surcharges live in two files. Bracket rows for one year must
/// appear in ascending ceiling order; years may be interleaved.
pub struct TaxYearLoader;

impl TaxYearLoader {
    /// Parse bracket records from a CSV reader, in file order.
    pub fn parse_brackets<R: Read>(reader: R) -> Result<Vec<BracketRecord>, TaxYearLoaderError> {
        let records = csv_reader(reader)
            .deserialize()
            .collect::<Result<Vec<BracketRecord>, _>>()?;
        debug!(records = records.len(), "parsed bracket rows");
        Ok(records)
    }

    /// Parse surcharge records from a CSV reader, in file order.
    pub fn parse_surcharges<R: Read>(
        reader: R
    ) -> Result<Vec<SurchargeRecord>, TaxYearLoaderError> {
        let records = csv_reader(reader)
            .deserialize()
            .collect::<Result<Vec<SurchargeRecord>, _>>()?;
        debug!(records = records.len(), "parsed surcharge rows");
        Ok(records)
    }

    /// Group records by year label and validate each year.
    ///
    /// Years are returned in order of first appearance in `brackets`.
    pub fn build(
        brackets: &[BracketRecord],
        surcharges: &[SurchargeRecord],
    ) -> Result<Vec<TaxYearConfig>, TaxYearLoaderError> {
        let mut order: Vec<&str> = Vec::new();
        let mut groups: HashMap<&str, Vec<TaxBracket>> = HashMap::new();

        for record in brackets {
            let label = record.year_label.as_str();
            groups
                .entry(label)
                .or_insert_with(|| {
                    order.push(label);
                    Vec::new()
                })
                .push(TaxBracket {
                    ceiling: record.ceiling,
                    rate: record.rate,
                    base_tax: record.base_tax,
                });
        }

        let mut surcharge_by_year: HashMap<&str, Surcharge> = HashMap::new();
        for record in surcharges {
            let label = record.year_label.as_str();
            if !groups.contains_key(label) {
                return Err(TaxYearLoaderError::OrphanSurcharge(label.to_string()));
            }
            let surcharge = Surcharge {
                threshold_income: record.threshold_income,
                rate: record.rate,
            };
            if surcharge_by_year.insert(label, surcharge).is_some() {
                return Err(TaxYearLoaderError::DuplicateSurcharge(label.to_string()));
            }
        }

        order
            .into_iter()
            .map(|label| {
                let year_brackets = groups.remove(label).unwrap_or_default();
                let surcharge = surcharge_by_year.remove(label);
                TaxYearConfig::new(label, year_brackets, surcharge).map_err(|source| {
                    TaxYearLoaderError::Config {
                        year_label: label.to_string(),
                        source,
                    }
                })
            })
            .collect()
    }

    /// Read both files from disk and build a registry from them.
    ///
    /// `surcharges_path` is optional; without it no year carries a surcharge.
    pub fn load_registry(
        brackets_path: &Path,
        surcharges_path: Option<&Path>,
    ) -> Result<TaxYearRegistry, TaxYearLoaderError> {
        let brackets = Self::parse_brackets(open(brackets_path)?)?;
        let surcharges = match surcharges_path {
            Some(path) => Self::parse_surcharges(open(path)?)?,
            None => Vec::new(),
        };

        let configs = Self::build(&brackets, &surcharges)?;
        info!(
            path = %brackets_path.display(),
            years = configs.len(),
            "loaded tax year tables"
        );

        Ok(TaxYearRegistry::new(configs))
    }
}
