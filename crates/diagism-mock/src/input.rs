//! Reconciliation of user-supplied tables with the model's feature columns.
//!
//! Input tables may carry any subset of the recognized columns, in any order:
//!
//! - the eight `Lum_*` line luminosities (`log10(Lsun)`)
//! - `z`, a raw redshift, converted to `log10(1 + z)`
//! - `log(1+z)`, an already converted redshift
//!
//! Columns that are not supplied, and empty cells, become missing values.
//! Anything else in the header is a schema error.

use diagism_model::{Feature, FeatureValues, feature::log_one_plus_z};

/// Minimum number of supplied columns for a request to be served.
pub const MIN_INPUT_COLUMNS: usize = 2;
/// Number of supplied columns below which a request is flagged.
pub const RECOMMENDED_INPUT_COLUMNS: usize = 3;

/// Header name of the raw redshift column.
pub const RAW_REDSHIFT_COLUMN: &str = "z";

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum InputError {
    #[display("column '{name}' is not recognized; expected one of z, log(1+z) or Lum_* line names")]
    UnknownColumn {
        #[error(not(source))]
        name: String,
    },
    #[display("column for {feature} appears more than once")]
    DuplicateColumn {
        #[error(not(source))]
        feature: Feature,
    },
    #[display("row {row}: {found} fields, expected {expected}")]
    FieldCount {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[display("row {row}, column '{column}': '{value}' is not a finite number")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
    #[display("input has no rows")]
    NoRows,
    #[display(
        "{supplied} input column(s) are not enough to give reliable information (need at least {})",
        MIN_INPUT_COLUMNS
    )]
    InsufficientInput {
        #[error(not(source))]
        supplied: usize,
    },
}

/// Non-fatal remarks about the supplied columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum InputNotice {
    #[display("the redshift dimension is not used")]
    RedshiftUnused,
    #[display(
        "only {supplied} input columns supplied; two emission lines and the redshift are recommended"
    )]
    FewerThanRecommended { supplied: usize },
}

/// A recognized input header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputColumn {
    /// A model feature, taken as is.
    Feature(Feature),
    /// A raw redshift, stored as [`Feature::LogOnePlusZ`].
    RawRedshift,
}

impl InputColumn {
    /// Recognizes a header (surrounding whitespace ignored).
    ///
    /// # Examples
    ///
    /// ```
    /// use diagism_mock::input::InputColumn;
    /// use diagism_model::Feature;
    ///
    /// assert_eq!(InputColumn::from_header(" z"), Some(InputColumn::RawRedshift));
    /// assert_eq!(
    ///     InputColumn::from_header("Lum_OI_63"),
    ///     Some(InputColumn::Feature(Feature::OI63))
    /// );
    /// assert_eq!(InputColumn::from_header("Lum_CO_10"), None);
    /// ```
    #[must_use]
    pub fn from_header(header: &str) -> Option<Self> {
        let header = header.trim();
        if header == RAW_REDSHIFT_COLUMN {
            return Some(Self::RawRedshift);
        }
        Feature::from_column_name(header).map(Self::Feature)
    }

    /// The model feature this column fills.
    #[must_use]
    pub const fn feature(self) -> Feature {
        match self {
            Self::Feature(feature) => feature,
            Self::RawRedshift => Feature::LogOnePlusZ,
        }
    }

    fn convert(self, value: f64) -> f64 {
        match self {
            Self::Feature(_) => value,
            Self::RawRedshift => log_one_plus_z(value),
        }
    }

    /// Parses one cell of this column into its feature value.
    ///
    /// Empty cells are missing (NaN). Anything else must be a number whose
    /// converted value is finite, so a raw redshift must exceed -1.
    pub(crate) fn parse_cell(self, cell: &str) -> Option<f64> {
        let cell = cell.trim();
        if cell.is_empty() {
            return Some(f64::NAN);
        }
        parse_number(cell)
            .map(|value| self.convert(value))
            .filter(|value| value.is_finite())
    }
}

/// Parses a non-empty cell that must hold a finite number.
pub(crate) fn parse_number(cell: &str) -> Option<f64> {
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// User input reconciled to model feature order.
#[derive(Debug, Clone)]
pub struct InputTable {
    supplied: Vec<Feature>,
    rows: Vec<FeatureValues>,
}

impl InputTable {
    /// Builds a table from a header and string records.
    ///
    /// Rows are numbered from 1 in error messages.
    ///
    /// # Examples
    ///
    /// ```
    /// use diagism_mock::input::InputTable;
    /// use diagism_model::Feature;
    ///
    /// let table = InputTable::from_records(
    ///     ["z", "Lum_OIII_88", "Lum_CII_158"],
    ///     [["0.47", "", "6.0"], ["0", "4.0", "4.0"]],
    /// )?;
    /// assert_eq!(table.rows().len(), 2);
    /// assert!(table.rows()[0][Feature::OIII88].is_nan());
    /// assert_eq!(table.rows()[1][Feature::LogOnePlusZ], 0.0);
    /// # Ok::<(), diagism_mock::input::InputError>(())
    /// ```
    pub fn from_records<H, R, F, S>(headers: H, records: R) -> Result<Self, InputError>
    where
        H: IntoIterator,
        H::Item: AsRef<str>,
        R: IntoIterator<Item = F>,
        F: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let columns = headers
            .into_iter()
            .map(|header| {
                InputColumn::from_header(header.as_ref()).ok_or_else(|| {
                    InputError::UnknownColumn {
                        name: header.as_ref().trim().to_owned(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut supplied = Vec::with_capacity(columns.len());
        for column in &columns {
            let feature = column.feature();
            if supplied.contains(&feature) {
                return Err(InputError::DuplicateColumn { feature });
            }
            supplied.push(feature);
        }
        supplied.sort();

        let rows = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| Self::parse_record(&columns, i + 1, record))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { supplied, rows })
    }

    fn parse_record<F, S>(
        columns: &[InputColumn],
        row: usize,
        record: F,
    ) -> Result<FeatureValues, InputError>
    where
        F: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let cells = record.into_iter().collect::<Vec<_>>();
        if cells.len() != columns.len() {
            return Err(InputError::FieldCount {
                row,
                found: cells.len(),
                expected: columns.len(),
            });
        }
        let mut values = FeatureValues::missing();
        for (column, cell) in std::iter::zip(columns, &cells) {
            let cell = cell.as_ref();
            values[column.feature()] =
                column
                    .parse_cell(cell)
                    .ok_or_else(|| InputError::InvalidValue {
                        row,
                        column: column.feature().column_name().to_owned(),
                        value: cell.to_owned(),
                    })?;
        }
        Ok(values)
    }

    /// Features present as columns, in model order.
    #[must_use]
    pub fn supplied(&self) -> &[Feature] {
        &self.supplied
    }

    #[must_use]
    pub fn rows(&self) -> &[FeatureValues] {
        &self.rows
    }

    /// Checks that the request can be served and collects non-fatal notices.
    ///
    /// # Examples
    ///
    /// ```
    /// use diagism_mock::input::{InputError, InputTable};
    ///
    /// let table = InputTable::from_records(["Lum_CII_158"], [["6.0"]])?;
    /// assert_eq!(
    ///     table.validate().unwrap_err(),
    ///     InputError::InsufficientInput { supplied: 1 }
    /// );
    /// # Ok::<(), InputError>(())
    /// ```
    pub fn validate(&self) -> Result<Vec<InputNotice>, InputError> {
        let supplied = self.supplied.len();
        if supplied < MIN_INPUT_COLUMNS {
            return Err(InputError::InsufficientInput { supplied });
        }
        if self.rows.is_empty() {
            return Err(InputError::NoRows);
        }
        let mut notices = vec![];
        if !self.supplied.contains(&Feature::LogOnePlusZ) {
            notices.push(InputNotice::RedshiftUnused);
        }
        if supplied < RECOMMENDED_INPUT_COLUMNS {
            notices.push(InputNotice::FewerThanRecommended { supplied });
        }
        Ok(notices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_RECORDS: [[&str; 0]; 0] = [];

    #[test]
    fn test_columns_reordered_to_model_order() {
        let table = InputTable::from_records(
            ["Lum_CII_158", "z", "Lum_OIII_88", "Lum_OI_145"],
            [["6.0", "0.47", "", "5.0"]],
        )
        .unwrap();
        assert_eq!(
            table.supplied(),
            &[
                Feature::OIII88,
                Feature::OI145,
                Feature::CII158,
                Feature::LogOnePlusZ
            ]
        );
        let row = table.rows()[0];
        assert_eq!(row[Feature::CII158], 6.0);
        assert_eq!(row[Feature::OI145], 5.0);
        assert!(row[Feature::OIII88].is_nan());
        assert!(row[Feature::NII205].is_nan());
        assert!((row[Feature::LogOnePlusZ] - 1.47_f64.log10()).abs() < 1e-12);
    }

    #[test]
    fn test_transformed_redshift_taken_as_is() {
        let table =
            InputTable::from_records(["log(1+z)", "Lum_CII_158"], [["0.167", "6.0"]]).unwrap();
        assert_eq!(table.rows()[0][Feature::LogOnePlusZ], 0.167);
    }

    #[test]
    fn test_unknown_column_is_schema_error() {
        let err = InputTable::from_records(["z", "Lum_CO_10"], NO_RECORDS).unwrap_err();
        assert_eq!(
            err,
            InputError::UnknownColumn {
                name: "Lum_CO_10".to_owned()
            }
        );
    }

    #[test]
    fn test_both_redshift_forms_are_duplicates() {
        let err = InputTable::from_records(["z", "log(1+z)"], NO_RECORDS).unwrap_err();
        assert_eq!(
            err,
            InputError::DuplicateColumn {
                feature: Feature::LogOnePlusZ
            }
        );
    }

    #[test]
    fn test_invalid_cells() {
        let err = InputTable::from_records(["z", "Lum_CII_158"], [["0.1", "bright"]]).unwrap_err();
        assert_eq!(
            err,
            InputError::InvalidValue {
                row: 1,
                column: "Lum_CII_158".to_owned(),
                value: "bright".to_owned()
            }
        );
        let err = InputTable::from_records(["z", "Lum_CII_158"], [["0.1", "inf"]]).unwrap_err();
        assert!(matches!(err, InputError::InvalidValue { .. }));
        let err = InputTable::from_records(["z", "Lum_CII_158"], [vec!["0.1"]]).unwrap_err();
        assert_eq!(
            err,
            InputError::FieldCount {
                row: 1,
                found: 1,
                expected: 2
            }
        );
    }

    #[test]
    fn test_redshift_at_or_below_minus_one_rejected() {
        for z in ["-1", "-2"] {
            let err = InputTable::from_records(
                ["z", "Lum_OIII_88", "Lum_CII_158"],
                [[z, "6", "6"]],
            )
            .unwrap_err();
            assert_eq!(
                err,
                InputError::InvalidValue {
                    row: 1,
                    column: "log(1+z)".to_owned(),
                    value: z.to_owned()
                }
            );
        }
        let table =
            InputTable::from_records(["z", "Lum_CII_158"], [["-0.5", "6"], ["", "6"]]).unwrap();
        assert!((table.rows()[0][Feature::LogOnePlusZ] - 0.5_f64.log10()).abs() < 1e-12);
        assert!(table.rows()[1][Feature::LogOnePlusZ].is_nan());
    }

    #[test]
    fn test_validate_notices() {
        let table = InputTable::from_records(["Lum_OIII_88", "Lum_CII_158"], [["6", "6"]]).unwrap();
        assert_eq!(
            table.validate().unwrap(),
            vec![
                InputNotice::RedshiftUnused,
                InputNotice::FewerThanRecommended { supplied: 2 }
            ]
        );

        let table = InputTable::from_records(
            ["z", "Lum_OIII_88", "Lum_CII_158"],
            [["0.47", "6", "6"]],
        )
        .unwrap();
        assert!(table.validate().unwrap().is_empty());
    }

    #[test]
    fn test_validate_rejects_empty_requests() {
        let table = InputTable::from_records(["z", "Lum_CII_158"], NO_RECORDS).unwrap();
        assert_eq!(table.validate().unwrap_err(), InputError::NoRows);

        let table = InputTable::from_records(["z"], [["0.1"]]).unwrap();
        assert_eq!(
            table.validate().unwrap_err(),
            InputError::InsufficientInput { supplied: 1 }
        );
    }
}
