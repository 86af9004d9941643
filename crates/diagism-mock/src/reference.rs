//! The simulated galaxy population used as a statistical prior.

use std::collections::BTreeMap;

use diagism_model::{Feature, FeatureValues, PhysicalParameter};

use crate::input::{InputColumn, parse_number};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ReferenceError {
    #[display("reference table has no column for {feature}")]
    MissingColumn {
        #[error(not(source))]
        feature: Feature,
    },
    #[display("reference table has two columns for {feature}")]
    DuplicateColumn {
        #[error(not(source))]
        feature: Feature,
    },
    #[display("reference row {row}: {found} fields, expected {expected}")]
    FieldCount {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[display("reference row {row}, column '{column}': '{value}' is not a finite number")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
    #[display("target column for {parameter} has {found} values, expected {expected}")]
    TargetLength {
        parameter: PhysicalParameter,
        found: usize,
        expected: usize,
    },
}

/// Read-only table of simulated galaxies.
///
/// Each row holds all nine model features; missing simulated values are NaN.
/// Target columns (the physical parameters of each simulated galaxy) are
/// optional and only needed to re-score pipelines.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    rows: Vec<FeatureValues>,
    targets: BTreeMap<PhysicalParameter, Vec<f64>>,
}

#[derive(Debug, Clone, Copy)]
enum ReferenceColumn {
    Input(InputColumn),
    Target(PhysicalParameter),
    Ignored,
}

impl ReferenceColumn {
    fn from_header(header: &str) -> Self {
        if let Some(column) = InputColumn::from_header(header) {
            return Self::Input(column);
        }
        PhysicalParameter::ALL
            .into_iter()
            .find(|p| p.matches_column(header))
            .map_or(Self::Ignored, Self::Target)
    }
}

impl ReferenceTable {
    #[must_use]
    pub fn new(rows: Vec<FeatureValues>) -> Self {
        Self {
            rows,
            targets: BTreeMap::new(),
        }
    }

    /// Attaches known values of `parameter`, one per row.
    pub fn with_target(
        mut self,
        parameter: PhysicalParameter,
        values: Vec<f64>,
    ) -> Result<Self, ReferenceError> {
        if values.len() != self.rows.len() {
            return Err(ReferenceError::TargetLength {
                parameter,
                found: values.len(),
                expected: self.rows.len(),
            });
        }
        self.targets.insert(parameter, values);
        Ok(self)
    }

    /// Builds a table from a header and string records.
    ///
    /// Every feature must have a column (`z` or `log(1+z)` for the redshift);
    /// columns naming a physical parameter become targets; other columns are ignored.
    pub fn from_records<H, R, F, S>(headers: H, records: R) -> Result<Self, ReferenceError>
    where
        H: IntoIterator,
        H::Item: AsRef<str>,
        R: IntoIterator<Item = F>,
        F: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let headers = headers
            .into_iter()
            .map(|h| h.as_ref().trim().to_owned())
            .collect::<Vec<_>>();
        let columns = headers
            .iter()
            .map(|h| ReferenceColumn::from_header(h))
            .collect::<Vec<_>>();

        for feature in Feature::ALL {
            let count = columns
                .iter()
                .filter(|c| matches!(c, ReferenceColumn::Input(i) if i.feature() == feature))
                .count();
            match count {
                0 => return Err(ReferenceError::MissingColumn { feature }),
                1 => {}
                _ => return Err(ReferenceError::DuplicateColumn { feature }),
            }
        }

        let mut rows = vec![];
        let mut targets = BTreeMap::<PhysicalParameter, Vec<f64>>::new();
        for (i, record) in records.into_iter().enumerate() {
            let row = i + 1;
            let cells = record.into_iter().collect::<Vec<_>>();
            if cells.len() != columns.len() {
                return Err(ReferenceError::FieldCount {
                    row,
                    found: cells.len(),
                    expected: columns.len(),
                });
            }
            let mut values = FeatureValues::missing();
            for ((column, header), cell) in columns.iter().zip(&headers).zip(&cells) {
                let cell = cell.as_ref();
                let invalid = || ReferenceError::InvalidValue {
                    row,
                    column: header.clone(),
                    value: cell.to_owned(),
                };
                match column {
                    ReferenceColumn::Input(input) => {
                        values[input.feature()] = input.parse_cell(cell).ok_or_else(invalid)?;
                    }
                    ReferenceColumn::Target(parameter) => {
                        let value = match cell.trim() {
                            "" => f64::NAN,
                            cell => parse_number(cell).ok_or_else(invalid)?,
                        };
                        targets.entry(*parameter).or_default().push(value);
                    }
                    ReferenceColumn::Ignored => {}
                }
            }
            rows.push(values);
        }

        Ok(Self { rows, targets })
    }

    #[must_use]
    pub fn rows(&self) -> &[FeatureValues] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Known values of `parameter`, aligned with [`Self::rows`].
    #[must_use]
    pub fn target(&self, parameter: PhysicalParameter) -> Option<&[f64]> {
        self.targets.get(&parameter).map(Vec::as_slice)
    }
}
