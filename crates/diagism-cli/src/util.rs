use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock},
    path::{Path, PathBuf},
};

use anyhow::Context;
use csv::StringRecord;
use diagism_mock::{input::InputTable, reference::ReferenceTable};
use diagism_model::bundle::{HyperparameterTable, ModelBundle};

/// Column of the hyperparameter table naming the parameter of each pipeline.
const HYPERPARAMETER_COLUMN: &str = "Parameter";

#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl Output {
    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Header and records of a CSV file, fields trimmed, `#` lines skipped.
#[derive(Debug)]
pub struct CsvTable {
    pub headers: StringRecord,
    pub records: Vec<StringRecord>,
}

pub fn read_csv_file<P>(file_kind: &str, path: P) -> anyhow::Result<CsvTable>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;
    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read {} header: {}", file_kind, path.display()))?
        .clone();
    let records = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to parse {} CSV file: {}", file_kind, path.display()))?;
    Ok(CsvTable { headers, records })
}

pub fn read_model_file<P>(path: P) -> anyhow::Result<ModelBundle>
where
    P: AsRef<Path>,
{
    read_json_file("model", path)
}

pub fn read_reference_file<P>(path: P) -> anyhow::Result<ReferenceTable>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let CsvTable { headers, records } = read_csv_file("reference", path)?;
    ReferenceTable::from_records(&headers, &records)
        .with_context(|| format!("Invalid reference table: {}", path.display()))
}

pub fn read_input_file<P>(path: P) -> anyhow::Result<InputTable>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let CsvTable { headers, records } = read_csv_file("input", path)?;
    InputTable::from_records(&headers, &records)
        .with_context(|| format!("Invalid input table: {}", path.display()))
}

/// Reads the hyperparameter table; row `i` describes pipeline `i`.
pub fn read_hyperparameter_file<P>(path: P) -> anyhow::Result<HyperparameterTable>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let CsvTable { headers, records } = read_csv_file("hyperparameter", path)?;
    let column = headers
        .iter()
        .position(|h| h == HYPERPARAMETER_COLUMN)
        .with_context(|| {
            format!(
                "Hyperparameter table has no '{HYPERPARAMETER_COLUMN}' column: {}",
                path.display()
            )
        })?;
    let parameters = records
        .iter()
        .map(|record| record.get(column).unwrap_or_default().to_owned())
        .collect();
    Ok(HyperparameterTable::new(parameters))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use diagism_model::{Feature, PhysicalParameter};

    use super::*;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("diagism-{}-{name}", std::process::id()));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_read_hyperparameter_file() {
        let path = write_temp(
            "hyperparameters.csv",
            "Parameter,hidden_layer_sizes\nSFR,(32)\n M$_{\\mathrm{gas}}$ ,(64)\n",
        );
        let table = read_hyperparameter_file(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.index_of(PhysicalParameter::GasMass), Ok(1));
    }

    #[test]
    fn test_read_input_file_skips_comments() {
        let path = write_temp(
            "input.csv",
            "# galaxies observed with ALMA\nz, Lum_OIII_88, Lum_CII_158\n0.47, 6.0, 6.0\n0.3, , 5.5\n",
        );
        let input = read_input_file(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(input.rows().len(), 2);
        assert!(input.rows()[1][Feature::OIII88].is_nan());
        assert_eq!(input.rows()[1][Feature::CII158], 5.5);
    }

    #[test]
    fn test_missing_hyperparameter_column() {
        let path = write_temp("bad-hyperparameters.csv", "name\nSFR\n");
        let err = read_hyperparameter_file(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(err.to_string().contains("no 'Parameter' column"));
    }
}
