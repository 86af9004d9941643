//! Result tables: five `#` comment lines, then one CSV row per input row.

use std::io::Write;

use anyhow::Context;
use chrono::{DateTime, Utc};
use diagism_mock::aggregate::PredictionSummary;
use diagism_model::PhysicalParameter;
use serde::Serialize;

/// Provenance written above the result rows.
#[derive(Debug, Clone)]
pub struct ExportHeader<'a> {
    pub executed_at: DateTime<Utc>,
    pub parameter: PhysicalParameter,
    pub score: f64,
    pub variant: &'a str,
}

impl ExportHeader<'_> {
    fn write_to<W>(&self, writer: &mut W) -> std::io::Result<()>
    where
        W: Write,
    {
        writeln!(writer, "# Predictions obtained from DiagISM")?;
        writeln!(
            writer,
            "# Date execution time: {}",
            self.executed_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(
            writer,
            "# Predicted physical parameter: {} [{}]",
            self.parameter.name(),
            self.parameter.unit()
        )?;
        writeln!(
            writer,
            "# The score of the predictions was: {:.3}",
            self.score
        )?;
        writeln!(writer, "# Model: {}", self.variant)?;
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct ExportRecord {
    id: usize,
    per_16th: f64,
    median: f64,
    per_84th: f64,
    mean: f64,
    std: f64,
}

impl ExportRecord {
    fn new(id: usize, summary: &PredictionSummary) -> Self {
        let PredictionSummary {
            per_16th,
            median,
            per_84th,
            mean,
            std,
        } = *summary;
        Self {
            id,
            per_16th,
            median,
            per_84th,
            mean,
            std,
        }
    }
}

/// Writes the header and one row per summary; ids start at 1.
pub fn write_predictions<W>(
    mut writer: W,
    header: &ExportHeader<'_>,
    summaries: &[PredictionSummary],
) -> anyhow::Result<()>
where
    W: Write,
{
    header
        .write_to(&mut writer)
        .context("Failed to write result header")?;
    let mut csv_writer = csv::Writer::from_writer(writer);
    for (i, summary) in summaries.iter().enumerate() {
        csv_writer
            .serialize(ExportRecord::new(i + 1, summary))
            .with_context(|| format!("Failed to write result row {}", i + 1))?;
    }
    csv_writer.flush().context("Failed to flush results")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    #[test]
    fn test_write_predictions() {
        let header = ExportHeader {
            executed_at: Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap(),
            parameter: PhysicalParameter::Sfr,
            score: 0.93456,
            variant: "Eight FIR lines",
        };
        let summaries = [
            PredictionSummary {
                per_16th: 0.5,
                median: 1.0,
                per_84th: 1.5,
                mean: 1.25,
                std: 0.5,
            },
            PredictionSummary {
                per_16th: -1.0,
                median: 0.0,
                per_84th: 2.0,
                mean: 0.0,
                std: 1.0,
            },
        ];
        let mut buffer = vec![];
        write_predictions(&mut buffer, &header, &summaries).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(
            lines,
            [
                "# Predictions obtained from DiagISM",
                "# Date execution time: 2024-03-05 14:07:09 UTC",
                "# Predicted physical parameter: SFR [Msun/yr]",
                "# The score of the predictions was: 0.935",
                "# Model: Eight FIR lines",
                "id,per_16th,median,per_84th,mean,std",
                "1,0.5,1.0,1.5,1.25,0.5",
                "2,-1.0,0.0,2.0,0.0,1.0",
            ]
        );
    }

    #[test]
    fn test_export_can_be_read_back() {
        let header = ExportHeader {
            executed_at: Utc::now(),
            parameter: PhysicalParameter::GasMass,
            score: 0.8,
            variant: "test",
        };
        let summary = PredictionSummary {
            per_16th: 8.5,
            median: 9.0,
            per_84th: 9.5,
            mean: 9.0,
            std: 0.4,
        };
        let mut buffer = vec![];
        write_predictions(&mut buffer, &header, &[summary]).unwrap();

        let mut reader = csv::ReaderBuilder::new()
            .comment(Some(b'#'))
            .from_reader(buffer.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 6);
        let records = reader.records().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(&records[0][2], "9.0");
    }
}
