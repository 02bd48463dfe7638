use crate::error::Result;
use crate::models::StationReport;
use clap::ValueEnum;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// `{name=min/mean/max, ...}`
    #[default]
    Text,
    /// JSON object keyed by station name
    Json,
}

pub struct ReportWriter {
    format: OutputFormat,
}

impl ReportWriter {
    pub fn new() -> Self {
        Self {
            format: OutputFormat::Text,
        }
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Write the report to `output`, or to stdout when `None`.
    pub fn write_report(&self, report: &StationReport, output: Option<&Path>) -> Result<()> {
        match output {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                let file = File::create(path)?;
                self.write_to(report, BufWriter::new(file))
            }
            None => {
                let stdout = io::stdout();
                self.write_to(report, BufWriter::new(stdout.lock()))
            }
        }
    }

    pub fn write_to<W: Write>(&self, report: &StationReport, mut writer: W) -> Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(writer, "{}", report)?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut writer, report)?;
                writeln!(writer)?;
            }
        }
        writer.flush()?;
        Ok(())
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MeasurementAggregator;
    use tempfile::TempDir;

    fn report() -> StationReport {
        StationReport::from_sorted(vec![
            (b"Abha".to_vec(), MeasurementAggregator::new(-52)),
            (b"Oslo".to_vec(), MeasurementAggregator::new(3)),
        ])
    }

    #[test]
    fn test_text_output() -> Result<()> {
        let mut out = Vec::new();
        ReportWriter::new().write_to(&report(), &mut out)?;
        assert_eq!(String::from_utf8_lossy(&out), "{Abha=-5.2/-5.2/-5.2, Oslo=0.3/0.3/0.3}\n");
        Ok(())
    }

    #[test]
    fn test_json_output() -> Result<()> {
        let mut out = Vec::new();
        ReportWriter::new()
            .with_format(OutputFormat::Json)
            .write_to(&report(), &mut out)?;

        let value: serde_json::Value = serde_json::from_slice(&out)?;
        assert_eq!(value["Abha"]["min"], serde_json::json!(-5.2));
        assert_eq!(value["Oslo"]["max"], serde_json::json!(0.3));
        Ok(())
    }

    #[test]
    fn test_writes_file_creating_parent_dirs() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("out").join("report.txt");

        ReportWriter::new().write_report(&report(), Some(&path))?;

        assert_eq!(
            std::fs::read_to_string(&path)?,
            "{Abha=-5.2/-5.2/-5.2, Oslo=0.3/0.3/0.3}\n"
        );
        Ok(())
    }
}
