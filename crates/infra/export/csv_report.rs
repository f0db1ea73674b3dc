use std::fs;
use std::path::{Path, PathBuf};

use walbench_app::ports::{ReportError, ReportWriter};
use walbench_domain::{REPORT_HEADER, ReportRow};

/// File name prefix for benchmark result files.
pub const REPORT_FILE_PREFIX: &str = "sql_benchmark_results";

/// Serializes the benchmark report as a CSV file: fixed header, then rows in
/// the exact order given.
#[derive(Default)]
pub struct CsvReportWriter;

impl CsvReportWriter {
    pub fn new() -> Self {
        Self
    }
}

impl ReportWriter for CsvReportWriter {
    fn write(&self, rows: &[ReportRow], destination: &Path) -> Result<(), ReportError> {
        if rows.is_empty() {
            return Err(ReportError::EmptyReport);
        }

        if let Some(parent) = destination.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut writer = csv::Writer::from_path(destination)?;
        writer.write_record(REPORT_HEADER)?;
        for row in rows {
            writer.write_record(row.fields())?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Timestamped file name under `output_dir`, so successive sessions never
/// overwrite each other.
pub fn timestamped_report_path(output_dir: &Path) -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d%H%M%S");
    output_dir.join(format!("{REPORT_FILE_PREFIX}_{timestamp}.csv"))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use walbench_domain::{AggregateRecord, RunRecord, StrategyKind, WalSnapshot};

    use super::*;

    fn sample_rows() -> Vec<ReportRow> {
        let record = RunRecord {
            strategy: StrategyKind::Bulk,
            elapsed: Duration::from_millis(125),
            wal: WalSnapshot::new(3.25, 7),
            error: None,
        };
        vec![
            ReportRow::Run {
                run: 1,
                record: record.clone(),
            },
            ReportRow::Average(AggregateRecord::from_runs(StrategyKind::Bulk, &[record])),
        ]
    }

    #[test]
    fn zero_rows_is_an_empty_report_error() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("report.csv");

        let err = CsvReportWriter::new().write(&[], &destination).unwrap_err();

        assert!(matches!(err, ReportError::EmptyReport));
        assert!(!destination.exists());
    }

    #[test]
    fn writes_header_plus_one_line_per_row() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("report.csv");

        CsvReportWriter::new()
            .write(&sample_rows(), &destination)
            .unwrap();

        let content = fs::read_to_string(&destination).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "mode,run,elapsed_seconds,wal_sync_time,wal_sync_count");
        assert_eq!(lines[1], "bulk,1,0.125000,3.250,7");
        assert_eq!(lines[2], "bulk,avg,0.125000,3.250,7.0");
    }

    #[test]
    fn creates_the_containing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("nested").join("out").join("report.csv");

        CsvReportWriter::new()
            .write(&sample_rows(), &destination)
            .unwrap();

        assert!(destination.exists());
    }

    #[test]
    fn report_path_is_prefixed_and_csv() {
        let path = timestamped_report_path(Path::new("output"));
        let name = path.file_name().unwrap().to_str().unwrap();

        assert!(name.starts_with(REPORT_FILE_PREFIX));
        assert!(name.ends_with(".csv"));
        assert!(path.starts_with("output"));
    }
}
