mod csv_report;

pub use csv_report::{CsvReportWriter, REPORT_FILE_PREFIX, timestamped_report_path};
