//! CSV/JSON export
//!
//! Export file naming, dashboard CSV rendering and writing downloaded bodies
//! into the export directory.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::info;

use crate::error::{CrmError, Result};
use crate::models::DashboardMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// File extension, also the value of the `export` query parameter.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = CrmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(CrmError::InvalidRequest(format!(
                "unsupported export format: {}",
                other
            ))),
        }
    }
}

/// `export_{YYYY-MM-DD}.{ext}`
pub fn export_filename(format: ExportFormat, date: NaiveDate) -> String {
    format!("export_{}.{}", date.format("%Y-%m-%d"), format.extension())
}

/// `dashboard_data.{ext}`
pub fn dashboard_filename(format: ExportFormat) -> String {
    format!("dashboard_data.{}", format.extension())
}

/// Writes `bytes` to `dir/filename`, creating `dir` if needed.
pub fn write_download(dir: &Path, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    std::fs::write(&path, bytes)?;
    info!(path = %path.display(), bytes = bytes.len(), "export written");
    Ok(path)
}

/// Renders dashboard metrics as CSV.
///
/// Every row ends with a newline. The stage breakdown section is appended
/// only when there are stages.
pub fn dashboard_csv(metrics: &DashboardMetrics) -> String {
    let mut rows = vec![
        "Metric,Value".to_string(),
        format!("Visits Today,{}", metrics.visits_today),
        format!("Visits This Month,{}", metrics.visits_month),
        format!("Total Leads,{}", metrics.total_leads),
        format!("Conversion Rate,{}%", metrics.conversion_rate),
        format!("Converted Count,{}", metrics.converted_count),
    ];

    if !metrics.leads_by_stage.is_empty() {
        rows.push(String::new());
        rows.push("Leads by Stage".to_string());
        rows.push("Stage,Count".to_string());
        for stage in &metrics.leads_by_stage {
            rows.push(format!("{},{}", csv_field(&stage.status), stage.count));
        }
    }

    rows.iter().map(|row| format!("{}\n", row)).collect()
}

pub fn pretty_json(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StageCount;

    fn metrics() -> DashboardMetrics {
        DashboardMetrics {
            visits_today: 4,
            visits_month: 38,
            total_leads: 120,
            conversion_rate: 12.5,
            converted_count: 15,
            ..Default::default()
        }
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("xlsx".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_filename(ExportFormat::Csv, date), "export_2024-03-09.csv");
        assert_eq!(dashboard_filename(ExportFormat::Json), "dashboard_data.json");
    }

    #[test]
    fn test_dashboard_csv_without_stages() {
        let csv = dashboard_csv(&metrics());
        assert_eq!(
            csv,
            "Metric,Value\nVisits Today,4\nVisits This Month,38\nTotal Leads,120\n\
             Conversion Rate,12.5%\nConverted Count,15\n"
        );
    }

    #[test]
    fn test_dashboard_csv_with_stages() {
        let mut metrics = metrics();
        metrics.leads_by_stage = vec![
            StageCount {
                status: "new".to_string(),
                count: 7,
            },
            StageCount {
                status: "won, closed".to_string(),
                count: 2,
            },
        ];

        let csv = dashboard_csv(&metrics);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[6], "");
        assert_eq!(lines[7], "Leads by Stage");
        assert_eq!(lines[8], "Stage,Count");
        assert_eq!(lines[9], "new,7");
        assert_eq!(lines[10], "\"won, closed\",2");
        assert!(csv.ends_with("\"won, closed\",2\n"));
    }

    #[test]
    fn test_write_download_creates_dir() {
        let dir = std::env::temp_dir().join(format!("crm_export_test_{}", std::process::id()));
        let path = write_download(&dir.join("nested"), "export.csv", b"a,b").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"a,b");
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
