use anyhow::{Context, Result};
use intent_parser::{DispatchOutcome, IntentResult};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

#[derive(Debug, Serialize)]
pub struct HistoryRecord<'a> {
    pub timestamp: String,
    pub robot: &'a str,
    pub phrase: &'a str,
    pub result: &'a IntentResult,
    /// Absent for resolve-only runs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<&'a DispatchOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<'a> HistoryRecord<'a> {
    pub fn new(
        robot: &'a str,
        phrase: &'a str,
        result: &'a IntentResult,
        outcome: Option<&'a DispatchOutcome>,
    ) -> Self {
        let timestamp = OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_else(|_| "unknown".to_string());
        Self {
            timestamp,
            robot,
            phrase,
            result,
            outcome,
            message: outcome.map(|o| o.to_string()),
        }
    }
}

/// Appends one JSON object per line.
pub struct HistoryLog {
    writer: BufWriter<File>,
}

impl HistoryLog {
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening history file: {}", path.display()))?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    pub fn append(&mut self, record: &HistoryRecord<'_>) -> Result<()> {
        let json = serde_json::to_string(record)?;
        writeln!(self.writer, "{}", json)?;
        self.writer.flush()?;
        Ok(())
    }
}
