//! CSV persistence for telemetry rows and predictions. File layout follows
//! the existing dataset tooling: the telemetry file is
//! `Timestamp,<channel names...>,Letter` and the prediction file is
//! `Timestamp,Prediction,Actual_Letter`, both with millisecond timestamps.
//! Writes are flushed per row; capture runs usually end with a Ctrl-C, so
//! nothing can be left sitting in a buffer.

use crate::pipeline::{DataRow, PredictionEvent, Sink};

use log::{info, warn};
use std::{
    fmt,
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// A [Sink] that appends rows and predictions to CSV files. Either file is
/// optional: capture runs only log telemetry, live runs may log both.
pub struct CaptureLog {
    telemetry: Option<BufWriter<File>>,
    predictions: Option<BufWriter<File>>,
}

impl CaptureLog {
    /// A log that writes nothing until a file is attached.
    pub fn new() -> Self {
        Self {
            telemetry: None,
            predictions: None,
        }
    }

    /// Attaches a telemetry CSV, writing its header row immediately.
    pub fn with_telemetry(
        mut self,
        path: impl AsRef<Path>,
        channels: &[String],
    ) -> io::Result<Self> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "Timestamp,{},Letter", channels.join(","))?;
        writer.flush()?;
        self.telemetry = Some(writer);
        Ok(self)
    }

    /// Attaches a prediction CSV, writing its header row immediately.
    pub fn with_predictions(mut self, path: impl AsRef<Path>) -> io::Result<Self> {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "Timestamp,Prediction,Actual_Letter")?;
        writer.flush()?;
        self.predictions = Some(writer);
        Ok(self)
    }

    fn write_row(&mut self, row: &DataRow) -> io::Result<()> {
        if let Some(writer) = &mut self.telemetry {
            let values = row
                .values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(",");
            writeln!(
                writer,
                "{},{},{}",
                row.at.format(TIMESTAMP_FORMAT),
                values,
                row.label.as_deref().unwrap_or("")
            )?;
            writer.flush()?;
        }
        Ok(())
    }

    fn write_prediction(&mut self, at: &str, result: &str, expected: &str) -> io::Result<()> {
        if let Some(writer) = &mut self.predictions {
            writeln!(writer, "{},{},{}", at, result, expected)?;
            writer.flush()?;
        }
        Ok(())
    }
}

impl Default for CaptureLog {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Display> Sink<T> for CaptureLog {
    fn on_row(&mut self, row: &DataRow) {
        if let Err(error) = self.write_row(row) {
            warn!("failed to log telemetry row: {}", error);
        }
    }

    fn on_prediction(&mut self, event: &PredictionEvent<T>) {
        let at = event.at.format(TIMESTAMP_FORMAT).to_string();
        let result = event.result.to_string();
        let expected = event.expected.clone().unwrap_or_default();
        if let Err(error) = self.write_prediction(&at, &result, &expected) {
            warn!("failed to log prediction: {}", error);
        }
    }

    fn on_pass_complete(&mut self) {
        info!("all characters successfully recorded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use std::fs;

    fn channels() -> Vec<String> {
        vec!["Acc_X".to_string(), "Acc_Y".to_string()]
    }

    #[test]
    fn telemetry_rows_round_trip_through_the_file() {
        let tempfile = tempfile::NamedTempFile::new().unwrap();
        let mut log: CaptureLog = CaptureLog::new()
            .with_telemetry(tempfile.path(), &channels())
            .unwrap();

        let row = DataRow {
            at: Local::now(),
            values: vec![1.5, -2.25],
            label: Some("Q".to_string()),
        };
        Sink::<String>::on_row(&mut log, &row);
        Sink::<String>::on_row(&mut log, &row);

        let text = fs::read_to_string(tempfile.path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Timestamp,Acc_X,Acc_Y,Letter");
        assert!(lines[1].ends_with(",1.5,-2.25,Q"));
    }

    #[test]
    fn predictions_go_to_their_own_file() {
        let tempfile = tempfile::NamedTempFile::new().unwrap();
        let mut log = CaptureLog::new().with_predictions(tempfile.path()).unwrap();

        let event = PredictionEvent {
            at: Local::now(),
            result: "W".to_string(),
            expected: Some("V".to_string()),
        };
        log.on_prediction(&event);

        let text = fs::read_to_string(tempfile.path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Timestamp,Prediction,Actual_Letter");
        assert!(lines[1].ends_with(",W,V"));
    }

    #[test]
    fn detached_log_ignores_everything() {
        let mut log = CaptureLog::new();
        let row = DataRow {
            at: Local::now(),
            values: vec![0.0],
            label: None,
        };
        // Nothing attached; must not panic.
        Sink::<String>::on_row(&mut log, &row);
    }
}
