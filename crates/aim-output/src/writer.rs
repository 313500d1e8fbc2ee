//! CSV file sink.

use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

use crate::{OutputResult, StepRow, TripRow};

/// Writes `trips.csv` and `steps.csv` under one output directory.
///
/// Headers come from the row struct field names; files are created eagerly
/// so path problems surface before the run starts.
pub struct CsvSink {
    trips: csv::Writer<File>,
    steps: csv::Writer<File>,
    dir:   PathBuf,
}

impl CsvSink {
    pub fn create(dir: &Path) -> OutputResult<CsvSink> {
        fs::create_dir_all(dir)?;
        Ok(CsvSink {
            trips: csv::Writer::from_path(dir.join("trips.csv"))?,
            steps: csv::Writer::from_path(dir.join("steps.csv"))?,
            dir:   dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write_trip(&mut self, row: &TripRow) -> OutputResult<()> {
        self.trips.serialize(row)?;
        Ok(())
    }

    pub fn write_step(&mut self, row: &StepRow) -> OutputResult<()> {
        self.steps.serialize(row)?;
        Ok(())
    }

    pub fn flush(&mut self) -> OutputResult<()> {
        self.trips.flush()?;
        self.steps.flush()?;
        Ok(())
    }
}
