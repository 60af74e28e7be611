//! Checkpointed CSV writer
//!
//! One output file per run, named by the collection date. The 13-column
//! header is written exactly once per fresh file; a re-run on the same day
//! appends data rows to the existing file, so within a calendar day the file
//! is append-only.

use crate::record::BuildingRecord;
use crate::Result;
use chrono::NaiveDate;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// The fixed output header, in entity field order
pub const HEADER: [&str; 13] = [
    "Идентификационный номер",
    "Регион",
    "Населенный пункт",
    "Улица",
    "Номер дома",
    "Материал наружных стен",
    "Этажность минимальная",
    "Этажность максимальная",
    "Проектная площадь жилых помещений",
    "Стадия строительства",
    "Планируемые даты окончания строительства",
    "Запланированный срок ввода в эксплуатацию",
    "Дата сбора информации",
];

/// Appends completed records to the dated output file in per-region batches
pub struct CheckpointedWriter {
    path: PathBuf,
}

impl CheckpointedWriter {
    /// Prepares the destination file for the given collection date
    ///
    /// Creates the file and writes the header when no data exists yet;
    /// leaves an existing non-empty file untouched so same-day re-runs
    /// keep appending below the original header.
    pub fn initialize(directory: &Path, collected_on: NaiveDate) -> Result<Self> {
        let path = directory.join(format!("data_{}.csv", collected_on.format("%Y-%m-%d")));

        let fresh = match std::fs::metadata(&path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };

        if fresh {
            let mut writer = csv::Writer::from_path(&path)?;
            writer.write_record(HEADER)?;
            writer.flush()?;
        }

        Ok(Self { path })
    }

    /// Appends one batch of records, one row per record
    ///
    /// Opens the destination in append mode, writes, and closes; a crash
    /// between batches loses at most the in-flight region.
    pub fn append_batch(&self, records: &[BuildingRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        for record in records {
            writer.write_record(record.fields())?;
        }
        writer.flush()?;

        Ok(records.len())
    }

    /// Destination path of this run's output file
    pub fn path(&self) -> &Path {
        &self.path
    }
}
