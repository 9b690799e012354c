//! # Archive Export
//!
//! Where rollover sends the period's sale records before resetting stock.
//!
//! ## Layout
//! ```text
//! Date,Item,Category,Quantity,Unit Price,Total Price,User
//! 2026-10-16 09:30:00,Burger,food,3,120,360,desk
//! 2026-10-16 11:02:41,Room,accommodation,1,1200,1200,admin
//! ```

use chrono::NaiveDate;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use hotel_core::{format_timestamp, SaleRecord};

/// Destination for archived sale records.
pub trait ArchiveSink {
    /// Writes one record.
    fn write_record(&mut self, record: &SaleRecord) -> DbResult<()>;

    /// Flushes everything written so far to durable storage.
    fn finish(&mut self) -> DbResult<()>;
}

/// File name for the archive of `day`: `sales_report_YYYYMMDD.csv`.
pub fn archive_file_name(day: NaiveDate) -> String {
    format!("sales_report_{}.csv", day.format("%Y%m%d"))
}

#[derive(Debug, Serialize)]
struct ArchiveRow<'a> {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Item")]
    item: &'a str,
    #[serde(rename = "Category")]
    category: &'static str,
    #[serde(rename = "Quantity")]
    quantity: i64,
    #[serde(rename = "Unit Price")]
    unit_price: i64,
    #[serde(rename = "Total Price")]
    total_price: i64,
    #[serde(rename = "User")]
    user: &'a str,
}

impl<'a> From<&'a SaleRecord> for ArchiveRow<'a> {
    fn from(record: &'a SaleRecord) -> Self {
        ArchiveRow {
            date: format_timestamp(record.sold_at),
            item: &record.item,
            category: record.category.as_str(),
            quantity: record.quantity,
            unit_price: record.unit_price.units(),
            total_price: record.total.units(),
            user: &record.user,
        }
    }
}

// =============================================================================
// CSV Archive
// =============================================================================

/// CSV sink with the `Date,Item,Category,Quantity,Unit Price,Total Price,User`
/// header. The header is written even when no records are.
pub struct CsvArchive<W: Write> {
    writer: csv::Writer<W>,
    header_written: bool,
}

impl<W: Write> CsvArchive<W> {
    /// Wraps any writer.
    pub fn new(inner: W) -> Self {
        CsvArchive {
            writer: csv::WriterBuilder::new()
                .has_headers(false)
                .terminator(csv::Terminator::Any(b'\n'))
                .from_writer(inner),
            header_written: false,
        }
    }

    fn ensure_header(&mut self) -> DbResult<()> {
        if !self.header_written {
            self.writer.write_record([
                "Date",
                "Item",
                "Category",
                "Quantity",
                "Unit Price",
                "Total Price",
                "User",
            ])?;
            self.header_written = true;
        }
        Ok(())
    }

    /// Finishes and returns the inner writer.
    pub fn into_inner(mut self) -> DbResult<W> {
        self.ensure_header()?;
        self.writer
            .into_inner()
            .map_err(|e| DbError::ArchiveFailed(e.to_string()))
    }
}

impl<W: Write> ArchiveSink for CsvArchive<W> {
    fn write_record(&mut self, record: &SaleRecord) -> DbResult<()> {
        self.ensure_header()?;
        self.writer.serialize(ArchiveRow::from(record))?;
        Ok(())
    }

    fn finish(&mut self) -> DbResult<()> {
        self.ensure_header()?;
        self.writer
            .flush()
            .map_err(|e| DbError::ArchiveFailed(e.to_string()))
    }
}

// =============================================================================
// Archive File
// =============================================================================

/// `sales_report_YYYYMMDD.csv` written as `*.csv.tmp` and renamed into place
/// by `finish`, so an earlier export for the same day survives a failed run.
pub struct ArchiveFile {
    archive: CsvArchive<File>,
    tmp_path: PathBuf,
    path: PathBuf,
    finished: bool,
}

impl ArchiveFile {
    /// Starts the archive for `day` inside `dir`.
    pub fn create_in(dir: &Path, day: NaiveDate) -> DbResult<Self> {
        std::fs::create_dir_all(dir).map_err(|e| DbError::ArchiveFailed(e.to_string()))?;
        let path = dir.join(archive_file_name(day));
        let tmp_path = PathBuf::from(format!("{}.tmp", path.display()));
        let file = File::create(&tmp_path).map_err(|e| DbError::ArchiveFailed(e.to_string()))?;
        debug!(path = %tmp_path.display(), "Archive started");
        Ok(ArchiveFile {
            archive: CsvArchive::new(file),
            tmp_path,
            path,
            finished: false,
        })
    }

    /// Final location of the archive.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drops an unfinished archive, leaving any earlier file for the day as is.
    pub fn discard(self) {
        if self.finished {
            return;
        }
        let ArchiveFile { archive, tmp_path, .. } = self;
        drop(archive);
        if let Err(err) = std::fs::remove_file(&tmp_path) {
            debug!(path = %tmp_path.display(), error = %err, "Could not remove unfinished archive");
        }
    }
}

impl ArchiveSink for ArchiveFile {
    fn write_record(&mut self, record: &SaleRecord) -> DbResult<()> {
        self.archive.write_record(record)
    }

    fn finish(&mut self) -> DbResult<()> {
        self.archive.finish()?;
        self.archive
            .writer
            .get_ref()
            .sync_all()
            .map_err(|e| DbError::ArchiveFailed(e.to_string()))?;
        std::fs::rename(&self.tmp_path, &self.path)
            .map_err(|e| DbError::ArchiveFailed(e.to_string()))?;
        self.finished = true;
        info!(path = %self.path.display(), "Archive written");
        Ok(())
    }
}

/// Keeps archived records in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryArchive {
    pub records: Vec<SaleRecord>,
    pub finished: bool,
}

impl ArchiveSink for MemoryArchive {
    fn write_record(&mut self, record: &SaleRecord) -> DbResult<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn finish(&mut self) -> DbResult<()> {
        self.finished = true;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hotel_core::{Category, Money};

    fn record() -> SaleRecord {
        SaleRecord {
            item: "Chicken Roll".to_string(),
            category: Category::Food,
            quantity: 2,
            unit_price: Money::from_units(150),
            total: Money::from_units(300),
            user: "desk".to_string(),
            sold_at: Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 5).unwrap(),
        }
    }

    #[test]
    fn test_csv_layout() {
        let mut archive = CsvArchive::new(Vec::new());
        archive.write_record(&record()).unwrap();
        archive.finish().unwrap();
        let text = String::from_utf8(archive.into_inner().unwrap()).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Date,Item,Category,Quantity,Unit Price,Total Price,User")
        );
        assert_eq!(
            lines.next(),
            Some("2026-10-16 12:00:05,Chicken Roll,food,2,150,300,desk")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_empty_archive_still_has_header() {
        let mut archive = CsvArchive::new(Vec::new());
        archive.finish().unwrap();
        let text = String::from_utf8(archive.into_inner().unwrap()).unwrap();
        assert_eq!(text.trim_end(), "Date,Item,Category,Quantity,Unit Price,Total Price,User");
    }

    #[test]
    fn test_archive_file_appears_on_finish() {
        let dir = tempfile::tempdir().unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let mut archive = ArchiveFile::create_in(dir.path(), day).unwrap();
        archive.write_record(&record()).unwrap();
        assert!(!archive.path().exists());

        archive.finish().unwrap();
        let path = archive.path().to_path_buf();
        archive.discard();

        assert_eq!(path.file_name().unwrap(), "sales_report_20261016.csv");
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_unfinished_archive_keeps_earlier_export() {
        let dir = tempfile::tempdir().unwrap();
        let day = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let earlier = dir.path().join("sales_report_20261016.csv");
        std::fs::write(&earlier, "earlier export\n").unwrap();

        let mut archive = ArchiveFile::create_in(dir.path(), day).unwrap();
        archive.write_record(&record()).unwrap();
        archive.discard();

        assert_eq!(std::fs::read_to_string(&earlier).unwrap(), "earlier export\n");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
