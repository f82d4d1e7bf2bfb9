//! Where records go.

use std::fs::{DirBuilder, File, OpenOptions};
use std::io::{self, Write};
#[cfg(unix)]
use std::os::unix::fs::DirBuilderExt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{info, warn};

use super::record::Record;

/// `tracing` target that console copies of records are emitted under.
pub const ACCESS_TARGET: &str = "logroute::access";

/// Destination for log records.
///
/// The [`Logger`](super::Logger) calls into its sink while holding its lock,
/// so implementations see one record at a time.
pub trait LogSink: Send {
    fn write_record(&mut self, record: &Record) -> io::Result<()>;

    /// Points the sink at a new directory. Sinks without one ignore it.
    fn set_dir(&mut self, _dir: &Path) {}

    /// The directory records currently go to, if the sink writes files.
    fn log_dir(&self) -> Option<PathBuf> {
        None
    }
}

/// Mirrors records to the console through `tracing`.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn write_record(&mut self, record: &Record) -> io::Result<()> {
        let line = record.to_line()?;
        info!(target: ACCESS_TARGET, "{line}");
        Ok(())
    }
}

/// Appends records to `<dir>/<DD-MM-YYYY>.log` and mirrors them to the console.
///
/// The day's file stays open between records and is swapped when a record
/// carries a new date or the directory changes. The directory is created on
/// demand with mode `0755`. When it cannot be created, or the file cannot be
/// opened, records still reach the console and a warning is emitted.
#[derive(Debug)]
pub struct DailyFileSink {
    dir: PathBuf,
    open: Option<(NaiveDate, File)>,
}

impl DailyFileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), open: None }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name used for records dated `day`.
    pub fn file_name(day: NaiveDate) -> String {
        format!("{}.log", day.format("%d-%m-%Y"))
    }

    fn append(&mut self, line: &str, day: NaiveDate) -> io::Result<()> {
        let file = self.file_for(day)?;
        let res = writeln!(file, "{line}");
        if res.is_err() {
            self.open = None;
        }
        res
    }

    fn file_for(&mut self, day: NaiveDate) -> io::Result<&mut File> {
        let stale = self.open.as_ref().is_none_or(|(opened, _)| *opened != day);
        if stale {
            self.open = None;
            self.open = Some((day, open_log_file(&self.dir, day)?));
        }
        match &mut self.open {
            Some((_, file)) => Ok(file),
            None => Err(io::Error::other("log file not open")),
        }
    }
}

impl LogSink for DailyFileSink {
    fn write_record(&mut self, record: &Record) -> io::Result<()> {
        let line = record.to_line()?;
        info!(target: ACCESS_TARGET, "{line}");
        if let Err(e) = self.append(&line, record.time().date_naive()) {
            warn!(dir = %self.dir.display(), "log file unavailable, record written to console only: {e}");
        }
        Ok(())
    }

    fn set_dir(&mut self, dir: &Path) {
        self.dir = dir.to_path_buf();
        self.open = None;
    }

    fn log_dir(&self) -> Option<PathBuf> {
        Some(self.dir.clone())
    }
}

fn open_log_file(dir: &Path, day: NaiveDate) -> io::Result<File> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o755);
    builder.create(dir)?;

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(DailyFileSink::file_name(day)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::Fields;
    use chrono::{Local, TimeZone};

    fn record_on(day: u32, msg: &str) -> Record {
        let time = Local.with_ymd_and_hms(2026, 10, day, 12, 0, 0).unwrap();
        Record::at(time, msg, Fields::new())
    }

    #[test]
    fn file_name_is_day_month_year() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
        assert_eq!(DailyFileSink::file_name(day), "07-03-2026.log");
    }

    #[test]
    fn creates_the_directory_and_appends() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested/logs");
        let mut sink = DailyFileSink::new(&dir);

        sink.write_record(&record_on(18, "one")).unwrap();
        sink.write_record(&record_on(18, "two")).unwrap();

        let content = std::fs::read_to_string(dir.join("18-10-2026.log")).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].contains(r#""msg":"two""#));
    }

    #[cfg(unix)]
    #[test]
    fn directory_mode_is_0755() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("logs");
        DailyFileSink::new(&dir).write_record(&record_on(18, "x")).unwrap();

        let mode = std::fs::metadata(&dir).unwrap().permissions().mode() & 0o777;
        // The process umask can only clear bits.
        assert_eq!(mode & !0o755, 0);
    }

    #[test]
    fn rolls_over_to_a_new_file_on_date_change() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sink = DailyFileSink::new(tmp.path());

        sink.write_record(&record_on(18, "today")).unwrap();
        sink.write_record(&record_on(19, "tomorrow")).unwrap();

        assert!(tmp.path().join("18-10-2026.log").exists());
        let next = std::fs::read_to_string(tmp.path().join("19-10-2026.log")).unwrap();
        assert_eq!(next.lines().count(), 1);
    }

    #[test]
    fn set_dir_moves_subsequent_records() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let mut sink = DailyFileSink::new(first.path());

        sink.write_record(&record_on(18, "a")).unwrap();
        sink.set_dir(second.path());
        assert_eq!(sink.log_dir().as_deref(), Some(second.path()));
        sink.write_record(&record_on(18, "b")).unwrap();

        let a = std::fs::read_to_string(first.path().join("18-10-2026.log")).unwrap();
        let b = std::fs::read_to_string(second.path().join("18-10-2026.log")).unwrap();
        assert_eq!((a.lines().count(), b.lines().count()), (1, 1));
    }

    #[test]
    fn unusable_directory_falls_back_to_console() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();

        let mut sink = DailyFileSink::new(blocker.join("logs"));
        assert!(sink.write_record(&record_on(18, "x")).is_ok());
    }
}
