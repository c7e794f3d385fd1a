use std::fs::{self, File, OpenOptions};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveTime, Timelike};
use mlx90614::Temperature;

/// Header written once when a day's file is first created.
const HEADER: &str = "(hour:minute:second), temperature(C)\n";

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("failed to create log directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("failed to open log file {path}: {source}")]
    Open { path: PathBuf, source: io::Error },
    #[error("failed to append to log file {path}: {source}")]
    Append { path: PathBuf, source: io::Error },
}

/** The log file for one calendar day.

Owns the only writable handle in the process. Every line appended to a
`DayLog` carries a time from the same local date the file is named after;
crossing midnight means rotating to a fresh `DayLog` first.

Generic over the write target so append failures can be injected; outside
of tests `W` is always a [File]. */
pub struct DayLog<W: Write + Seek = File> {
    dir: PathBuf,
    date: NaiveDate,
    path: PathBuf,
    file: W,
}

fn file_name(date: NaiveDate) -> String {
    use chrono::Datelike;
    format!("{}-{}-{}.csv", date.month(), date.day(), date.year())
}

impl DayLog<File> {
    /** Open the log file for `date` inside `dir`, creating `dir` if needed.

    An existing file is opened for writing at its end and its header left
    alone, so restarting the process mid-day keeps adding rows to the same
    file. A new file gets the header line, flushed immediately.

    Not `O_APPEND`: appends to an `O_APPEND` handle ignore the seek
    position, which would defeat the seek-back rewrite in [DayLog::append]. */
    pub fn open_for(dir: impl Into<PathBuf>, date: NaiveDate) -> Result<Self, LogError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| LogError::CreateDir {
            path: dir.clone(),
            source,
        })?;

        let path = dir.join(file_name(date));
        let file = if path.exists() {
            let mut file =
                OpenOptions::new()
                    .write(true)
                    .open(&path)
                    .map_err(|source| LogError::Open {
                        path: path.clone(),
                        source,
                    })?;
            file.seek(SeekFrom::End(0)).map_err(|source| LogError::Open {
                path: path.clone(),
                source,
            })?;
            file
        } else {
            let mut file = File::create(&path).map_err(|source| LogError::Open {
                path: path.clone(),
                source,
            })?;
            file.write_all(HEADER.as_bytes())
                .and_then(|_| file.flush())
                .map_err(|source| LogError::Append {
                    path: path.clone(),
                    source,
                })?;
            file
        };

        Ok(DayLog {
            dir,
            date,
            path,
            file,
        })
    }

    /// Close the current file and open the one named after `date`.
    pub fn rotate(&mut self, date: NaiveDate) -> Result<(), LogError> {
        let next = DayLog::open_for(self.dir.clone(), date)?;
        // Replacing self drops (and closes) the outgoing handle.
        *self = next;
        Ok(())
    }
}

impl<W: Write + Seek> DayLog<W> {
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /** Append one `(H:M:S), T` row and flush it.

    A failed write is retried once; the retry seeks back to the row's
    starting offset and rewrites the whole row, so a partially landed first
    attempt is overwritten rather than duplicated. A second failure
    propagates, since durable rows are the whole point of this process. */
    pub fn append(&mut self, time: NaiveTime, temp: Temperature) -> Result<(), LogError> {
        let line = format!(
            "({}:{}:{}), {}\n",
            time.hour(),
            time.minute(),
            time.second(),
            temp
        );

        let start = self
            .file
            .stream_position()
            .map_err(|source| self.append_error(source))?;

        if let Err(first) = self.write_line(&line) {
            log::warn!("append to {} failed ({}), retrying", self.path.display(), first);
            self.file
                .seek(SeekFrom::Start(start))
                .and_then(|_| self.file.write_all(line.as_bytes()))
                .and_then(|_| self.file.flush())
                .map_err(|source| self.append_error(source))?;
        }

        Ok(())
    }

    #[cfg(test)]
    fn with_writer(date: NaiveDate, file: W) -> Self {
        DayLog {
            dir: PathBuf::new(),
            date,
            path: PathBuf::from(file_name(date)),
            file,
        }
    }

    fn write_line(&mut self, line: &str) -> io::Result<()> {
        self.file.write_all(line.as_bytes())?;
        self.file.flush()
    }

    fn append_error(&self, source: io::Error) -> LogError {
        LogError::Append {
            path: self.path.clone(),
            source,
        }
    }
}
