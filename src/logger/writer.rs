//! Log writer module
//!
//! Optional file targets for the access and error logs. When a target is not
//! configured, messages go through the `tracing` subscriber instead.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

/// Global log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// File targets for access and error lines
pub struct LogWriter {
    access: Option<Mutex<File>>,
    error: Option<Mutex<File>>,
}

impl LogWriter {
    fn new(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<Self> {
        Ok(Self {
            access: access_log_file.map(open_log_file).transpose()?.map(Mutex::new),
            error: error_log_file.map(open_log_file).transpose()?.map(Mutex::new),
        })
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

fn write_line(target: Option<&Mutex<File>>, message: &str) -> bool {
    let Some(file) = target else {
        return false;
    };
    if let Ok(mut f) = file.lock() {
        let _ = writeln!(f, "{message}");
    }
    true
}

/// Append to the access log file; `false` when none is configured
pub fn write_access(message: &str) -> bool {
    LOG_WRITER
        .get()
        .is_some_and(|w| write_line(w.access.as_ref(), message))
}

/// Append to the error log file; `false` when none is configured
pub fn write_error(message: &str) -> bool {
    LOG_WRITER
        .get()
        .is_some_and(|w| write_line(w.error.as_ref(), message))
}

/// Initialize the global log writer
///
/// This should be called once at application startup.
/// Returns error if log files cannot be opened.
pub fn init(access_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<()> {
    let writer = LogWriter::new(access_log_file, error_log_file)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}
