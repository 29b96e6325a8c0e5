// logging.rs
// Simple logging utility for the tic tac toe client

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use chrono::Local;

/// Log level enum
#[derive(Debug, Clone, Copy)]
pub enum LogLevel {
    Info,
    Error,
    Warning,
}

impl LogLevel {
    fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARNING",
        }
    }
}

// Set once the terminal UI takes over stdout
static LOG_FILE: OnceLock<Mutex<File>> = OnceLock::new();

/// Send all further log lines to `path` (appending) instead of stdout.
pub fn init_file<P: AsRef<Path>>(path: P) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    // A second init keeps the first file
    let _ = LOG_FILE.set(Mutex::new(file));
    Ok(())
}

pub fn format_line(level: LogLevel, message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!("{} - {} - {}", timestamp, level.as_str(), message)
}

/// Format and print a log message with timestamp
pub fn log_message(level: LogLevel, message: &str) {
    let line = format_line(level, message);
    match LOG_FILE.get() {
        Some(file) => {
            let mut file = file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            let _ = writeln!(file, "{line}");
        }
        None => println!("{line}"),
    }
}

/// Log an info message
pub fn log_info(message: &str) {
    log_message(LogLevel::Info, message);
}

/// Log an error message
pub fn log_error(message: &str) {
    log_message(LogLevel::Error, message);
}

/// Log a warning message
pub fn log_warning(message: &str) {
    log_message(LogLevel::Warning, message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_line() {
        let line = format_line(LogLevel::Warning, "poll failed");
        assert!(line.ends_with(" - WARNING - poll failed"));
        // "YYYY-MM-DD HH:MM:SS" prefix
        assert_eq!(line.find(" - "), Some(19));
    }

    // The only test that installs the file sink; later lines from other
    // tests land in the same file.
    #[test]
    fn test_init_file_redirects_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("client.log");

        init_file(&path).unwrap();
        log_info("first line");
        log_error("second line");

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.lines().any(|l| l.ends_with(" - INFO - first line")));
        assert!(content.lines().any(|l| l.ends_with(" - ERROR - second line")));

        // A second init keeps writing to the first file
        let other = dir.path().join("other.log");
        init_file(&other).unwrap();
        log_warning("third line");
        assert!(fs::read_to_string(&path).unwrap().contains(" - WARNING - third line"));
        assert!(!fs::read_to_string(&other).unwrap().contains("third line"));
    }
}
