//! The terminal belongs to the renderer, so log lines go to a file instead.
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

pub struct FileLogger {
    file: Mutex<File>,
    level: LevelFilter,
}

impl FileLogger {
    pub fn new(path: impl AsRef<Path>, level: LevelFilter) -> Result<Self, io::Error> {
        let file = OpenOptions::new().append(true).create(true).open(path)?;
        Ok(FileLogger {
            file: Mutex::new(file),
            level,
        })
    }

    /// install as the global logger
    pub fn init(self) -> Result<(), SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        // a poisoned lock or failed write just drops the line
        if let Ok(mut f) = self.file.lock() {
            let _ = writeln!(f, "{:<5} {}: {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {
        if let Ok(mut f) = self.file.lock() {
            let _ = f.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log::Level;
    use std::fs;

    #[test]
    fn test_writes_enabled_records_only() -> Result<(), io::Error> {
        let path = std::env::temp_dir().join(format!("chip8vm-log-{}.txt", std::process::id()));
        let _ = fs::remove_file(&path);
        let logger = FileLogger::new(&path, LevelFilter::Info)?;

        logger.log(
            &Record::builder()
                .level(Level::Info)
                .target("chip8vm::cpu")
                .args(format_args!("hello {}", 8))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Trace)
                .target("chip8vm::cpu")
                .args(format_args!("too chatty"))
                .build(),
        );
        logger.flush();

        let text = fs::read_to_string(&path)?;
        fs::remove_file(&path)?;
        assert_eq!(text, "INFO  chip8vm::cpu: hello 8\n");
        Ok(())
    }

    #[test]
    fn test_init_routes_log_macros_to_file() -> Result<(), Box<dyn std::error::Error>> {
        let path = std::env::temp_dir().join(format!("chip8vm-global-{}.txt", std::process::id()));
        let _ = fs::remove_file(&path);
        FileLogger::new(&path, LevelFilter::Debug)?.init()?;

        log::debug!(target: "chip8vm::logger::check", "installed");
        log::trace!(target: "chip8vm::logger::check", "filtered");
        log::logger().flush();

        // other tests may log concurrently, so only look for our own lines
        let text = fs::read_to_string(&path)?;
        let _ = fs::remove_file(&path);
        assert!(text.contains("DEBUG chip8vm::logger::check: installed\n"));
        assert!(!text.contains("filtered"));
        Ok(())
    }
}
