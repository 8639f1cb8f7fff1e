//! Logging for galaxy_nn
//!
//! Library code never prints directly: it goes through the `engine_*!` macros,
//! which hand a [`LogEntry`] to the logger installed in `Engine`. Each entry is
//! tagged with the component that emitted it (see [`source`]), so an
//! application embedding the inference runtime can route pipeline compiles,
//! cache activity and driver messages differently.
//!
//! The `engine_err!` family couples logging with error construction: device
//! API failures are logged at the point they happen and turned into an
//! `Error` in the same expression.

use std::fmt;
use std::time::SystemTime;
use chrono::{DateTime, Local};
use colored::*;

/// Component names used as log sources
pub mod source {
    pub const ENGINE: &str = "galaxynn::Engine";
    pub const PIPELINE: &str = "galaxynn::Pipeline";
    pub const IMPORT_PIPELINE: &str = "galaxynn::HardwareBufferImportPipeline";
    pub const PIPELINE_CACHE: &str = "galaxynn::PipelineCache";
    pub const SHADER_LIBRARY: &str = "galaxynn::ShaderLibrary";
    /// Vulkan backend (device, objects, external images)
    pub const VULKAN: &str = "galaxynn::vulkan";
    /// Messages forwarded from the Vulkan validation layers
    pub const VALIDATION: &str = "galaxynn::vulkan::validation";

    /// Every component, core first
    pub const ALL: [&str; 7] = [
        ENGINE, PIPELINE, IMPORT_PIPELINE, PIPELINE_CACHE, SHADER_LIBRARY, VULKAN, VALIDATION,
    ];
}

/// Receiver of log entries, installed with `Engine::set_logger`
///
/// Called from whichever thread logs, possibly several at once.
pub trait Logger: Send + Sync {
    fn log(&self, entry: &LogEntry);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogSeverity {
    /// Per-request detail such as pipeline cache hits
    Trace,
    Debug,
    Info,
    Warn,
    /// Device or driver failures; carries the emitting file:line
    Error,
}

impl LogSeverity {
    /// Fixed-width label used in console output
    pub fn label(self) -> &'static str {
        match self {
            LogSeverity::Trace => "TRACE",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Info => "INFO ",
            LogSeverity::Warn => "WARN ",
            LogSeverity::Error => "ERROR",
        }
    }
}

/// One log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub severity: LogSeverity,
    pub timestamp: SystemTime,
    /// Emitting component, one of [`source`] for library messages
    pub source: String,
    pub message: String,
    pub file: Option<&'static str>,
    pub line: Option<u32>,
}

impl LogEntry {
    /// Entry stamped with the current time and no location
    pub fn new(severity: LogSeverity, source: &str, message: String) -> Self {
        Self {
            severity,
            timestamp: SystemTime::now(),
            source: source.to_string(),
            message,
            file: None,
            line: None,
        }
    }

    /// Attach the emitting file:line
    pub fn at(mut self, file: &'static str, line: u32) -> Self {
        self.file = Some(file);
        self.line = Some(line);
        self
    }

    /// `file:line` when the entry carries a location
    pub fn location(&self) -> Option<String> {
        match (self.file, self.line) {
            (Some(file), Some(line)) => Some(format!("{}:{}", file, line)),
            _ => None,
        }
    }

    fn local_time(&self) -> String {
        let datetime: DateTime<Local> = self.timestamp.into();
        datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
    }
}

/// Plain (uncolored) single-line rendering
impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] [{}] [{}] {}",
            self.local_time(),
            self.severity.label(),
            self.source,
            self.message
        )?;
        if let Some(location) = self.location() {
            write!(f, " ({})", location)?;
        }
        Ok(())
    }
}

/// Console logger used until another one is installed
///
/// Warnings and errors go to stderr, the rest to stdout. Entries below
/// `min_severity` are dropped.
#[derive(Debug, Clone, Copy)]
pub struct DefaultLogger {
    min_severity: LogSeverity,
}

impl DefaultLogger {
    pub const fn new() -> Self {
        Self { min_severity: LogSeverity::Trace }
    }

    pub const fn with_min_severity(min_severity: LogSeverity) -> Self {
        Self { min_severity }
    }

    pub fn min_severity(&self) -> LogSeverity {
        self.min_severity
    }

    pub fn accepts(&self, severity: LogSeverity) -> bool {
        severity >= self.min_severity
    }
}

impl Default for DefaultLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        if !self.accepts(entry.severity) {
            return;
        }

        let label = entry.severity.label();
        let severity = match entry.severity {
            LogSeverity::Trace => label.bright_black(),
            LogSeverity::Debug => label.cyan(),
            LogSeverity::Info => label.green(),
            LogSeverity::Warn => label.yellow(),
            LogSeverity::Error => label.red().bold(),
        };
        let location = entry
            .location()
            .map(|l| format!(" ({})", l).bright_black().to_string())
            .unwrap_or_default();

        let line = format!(
            "[{}] [{}] [{}] {}{}",
            entry.local_time(),
            severity,
            entry.source.bright_blue(),
            entry.message,
            location
        );

        if entry.severity >= LogSeverity::Warn {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }
}

// ===== MACROS =====

/// Log through the engine logger at a given severity
///
/// ```no_run
/// # use galaxy_nn::engine_log;
/// use galaxy_nn::galaxynn::log::source;
/// engine_log!(Debug, source::PIPELINE, "local size {}x{}x{}", 8, 8, 1);
/// ```
#[macro_export]
macro_rules! engine_log {
    ($severity:ident, $source:expr, $($arg:tt)*) => {
        $crate::galaxynn::Engine::log(
            $crate::galaxynn::log::LogSeverity::$severity,
            $source,
            format!($($arg)*)
        )
    };
}

#[macro_export]
macro_rules! engine_trace {
    ($source:expr, $($arg:tt)*) => { $crate::engine_log!(Trace, $source, $($arg)*) };
}

#[macro_export]
macro_rules! engine_debug {
    ($source:expr, $($arg:tt)*) => { $crate::engine_log!(Debug, $source, $($arg)*) };
}

#[macro_export]
macro_rules! engine_info {
    ($source:expr, $($arg:tt)*) => { $crate::engine_log!(Info, $source, $($arg)*) };
}

#[macro_export]
macro_rules! engine_warn {
    ($source:expr, $($arg:tt)*) => { $crate::engine_log!(Warn, $source, $($arg)*) };
}

/// Log an error with the caller's file:line
#[macro_export]
macro_rules! engine_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::galaxynn::Engine::log_detailed(
            $crate::galaxynn::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

/// Log an error and evaluate to `Error::BackendError` with the same text
///
/// ```no_run
/// # use galaxy_nn::engine_err;
/// # use galaxy_nn::galaxynn::log::source;
/// # fn create() -> Result<u64, i32> { Err(-3) }
/// let handle = create()
///     .map_err(|code| engine_err!(source::VULKAN, "vkCreateComputePipelines returned {}", code));
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxynn::Error::BackendError(message)
    }};
}

/// Log a warning and evaluate to `Error::InvalidResource` with the same text
///
/// For caller mistakes (bad sizes, unknown names) rather than device failures.
#[macro_export]
macro_rules! engine_warn_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_warn!($source, "{}", message);
        $crate::galaxynn::Error::InvalidResource(message)
    }};
}

/// `return Err(engine_err!(...))`
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

/// `return Err(engine_warn_err!(...))`
#[macro_export]
macro_rules! engine_bail_warn {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_warn_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
