/// Galaxy NN Engine - process-wide logger and compute device registry
///
/// Devices are registered under a name and shared as `Arc<dyn ComputeDevice>`.
/// State lives in thread-safe static storage guarded by RwLock.

use std::sync::{OnceLock, RwLock, Arc};
use rustc_hash::FxHashMap;
use crate::compute::ComputeDevice;
use crate::error::{Result, Error};
use crate::log::{source, DefaultLogger, LogEntry, LogSeverity, Logger};

// ===== INTERNAL STATE =====

/// Global engine state storage
static ENGINE_STATE: OnceLock<EngineState> = OnceLock::new();

/// Global logger (initialized with DefaultLogger)
static LOGGER: OnceLock<RwLock<Box<dyn Logger>>> = OnceLock::new();

fn logger() -> &'static RwLock<Box<dyn Logger>> {
    LOGGER.get_or_init(|| RwLock::new(Box::new(DefaultLogger::new())))
}

/// Internal state structure holding the device registry
struct EngineState {
    devices: RwLock<FxHashMap<String, Arc<dyn ComputeDevice>>>,
}

impl EngineState {
    fn new() -> Self {
        Self {
            devices: RwLock::new(FxHashMap::default()),
        }
    }
}

// ===== PUBLIC API =====

/// Main engine singleton manager
///
/// # Example
///
/// ```no_run
/// use galaxy_nn::galaxynn::Engine;
///
/// Engine::initialize()?;
/// let device = Engine::device("gpu0")?;
/// println!("{}", device.info().device_name);
/// Engine::shutdown();
/// # Ok::<(), galaxy_nn::galaxynn::Error>(())
/// ```
pub struct Engine;

impl Engine {
    /// Log an error before returning it
    fn log_and_return_error(error: Error) -> Error {
        crate::engine_error!(source::ENGINE, "{}", error);
        error
    }

    fn state() -> Result<&'static EngineState> {
        ENGINE_STATE.get().ok_or_else(|| Self::log_and_return_error(
            Error::InitializationFailed("Engine not initialized. Call Engine::initialize() first.".to_string())
        ))
    }

    /// Initialize the engine (idempotent)
    pub fn initialize() -> Result<()> {
        ENGINE_STATE.get_or_init(EngineState::new);
        Ok(())
    }

    /// Drop every registered device
    ///
    /// Devices stay alive while pipelines still reference them.
    pub fn shutdown() {
        if let Some(state) = ENGINE_STATE.get() {
            if let Ok(mut devices) = state.devices.write() {
                devices.clear();
            }
        }
    }

    // ===== DEVICE REGISTRY =====

    /// Register a device under `name` and return the shared handle
    ///
    /// # Errors
    ///
    /// - The engine is not initialized
    /// - A device with the same name already exists
    pub fn create_device<D: ComputeDevice + 'static>(name: &str, device: D) -> Result<Arc<dyn ComputeDevice>> {
        let device: Arc<dyn ComputeDevice> = Arc::new(device);
        Self::register_device(name, Arc::clone(&device))?;
        Ok(device)
    }

    /// Register an already shared device under `name`
    pub fn register_device(name: &str, device: Arc<dyn ComputeDevice>) -> Result<()> {
        let state = Self::state()?;

        let mut devices = state.devices.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("Device registry lock poisoned".to_string())
            ))?;

        if devices.contains_key(name) {
            return Err(Self::log_and_return_error(
                Error::InitializationFailed(format!("Device '{}' already exists", name))
            ));
        }

        crate::engine_info!(
            source::ENGINE,
            "Device '{}' registered ({})", name, device.info().device_name
        );
        devices.insert(name.to_string(), device);
        Ok(())
    }

    /// Shared handle of the device registered under `name`
    pub fn device(name: &str) -> Result<Arc<dyn ComputeDevice>> {
        let state = Self::state()?;

        let devices = state.devices.read()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("Device registry lock poisoned".to_string())
            ))?;

        devices.get(name).cloned().ok_or_else(|| Self::log_and_return_error(
            Error::InvalidResource(format!("Device '{}' not found", name))
        ))
    }

    /// Unregister the device named `name`
    pub fn destroy_device(name: &str) -> Result<()> {
        let state = Self::state()?;

        let mut devices = state.devices.write()
            .map_err(|_| Self::log_and_return_error(
                Error::BackendError("Device registry lock poisoned".to_string())
            ))?;

        if devices.remove(name).is_none() {
            return Err(Self::log_and_return_error(
                Error::InvalidResource(format!("Device '{}' not found", name))
            ));
        }

        crate::engine_info!(source::ENGINE, "Device '{}' destroyed", name);
        Ok(())
    }

    pub fn device_count() -> usize {
        ENGINE_STATE
            .get()
            .and_then(|state| state.devices.read().ok().map(|d| d.len()))
            .unwrap_or(0)
    }

    /// Names of registered devices, sorted
    pub fn device_names() -> Vec<String> {
        let mut names: Vec<String> = ENGINE_STATE
            .get()
            .and_then(|state| state.devices.read().ok().map(|d| d.keys().cloned().collect()))
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Clear all registered devices (test builds only)
    #[cfg(test)]
    pub fn reset_for_testing() {
        Self::shutdown();
    }

    // ===== LOGGING API =====

    /// Replace the logger
    ///
    /// # Example
    ///
    /// ```no_run
    /// use galaxy_nn::galaxynn::{Engine, log::{Logger, LogEntry}};
    ///
    /// struct FileLogger;
    /// impl Logger for FileLogger {
    ///     fn log(&self, entry: &LogEntry) {
    ///         // Write to file...
    ///     }
    /// }
    ///
    /// Engine::set_logger(FileLogger);
    /// ```
    pub fn set_logger<L: Logger + 'static>(new_logger: L) {
        if let Ok(mut lock) = logger().write() {
            *lock = Box::new(new_logger);
        }
    }

    /// Reinstall the console `DefaultLogger`
    pub fn reset_logger() {
        Self::set_logger(DefaultLogger::new());
    }

    /// Deliver an entry without location (engine_info!, engine_warn!, ...)
    pub fn log(severity: LogSeverity, source: &str, message: String) {
        Self::dispatch(&LogEntry::new(severity, source, message));
    }

    /// Deliver an entry carrying file:line (engine_error!, engine_err!)
    pub fn log_detailed(
        severity: LogSeverity,
        source: &str,
        message: String,
        file: &'static str,
        line: u32,
    ) {
        Self::dispatch(&LogEntry::new(severity, source, message).at(file, line));
    }

    fn dispatch(entry: &LogEntry) {
        if let Ok(lock) = logger().read() {
            lock.log(entry);
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
