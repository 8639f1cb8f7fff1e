/// Vulkan device configuration and validation-layer debug settings

/// Which validation messages are reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugSeverity {
    ErrorsOnly,
    ErrorsAndWarnings,
    All,
}

/// Where validation messages are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebugOutput {
    /// Colored console output on stderr
    Console,
    /// Forwarded to the engine logger (source `galaxynn::vulkan::validation`)
    Logger,
    /// Appended to a log file
    File(String),
    /// Console and log file
    Both(String),
}

/// Message category filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugMessageFilter {
    pub show_general: bool,
    pub show_validation: bool,
    pub show_performance: bool,
}

impl Default for DebugMessageFilter {
    fn default() -> Self {
        Self {
            show_general: true,
            show_validation: true,
            show_performance: false,
        }
    }
}

/// Validation message counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationStats {
    pub errors: u32,
    pub warnings: u32,
    pub info: u32,
    pub verbose: u32,
}

impl ValidationStats {
    pub fn total(&self) -> u32 {
        self.errors + self.warnings + self.info + self.verbose
    }
}

/// Configuration for `VulkanComputeDevice::new`
///
/// Validation fields only take effect when the crate is built with the
/// `vulkan-validation` feature.
#[derive(Debug, Clone)]
pub struct VulkanDeviceConfig {
    /// Application name reported to the driver
    pub app_name: String,
    /// Index into the enumerated physical devices
    pub physical_device_index: usize,
    /// Enable VK_LAYER_KHRONOS_validation and the debug messenger
    pub enable_validation: bool,
    pub debug_severity: DebugSeverity,
    pub debug_output: DebugOutput,
    pub debug_message_filter: DebugMessageFilter,
    /// Abort the process on a validation error (debugger attachment)
    pub break_on_validation_error: bool,
    /// Panic on a validation error
    pub panic_on_error: bool,
    pub enable_validation_stats: bool,
}

impl Default for VulkanDeviceConfig {
    fn default() -> Self {
        Self {
            app_name: "Galaxy NN".to_string(),
            physical_device_index: 0,
            enable_validation: cfg!(debug_assertions),
            debug_severity: DebugSeverity::ErrorsAndWarnings,
            debug_output: DebugOutput::Logger,
            debug_message_filter: DebugMessageFilter::default(),
            break_on_validation_error: false,
            panic_on_error: false,
            enable_validation_stats: true,
        }
    }
}
