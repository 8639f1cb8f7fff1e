//! Unit tests for debug.rs (message filtering, no Vulkan instance needed)

use super::*;
use serial_test::serial;

fn config(severity: DebugSeverity) -> Config {
    Config {
        severity,
        output: DebugOutput::Logger,
        message_filter: DebugMessageFilter::default(),
        break_on_error: false,
        panic_on_error: false,
        enable_stats: true,
    }
}

#[test]
fn test_severity_flags() {
    use vk::DebugUtilsMessageSeverityFlagsEXT as S;

    assert_eq!(severity_flags(DebugSeverity::ErrorsOnly), S::ERROR);
    assert_eq!(severity_flags(DebugSeverity::ErrorsAndWarnings), S::ERROR | S::WARNING);
    assert!(severity_flags(DebugSeverity::All).contains(S::VERBOSE | S::INFO));
}

#[test]
fn test_filter_by_severity() {
    use vk::DebugUtilsMessageSeverityFlagsEXT as S;
    let validation = vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION;

    let errors_only = config(DebugSeverity::ErrorsOnly);
    assert!(passes_filter(&errors_only, S::ERROR, validation));
    assert!(!passes_filter(&errors_only, S::WARNING, validation));

    let all = config(DebugSeverity::All);
    assert!(passes_filter(&all, S::VERBOSE, validation));
}

#[test]
fn test_filter_by_category() {
    use vk::DebugUtilsMessageTypeFlagsEXT as T;
    let error = vk::DebugUtilsMessageSeverityFlagsEXT::ERROR;

    let cfg = config(DebugSeverity::All);
    assert!(passes_filter(&cfg, error, T::VALIDATION));
    assert!(passes_filter(&cfg, error, T::GENERAL));
    // Performance hints are hidden by default
    assert!(!passes_filter(&cfg, error, T::PERFORMANCE));
}

#[test]
#[serial]
fn test_stats_reset_on_init() {
    VALIDATION_STATS.record(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR);
    VALIDATION_STATS.record(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING);
    assert!(get_validation_stats().total() >= 2);

    init_debug_config(config(DebugSeverity::All));
    assert_eq!(get_validation_stats(), ValidationStats::default());

    cleanup_debug_config();
}

#[test]
#[serial]
fn test_track_message_counts_repeats() {
    init_debug_config(config(DebugSeverity::All));

    assert_eq!(track_message("same"), 1);
    assert_eq!(track_message("same"), 2);
    assert_eq!(track_message("other"), 1);

    cleanup_debug_config();
}
