//! Unit tests for workgroup.rs
//!
//! Covers subgroup alignment invariants and local size fitting against
//! device limits.

use crate::compute::workgroup::{
    align_to_subgroup, fit_to_limits, optimal_local_size, LocalSize, WorkgroupLimits,
};

const SUBGROUP_SIZES: [u32; 11] = [1, 2, 4, 8, 16, 32, 64, 128, 256, 512, 1024];

fn limits(x: u32, y: u32, z: u32, invocations: u32) -> WorkgroupLimits {
    WorkgroupLimits {
        max_size: [x, y, z],
        max_invocations: invocations,
    }
}

// ============================================================================
// LOCAL SIZE TESTS
// ============================================================================

#[test]
fn test_local_size_default_is_one() {
    assert_eq!(LocalSize::default(), LocalSize::new(1, 1, 1));
    assert_eq!(LocalSize::default().invocations(), 1);
}

#[test]
fn test_local_size_unset() {
    assert!(LocalSize::new(0, 0, 0).is_unset());
    assert!(!LocalSize::new(0, 0, 1).is_unset());
}

#[test]
fn test_local_size_from_tuple() {
    let size: LocalSize = (8, 4, 2).into();
    assert_eq!(size, LocalSize::new(8, 4, 2));
    assert_eq!(size.invocations(), 64);
}

#[test]
fn test_limits_admits() {
    let l = limits(64, 64, 64, 256);
    assert!(l.admits(LocalSize::new(16, 16, 1)));
    assert!(!l.admits(LocalSize::new(16, 16, 2)));
    assert!(!l.admits(LocalSize::new(128, 1, 1)));
    assert!(!l.admits(LocalSize::new(0, 1, 1)));
}

// ============================================================================
// SUBGROUP ALIGNMENT TESTS
// ============================================================================

#[test]
fn test_align_never_shrinks_and_is_multiple() {
    for s in SUBGROUP_SIZES {
        for x in 1..=20u32 {
            for y in 1..=20u32 {
                for z in 1..=12u32 {
                    let (ax, ay, az) = align_to_subgroup(x, y, z, s);
                    assert!(ax >= x && ay >= y && az >= z, "shrunk {:?} for s={}", (x, y, z), s);
                    let product = ax as u64 * ay as u64 * az as u64;
                    assert_eq!(product % s as u64, 0, "{:?} -> {:?} for s={}", (x, y, z), (ax, ay, az), s);
                }
            }
        }
    }
}

#[test]
fn test_align_only_x_changes_when_y_and_z_are_one() {
    for s in SUBGROUP_SIZES {
        for x in 1..=300u32 {
            let (ax, ay, az) = align_to_subgroup(x, 1, 1, s);
            assert_eq!((ay, az), (1, 1));
            assert!(ax >= x);
            assert_eq!(ax % s, 0);
        }
    }
}

#[test]
fn test_align_keeps_axes_fixed_at_one() {
    // x and z fixed at 1: only y grows
    assert_eq!(align_to_subgroup(1, 5, 1, 8), (1, 8, 1));
    // x and y fixed at 1: only z grows
    assert_eq!(align_to_subgroup(1, 1, 3, 16), (1, 1, 16));
    // z fixed at 1: x and y share the missing factor
    let (x, y, z) = align_to_subgroup(6, 3, 1, 8);
    assert_eq!(z, 1);
    assert_eq!((x * y) % 8, 0);
    assert_eq!((x, y), (8, 4));
    // y fixed at 1
    let (x, y, z) = align_to_subgroup(3, 1, 3, 16);
    assert_eq!(y, 1);
    assert_eq!((x * z) % 16, 0);
    // x fixed at 1
    let (x, y, z) = align_to_subgroup(1, 3, 3, 16);
    assert_eq!(x, 1);
    assert_eq!((y * z) % 16, 0);
}

#[test]
fn test_align_three_way_split() {
    // need = 6 bits spread as 2 / 2 / 2
    assert_eq!(align_to_subgroup(3, 5, 7, 64), (4, 8, 8));
}

#[test]
fn test_align_already_multiple_is_unchanged() {
    assert_eq!(align_to_subgroup(8, 8, 1, 64), (8, 8, 1));
    assert_eq!(align_to_subgroup(4, 4, 8, 32), (4, 4, 8));
    assert_eq!(align_to_subgroup(7, 3, 5, 1), (7, 3, 5));
}

#[test]
fn test_align_all_ones_grows_x() {
    assert_eq!(align_to_subgroup(1, 1, 1, 32), (32, 1, 1));
}

#[test]
fn test_align_ignores_non_power_of_two() {
    assert_eq!(align_to_subgroup(3, 3, 3, 24), (3, 3, 3));
    assert_eq!(align_to_subgroup(3, 3, 3, 0), (3, 3, 3));
}

// ============================================================================
// FIT / OPTIMAL LOCAL SIZE TESTS
// ============================================================================

#[test]
fn test_zero_desired_resolves_to_default() {
    let l = limits(1024, 1024, 64, 1024);
    assert_eq!(fit_to_limits(LocalSize::new(0, 0, 0), &l), LocalSize::new(4, 4, 4));
    assert_eq!(optimal_local_size(LocalSize::new(0, 0, 0), &l, 1), LocalSize::new(4, 4, 4));
    assert_eq!(optimal_local_size(LocalSize::new(0, 0, 0), &l, 32), LocalSize::new(4, 4, 4));
}

#[test]
fn test_fit_clamps_each_axis() {
    let l = limits(16, 8, 4, 4096);
    assert_eq!(fit_to_limits(LocalSize::new(100, 100, 100), &l), LocalSize::new(16, 8, 4));
}

#[test]
fn test_fit_halves_x_and_y_holding_z() {
    let l = limits(64, 64, 64, 256);
    assert_eq!(fit_to_limits(LocalSize::new(8, 8, 8), &l), LocalSize::new(2, 2, 8));
    assert_eq!(fit_to_limits(LocalSize::new(64, 64, 1), &l), LocalSize::new(2, 2, 1));
    assert_eq!(fit_to_limits(LocalSize::new(32, 32, 4), &l), LocalSize::new(2, 2, 4));
}

#[test]
fn test_fit_threshold_is_square_root_of_xy_budget() {
    // budget per z-slice 1024, threshold 32: 1024x1024 -> 4x4 (16 < 32)
    let l = limits(1024, 1024, 64, 1024);
    assert_eq!(fit_to_limits(LocalSize::new(1024, 1024, 1), &l), LocalSize::new(4, 4, 1));
    // z is clamped to the budget, leaving a threshold of 1
    let l = limits(64, 64, 64, 32);
    assert_eq!(fit_to_limits(LocalSize::new(8, 8, 64), &l), LocalSize::new(1, 1, 32));
}

#[test]
fn test_reference_device_8x8x8_aligned_size() {
    let l = limits(64, 64, 64, 256);
    assert_eq!(optimal_local_size(LocalSize::new(8, 8, 8), &l, 32), LocalSize::new(2, 2, 8));
    assert_eq!(optimal_local_size(LocalSize::new(64, 64, 1), &l, 32), LocalSize::new(8, 4, 1));
}

#[test]
fn test_reference_device_8x8x8() {
    let l = limits(64, 64, 64, 256);
    let pre_alignment = fit_to_limits(LocalSize::new(8, 8, 8), &l);
    let result = optimal_local_size(LocalSize::new(8, 8, 8), &l, 32);

    assert_eq!(result.invocations() % 32, 0);
    assert!(result.invocations() <= 256);
    assert!(result.x >= pre_alignment.x);
    assert!(result.y >= pre_alignment.y);
    assert!(result.z >= pre_alignment.z);
}

#[test]
fn test_optimal_never_exceeds_limits() {
    let device_limits = [
        limits(64, 64, 64, 256),
        limits(1024, 1024, 64, 1024),
        limits(256, 256, 64, 128),
        limits(32, 16, 4, 64),
        limits(128, 128, 128, 32),
    ];

    for l in &device_limits {
        for s in [1u32, 8, 16, 32, 64, 128] {
            for x in (0..=300u32).step_by(13) {
                for y in (0..=300u32).step_by(17) {
                    for z in [0u32, 1, 2, 3, 7, 16, 64, 200] {
                        let result = optimal_local_size(LocalSize::new(x, y, z), l, s);
                        assert!(l.admits(result), "{:?} produced {:?} on {:?}", (x, y, z), result, l);
                    }
                }
            }
        }
    }
}

#[test]
fn test_optimal_falls_back_to_fitted_when_alignment_cannot_fit() {
    // x may grow to at most 4, but a 32-lane subgroup would need x = 32
    let l = limits(4, 64, 64, 1024);
    let result = optimal_local_size(LocalSize::new(3, 1, 1), &l, 32);
    assert_eq!(result, LocalSize::new(3, 1, 1));
}

#[test]
fn test_optimal_z_above_invocation_budget_is_clamped() {
    let l = limits(64, 64, 64, 32);
    let result = optimal_local_size(LocalSize::new(1, 1, 64), &l, 1);
    assert_eq!(result, LocalSize::new(1, 1, 32));
}
