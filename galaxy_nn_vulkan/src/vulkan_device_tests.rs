//! Unit tests for vulkan_device.rs capability mapping (no GPU required)

use super::*;

fn limits() -> vk::PhysicalDeviceLimits {
    vk::PhysicalDeviceLimits {
        max_compute_work_group_size: [1024, 1024, 64],
        max_compute_work_group_invocations: 1024,
        ..Default::default()
    }
}

#[test]
fn test_device_info_full_support() {
    let support = FeatureSupport {
        storage_16bit: true,
        shader_float16: true,
        int8_storage: true,
        ycbcr_conversion: true,
        subgroup_size_control: true,
        push_descriptor: true,
    };
    let subgroup = SubgroupCaps { default: 32, min: 16, max: 64 };

    let info = build_device_info("GPU".to_string(), &limits(), subgroup, support);

    assert_eq!(info.device_name, "GPU");
    assert_eq!(info.max_workgroup_size, [1024, 1024, 64]);
    assert_eq!(info.max_workgroup_invocations, 1024);
    assert_eq!((info.subgroup_size, info.min_subgroup_size, info.max_subgroup_size), (32, 16, 64));
    assert_eq!(info.features, DeviceFeatures::all());
}

#[test]
fn test_device_info_without_subgroup_control_pins_size() {
    let subgroup = SubgroupCaps { default: 64, min: 0, max: 0 };

    let info = build_device_info("GPU".to_string(), &limits(), subgroup, FeatureSupport::default());

    assert_eq!((info.subgroup_size, info.min_subgroup_size, info.max_subgroup_size), (64, 64, 64));
    assert_eq!(info.clamp_subgroup_size(16), 64);
}

#[test]
fn test_device_info_baseline_features() {
    let subgroup = SubgroupCaps { default: 32, min: 32, max: 32 };

    let info = build_device_info("GPU".to_string(), &limits(), subgroup, FeatureSupport::default());

    assert!(info.support_descriptor_update_template());
    assert!(info.supports(DeviceFeatures::FP16_PACKED));
    assert!(!info.support_push_descriptor());
    assert!(!info.support_16bit_storage());
    assert!(!info.supports(DeviceFeatures::SAMPLER_YCBCR_CONVERSION));
}

#[test]
fn test_device_info_zero_subgroup_is_sanitized() {
    let subgroup = SubgroupCaps { default: 0, min: 0, max: 0 };

    let info = build_device_info("GPU".to_string(), &limits(), subgroup, FeatureSupport::default());
    assert_eq!(info.subgroup_size, 1);
}
