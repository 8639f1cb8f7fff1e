//! Unit tests for variant.rs

use std::sync::Arc;
use crate::compute::mock_device::{MockComputeDevice, MockObjectKind};
use crate::compute::{
    ColorConversion, ComputeDevice, ComputeOptions, ComputePipelineVariant,
    ExternalImageAllocator, HardwareBufferImportPipeline, Orientation, Pipeline, YcbcrConversion,
};

struct FrameConversion;

impl YcbcrConversion for FrameConversion {
    fn raw_handle(&self) -> u64 { 2 }
}

struct Frame;

impl ExternalImageAllocator for Frame {
    fn width(&self) -> u32 { 640 }
    fn height(&self) -> u32 { 480 }
    fn external_format(&self) -> u64 { 1 }
    fn ycbcr_conversion(&self) -> Arc<dyn YcbcrConversion> { Arc::new(FrameConversion) }
}

#[test]
fn test_generic_variant() {
    let mock = Arc::new(MockComputeDevice::new());
    let device: Arc<dyn ComputeDevice> = mock.clone();

    let mut pipeline = Pipeline::new(device);
    pipeline.create(&[0x0723_0203, 5], &[]).unwrap();

    let mut variant = ComputePipelineVariant::from(pipeline);
    assert!(matches!(variant, ComputePipelineVariant::Generic(_)));
    assert!(variant.is_created());

    variant.destroy();
    assert!(!variant.is_created());
}

#[test]
fn test_import_variant() {
    let mock = Arc::new(MockComputeDevice::new());
    let device: Arc<dyn ComputeDevice> = mock.clone();

    let mut pipeline = HardwareBufferImportPipeline::new(device);
    pipeline
        .create(&Frame, ColorConversion::Rgb, Orientation::TopLeft, &ComputeOptions::default())
        .unwrap();

    let mut variant: ComputePipelineVariant = pipeline.into();
    assert!(variant.pipeline().pipeline().is_some());

    variant.destroy();
    assert!(!variant.is_created());
    assert_eq!(mock.tracker().live(MockObjectKind::Sampler), 0);
}
