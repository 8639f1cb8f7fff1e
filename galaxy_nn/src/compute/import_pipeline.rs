//! Hardware buffer import pipeline
//!
//! Imports a platform-allocated YCbCr image (camera frame, video decoder
//! output) into a tensor blob in one dispatch: color conversion, optional
//! resize and EXIF rotation happen in the `convert_ycbcr` shader. The image
//! is read through an immutable sampler carrying the YCbCr conversion, so the
//! sampler is baked into the descriptor set layout.

use std::fmt;
use std::sync::Arc;
use crate::error::{Error, Result};
use crate::log::source;
use crate::compute::{
    align_to_subgroup, ComputeDevice, ComputeOptions, DescriptorBindingType,
    DescriptorSetLayoutBinding, DescriptorSetLayoutDesc, DeviceFeatures, DeviceInfo,
    ExternalSamplerDesc, LocalSize, Pipeline, Sampler, SamplerFilter, ShaderVariant,
    SpecializationValue, YcbcrConversion, CONVERT_YCBCR_SHADER_INDEX,
};
use crate::compute::pipeline::{check_specializations, create_pipeline_handles};

/// Local size of the import dispatch (2-D tiles)
pub const IMPORT_LOCAL_SIZE: LocalSize = LocalSize::new(8, 8, 1);

/// Source of an externally allocated image
pub trait ExternalImageAllocator: Send + Sync {
    /// Image width in pixels
    fn width(&self) -> u32;

    /// Image height in pixels
    fn height(&self) -> u32;

    /// Opaque platform format token
    fn external_format(&self) -> u64;

    /// YCbCr conversion matching `external_format`
    fn ycbcr_conversion(&self) -> Arc<dyn YcbcrConversion>;
}

// ===== COLOR CONVERSION =====

/// Target color layout of the imported blob
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ColorConversion {
    Rgb = 1,
    Bgr = 2,
    Gray = 3,
    Rgba = 4,
    Bgra = 5,
}

/// Shape of one output element for a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputLayout {
    pub channels: u32,
    /// Bytes per element (a packed element counts as one)
    pub elemsize: usize,
    pub elempack: u32,
}

impl ColorConversion {
    /// Value passed to the shader
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            1 => Ok(ColorConversion::Rgb),
            2 => Ok(ColorConversion::Bgr),
            3 => Ok(ColorConversion::Gray),
            4 => Ok(ColorConversion::Rgba),
            5 => Ok(ColorConversion::Bgra),
            _ => Err(Error::InvalidResource(format!("Unknown color conversion {}", code))),
        }
    }

    /// Output blob layout on `info` with `options`
    pub fn output_layout(self, info: &DeviceInfo, options: &ComputeOptions) -> OutputLayout {
        let fp16_storage = options.use_fp16_storage && info.supports(DeviceFeatures::STORAGE_16BIT);
        let fp16_packed = options.use_fp16_packed && info.supports(DeviceFeatures::FP16_PACKED);

        match self {
            ColorConversion::Rgb | ColorConversion::Bgr => OutputLayout {
                channels: 3,
                elemsize: if fp16_storage { 2 } else { 4 },
                elempack: 1,
            },
            ColorConversion::Gray => OutputLayout {
                channels: 1,
                elemsize: if fp16_storage { 2 } else { 4 },
                elempack: 1,
            },
            ColorConversion::Rgba | ColorConversion::Bgra => OutputLayout {
                channels: 1,
                elemsize: if fp16_packed || fp16_storage { 8 } else { 16 },
                elempack: 4,
            },
        }
    }
}

// ===== ORIENTATION =====

/// EXIF orientation of the source image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Orientation {
    TopLeft = 1,
    TopRight = 2,
    BottomRight = 3,
    BottomLeft = 4,
    LeftTop = 5,
    RightTop = 6,
    RightBottom = 7,
    LeftBottom = 8,
}

impl Orientation {
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            1 => Ok(Orientation::TopLeft),
            2 => Ok(Orientation::TopRight),
            3 => Ok(Orientation::BottomRight),
            4 => Ok(Orientation::BottomLeft),
            5 => Ok(Orientation::LeftTop),
            6 => Ok(Orientation::RightTop),
            7 => Ok(Orientation::RightBottom),
            8 => Ok(Orientation::LeftBottom),
            _ => Err(Error::InvalidResource(format!("Orientation {} out of range 1..=8", code))),
        }
    }

    /// Orientations 5-8 transpose the image
    pub fn swaps_axes(self) -> bool {
        self.code() >= 5
    }
}

// ===== GEOMETRY =====

/// Source and target extent of an import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportGeometry {
    pub src_width: u32,
    pub src_height: u32,
    pub target_width: u32,
    pub target_height: u32,
    pub need_resize: bool,
}

impl ImportGeometry {
    /// Target defaults to the source extent after rotation
    pub fn resolve(
        src_width: u32,
        src_height: u32,
        orientation: Orientation,
        target: Option<(u32, u32)>,
    ) -> Self {
        let rotated = if orientation.swaps_axes() {
            (src_height, src_width)
        } else {
            (src_width, src_height)
        };
        let (target_width, target_height) = target.unwrap_or(rotated);

        Self {
            src_width,
            src_height,
            target_width,
            target_height,
            need_resize: (target_width, target_height) != rotated,
        }
    }

    /// Shader constants in declaration order
    pub fn specializations(
        &self,
        type_to: ColorConversion,
        rotate_from: Orientation,
    ) -> [SpecializationValue; 7] {
        [
            SpecializationValue::Int(self.src_width as i32),
            SpecializationValue::Int(self.src_height as i32),
            SpecializationValue::Int(self.target_width as i32),
            SpecializationValue::Int(self.target_height as i32),
            SpecializationValue::Int(type_to.code()),
            SpecializationValue::Int(rotate_from.code()),
            SpecializationValue::from(self.need_resize),
        ]
    }
}

// ===== PIPELINE =====

/// Pipeline importing an external YCbCr image
///
/// Single shot: `create` succeeds at most once per instance. On failure
/// nothing created during the attempt survives and the instance stays empty.
pub struct HardwareBufferImportPipeline {
    base: Pipeline,
    sampler: Option<Arc<dyn Sampler>>,
    type_to: Option<ColorConversion>,
    rotate_from: Option<Orientation>,
    geometry: Option<ImportGeometry>,
    built: bool,
}

impl HardwareBufferImportPipeline {
    pub fn new(device: Arc<dyn ComputeDevice>) -> Self {
        Self {
            base: Pipeline::new(device),
            sampler: None,
            type_to: None,
            rotate_from: None,
            geometry: None,
            built: false,
        }
    }

    /// Build with the target extent equal to the rotated source
    pub fn create(
        &mut self,
        allocator: &dyn ExternalImageAllocator,
        type_to: ColorConversion,
        rotate_from: Orientation,
        options: &ComputeOptions,
    ) -> Result<()> {
        self.build(allocator, type_to, rotate_from, None, options)
    }

    /// Build with an explicit target extent (resizes when it differs)
    pub fn create_with_target(
        &mut self,
        allocator: &dyn ExternalImageAllocator,
        type_to: ColorConversion,
        rotate_from: Orientation,
        target_width: u32,
        target_height: u32,
        options: &ComputeOptions,
    ) -> Result<()> {
        self.build(allocator, type_to, rotate_from, Some((target_width, target_height)), options)
    }

    fn build(
        &mut self,
        allocator: &dyn ExternalImageAllocator,
        type_to: ColorConversion,
        rotate_from: Orientation,
        target: Option<(u32, u32)>,
        options: &ComputeOptions,
    ) -> Result<()> {
        if self.built {
            crate::engine_warn!(
                source::IMPORT_PIPELINE,
                "Import pipeline already created"
            );
            return Err(Error::InvalidState("import pipeline is single-shot".to_string()));
        }

        let (width, height) = (allocator.width(), allocator.height());
        if width == 0 || height == 0 {
            crate::engine_bail_warn!(
                source::IMPORT_PIPELINE,
                "External image has empty extent {}x{}", width, height
            );
        }
        if let Some((tw, th)) = target {
            if tw == 0 || th == 0 {
                crate::engine_bail_warn!(
                    source::IMPORT_PIPELINE,
                    "Empty target extent {}x{}", tw, th
                );
            }
        }

        let device = Arc::clone(self.base.device());
        let info = device.info();

        let geometry = ImportGeometry::resolve(width, height, rotate_from, target);
        let subgroup_size = self.base.subgroup_size();
        let (lx, ly, lz) = align_to_subgroup(
            IMPORT_LOCAL_SIZE.x,
            IMPORT_LOCAL_SIZE.y,
            IMPORT_LOCAL_SIZE.z,
            subgroup_size,
        );
        let local_size = LocalSize::new(lx, ly, lz);
        let specializations = geometry.specializations(type_to, rotate_from);

        let variant = ShaderVariant::select(info, options);
        let (_, spirv) = device.shader_library().lookup(CONVERT_YCBCR_SHADER_INDEX, variant)?;

        let shader_module = device.create_shader_module(&spirv)?;
        let shader_info = shader_module.shader_info().clone();
        check_specializations(
            source::IMPORT_PIPELINE,
            &shader_info,
            &specializations,
        )?;

        let sampler = device.create_sampler(&ExternalSamplerDesc {
            filter: if geometry.need_resize { SamplerFilter::Linear } else { SamplerFilter::Nearest },
            unnormalized_coordinates: true,
            external_format: allocator.external_format(),
            ycbcr_conversion: Some(allocator.ycbcr_conversion()),
        })?;

        let descriptorset_layout = device.create_descriptorset_layout(&DescriptorSetLayoutDesc {
            bindings: vec![
                DescriptorSetLayoutBinding {
                    binding: 0,
                    binding_type: DescriptorBindingType::CombinedImageSampler,
                    immutable_sampler: Some(Arc::clone(&sampler)),
                },
                DescriptorSetLayoutBinding {
                    binding: 1,
                    binding_type: DescriptorBindingType::StorageBuffer,
                    immutable_sampler: None,
                },
                DescriptorSetLayoutBinding {
                    binding: 2,
                    binding_type: DescriptorBindingType::StorageBuffer,
                    immutable_sampler: None,
                },
            ],
            push_descriptor: info.support_push_descriptor(),
        })?;

        let handles = create_pipeline_handles(
            device.as_ref(),
            shader_module,
            descriptorset_layout,
            &specializations,
            local_size,
            subgroup_size,
        )?;

        // Everything exists: commit
        self.base.set_local_size_xyz(lx, ly, lz);
        self.base.install(handles, shader_info);
        self.sampler = Some(sampler);
        self.type_to = Some(type_to);
        self.rotate_from = Some(rotate_from);
        self.geometry = Some(geometry);
        self.built = true;

        crate::engine_debug!(
            source::IMPORT_PIPELINE,
            "Import {}x{} -> {}x{} ({:?}, {:?}, resize={})",
            geometry.src_width, geometry.src_height,
            geometry.target_width, geometry.target_height,
            type_to, rotate_from, geometry.need_resize
        );

        Ok(())
    }

    /// Release the sampler and the pipeline handles
    pub fn destroy(&mut self) {
        self.base.destroy();
        self.sampler = None;
    }

    // ===== ACCESSORS =====

    pub fn pipeline(&self) -> &Pipeline {
        &self.base
    }

    pub fn is_created(&self) -> bool {
        self.base.is_created()
    }

    pub fn sampler(&self) -> Option<&Arc<dyn Sampler>> {
        self.sampler.as_ref()
    }

    pub fn type_to(&self) -> Option<ColorConversion> {
        self.type_to
    }

    pub fn rotate_from(&self) -> Option<Orientation> {
        self.rotate_from
    }

    pub fn geometry(&self) -> Option<&ImportGeometry> {
        self.geometry.as_ref()
    }

    pub fn need_resize(&self) -> bool {
        self.geometry.is_some_and(|g| g.need_resize)
    }
}

impl Drop for HardwareBufferImportPipeline {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl fmt::Debug for HardwareBufferImportPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HardwareBufferImportPipeline")
            .field("base", &self.base)
            .field("sampler", &self.sampler.as_ref().map(|s| s.raw_handle()))
            .field("type_to", &self.type_to)
            .field("rotate_from", &self.rotate_from)
            .field("geometry", &self.geometry)
            .finish()
    }
}

#[cfg(test)]
#[path = "import_pipeline_tests.rs"]
mod tests;
