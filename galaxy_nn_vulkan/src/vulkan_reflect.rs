/// SPIR-V reflection into `ShaderInfo` using spirq

use galaxy_nn::galaxynn::log::source;
use galaxy_nn::galaxynn::Result;
use galaxy_nn::galaxynn::compute::{DescriptorBindingType, ShaderInfo};
use galaxy_nn::{engine_err, engine_bail, engine_warn};

/// First specialization id reserved for the workgroup local size (x, y, z)
pub const LOCAL_SIZE_SPECIALIZATION_ID: u32 = 233;

/// Reflect specialization constants, push constants and set-0 bindings
///
/// Specialization ids from `LOCAL_SIZE_SPECIALIZATION_ID` up are filled from
/// the pipeline local size and are not counted. The specialization count is
/// the highest remaining id plus one. The push constant count is the member
/// count of the push constant block.
pub fn resolve_shader_info(spirv: &[u32]) -> Result<ShaderInfo> {
    let entry_points = spirq::ReflectConfig::new()
        .spv(spirv)
        .ref_all_rscs(true)
        .reflect()
        .map_err(|e| engine_err!(source::VULKAN, "SPIR-V reflection failed: {:?}", e))?;

    let mut specialization_count = 0u32;
    let mut push_constant_count = 0u32;
    let mut bindings: Vec<Option<DescriptorBindingType>> = Vec::new();

    for entry_point in &entry_points {
        for var in entry_point.vars.iter() {
            match var {
                spirq::var::Variable::SpecConstant { spec_id, .. } => {
                    let id = *spec_id;
                    if id < LOCAL_SIZE_SPECIALIZATION_ID {
                        specialization_count = specialization_count.max(id + 1);
                    }
                }
                spirq::var::Variable::PushConstant { ty, .. } => {
                    if let spirq::ty::Type::Struct(st) = ty {
                        push_constant_count = push_constant_count.max(st.members.len() as u32);
                    }
                }
                spirq::var::Variable::Descriptor { desc_bind, desc_ty, .. } => {
                    if desc_bind.set() != 0 {
                        engine_bail!(source::VULKAN,
                            "Descriptor set {} is not supported, compute shaders use set 0 only",
                            desc_bind.set());
                    }
                    let binding = desc_bind.bind() as usize;
                    if bindings.len() <= binding {
                        bindings.resize(binding + 1, None);
                    }
                    bindings[binding] = Some(descriptor_binding_type(desc_ty)?);
                }
                _ => {}
            }
        }
    }

    let binding_types = bindings
        .into_iter()
        .enumerate()
        .map(|(binding, ty)| {
            ty.unwrap_or_else(|| {
                engine_warn!(source::VULKAN,
                    "Binding {} unused by shader, declared as storage buffer", binding);
                DescriptorBindingType::StorageBuffer
            })
        })
        .collect();

    Ok(ShaderInfo::new(specialization_count, push_constant_count, binding_types))
}

fn descriptor_binding_type(desc_ty: &spirq::ty::DescriptorType) -> Result<DescriptorBindingType> {
    use spirq::ty::DescriptorType;
    match desc_ty {
        DescriptorType::StorageBuffer(..) => Ok(DescriptorBindingType::StorageBuffer),
        DescriptorType::StorageImage(..) => Ok(DescriptorBindingType::StorageImage),
        DescriptorType::CombinedImageSampler() => Ok(DescriptorBindingType::CombinedImageSampler),
        DescriptorType::SampledImage() => Ok(DescriptorBindingType::CombinedImageSampler),
        other => {
            engine_bail!(source::VULKAN, "Unsupported descriptor type in compute shader: {:?}", other);
        }
    }
}

#[cfg(test)]
#[path = "vulkan_reflect_tests.rs"]
mod tests;
