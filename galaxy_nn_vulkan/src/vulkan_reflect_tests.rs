//! Unit tests for vulkan_reflect.rs
//!
//! The SPIR-V below is a hand-assembled compute module equivalent to:
//!
//! ```glsl
//! layout (constant_id = 0) const int a = 0;
//! layout (constant_id = 1) const float b = 0;
//! layout (local_size_x_id = 233) in;
//! layout (push_constant) uniform P { uint w; float scale; } p;
//! layout (binding = 0) buffer A { uint a_data[]; };
//! layout (binding = 1) buffer B { uint b_data[]; };
//! void main() {}
//! ```

use super::*;
use galaxy_nn::galaxynn::Error;

const fn op(word_count: u32, opcode: u32) -> u32 {
    (word_count << 16) | opcode
}

/// "main\0" packed little-endian
const MAIN: [u32; 2] = [0x6e69_616d, 0];

fn reflect_module() -> Vec<u32> {
    let mut words = vec![0x0723_0203, 0x0001_0000, 0, 19, 0];

    // Capability Shader, MemoryModel Logical GLSL450
    words.extend([op(2, 17), 1]);
    words.extend([op(3, 14), 0, 1]);
    // EntryPoint GLCompute %3 "main", ExecutionMode LocalSize 1 1 1
    words.extend([op(5, 15), 5, 3, MAIN[0], MAIN[1]]);
    words.extend([op(6, 16), 3, 17, 1, 1, 1]);

    // SpecId decorations
    words.extend([op(4, 71), 7, 1, 0]);
    words.extend([op(4, 71), 8, 1, 1]);
    words.extend([op(4, 71), 9, 1, 233]);
    // Push constant block
    words.extend([op(5, 72), 10, 0, 35, 0]);
    words.extend([op(5, 72), 10, 1, 35, 4]);
    words.extend([op(3, 71), 10, 2]);
    // Storage buffer block
    words.extend([op(4, 71), 13, 6, 4]);
    words.extend([op(5, 72), 14, 0, 35, 0]);
    words.extend([op(3, 71), 14, 3]);
    words.extend([op(4, 71), 16, 34, 0]);
    words.extend([op(4, 71), 16, 33, 0]);
    words.extend([op(4, 71), 17, 34, 0]);
    words.extend([op(4, 71), 17, 33, 1]);

    // Types
    words.extend([op(2, 19), 1]);
    words.extend([op(3, 33), 2, 1]);
    words.extend([op(4, 21), 4, 32, 0]);
    words.extend([op(4, 21), 5, 32, 1]);
    words.extend([op(3, 22), 6, 32]);
    // Specialization constants
    words.extend([op(4, 50), 5, 7, 0]);
    words.extend([op(4, 50), 6, 8, 0]);
    words.extend([op(4, 50), 4, 9, 1]);
    // Push constants
    words.extend([op(4, 30), 10, 4, 6]);
    words.extend([op(4, 32), 11, 9, 10]);
    words.extend([op(4, 59), 11, 12, 9]);
    // Buffers
    words.extend([op(3, 29), 13, 4]);
    words.extend([op(3, 30), 14, 13]);
    words.extend([op(4, 32), 15, 2, 14]);
    words.extend([op(4, 59), 15, 16, 2]);
    words.extend([op(4, 59), 15, 17, 2]);

    // void main() {}
    words.extend([op(5, 54), 1, 3, 0, 2]);
    words.extend([op(2, 248), 18]);
    words.extend([op(1, 253)]);
    words.extend([op(1, 56)]);

    words
}

#[test]
fn test_resolve_counts() {
    let info = resolve_shader_info(&reflect_module()).unwrap();

    // id 233 is the local size and is not counted
    assert_eq!(info.specialization_count, 2);
    assert_eq!(info.push_constant_count, 2);
    assert_eq!(info.binding_count, 2);
    assert_eq!(
        info.binding_types,
        vec![DescriptorBindingType::StorageBuffer, DescriptorBindingType::StorageBuffer]
    );
}

#[test]
fn test_invalid_spirv_is_backend_error() {
    let result = resolve_shader_info(&[0xDEAD_BEEF, 1, 2]);
    assert!(matches!(result, Err(Error::BackendError(_))));
}
