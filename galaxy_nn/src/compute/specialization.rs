/// Specialization constant values
///
/// Each value occupies one 32-bit slot; the position in the list is the
/// constant id the shader declares.

/// One specialization constant value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpecializationValue {
    /// Signed integer constant
    Int(i32),
    /// Floating point constant
    Float(f32),
    /// Unsigned integer constant
    UInt(u32),
}

impl SpecializationValue {
    /// Raw 32-bit pattern as uploaded to the driver
    pub fn to_bits(&self) -> u32 {
        match *self {
            SpecializationValue::Int(v) => bytemuck::cast(v),
            SpecializationValue::Float(v) => v.to_bits(),
            SpecializationValue::UInt(v) => v,
        }
    }

    /// Discriminant used when hashing a value list (floats compare by bits)
    pub(crate) fn tag(&self) -> u8 {
        match self {
            SpecializationValue::Int(_) => 0,
            SpecializationValue::Float(_) => 1,
            SpecializationValue::UInt(_) => 2,
        }
    }
}

impl From<i32> for SpecializationValue {
    fn from(v: i32) -> Self {
        SpecializationValue::Int(v)
    }
}

impl From<f32> for SpecializationValue {
    fn from(v: f32) -> Self {
        SpecializationValue::Float(v)
    }
}

impl From<u32> for SpecializationValue {
    fn from(v: u32) -> Self {
        SpecializationValue::UInt(v)
    }
}

impl From<bool> for SpecializationValue {
    fn from(v: bool) -> Self {
        SpecializationValue::Int(v as i32)
    }
}

/// Pack a value list into the contiguous words a backend uploads
pub fn pack_specializations(values: &[SpecializationValue]) -> Vec<u32> {
    values.iter().map(SpecializationValue::to_bits).collect()
}
