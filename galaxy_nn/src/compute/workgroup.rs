//! Workgroup (local size) selection
//!
//! Pure functions that turn a desired dispatch geometry into a local size the
//! device accepts: clamped to the per-axis maxima, within the invocation
//! budget, and with an invocation count that is a whole number of subgroups.

/// Local workgroup size of a compute dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalSize {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl LocalSize {
    /// Size of an unconfigured pipeline
    pub const ONE: LocalSize = LocalSize { x: 1, y: 1, z: 1 };

    /// Fallback used when the caller has no preference (all zero)
    pub const DEFAULT: LocalSize = LocalSize { x: 4, y: 4, z: 4 };

    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Total invocations per workgroup
    pub fn invocations(&self) -> u64 {
        self.x as u64 * self.y as u64 * self.z as u64
    }

    /// True when all three dimensions are zero ("no preference")
    pub fn is_unset(&self) -> bool {
        self.x == 0 && self.y == 0 && self.z == 0
    }
}

impl Default for LocalSize {
    fn default() -> Self {
        Self::ONE
    }
}

impl From<(u32, u32, u32)> for LocalSize {
    fn from((x, y, z): (u32, u32, u32)) -> Self {
        Self { x, y, z }
    }
}

/// Device limits relevant to workgroup sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkgroupLimits {
    /// Per-axis maximum (x, y, z)
    pub max_size: [u32; 3],
    /// Maximum invocations in a single workgroup
    pub max_invocations: u32,
}

impl WorkgroupLimits {
    /// True when `size` respects every limit
    pub fn admits(&self, size: LocalSize) -> bool {
        size.x >= 1
            && size.y >= 1
            && size.z >= 1
            && size.x <= self.max_size[0]
            && size.y <= self.max_size[1]
            && size.z <= self.max_size[2]
            && size.invocations() <= self.max_invocations as u64
    }
}

/// Pick the best local size for `desired` on a device with `limits`
///
/// The result always satisfies `limits`. It is a whole number of subgroups
/// whenever some halving of the fitted size can be aligned within the limits;
/// otherwise the fitted (unaligned) size is returned.
pub fn optimal_local_size(
    desired: LocalSize,
    limits: &WorkgroupLimits,
    subgroup_size: u32,
) -> LocalSize {
    let fitted = fit_to_limits(desired, limits);

    let mut candidate = fitted;
    loop {
        let (x, y, z) = align_to_subgroup(candidate.x, candidate.y, candidate.z, subgroup_size);
        let aligned = LocalSize::new(x, y, z);
        if limits.admits(aligned) {
            return aligned;
        }

        if candidate.x == 1 && candidate.y == 1 {
            return fitted;
        }

        candidate.x = (candidate.x / 2).max(1);
        candidate.y = (candidate.y / 2).max(1);
    }
}

/// Clamp `desired` into the device limits without subgroup alignment
///
/// All-zero input becomes [`LocalSize::DEFAULT`]. When the clamped size still
/// exceeds the invocation budget, z is held and x, y are halved together
/// until `x * y` drops below `sqrt(max_invocations / z)`. The small tile
/// leaves room for subgroup alignment to grow it back.
pub fn fit_to_limits(desired: LocalSize, limits: &WorkgroupLimits) -> LocalSize {
    let desired = if desired.is_unset() { LocalSize::DEFAULT } else { desired };

    let max_invocations = limits.max_invocations.max(1);

    let mut x = desired.x.clamp(1, limits.max_size[0].max(1));
    let mut y = desired.y.clamp(1, limits.max_size[1].max(1));
    let z = desired.z.clamp(1, limits.max_size[2].max(1)).min(max_invocations);

    if LocalSize::new(x, y, z).invocations() <= max_invocations as u64 {
        return LocalSize::new(x, y, z);
    }

    // x and y shrink until their product is below sqrt(max_invocations / z)
    let xy_max = ((max_invocations / z) as f64).sqrt() as u64;
    let xy_max = xy_max.max(1);
    while x as u64 * y as u64 >= xy_max && (x > 1 || y > 1) {
        x = (x / 2).max(1);
        y = (y / 2).max(1);
    }

    LocalSize::new(x, y, z)
}

/// Grow `(x, y, z)` so that `x * y * z` is a multiple of `subgroup_size`
///
/// `subgroup_size` must be a power of two; other values leave the input
/// untouched. No dimension ever shrinks, and an axis that is exactly 1 is
/// only grown when every axis is 1 or it is the sole remaining candidate.
pub fn align_to_subgroup(x: u32, y: u32, z: u32, subgroup_size: u32) -> (u32, u32, u32) {
    if x == 0 || y == 0 || z == 0 || !subgroup_size.is_power_of_two() {
        return (x, y, z);
    }

    let product = x as u64 * y as u64 * z as u64;
    if product % subgroup_size as u64 == 0 {
        return (x, y, z);
    }

    // subgroups beyond 1024 lanes are not expected
    let target_n = subgroup_size.trailing_zeros().min(10);

    let tx = x.trailing_zeros();
    let ty = y.trailing_zeros();
    let tz = z.trailing_zeros();
    let need = target_n.saturating_sub(tx + ty + tz);

    match (x == 1, y == 1, z == 1) {
        (_, true, true) => (round_up_pow2_mul(x, target_n), y, z),
        (true, false, true) => (x, round_up_pow2_mul(y, target_n), z),
        (true, true, false) => (x, y, round_up_pow2_mul(z, target_n)),
        (false, false, true) => {
            let y_bits = need / 2;
            let x_bits = need - y_bits;
            (round_up_pow2_mul(x, tx + x_bits), round_up_pow2_mul(y, ty + y_bits), z)
        }
        (false, true, false) => {
            let z_bits = need / 2;
            let x_bits = need - z_bits;
            (round_up_pow2_mul(x, tx + x_bits), y, round_up_pow2_mul(z, tz + z_bits))
        }
        (true, false, false) => {
            let z_bits = need / 2;
            let y_bits = need - z_bits;
            (x, round_up_pow2_mul(y, ty + y_bits), round_up_pow2_mul(z, tz + z_bits))
        }
        (false, false, false) => {
            let z_bits = need / 3;
            let y_bits = (need - z_bits) / 2;
            let x_bits = need - z_bits - y_bits;
            (
                round_up_pow2_mul(x, tx + x_bits),
                round_up_pow2_mul(y, ty + y_bits),
                round_up_pow2_mul(z, tz + z_bits),
            )
        }
    }
}

/// Round `v` up to the next multiple of `2^k`
fn round_up_pow2_mul(v: u32, k: u32) -> u32 {
    let m = 1u64 << k.min(63);
    let rounded = (v as u64).div_ceil(m) * m;
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

#[cfg(test)]
#[path = "workgroup_tests.rs"]
mod tests;
