#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new(seed: u64) -> Self {
        Self(Self::OFFSET_BASIS ^ seed)
    }

    pub(crate) fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    pub(crate) fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    /// Hashes the exact bit pattern, so `0.0` and `-0.0` differ.
    pub(crate) fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

/// Wrap a compass heading into `[0, 360)`.
pub fn normalize_bearing(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // rem_euclid rounds tiny negatives up to exactly 360.0
    if r >= 360.0 { 0.0 } else { r }
}

/// Signed shortest rotation from `from` to `to`, in `(-180, 180]`.
pub fn shortest_bearing_delta(from: f64, to: f64) -> f64 {
    let d = normalize_bearing(to - from);
    if d > 180.0 { d - 360.0 } else { d }
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Interpolate headings along the shorter arc; 350 -> 10 passes through 0, never 180.
pub fn lerp_bearing(from: f64, to: f64, t: f64) -> f64 {
    normalize_bearing(from + shortest_bearing_delta(from, to) * t)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
