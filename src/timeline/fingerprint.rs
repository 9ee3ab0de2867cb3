use crate::foundation::core::CameraPose;
use crate::foundation::math::Fnv1a64;
use crate::timeline::precalc::PreCalculatedAnimation;

const FINGERPRINT_SEED: u64 = 0x726f_7574_6563_616d;

impl PreCalculatedAnimation {
    /// Stable 64-bit hash over the phase layout and both sampled tables.
    ///
    /// Two animations built from the same route and settings hash equal. Floats are hashed by bit
    /// pattern, so any numeric drift between runs shows up here.
    pub fn fingerprint(&self) -> u64 {
        let mut h = Fnv1a64::new(FINGERPRINT_SEED);

        h.write_f64(self.total_duration_ms());
        h.write_u64(self.spans().len() as u64);
        for span in self.spans() {
            h.write_bytes(format!("{:?}", span.kind).as_bytes());
            h.write_f64(span.start_ms);
            h.write_f64(span.duration_ms);
        }

        h.write_u8(b'K');
        h.write_u64(self.keyframes().len() as u64);
        for k in self.keyframes() {
            h.write_f64(k.timestamp_ms);
            write_pose(&mut h, &k.pose);
        }

        h.write_u8(b'P');
        h.write_u64(self.progress().len() as u64);
        for p in self.progress() {
            h.write_f64(p.timestamp_ms);
            h.write_u64(p.covered_vertices as u64);
            h.write_f64(p.position.x);
            h.write_f64(p.position.y);
            h.write_f64(p.distance_km);
        }

        h.finish()
    }
}

fn write_pose(h: &mut Fnv1a64, pose: &CameraPose) {
    h.write_f64(pose.longitude);
    h.write_f64(pose.latitude);
    h.write_f64(pose.altitude);
    h.write_f64(pose.bearing);
    h.write_f64(pose.pitch);
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/fingerprint.rs"]
mod tests;
