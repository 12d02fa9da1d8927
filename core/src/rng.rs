//! Seeded jitter for recommendation confidence.
//!
//! RULE: nothing in the model may call a platform RNG. The seeded
//! confidence model draws from a PCG stream derived from the seed in
//! `ModelConfig`, so the same configuration always yields the same
//! recommendations.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;

/// Stream index mixed into the seed. Append only; changing a value
/// changes every draw made from that stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum JitterStream {
    Confidence = 0,
}

pub struct JitterRng {
    inner: Pcg64Mcg,
}

impl JitterRng {
    pub fn new(seed: u64, stream: JitterStream) -> Self {
        let derived_seed = seed ^ (stream as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15);
        Self {
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Roll a float in [lo, hi).
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_draws() {
        let mut a = JitterRng::new(7, JitterStream::Confidence);
        let mut b = JitterRng::new(7, JitterStream::Confidence);
        for _ in 0..16 {
            assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        }
    }

    #[test]
    fn uniform_stays_in_range() {
        let mut rng = JitterRng::new(42, JitterStream::Confidence);
        for _ in 0..1_000 {
            let v = rng.uniform(65.0, 90.0);
            assert!((65.0..90.0).contains(&v), "draw {v} out of range");
        }
    }
}
