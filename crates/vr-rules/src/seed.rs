//! Seed hashing and named substreams.
//!
//! Every random decision in the rules core draws from a [`Stream`] obtained
//! through [`make_stream`]. A stream is fully determined by a seed string and
//! a label, so unrelated decisions (the primary check, a loot table, a trap
//! roll) never perturb each other's sequence, and any resolution can be
//! replayed bit-for-bit on any platform.
//!
//! The arithmetic is integer-only until the final scaling into `[0, 1)`,
//! which is exact for the 53-bit values produced.

use rand::RngCore;

/// Separator placed between a base seed and a label before hashing.
///
/// The ASCII unit separator never occurs in ordinary labels.
const LABEL_SEPARATOR: char = '\u{1F}';

/// SplitMix64 increment (the 64-bit golden ratio).
const GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Hash arbitrary text to a stable 32-bit seed.
///
/// Murmur-style multiply/rotate over the UTF-8 bytes with a final avalanche.
/// Total on every input, including the empty string.
pub fn hash_to_seed(text: &str) -> u32 {
    let bytes = text.as_bytes();
    let mut h: u32 = 1_779_033_703 ^ (bytes.len() as u32);
    for &b in bytes {
        h = (h ^ u32::from(b)).wrapping_mul(3_432_918_353);
        h = h.rotate_left(13);
    }
    h ^= h >> 16;
    h = h.wrapping_mul(2_246_822_507);
    h ^= h >> 13;
    h = h.wrapping_mul(3_266_489_909);
    h ^ (h >> 16)
}

/// Derive the seed of a named substream from a base seed.
pub fn derive_sub_seed(base: u32, label: &str) -> u32 {
    hash_to_seed(&format!("{base}{LABEL_SEPARATOR}{label}"))
}

/// Create a generator from a 32-bit seed.
pub fn make_generator(seed: u32) -> Stream {
    Stream::from_seed(seed)
}

/// Create the named substream `label` of the seed text `seed_text`.
///
/// This is the only entry point the rest of the engine uses.
pub fn make_stream(seed_text: &str, label: &str) -> Stream {
    make_generator(derive_sub_seed(hash_to_seed(seed_text), label))
}

/// SplitMix64 output mixing.
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// A deterministic pseudo-random stream producing values in `[0, 1)`.
///
/// SplitMix64 over a whitened 64-bit state; period 2^64.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stream {
    state: u64,
    draws: u64,
}

impl Stream {
    /// Create a stream from a 32-bit seed.
    pub fn from_seed(seed: u32) -> Self {
        Self {
            state: mix64(u64::from(seed).wrapping_add(GAMMA)),
            draws: 0,
        }
    }

    /// Advance the state and return the next raw 64-bit value.
    pub fn next_raw(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GAMMA);
        self.draws += 1;
        mix64(self.state)
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        const SCALE: f64 = (1u64 << 53) as f64;
        (self.next_raw() >> 11) as f64 / SCALE
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }

    /// Uniform integer in `[min, max]`. Returns `min` when `min >= max`.
    pub fn range_inclusive(&mut self, min: i64, max: i64) -> i64 {
        if min >= max {
            return min;
        }
        let span = (max - min + 1) as f64;
        let offset = (self.next_f64() * span).floor() as i64;
        (min + offset).min(max)
    }

    /// Linear interpolation between `a` and `b` at a random point.
    pub fn lerp(&mut self, a: f64, b: f64) -> f64 {
        a + (b - a) * self.next_f64()
    }

    /// Pick a uniformly random element, or `None` for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let index = (self.next_f64() * items.len() as f64).floor() as usize;
        items.get(index.min(items.len() - 1))
    }

    /// Signed noise in `[bias - amplitude, bias + amplitude)`.
    pub fn noise(&mut self, bias: f64, amplitude: f64) -> f64 {
        bias + (self.next_f64() * 2.0 - 1.0) * amplitude
    }
}

impl RngCore for Stream {
    fn next_u32(&mut self) -> u32 {
        (self.next_raw() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.next_raw()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let bytes = self.next_raw().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn hash_is_stable() {
        assert_eq!(hash_to_seed(""), 167_010_153);
        assert_eq!(hash_to_seed("voidreach"), 3_989_982_306);
    }

    #[test]
    fn sub_seeds_of_similar_labels_are_unrelated() {
        let base = hash_to_seed("voidreach");
        assert_eq!(derive_sub_seed(base, "mining"), 2_744_419_321);
        assert_eq!(derive_sub_seed(base, "mining2"), 70_968_556);
    }

    #[test]
    fn golden_sequence() {
        let mut s = make_stream("voidreach", "mining");
        assert_eq!(s.next_raw(), 10_461_795_208_045_422_644);
        assert_eq!(s.next_raw(), 15_167_694_611_745_845_001);
        assert_eq!(s.next_raw(), 11_544_489_904_605_124_901);

        let mut s = make_stream("voidreach", "mining");
        assert_eq!(s.next_f64(), 0.5671350546330644);
        assert_eq!(s.next_f64(), 0.8222423724825761);
        assert_eq!(s.next_f64(), 0.6258280517404925);
        assert_eq!(s.draws(), 3);
    }

    #[test]
    fn same_seed_and_label_reproduce() {
        let mut a = make_stream("replay-7", "salvage:loot");
        let mut b = make_stream("replay-7", "salvage:loot");
        for _ in 0..1000 {
            assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        }
    }

    #[test]
    fn values_in_unit_interval() {
        let mut s = make_stream("bounds", "unit");
        for _ in 0..10_000 {
            let v = s.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn labelled_streams_are_uncorrelated() {
        let n = 10_000;
        let mut a = make_stream("correlation", "a");
        let mut b = make_stream("correlation", "b");
        let xs: Vec<f64> = (0..n).map(|_| a.next_f64()).collect();
        let ys: Vec<f64> = (0..n).map(|_| b.next_f64()).collect();

        let mean_x = xs.iter().sum::<f64>() / n as f64;
        let mean_y = ys.iter().sum::<f64>() / n as f64;
        let mut cov = 0.0;
        let mut var_x = 0.0;
        let mut var_y = 0.0;
        for (x, y) in xs.iter().zip(&ys) {
            cov += (x - mean_x) * (y - mean_y);
            var_x += (x - mean_x).powi(2);
            var_y += (y - mean_y).powi(2);
        }
        let r = cov / (var_x.sqrt() * var_y.sqrt());
        assert!(r.abs() < 0.05, "correlation {r}");
    }

    #[test]
    fn range_inclusive_hits_both_ends() {
        let mut s = make_stream("range", "ends");
        let mut seen = [false; 4];
        for _ in 0..500 {
            let v = s.range_inclusive(3, 6);
            assert!((3..=6).contains(&v));
            seen[(v - 3) as usize] = true;
        }
        assert!(seen.iter().all(|&x| x));
        assert_eq!(s.range_inclusive(5, 5), 5);
        assert_eq!(s.range_inclusive(9, 2), 9);
    }

    #[test]
    fn pick_and_noise() {
        let mut s = make_stream("helpers", "pick");
        let empty: [u8; 0] = [];
        assert!(s.pick(&empty).is_none());
        let items = ["a", "b", "c"];
        for _ in 0..50 {
            assert!(items.contains(s.pick(&items).unwrap()));
        }
        for _ in 0..200 {
            let n = s.noise(2.0, 0.5);
            assert!((1.5..2.5).contains(&n));
            let l = s.lerp(10.0, 20.0);
            assert!((10.0..20.0).contains(&l));
        }
    }

    #[test]
    fn drives_rand_distributions() {
        let mut s = make_stream("interop", "rand");
        for _ in 0..100 {
            let v: u32 = s.random_range(1..=6);
            assert!((1..=6).contains(&v));
        }
        let mut bytes = [0u8; 13];
        s.fill_bytes(&mut bytes);
        assert!(bytes.iter().any(|&b| b != 0));
    }
}
