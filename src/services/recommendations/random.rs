use rand::{rngs::StdRng, Rng, SeedableRng};

/// Source of the randomness used for tie-breaking noise and fallback picks
pub trait RandomSource {
    /// Uniform value in `[0, 1)`
    fn next_unit(&mut self) -> f64;

    /// Uniform index in `0..len`; returns 0 when `len` is 0
    fn pick_index(&mut self, len: usize) -> usize;
}

/// Adapts any `rand` generator
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

/// Generator seeded from OS entropy, used for live traffic
pub fn entropy_source() -> RngSource<StdRng> {
    RngSource(StdRng::from_entropy())
}

/// Reproducible generator
pub fn seeded_source(seed: u64) -> RngSource<StdRng> {
    RngSource(StdRng::seed_from_u64(seed))
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.0.gen::<f64>()
    }

    fn pick_index(&mut self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            self.0.gen_range(0..len)
        }
    }
}

/// Returns the same noise for every draw and always picks the first index
#[derive(Debug, Clone, Copy)]
pub struct FixedSource {
    value: f64,
}

impl FixedSource {
    /// `value` is clamped into `[0, 1)`
    pub fn new(value: f64) -> Self {
        Self {
            value: value.clamp(0.0, 1.0 - f64::EPSILON),
        }
    }
}

impl RandomSource for FixedSource {
    fn next_unit(&mut self) -> f64 {
        self.value
    }

    fn pick_index(&mut self, _len: usize) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_source_stays_in_range() {
        let mut source = seeded_source(7);
        for _ in 0..1_000 {
            let unit = source.next_unit();
            assert!((0.0..1.0).contains(&unit));
            assert!(source.pick_index(4) < 4);
        }
        assert_eq!(source.pick_index(0), 0);
    }

    #[test]
    fn test_seeded_sources_repeat() {
        let mut a = seeded_source(42);
        let mut b = seeded_source(42);
        for _ in 0..10 {
            assert_eq!(a.next_unit(), b.next_unit());
        }
    }

    #[test]
    fn test_fixed_source_is_clamped() {
        assert_eq!(FixedSource::new(0.25).next_unit(), 0.25);
        assert!(FixedSource::new(3.0).next_unit() < 1.0);
        assert_eq!(FixedSource::new(-1.0).next_unit(), 0.0);
    }
}
