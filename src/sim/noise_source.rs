//! Coherent noise source for the flow field

use noise::{NoiseFn, Perlin};

/// Largest value a source may return (the range is half-open)
const NOISE_MAX: f64 = 1.0 - f64::EPSILON;

/// A deterministic 3D coherent noise function with output in `[0, 1)`.
pub trait NoiseSource {
    fn sample(&self, x: f64, y: f64, z: f64) -> f64;
}

impl<F> NoiseSource for F
where
    F: Fn(f64, f64, f64) -> f64,
{
    fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        self(x, y, z)
    }
}

/// Perlin noise re-mapped from `[-1, 1]` into `[0, 1)`
#[derive(Clone)]
pub struct PerlinNoise {
    perlin: Perlin,
    seed: u32,
}

impl PerlinNoise {
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            seed,
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl NoiseSource for PerlinNoise {
    fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let raw = self.perlin.get([x, y, z]);
        ((raw + 1.0) * 0.5).clamp(0.0, NOISE_MAX)
    }
}
