//! Stateless value-noise primitives.
//!
//! Everything here is a pure function of its arguments: there is no
//! generator state, so the same `(x, y, seed)` always yields the same value.
//! Terrain recipes use these only as additive detail on top of closed-form
//! shapes.

/// Octave count used when a recipe doesn't ask for a specific one.
pub const DEFAULT_OCTAVES: u32 = 4;

/// Trigonometric hash in `[0, 1)`.
pub fn hash_noise(x: f64, y: f64, seed: f64) -> f64 {
    let n = (x * 12.9898 + y * 78.233 + seed).sin() * 43758.5453;
    n - n.floor()
}

/// Bilinear blend of [`hash_noise`] over the lattice cell enclosing
/// `(x * scale, y * scale)`.
pub fn smooth_noise(x: f64, y: f64, scale: f64, seed: f64) -> f64 {
    let sx = x * scale;
    let sy = y * scale;
    let x0 = sx.floor();
    let y0 = sy.floor();
    let fx = sx - x0;
    let fy = sy - y0;

    let v00 = hash_noise(x0, y0, seed);
    let v10 = hash_noise(x0 + 1.0, y0, seed);
    let v01 = hash_noise(x0, y0 + 1.0, seed);
    let v11 = hash_noise(x0 + 1.0, y0 + 1.0, seed);

    let top = v00 * (1.0 - fx) + v10 * fx;
    let bottom = v01 * (1.0 - fx) + v11 * fx;

    top * (1.0 - fy) + bottom * fy
}

/// Multi-octave sum of [`smooth_noise`].
///
/// Each octave doubles the frequency and halves the amplitude, starting at
/// amplitude 0.5 and lattice scale 4. Octave `i` is sampled with seed
/// `seed + i * 100` so layers don't line up.
pub fn fractal_sum(x: f64, y: f64, octaves: u32, seed: f64) -> f64 {
    let mut value = 0.0;
    let mut amplitude = 0.5;
    let mut frequency = 1.0;

    for i in 0..octaves {
        value += amplitude * smooth_noise(x, y, frequency * 4.0, seed + f64::from(i) * 100.0);
        amplitude *= 0.5;
        frequency *= 2.0;
    }

    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_values() {
        assert!((hash_noise(3.5, -1.25, 7.0) - 0.6193411743297474).abs() < 1e-9);
        assert!((smooth_noise(0.3, 0.7, 5.0, 2.0) - 0.33469825394240615).abs() < 1e-9);
        assert!((fractal_sum(0.37, -0.21, 4, 11.0) - 0.3577084708897212).abs() < 1e-9);
    }

    #[test]
    fn test_hash_noise_is_pure() {
        let a = hash_noise(0.37, -1.25, 42.0);
        let b = hash_noise(0.37, -1.25, 42.0);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_hash_noise_range() {
        for i in 0..200 {
            let x = f64::from(i) * 0.173 - 10.0;
            let y = f64::from(i) * -0.311 + 4.0;
            let v = hash_noise(x, y, 7.0);
            assert!((0.0..1.0).contains(&v), "hash_noise({x}, {y}) = {v}");
        }
    }

    #[test]
    fn test_seed_changes_output() {
        assert_ne!(hash_noise(1.0, 2.0, 0.0), hash_noise(1.0, 2.0, 100.0));
    }

    #[test]
    fn test_smooth_noise_hits_lattice_values() {
        // At integer lattice points the blend collapses onto the hash itself.
        let v = smooth_noise(3.0, 5.0, 1.0, 11.0);
        assert!((v - hash_noise(3.0, 5.0, 11.0)).abs() < 1e-12);
    }

    #[test]
    fn test_smooth_noise_is_bounded() {
        for i in 0..100 {
            let t = f64::from(i) / 100.0 - 0.5;
            let v = smooth_noise(t, -t, 4.0, 3.0);
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn test_fractal_sum_bounds() {
        // Amplitudes 0.5 + 0.25 + 0.125 + 0.0625 bound the sum below 0.9375.
        for i in 0..100 {
            let t = f64::from(i) / 100.0 - 0.5;
            let v = fractal_sum(t, t * 0.5, DEFAULT_OCTAVES, 42.0);
            assert!((0.0..0.9375).contains(&v));
        }
    }

    #[test]
    fn test_zero_octaves_is_zero() {
        assert_eq!(fractal_sum(0.2, 0.1, 0, 5.0), 0.0);
    }
}
