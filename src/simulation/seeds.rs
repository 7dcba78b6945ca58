//! Index-derived pseudo-random values.
//!
//! Generation never touches a runtime RNG. When the body table runs out of
//! hand-tuned entries, values come from fixed functions of the entry index.

use std::f64::consts::TAU;

use crate::configuration::config::{DotMoonEntry, StaticDotEntry};

/// Multipliers of the legacy grid-dot seeds
pub const SEED_A: u64 = 1237;
pub const SEED_B: u64 = 7919;
pub const SEED_C: u64 = 3571;
pub const SEED_D: u64 = 8843;
pub const SEED_E: u64 = 4409;

/// `(index * multiplier) mod 10000`, scaled to [0, 1)
pub fn index_seed(index: usize, multiplier: u64) -> f64 {
    ((index as u64).wrapping_mul(multiplier) % 10_000) as f64 / 10_000.0
}

/// splitmix64 finalizer
pub fn mix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    x ^ (x >> 31)
}

/// Uniform value in [0, 1) for an (index, salt) pair
pub fn hash01(index: usize, salt: u64) -> f64 {
    let h = mix64((index as u64) ^ mix64(salt));
    // top 53 bits fill the f64 mantissa
    (h >> 11) as f64 / (1u64 << 53) as f64
}

/// Grid dot values for an index past the end of the static table.
/// Moons are filled in by the generator, and only on moon-bearing dots.
pub fn derived_dot(index: usize) -> StaticDotEntry {
    let a = index_seed(index, SEED_A);
    let b = index_seed(index, SEED_B);
    let c = index_seed(index, SEED_C);

    StaticDotEntry {
        size: 1.5 + a * 3.0,
        offset_x: (b - 0.5) * 0.1,
        offset_y: (c - 0.5) * 0.1,
        moons: Vec::new(),
    }
}

/// One or two moons for a grid dot, always at least one
pub fn derived_moons(index: usize) -> Vec<DotMoonEntry> {
    let a = index_seed(index, SEED_A);
    let b = index_seed(index, SEED_B);
    let c = index_seed(index, SEED_C);
    let d = index_seed(index, SEED_D);
    let e = index_seed(index, SEED_E);

    let mut moons = vec![DotMoonEntry {
        orbit_radius: 4.0 + a * 8.0,
        orbit_speed: 1.0 + b * 4.0,
        orbit_angle: c * TAU,
        orbit_tilt: e * TAU * 0.25,
        moon_size: 0.2 + d * 0.5,
    }];
    if d >= 0.3 {
        moons.push(DotMoonEntry {
            orbit_radius: 6.0 + e * 6.0,
            orbit_speed: 0.5 + c * 2.5,
            orbit_angle: b * TAU,
            orbit_tilt: a * TAU * 0.25,
            moon_size: 0.15 + e * 0.35,
        });
    }
    moons
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_seed_matches_modulo_rule() {
        assert_eq!(index_seed(0, SEED_A), 0.0);
        // 3 * 1237 = 3711
        assert!((index_seed(3, SEED_A) - 0.3711).abs() < 1e-12);
        // 10 * 7919 = 79190 -> 9190
        assert!((index_seed(10, SEED_B) - 0.919).abs() < 1e-12);
    }

    #[test]
    fn hash_is_stable_and_in_range() {
        for i in 0..1000 {
            let h = hash01(i, 7);
            assert!((0.0..1.0).contains(&h));
            assert_eq!(h, hash01(i, 7));
        }
        assert_ne!(hash01(1, 7), hash01(1, 8));
    }

    #[test]
    fn derived_dot_ranges() {
        for i in 27..600 {
            let d = derived_dot(i);
            assert!(d.size >= 1.5 && d.size <= 4.5);
            assert!(d.offset_x.abs() <= 0.05 && d.offset_y.abs() <= 0.05);
            assert!(d.moons.is_empty());
            assert!(!derived_moons(i).is_empty() && derived_moons(i).len() <= 2);
        }
    }
}
