//! The production body table.
//!
//! Hand-tuned values that used to be drawn at random on every page load.
//! Grid dots past the end of [`static_dot_table`] get index-derived values
//! (see `simulation::seeds`).

use crate::configuration::config::{
    BigBodyEntry, ColorConfig, DotMoonEntry, MoonTable, PlanetEntry, StaticDotEntry,
};

const BEIGE: ColorConfig = ColorConfig { r: 210, g: 180, b: 140, alpha: 0.8 };

fn dot(size: f64, offset_x: f64, offset_y: f64) -> StaticDotEntry {
    StaticDotEntry { size, offset_x, offset_y, moons: Vec::new() }
}

fn dot_with_moons(size: f64, offset_x: f64, offset_y: f64, moons: &[[f64; 5]]) -> StaticDotEntry {
    let moons = moons
        .iter()
        .map(|m| DotMoonEntry {
            orbit_radius: m[0],
            orbit_speed: m[1],
            orbit_angle: m[2],
            orbit_tilt: m[3],
            moon_size: m[4],
        })
        .collect();
    StaticDotEntry { size, offset_x, offset_y, moons }
}

/// First grid dots, in kept-grid order.
///
/// Only moon-bearing indices (`i % 10 < 6` at the default ratio) list moons.
pub fn static_dot_table() -> Vec<StaticDotEntry> {
    vec![
        dot(3.2, -0.03, 0.07),
        dot(2.8, 0.05, -0.02),
        dot(4.1, -0.01, 0.04),
        dot_with_moons(3.7, 0.02, -0.05, &[[8.0, 2.0, 2.1, 0.2, 0.4]]),
        dot(2.9, -0.04, 0.01),
        dot_with_moons(3.5, 0.03, 0.06, &[[6.0, 3.0, 4.8, 1.3, 0.35], [10.0, 1.5, 1.3, 0.1, 0.3]]),
        dot(4.0, -0.02, -0.03),
        dot(2.4, 0.06, 0.05),
        dot(3.3, -0.05, -0.01),
        dot(3.8, 0.01, 0.03),
        dot(2.7, -0.03, -0.04),
        dot_with_moons(4.2, 0.04, 0.02, &[[7.0, 2.5, 0.9, 0.8, 0.4], [4.0, 5.0, 3.4, 0.3, 0.25]]),
        dot(3.1, -0.01, 0.07),
        dot(3.6, 0.05, -0.05),
        dot_with_moons(2.5, -0.04, 0.01, &[[3.8, 0.3, 6.1, 1.5, 0.6]]),
        dot(3.9, 0.02, 0.04),
        dot(2.6, -0.02, -0.03),
        dot(4.3, 0.03, 0.06),
        dot(3.4, -0.05, -0.01),
        dot(2.8, 0.01, 0.05),
        dot_with_moons(3.0, -0.03, 0.02, &[[1.2, 2.0, 1.8, 1.57, 0.7]]),
        dot(2.9, 0.04, -0.04),
        dot_with_moons(4.1, -0.02, 0.06, &[[3.5, 0.25, 3.9, 0.0, 0.5], [1.8, 1.8, 0.7, 1.2, 0.3]]),
        dot(3.7, 0.05, 0.01),
        dot_with_moons(2.3, -0.04, -0.02, &[[4.2, 0.1, 5.4, 0.7, 0.25]]),
        dot(3.5, 0.01, 0.03),
        dot(2.8, -0.03, -0.01),
    ]
}

fn moons(angles: &[f64], distances: &[f64], speeds: &[f64], tilts: &[f64]) -> MoonTable {
    MoonTable {
        angles: angles.to_vec(),
        distances: distances.to_vec(),
        speeds: speeds.to_vec(),
        tilts: tilts.to_vec(),
        sizes: Vec::new(),
        inclinations: Vec::new(),
    }
}

fn planet_moons(distances: [f64; 2], speeds: [f64; 2], angles: [f64; 2], sizes: [f64; 2], tilts: [f64; 2], inclinations: [f64; 2]) -> MoonTable {
    MoonTable {
        angles: angles.to_vec(),
        distances: distances.to_vec(),
        speeds: speeds.to_vec(),
        tilts: tilts.to_vec(),
        sizes: sizes.to_vec(),
        inclinations: inclinations.to_vec(),
    }
}

/// Planets in table order; the default count override uses the first three
pub fn planet_entries() -> Vec<PlanetEntry> {
    vec![
        // nearly horizontal, fat and slow
        PlanetEntry {
            angle: 1.2,
            base_radius: 2.5,
            size: 8.4,
            orbit_speed: 0.3,
            orbit_tilt: 0.1,
            orbit_eccentricity: 0.8,
            orbit_inclination: 0.0,
            orbit_rotation: 0.0,
            spin_speed: 0.35,
            spin_direction: -1.0,
            fat: true,
            color: Some(BEIGE),
            halo: true,
            moons: planet_moons([4.2, 7.1], [0.6, 0.35], [0.8, 4.9], [0.55, 0.72], [1.8, 2.7], [3.9, 1.2]),
        },
        PlanetEntry {
            angle: 4.5,
            base_radius: 2.2,
            size: 7.6,
            orbit_speed: 0.36,
            orbit_tilt: 1.4,
            orbit_eccentricity: 0.7,
            orbit_inclination: 0.0,
            orbit_rotation: 0.0,
            spin_speed: 0.22,
            spin_direction: 1.0,
            fat: true,
            color: Some(BEIGE),
            halo: true,
            moons: planet_moons([3.7, 6.8], [0.52, 0.28], [2.1, 0.3], [0.48, 0.65], [0.9, 2.2], [5.1, 2.8]),
        },
        // diagonal
        PlanetEntry {
            angle: 0.7,
            base_radius: 2.8,
            size: 9.2,
            orbit_speed: 0.24,
            orbit_tilt: 0.8,
            orbit_eccentricity: 0.95,
            orbit_inclination: 0.0,
            orbit_rotation: 0.0,
            spin_speed: 0.41,
            spin_direction: -1.0,
            fat: true,
            color: Some(BEIGE),
            halo: true,
            moons: planet_moons([4.8, 7.7], [0.38, 0.42], [1.6, 5.8], [0.61, 0.83], [2.5, 0.4], [0.7, 4.6]),
        },
        // steep diagonal
        PlanetEntry {
            angle: 3.8,
            base_radius: 2.4,
            size: 3.1,
            orbit_speed: 1.3,
            orbit_tilt: 1.1,
            orbit_eccentricity: 0.63,
            orbit_inclination: 0.0,
            orbit_rotation: 0.0,
            spin_speed: 0.29,
            spin_direction: -1.0,
            fat: false,
            color: None,
            halo: false,
            moons: planet_moons([3.4, 6.2], [0.44, 0.31], [4.2, 1.9], [0.39, 0.57], [1.3, 2.9], [2.4, 0.9]),
        },
        PlanetEntry {
            angle: 2.3,
            base_radius: 2.0,
            size: 4.9,
            orbit_speed: 1.8,
            orbit_tilt: 0.2,
            orbit_eccentricity: 0.74,
            orbit_inclination: 0.0,
            orbit_rotation: 0.0,
            spin_speed: 0.18,
            spin_direction: 1.0,
            fat: false,
            color: None,
            halo: false,
            moons: planet_moons([4.5, 7.9], [0.49, 0.26], [3.7, 0.5], [0.52, 0.78], [0.6, 3.0], [1.8, 5.3]),
        },
    ]
}

#[allow(clippy::too_many_arguments)]
fn big_body(
    size: f64,
    orbit_radius: f64,
    orbit_speed: f64,
    orbit_angle: f64,
    orbit_tilt: f64,
    orbit_rotation: f64,
    orbit_inclination: f64,
    orbit_direction: f64,
    spin_speed: f64,
    spin_direction: f64,
    moons: MoonTable,
) -> BigBodyEntry {
    BigBodyEntry {
        size,
        orbit_radius,
        orbit_speed,
        orbit_angle,
        orbit_tilt,
        orbit_rotation,
        orbit_inclination,
        orbit_direction,
        spin_speed,
        spin_direction,
        moons,
    }
}

/// Regular big bodies; the accent body is kept separately
pub fn big_body_entries() -> Vec<BigBodyEntry> {
    vec![
        big_body(4.2, 1.8, 0.24, 2.1, 0.12, 4.5, 0.15, 1.0, 0.42, 1.0,
            moons(&[0.0, 2.1, 4.2], &[1.4, 1.8, 1.6], &[1.0, 0.8, 1.3], &[1.2, 2.5, 0.8])),
        big_body(5.1, 1.6, 0.35, 0.8, 0.08, 1.3, 0.22, -1.0, 0.31, -1.0,
            moons(&[1.5, 4.7], &[1.3, 1.9], &[0.9, 1.1], &[0.6, 2.8])),
        big_body(3.8, 2.1, 0.19, 3.7, 0.18, 5.9, 0.08, 1.0, 0.55, 1.0,
            moons(&[0.8, 2.3, 3.9, 5.2], &[1.5, 1.2, 1.7, 1.4], &[1.2, 0.7, 1.4, 0.9], &[1.8, 0.3, 2.2, 1.0])),
        big_body(4.7, 2.3, 0.28, 5.2, 0.14, 2.8, 0.25, -1.0, 0.38, 1.0,
            moons(&[2.1, 0.5, 3.8], &[1.6, 1.3, 1.8], &[0.8, 1.5, 1.0], &[2.1, 1.4, 0.7])),
        big_body(3.4, 1.7, 0.32, 1.4, 0.11, 0.7, 0.18, 1.0, 0.49, -1.0,
            moons(&[3.2, 1.1], &[1.4, 1.7], &[1.3, 0.6], &[0.9, 2.6])),
    ]
}

/// The extra large, slow, vertically orbiting body with two opposed moons
pub fn big_body_accent() -> BigBodyEntry {
    big_body(10.5, 2.7, 0.18, 0.0, 1.57, 3.14, 1.57, 1.0, 0.26, 1.0,
        moons(&[0.0, std::f64::consts::PI], &[1.5, 2.2], &[0.4, 0.25], &[std::f64::consts::FRAC_PI_2, 0.0]))
}
