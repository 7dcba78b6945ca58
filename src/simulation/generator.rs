//! Build a fully-initialized `BodySet` from a `BodyTableConfig`
//!
//! Takes the deterministic body table and produces:
//! - the main sphere with its grid dots, their motion category and moons
//! - planet bodies with particle shells and moons
//! - orbital big bodies, the last one being the accent body
//!
//! Same table in, same topology out. Positions are left at their defaults
//! until the first kinematics step.

use std::f64::consts::TAU;

use log::{debug, warn};

use crate::configuration::config::{
    BigBodyEntry, BodyTableConfig, DotMoonEntry, MoonTable, PlanetEntry, PlanetTableConfig,
    StaticDotEntry, DEFAULT_MOON_SIZE,
};
use crate::simulation::seeds::{derived_dot, derived_moons, hash01};
use crate::simulation::states::{
    BodySet, MainSphere, Moon, MoonSet, NVec2, NVec3, OrbitElements, OrbitState, OrbitalBigBody,
    ParticleMotion, PlanetBody, SphereDot, SphereState, SurfaceParticle,
};

/// Shell points whose |y| exceeds this are too close to a pole
pub const SHELL_POLE_LIMIT: f64 = 0.85;
/// Shell points whose ring radius is below this are too close to a pole
pub const SHELL_MIN_RING: f64 = 0.15;
/// Rejection sampling gives up after this many tries per requested point
pub const SHELL_ATTEMPTS_PER_POINT: usize = 16;

/// Moon-bearing dots, counted in order, take a category from this cycle
const CATEGORY_CYCLE: usize = 12;
const PLANET_SLOTS: [usize; 4] = [0, 3, 6, 9];
const MAIN_SLOTS: [usize; 3] = [1, 5, 10];

// salts for hash01
const SALT_ORBIT_RADIUS: u64 = 11;
const SALT_ORBIT_SPEED: u64 = 12;
const SALT_ORBIT_OFFSET: u64 = 13;
const SALT_ORBIT_TILT: u64 = 14;
const SALT_SHELL: u64 = 21;
const SALT_SHELL_SIZE: u64 = 22;
const SALT_PLANET: u64 = 31;
const SALT_BIG_BODY: u64 = 41;

/// Grid points in [-1, 1]^2 whose normalized radius is within `radius`
pub fn grid_points(resolution: usize, radius: f64) -> Vec<NVec2> {
    if resolution < 2 {
        return Vec::new();
    }
    let step = 2.0 / (resolution - 1) as f64;
    let mut points = Vec::new();
    for i in 0..resolution {
        for j in 0..resolution {
            let x = -1.0 + i as f64 * step;
            let y = -1.0 + j as f64 * step;
            if (x * x + y * y).sqrt() <= radius {
                points.push(NVec2::new(x, y));
            }
        }
    }
    points
}

/// Number of planets: the table override, or derived from the grid size
pub fn planet_count(cfg: &PlanetTableConfig, grid_dots: usize) -> usize {
    cfg.count.unwrap_or_else(|| cfg.min_count.max(grid_dots / cfg.count_ratio.max(1)))
}

pub fn generate(config: &BodyTableConfig) -> BodySet {
    let sphere_cfg = &config.main_sphere;
    let grid = grid_points(sphere_cfg.grid_resolution, sphere_cfg.dot_placement_radius);
    let n_planets = planet_count(&config.planets, grid.len());

    let dots = build_sphere_dots(&grid, config, n_planets);

    let sphere = MainSphere {
        dots,
        grid_spin_speed: sphere_cfg.grid_spin_speed,
        breathing_amplitude: sphere_cfg.motion.breathing_px,
        motion: sphere_cfg.motion.clone(),
        shape: sphere_cfg.shape.clone(),
        state: SphereState::default(),
    };

    let planets: Vec<PlanetBody> = (0..n_planets)
        .map(|i| {
            let entry = config.planets.entries.get(i).cloned().unwrap_or_else(|| derived_planet(i));
            build_planet(i, &entry, config.planets.shell_particles)
        })
        .collect();

    let big_cfg = &config.orbital_big_bodies;
    let big_bodies: Vec<OrbitalBigBody> = (0..big_cfg.count)
        .map(|i| {
            let accent = i + 1 == big_cfg.count;
            let entry = if accent {
                big_cfg.accent.clone()
            } else {
                big_cfg.entries.get(i).cloned().unwrap_or_else(|| derived_big_body(i))
            };
            build_big_body(i, &entry, accent, big_cfg.shell_particles)
        })
        .collect();

    debug!(
        "generated {} sphere dots, {} planets, {} big bodies",
        sphere.dots.len(),
        planets.len(),
        big_bodies.len()
    );

    BodySet {
        sphere,
        planets,
        big_bodies,
        planet_depth_range: 0.0,
        big_body_depth_range: 0.0,
    }
}

/// Whether grid dot `i` carries moons at the given ratio
pub fn is_moon_bearing(i: usize, moon_dots_ratio: f64) -> bool {
    i % 10 < moon_slots(moon_dots_ratio)
}

fn moon_slots(moon_dots_ratio: f64) -> usize {
    (moon_dots_ratio.clamp(0.0, 1.0) * 10.0).round() as usize
}

fn build_sphere_dots(grid: &[NVec2], config: &BodyTableConfig, n_planets: usize) -> Vec<SphereDot> {
    let ratio = config.main_sphere.moon_dots_ratio;
    let mut moon_ordinal = 0;

    grid.iter()
        .enumerate()
        .map(|(i, p)| {
            let entry: StaticDotEntry = config.static_dots.get(i).cloned().unwrap_or_else(|| derived_dot(i));

            // front hemisphere of the unit sphere
            let z = (1.0 - p.x * p.x - p.y * p.y).max(0.0).sqrt();
            let particle = SurfaceParticle { base: NVec3::new(p.x, p.y, z), size: entry.size };

            let (motion, moons) = if is_moon_bearing(i, ratio) {
                let k = moon_ordinal;
                moon_ordinal += 1;
                let moon_entries = if entry.moons.is_empty() { derived_moons(i) } else { entry.moons };
                (dot_motion(i, k, n_planets), Some(dot_moon_set(&moon_entries)))
            } else {
                if !entry.moons.is_empty() {
                    warn!("static dot {i} lists {} moons but is not moon-bearing, moons ignored", entry.moons.len());
                }
                (ParticleMotion::Grid, None)
            };

            SphereDot {
                particle,
                jitter: NVec2::new(entry.offset_x, entry.offset_y),
                motion,
                moons,
                state: OrbitState::default(),
            }
        })
        .collect()
}

/// Category of the `k`-th moon-bearing dot (grid index `i`)
fn dot_motion(i: usize, k: usize, n_planets: usize) -> ParticleMotion {
    let slot = k % CATEGORY_CYCLE;
    if PLANET_SLOTS.contains(&slot) && n_planets > 0 {
        ParticleMotion::OrbitsPlanet {
            planet: (k / PLANET_SLOTS.len()) % n_planets,
            radius: 0.12 + hash01(i, SALT_ORBIT_RADIUS) * 0.18,
            speed: 0.4 + hash01(i, SALT_ORBIT_SPEED) * 0.8,
            offset: hash01(i, SALT_ORBIT_OFFSET) * TAU,
        }
    } else if MAIN_SLOTS.contains(&slot) {
        ParticleMotion::OrbitsMain {
            radius: 0.3 + hash01(i, SALT_ORBIT_RADIUS) * 0.55,
            speed: 0.1 + hash01(i, SALT_ORBIT_SPEED) * 0.25,
            offset: hash01(i, SALT_ORBIT_OFFSET) * TAU,
            tilt: hash01(i, SALT_ORBIT_TILT) * 0.8,
        }
    } else {
        ParticleMotion::Grid
    }
}

fn dot_moon_set(entries: &[DotMoonEntry]) -> MoonSet {
    MoonSet {
        moons: entries
            .iter()
            .map(|m| Moon {
                angle: m.orbit_angle,
                distance: m.orbit_radius,
                speed: m.orbit_speed,
                tilt: m.orbit_tilt,
                inclination: 0.0,
                size: m.moon_size,
                state: OrbitState::default(),
            })
            .collect(),
    }
}

pub fn moon_set(table: &MoonTable) -> MoonSet {
    MoonSet {
        moons: (0..table.count())
            .map(|j| Moon {
                angle: table.angles[j],
                distance: table.distances[j],
                speed: table.speeds[j],
                tilt: table.tilts[j],
                inclination: table.inclinations.get(j).copied().unwrap_or(0.0),
                size: table.sizes.get(j).copied().unwrap_or(DEFAULT_MOON_SIZE),
                state: OrbitState::default(),
            })
            .collect(),
    }
}

/// Points on the unit sphere away from the poles, by bounded rejection sampling
pub fn shell_particles(count: usize, body_seed: usize) -> Vec<SurfaceParticle> {
    let mut shell = Vec::with_capacity(count);
    let max_attempts = count * SHELL_ATTEMPTS_PER_POINT;
    let mut attempt = 0;

    while shell.len() < count && attempt < max_attempts {
        let stream = body_seed * max_attempts.max(1) + attempt;
        attempt += 1;

        let y = hash01(stream, SALT_SHELL) * 2.0 - 1.0;
        let theta = hash01(stream, SALT_SHELL + 1) * TAU;
        let ring = (1.0 - y * y).sqrt();
        if y.abs() > SHELL_POLE_LIMIT || ring < SHELL_MIN_RING {
            continue;
        }
        shell.push(SurfaceParticle {
            base: NVec3::new(ring * theta.cos(), y, ring * theta.sin()),
            size: 0.6 + hash01(stream, SALT_SHELL_SIZE) * 0.8,
        });
    }
    shell
}

fn build_planet(index: usize, entry: &PlanetEntry, shell_count: usize) -> PlanetBody {
    PlanetBody {
        elements: OrbitElements {
            radius: entry.base_radius,
            speed: entry.orbit_speed,
            phase: entry.angle,
            direction: 1.0,
            eccentricity: entry.orbit_eccentricity,
            inclination: entry.orbit_inclination,
            node: entry.orbit_rotation,
            tilt: entry.orbit_tilt,
        },
        spin_speed: entry.spin_speed,
        spin_direction: entry.spin_direction,
        size: entry.size,
        fat: entry.fat,
        color: entry.color,
        halo: entry.halo,
        shell: shell_particles(shell_count, 1_000 + index),
        moons: moon_set(&entry.moons),
        state: OrbitState::default(),
        spin: 0.0,
    }
}

fn build_big_body(index: usize, entry: &BigBodyEntry, accent: bool, shell_count: usize) -> OrbitalBigBody {
    OrbitalBigBody {
        elements: OrbitElements {
            radius: entry.orbit_radius,
            speed: entry.orbit_speed,
            phase: entry.orbit_angle,
            direction: entry.orbit_direction,
            eccentricity: 1.0,
            inclination: entry.orbit_inclination,
            node: entry.orbit_rotation,
            tilt: entry.orbit_tilt,
        },
        spin_speed: entry.spin_speed,
        spin_direction: entry.spin_direction,
        size: entry.size,
        accent,
        shell: shell_particles(shell_count, 2_000 + index),
        moons: moon_set(&entry.moons),
        state: OrbitState::default(),
        spin: 0.0,
    }
}

fn sign(u: f64) -> f64 {
    if u < 0.5 { 1.0 } else { -1.0 }
}

fn two_moons(index: usize, salt: u64, distance: (f64, f64)) -> MoonTable {
    let h = |k: u64| hash01(index, salt + k);
    MoonTable {
        angles: vec![h(10) * TAU, h(11) * TAU],
        distances: vec![distance.0 + h(12) * distance.1, distance.0 * 1.6 + h(13) * distance.1],
        speeds: vec![0.3 + h(14) * 0.4, 0.2 + h(15) * 0.3],
        tilts: vec![h(16) * std::f64::consts::PI, h(17) * std::f64::consts::PI],
        sizes: vec![0.3 + h(18) * 0.4, 0.4 + h(19) * 0.5],
        inclinations: vec![h(20) * TAU, h(21) * TAU],
    }
}

/// Planet for an index past the end of the planet table
pub fn derived_planet(index: usize) -> PlanetEntry {
    let h = |k: u64| hash01(index, SALT_PLANET + k);
    PlanetEntry {
        angle: h(0) * TAU,
        base_radius: 1.8 + h(1) * 1.0,
        size: 3.0 + h(2) * 2.0,
        orbit_speed: 0.2 + h(3) * 1.0,
        orbit_tilt: h(4) * 1.5,
        orbit_eccentricity: 0.5 + h(5) * 0.5,
        orbit_inclination: 0.0,
        orbit_rotation: 0.0,
        spin_speed: 0.1 + h(6) * 0.4,
        spin_direction: sign(h(7)),
        fat: false,
        color: None,
        halo: false,
        moons: two_moons(index, SALT_PLANET, (3.0, 2.0)),
    }
}

/// Big body for an index past the end of the big body table
pub fn derived_big_body(index: usize) -> BigBodyEntry {
    let h = |k: u64| hash01(index, SALT_BIG_BODY + k);
    BigBodyEntry {
        size: 3.0 + h(0) * 3.0,
        orbit_radius: 1.4 + h(1) * 0.6,
        orbit_speed: 0.16 + h(2) * 0.24,
        orbit_angle: h(3) * TAU,
        orbit_tilt: 0.05 + h(4) * 0.15,
        orbit_rotation: h(5) * TAU,
        orbit_inclination: h(6) * 0.3,
        orbit_direction: sign(h(7)),
        spin_speed: 0.15 + h(8) * 0.5,
        spin_direction: sign(h(9)),
        moons: two_moons(index, SALT_BIG_BODY, (1.2, 0.8)),
    }
}
