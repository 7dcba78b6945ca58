//! Configuration types for the deterministic body table.
//!
//! This module defines a `serde`-deserializable description of every body the
//! background animation will ever show. Nothing here is sampled at runtime:
//! the same table always yields the same topology.
//!
//! - [`MainSphereConfig`]       – grid, silhouette and motion of the main sphere
//! - [`StaticDotEntry`]         – hand-tuned size/jitter/moons of the first grid dots
//! - [`PlanetTableConfig`]      – planet bodies that orbit the sphere
//! - [`BigBodyTableConfig`]     – independently orbiting big bodies
//! - [`BodyTableConfig`]        – top-level wrapper, loadable from YAML
//!
//! # YAML format
//! Every field has a default, so an override file only names what it changes:
//!
//! ```yaml
//! time_step: 0.01
//! main_sphere:
//!   grid_resolution: 36
//!   dot_placement_radius: 0.9
//! planets:
//!   count: 4
//! orbital_big_bodies:
//!   count: 6
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::configuration::tables::{big_body_entries, big_body_accent, planet_entries, static_dot_table};

/// Top-level body table
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct BodyTableConfig {
    pub time_step: f64, // clock advance per rendered frame
    pub main_sphere: MainSphereConfig,
    pub static_dots: Vec<StaticDotEntry>, // per-grid-index overrides, index-derived beyond the end
    pub planets: PlanetTableConfig,
    pub orbital_big_bodies: BigBodyTableConfig,
}

impl Default for BodyTableConfig {
    fn default() -> Self {
        Self {
            time_step: 0.01,
            main_sphere: MainSphereConfig::default(),
            static_dots: static_dot_table(),
            planets: PlanetTableConfig::default(),
            orbital_big_bodies: BigBodyTableConfig::default(),
        }
    }
}

/// Grid layout, moon assignment, silhouette shape and orbit of the main sphere
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MainSphereConfig {
    pub grid_resolution: usize,    // points per grid side
    pub dot_placement_radius: f64, // keep grid points with normalized radius <= this
    pub moon_dots_ratio: f64,      // fraction of kept dots that carry moons
    pub grid_spin_speed: f64,      // in-plane rotation of the dot grid, rad per time unit
    pub shape: SilhouetteConfig,
    pub motion: SphereMotionConfig,
}

impl Default for MainSphereConfig {
    fn default() -> Self {
        Self {
            grid_resolution: 28,
            dot_placement_radius: 0.9,
            moon_dots_ratio: 0.6,
            grid_spin_speed: 0.12,
            shape: SilhouetteConfig::default(),
            motion: SphereMotionConfig::default(),
        }
    }
}

/// Organic outline of the sphere: `r(θ) = R * (1 + bump + detail + breathe)`
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SilhouetteConfig {
    pub samples: usize,            // points on the closed clip path
    pub subtle_bumps: f64,         // angular frequency of the large bumps
    pub bump_amplitude: f64,
    pub fine_details: f64,         // angular frequency of the fine ripples
    pub detail_amplitude: f64,
    pub breathing_intensity: f64,  // angular frequency of the breathing wave
    pub breathing_speed: f64,      // how fast the breathing wave travels
    pub breathing_amplitude: f64,
    pub edge_fade_start: f64,      // normalized radius where dots start fading
    pub edge_fade_floor: f64,      // alpha multiplier reached at the rim
}

impl Default for SilhouetteConfig {
    fn default() -> Self {
        Self {
            samples: 96,
            subtle_bumps: 6.0,
            bump_amplitude: 0.04,
            fine_details: 18.0,
            detail_amplitude: 0.015,
            breathing_intensity: 3.0,
            breathing_speed: 2.0,
            breathing_amplitude: 0.02,
            edge_fade_start: 0.85,
            edge_fade_floor: 0.15,
        }
    }
}

/// Where the sphere sits and how it moves for each section
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SphereMotionConfig {
    pub home_radius_factor: f64,   // base radius as fraction of min(width, height)
    pub me_radius_factor: f64,
    pub orbit_speed: f64,          // angular speed of the home-mode orbit
    pub orbit_radius_x: f64,       // fraction of canvas width
    pub orbit_radius_z: f64,       // fraction of canvas width (depth)
    pub vertical_wobble: f64,      // px, follows half the orbit angle
    pub vertical_oscillation: f64, // px, independent slow bob
    pub oscillation_speed: f64,
    pub breathing_px: f64,         // px added/removed from the base radius
    pub me_anchor_x: f64,          // fraction of canvas width
    pub me_anchor_y: f64,          // fraction of canvas height
    pub orbit_unit_fraction: f64,  // px per orbit-radius unit, as fraction of min(width, height)
}

impl Default for SphereMotionConfig {
    fn default() -> Self {
        Self {
            home_radius_factor: 0.62,
            me_radius_factor: 1.2,
            orbit_speed: 0.3,
            orbit_radius_x: 0.4,
            orbit_radius_z: 0.25,
            vertical_wobble: 20.0,
            vertical_oscillation: 32.0,
            oscillation_speed: 0.5,
            breathing_px: 16.0,
            me_anchor_x: 0.25,
            me_anchor_y: 0.5,
            orbit_unit_fraction: 0.25,
        }
    }
}

/// One moon of a grid dot, relative to its parent dot
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct DotMoonEntry {
    pub orbit_radius: f64, // multiple of the parent dot size
    pub orbit_speed: f64,
    pub orbit_angle: f64,
    pub orbit_tilt: f64,   // 0 = flat, PI/2 = edge-on
    pub moon_size: f64,    // multiple of the parent dot size
}

/// Fixed size and jitter for one kept grid dot
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct StaticDotEntry {
    pub size: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    #[serde(default)]
    pub moons: Vec<DotMoonEntry>,
}

/// Per-moon parameter arrays; the moon count is the shortest required array
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct MoonTable {
    pub angles: Vec<f64>,
    pub distances: Vec<f64>,
    pub speeds: Vec<f64>,
    pub tilts: Vec<f64>,
    pub sizes: Vec<f64>,        // optional, defaults to DEFAULT_MOON_SIZE
    pub inclinations: Vec<f64>, // optional, defaults to 0
}

pub const DEFAULT_MOON_SIZE: f64 = 0.3;

impl MoonTable {
    pub fn count(&self) -> usize {
        self.angles.len()
            .min(self.distances.len())
            .min(self.speeds.len())
            .min(self.tilts.len())
    }
}

/// RGBA with 8-bit channels and float alpha
#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ColorConfig {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub alpha: f64,
}

/// One planet body orbiting the main sphere
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PlanetEntry {
    pub angle: f64,              // phase offset
    pub base_radius: f64,        // orbit-radius units
    pub size: f64,
    pub orbit_speed: f64,
    pub orbit_tilt: f64,
    pub orbit_eccentricity: f64, // depth axis squash, 1 = circle
    #[serde(default)]
    pub orbit_inclination: f64,
    #[serde(default)]
    pub orbit_rotation: f64,
    pub spin_speed: f64,
    pub spin_direction: f64,
    #[serde(default)]
    pub fat: bool,
    #[serde(default)]
    pub color: Option<ColorConfig>,
    #[serde(default)]
    pub halo: bool,
    #[serde(default)]
    pub moons: MoonTable,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PlanetTableConfig {
    pub count: Option<usize>, // authoritative when set
    pub count_ratio: usize,   // otherwise max(min_count, grid_dots / count_ratio)
    pub min_count: usize,
    pub shell_particles: usize,
    pub entries: Vec<PlanetEntry>,
}

impl Default for PlanetTableConfig {
    fn default() -> Self {
        Self {
            count: Some(3),
            count_ratio: 40,
            min_count: 2,
            shell_particles: 24,
            entries: planet_entries(),
        }
    }
}

/// One orbital big body with full 3D orbit orientation
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct BigBodyEntry {
    pub size: f64,
    pub orbit_radius: f64, // orbit-radius units
    pub orbit_speed: f64,
    pub orbit_angle: f64,
    pub orbit_tilt: f64,
    pub orbit_rotation: f64,
    pub orbit_inclination: f64,
    pub orbit_direction: f64,
    pub spin_speed: f64,
    pub spin_direction: f64,
    #[serde(default)]
    pub moons: MoonTable,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct BigBodyTableConfig {
    pub count: usize,
    pub shell_particles: usize,
    pub entries: Vec<BigBodyEntry>, // the first count - 1 bodies
    pub accent: BigBodyEntry,       // always the last body
}

impl Default for BigBodyTableConfig {
    fn default() -> Self {
        Self {
            count: 6,
            shell_particles: 18,
            entries: big_body_entries(),
            accent: big_body_accent(),
        }
    }
}

/// Load a body table override from YAML
pub fn load_body_table(path: &Path) -> Result<BodyTableConfig> {
    let file = File::open(path)
        .with_context(|| format!("failed to open body table {}", path.display()))?;
    let reader = BufReader::new(file);
    let table: BodyTableConfig = serde_yaml::from_reader(reader)
        .with_context(|| format!("failed to parse body table {}", path.display()))?;
    Ok(table)
}
