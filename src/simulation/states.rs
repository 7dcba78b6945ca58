//! Core state types for the orbital-particle animation.
//!
//! - `MainSphere`  – the breathing sphere and its grid dots (`SphereDot`)
//! - `PlanetBody`  – bodies orbiting the sphere with a particle shell and moons
//! - `OrbitalBigBody` – independently oriented big bodies with moons
//! - `BodySet`     – everything above, built once and swapped wholesale
//!
//! Only the `state`/`spin` fields change after generation; everything else is
//! the fixed topology produced by the generator.

use nalgebra::{Vector2, Vector3};

use crate::configuration::config::{ColorConfig, SphereMotionConfig, SilhouetteConfig};

pub type NVec2 = Vector2<f64>;
pub type NVec3 = Vector3<f64>;

/// Frame-count driven time accumulator
#[derive(Debug, Clone)]
pub struct SimulationClock {
    time: f64, // accumulated time
    step: f64, // advance per rendered frame
}

impl SimulationClock {
    pub fn new(step: f64) -> Self {
        Self { time: 0.0, step }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Advance by one frame and return the new time
    pub fn advance(&mut self) -> f64 {
        self.time += self.step;
        self.time
    }
}

/// Screen position plus depth, written by the kinematics step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitState {
    pub screen: NVec2, // canvas pixels, y down
    pub z: f64,        // depth, positive toward the viewer
}

impl Default for OrbitState {
    fn default() -> Self {
        Self { screen: NVec2::zeros(), z: 0.0 }
    }
}

/// A dependent satellite of a dot or body
#[derive(Debug, Clone, PartialEq)]
pub struct Moon {
    pub angle: f64,       // starting phase
    pub distance: f64,    // multiple of the parent size
    pub speed: f64,
    pub tilt: f64,        // squashes the vertical axis of the orbit
    pub inclination: f64, // rotates the orbit ellipse on screen
    pub size: f64,        // multiple of the parent size
    pub state: OrbitState,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MoonSet {
    pub moons: Vec<Moon>,
}

impl MoonSet {
    pub fn count(&self) -> usize {
        self.moons.len()
    }
}

/// A dot on a unit sphere, immutable after generation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceParticle {
    pub base: NVec3, // unit sphere position
    pub size: f64,
}

/// How a grid dot moves; fixed at generation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticleMotion {
    /// Rides the rotating grid
    Grid,
    /// Circles one planet instead of its grid slot
    OrbitsPlanet { planet: usize, radius: f64, speed: f64, offset: f64 },
    /// Circles the sphere centre directly
    OrbitsMain { radius: f64, speed: f64, offset: f64, tilt: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SphereDot {
    pub particle: SurfaceParticle,
    pub jitter: NVec2,           // small fixed offset in sphere units
    pub motion: ParticleMotion,
    pub moons: Option<MoonSet>,
    pub state: OrbitState,       // z in sphere units, [-1, 1]
}

/// Per-frame placement of the sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereState {
    pub center: NVec2,
    pub z: f64,
    pub z_range: f64,       // |z| never exceeds this
    pub base_radius: f64,   // before breathing and perspective
    pub radius: f64,        // breathing and perspective applied
    pub spin: f64,          // grid rotation angle
}

impl Default for SphereState {
    fn default() -> Self {
        Self {
            center: NVec2::zeros(),
            z: 0.0,
            z_range: 1.0,
            base_radius: 0.0,
            radius: 0.0,
            spin: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MainSphere {
    pub dots: Vec<SphereDot>,
    pub grid_spin_speed: f64,
    pub breathing_amplitude: f64, // px
    pub motion: SphereMotionConfig,
    pub shape: SilhouetteConfig,
    pub state: SphereState,
}

/// Orbit parameters shared by planets and big bodies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitElements {
    pub radius: f64,       // orbit-radius units
    pub speed: f64,
    pub phase: f64,
    pub direction: f64,    // +1 / -1
    pub eccentricity: f64, // depth axis factor
    pub inclination: f64,
    pub node: f64,         // rotation about the vertical axis
    pub tilt: f64,
}

impl OrbitElements {
    pub fn angle_at(&self, time: f64) -> f64 {
        time * self.speed * self.direction + self.phase
    }
}

#[derive(Debug, Clone)]
pub struct PlanetBody {
    pub elements: OrbitElements,
    pub spin_speed: f64,
    pub spin_direction: f64,
    pub size: f64,
    pub fat: bool,
    pub color: Option<ColorConfig>,
    pub halo: bool,
    pub shell: Vec<SurfaceParticle>,
    pub moons: MoonSet,
    pub state: OrbitState,
    pub spin: f64,
}

#[derive(Debug, Clone)]
pub struct OrbitalBigBody {
    pub elements: OrbitElements,
    pub spin_speed: f64,
    pub spin_direction: f64,
    pub size: f64,
    pub accent: bool, // the oversized last body
    pub shell: Vec<SurfaceParticle>,
    pub moons: MoonSet,
    pub state: OrbitState,
    pub spin: f64,
}

/// Seam shared by every body that follows the 4-stage orbit transform
pub trait OrbitingBody {
    fn elements(&self) -> &OrbitElements;
    fn spin_rate(&self) -> f64;
    fn set_motion(&mut self, state: OrbitState, spin: f64);
    fn moons_mut(&mut self) -> &mut MoonSet;
    fn state(&self) -> OrbitState;
    fn size(&self) -> f64;
}

impl OrbitingBody for PlanetBody {
    fn elements(&self) -> &OrbitElements { &self.elements }
    fn spin_rate(&self) -> f64 { self.spin_speed * self.spin_direction }
    fn set_motion(&mut self, state: OrbitState, spin: f64) {
        self.state = state;
        self.spin = spin;
    }
    fn moons_mut(&mut self) -> &mut MoonSet { &mut self.moons }
    fn state(&self) -> OrbitState { self.state }
    fn size(&self) -> f64 { self.size }
}

impl OrbitingBody for OrbitalBigBody {
    fn elements(&self) -> &OrbitElements { &self.elements }
    fn spin_rate(&self) -> f64 { self.spin_speed * self.spin_direction }
    fn set_motion(&mut self, state: OrbitState, spin: f64) {
        self.state = state;
        self.spin = spin;
    }
    fn moons_mut(&mut self) -> &mut MoonSet { &mut self.moons }
    fn state(&self) -> OrbitState { self.state }
    fn size(&self) -> f64 { self.size }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    MainSphere,
    Planet,
    BigBody,
}

/// Borrowed view of any body
#[derive(Debug, Clone, Copy)]
pub enum Body<'a> {
    MainSphere(&'a MainSphere),
    Planet(&'a PlanetBody),
    BigBody(&'a OrbitalBigBody),
}

impl Body<'_> {
    pub fn kind(&self) -> BodyKind {
        match self {
            Body::MainSphere(_) => BodyKind::MainSphere,
            Body::Planet(_) => BodyKind::Planet,
            Body::BigBody(_) => BodyKind::BigBody,
        }
    }

    pub fn state(&self) -> OrbitState {
        match self {
            Body::MainSphere(s) => OrbitState { screen: s.state.center, z: s.state.z },
            Body::Planet(p) => p.state,
            Body::BigBody(b) => b.state,
        }
    }
}

/// Whole simulated population
#[derive(Debug, Clone)]
pub struct BodySet {
    pub sphere: MainSphere,
    pub planets: Vec<PlanetBody>,
    pub big_bodies: Vec<OrbitalBigBody>,
    pub planet_depth_range: f64,   // px, max planet orbit extent
    pub big_body_depth_range: f64, // px, max big body orbit extent
}

impl BodySet {
    pub fn bodies(&self) -> impl Iterator<Item = Body<'_>> {
        std::iter::once(Body::MainSphere(&self.sphere))
            .chain(self.planets.iter().map(Body::Planet))
            .chain(self.big_bodies.iter().map(Body::BigBody))
    }

    pub fn is_empty(&self) -> bool {
        self.sphere.dots.is_empty() && self.planets.is_empty() && self.big_bodies.is_empty()
    }
}
