//! Per-frame orbital kinematics
//!
//! `step` recomputes every position field of a `BodySet` for a given time.
//! Order inside a step matters: sphere placement, then planets and big bodies,
//! then the grid dots (some of which follow a planet), then every moon, each
//! from its parent's finished screen position.

use nalgebra::{Rotation2, Rotation3, Vector3};

use crate::configuration::config::SphereMotionConfig;
use crate::device::profile::Viewport;
use crate::projection::shading::{depth_factor, MAIN_SPHERE_SHADING};
use crate::simulation::context::{Section, SimulationContext};
use crate::simulation::states::{
    BodySet, MainSphere, MoonSet, NVec2, NVec3, OrbitElements, OrbitState, OrbitingBody,
    ParticleMotion, SphereState,
};

/// Base radius of the sphere for a section
pub fn sphere_base_radius(motion: &SphereMotionConfig, viewport: Viewport, section: Section) -> f64 {
    let factor = match section {
        Section::Home => motion.home_radius_factor,
        Section::Me => motion.me_radius_factor,
    };
    viewport.min_side() * factor
}

/// Sphere centre, depth and radius at `time`
///
/// `home` follows an ellipse around the canvas centre with a vertical bob;
/// `me` pins the sphere to a fixed anchor with no depth motion.
pub fn place_sphere(
    motion: &SphereMotionConfig,
    breathing_amplitude: f64,
    viewport: Viewport,
    section: Section,
    time: f64,
) -> SphereState {
    let (cx, cy) = viewport.center();
    let z_range = viewport.width * motion.orbit_radius_z;

    let (center, z) = match section {
        Section::Home => {
            let angle = time * motion.orbit_speed;
            let x = cx + angle.cos() * viewport.width * motion.orbit_radius_x;
            let z = angle.sin() * z_range;
            let bob = (time * motion.oscillation_speed).sin() * motion.vertical_oscillation;
            let y = cy + (angle * 0.5).sin() * motion.vertical_wobble + bob;
            (NVec2::new(x, y), z)
        }
        Section::Me => (
            NVec2::new(viewport.width * motion.me_anchor_x, viewport.height * motion.me_anchor_y),
            0.0,
        ),
    };

    let base_radius = sphere_base_radius(motion, viewport, section);
    let breathing = (time * motion.oscillation_speed).sin() * breathing_amplitude;
    let scale = MAIN_SPHERE_SHADING.scale(depth_factor(z, z_range));

    SphereState {
        center,
        z,
        z_range,
        base_radius,
        radius: ((base_radius + breathing) * scale).max(0.0),
        spin: 0.0,
    }
}

/// View-space offset of an orbiting body, in pixels
///
/// 1. circle in the local plane, depth axis squashed by the eccentricity
/// 2. inclination about the view axis
/// 3. line of nodes about the vertical axis
/// 4. tilt about the horizontal axis, opening the orbit toward the viewer
pub fn orbit_offset(elements: &OrbitElements, time: f64, unit: f64) -> NVec3 {
    let angle = elements.angle_at(time);
    let r = elements.radius * unit;
    let local = NVec3::new(angle.cos() * r, 0.0, angle.sin() * r * elements.eccentricity);

    let inclination = Rotation3::from_axis_angle(&Vector3::z_axis(), elements.inclination);
    let node = Rotation3::from_axis_angle(&Vector3::y_axis(), elements.node);
    let tilt = Rotation3::from_axis_angle(&Vector3::x_axis(), elements.tilt);

    tilt * (node * (inclination * local))
}

/// Pixels per orbit-radius unit
pub fn orbit_unit(motion: &SphereMotionConfig, viewport: Viewport) -> f64 {
    viewport.min_side() * motion.orbit_unit_fraction
}

/// Largest |z| any body of the slice can reach
fn depth_range<B: OrbitingBody>(bodies: &[B], unit: f64) -> f64 {
    bodies.iter()
        .map(|b| b.elements().radius.abs() * b.elements().eccentricity.abs().max(1.0) * unit)
        .fold(0.0, f64::max)
}

fn step_orbiting<B: OrbitingBody>(bodies: &mut [B], center: NVec2, unit: f64, time: f64) {
    for body in bodies.iter_mut() {
        let offset = orbit_offset(body.elements(), time, unit);
        let state = OrbitState {
            screen: NVec2::new(center.x + offset.x, center.y + offset.y),
            z: offset.z,
        };
        let spin = time * body.spin_rate();
        body.set_motion(state, spin);

        let size = body.size();
        step_moons(body.moons_mut(), state.screen, size, time);
    }
}

/// Moons circle their parent's screen position; depth is relative to the parent
pub fn step_moons(moons: &mut MoonSet, parent: NVec2, parent_size: f64, time: f64) {
    for moon in moons.moons.iter_mut() {
        let a = time * moon.speed + moon.angle;
        let reach = moon.distance * parent_size;
        let flat = NVec2::new(a.cos() * reach, a.sin() * reach * moon.tilt.cos());
        let offset = Rotation2::new(moon.inclination) * flat;
        moon.state = OrbitState {
            screen: parent + offset,
            z: a.sin() * moon.tilt.sin(),
        };
    }
}

fn step_sphere_dots(sphere: &mut MainSphere, planets: &[OrbitState], planet_range: f64, time: f64) {
    let SphereState { center, radius, spin, .. } = sphere.state;
    let rotation = Rotation2::new(spin);

    for dot in sphere.dots.iter_mut() {
        let state = match dot.motion {
            ParticleMotion::Grid => grid_state(rotation, dot.particle.base, dot.jitter, center, radius),
            ParticleMotion::OrbitsMain { radius: r, speed, offset, tilt } => {
                let a = time * speed + offset;
                let pos = NVec3::new(a.cos() * r, a.sin() * r * tilt.cos(), a.sin() * r * tilt.sin());
                OrbitState {
                    screen: center + NVec2::new(pos.x, pos.y) * radius,
                    z: pos.z,
                }
            }
            ParticleMotion::OrbitsPlanet { planet, radius: r, speed, offset } => match planets.get(planet) {
                Some(host) => {
                    let a = time * speed + offset;
                    let z = if planet_range > 0.0 { (host.z / planet_range).clamp(-1.0, 1.0) } else { 0.0 };
                    OrbitState {
                        screen: host.screen + NVec2::new(a.cos(), a.sin()) * r * radius,
                        z,
                    }
                }
                None => grid_state(rotation, dot.particle.base, dot.jitter, center, radius),
            },
        };
        dot.state = state;

        let size = dot.particle.size;
        if let Some(moons) = dot.moons.as_mut() {
            step_moons(moons, state.screen, size, time);
        }
    }
}

fn grid_state(rotation: Rotation2<f64>, base: NVec3, jitter: NVec2, center: NVec2, radius: f64) -> OrbitState {
    let flat = rotation * (NVec2::new(base.x, base.y) + jitter);
    OrbitState {
        screen: center + flat * radius,
        z: base.z,
    }
}

/// Advance every body of the set to `time`, in place
pub fn step(bodies: &mut BodySet, time: f64, ctx: &SimulationContext) {
    let viewport = ctx.viewport;
    let sphere = &mut bodies.sphere;

    let mut placement = place_sphere(&sphere.motion, sphere.breathing_amplitude, viewport, ctx.section, time);
    placement.spin = time * sphere.grid_spin_speed;
    sphere.state = placement;

    let unit = orbit_unit(&sphere.motion, viewport);
    bodies.planet_depth_range = depth_range(&bodies.planets, unit);
    bodies.big_body_depth_range = depth_range(&bodies.big_bodies, unit);

    step_orbiting(&mut bodies.planets, placement.center, unit, time);
    step_orbiting(&mut bodies.big_bodies, placement.center, unit, time);

    let planet_states: Vec<OrbitState> = bodies.planets.iter().map(|p| p.state).collect();
    step_sphere_dots(&mut bodies.sphere, &planet_states, bodies.planet_depth_range, time);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn elements(tilt: f64, inclination: f64, node: f64) -> OrbitElements {
        OrbitElements {
            radius: 2.0,
            speed: 0.5,
            phase: 0.3,
            direction: 1.0,
            eccentricity: 1.0,
            inclination,
            node,
            tilt,
        }
    }

    #[test]
    fn circular_orbit_keeps_its_radius_under_rotation() {
        let el = elements(0.7, 0.3, 1.9);
        for k in 0..50 {
            let p = orbit_offset(&el, k as f64 * 0.37, 100.0);
            assert!((p.norm() - 200.0).abs() < 1e-9);
        }
    }

    #[test]
    fn untilted_orbit_is_edge_on() {
        let el = elements(0.0, 0.0, 0.0);
        let p = orbit_offset(&el, 2.0, 10.0);
        assert!(p.y.abs() < 1e-12);
    }

    #[test]
    fn grid_spin_turns_in_the_screen_plane() {
        let base = NVec3::new(0.3, -0.4, (1.0f64 - 0.25).sqrt());
        let center = NVec2::new(500.0, 300.0);
        let rest = grid_state(Rotation2::new(0.0), base, NVec2::zeros(), center, 200.0);
        for k in 1..20 {
            let turned = grid_state(Rotation2::new(k as f64 * 0.4), base, NVec2::zeros(), center, 200.0);
            assert!(((turned.screen - center).norm() - (rest.screen - center).norm()).abs() < 1e-9);
            assert_eq!(turned.z, rest.z);
        }
    }

    #[test]
    fn direction_reverses_motion() {
        let mut el = elements(0.0, 0.0, 0.0);
        let forward = el.angle_at(1.0);
        el.direction = -1.0;
        let backward = el.angle_at(1.0);
        assert!(((forward - el.phase) + (backward - el.phase)).abs() < 1e-12);
    }
}
