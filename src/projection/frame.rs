//! Screen-space description of one animation frame.
//!
//! `project_frame` reads a stepped `BodySet` and produces every fill the
//! renderer will issue, already positioned, sized and shaded. It never
//! mutates the bodies. Layers are kept apart so the renderer can enforce the
//! draw order:
//! - `background` / `backdrop`: radial gradient and the pulsing dot lattice
//! - `sphere_dots`: grid dots and their moons, drawn inside `clip`
//! - `planets`, `big_bodies`: shells and moons, unclipped
//! - `overlays`: sphere atmosphere and planet halos

use std::f64::consts::PI;

use crate::configuration::config::ColorConfig;
use crate::device::profile::{RenderTunables, Viewport};
use crate::projection::shading::{depth_factor, project, CameraParams, Projection, MOON_SHADING, PARTICLE_SHADING};
use crate::projection::silhouette::{edge_fade, ClipPath};
use crate::simulation::context::SimulationContext;
use crate::simulation::states::{Body, BodySet, MainSphere, MoonSet, NVec2, SurfaceParticle};

pub const BACKDROP_SPACING: f64 = 60.0;
/// Share of alpha lost between the canvas centre and a corner
pub const BACKDROP_EDGE_FADE: f64 = 0.7;
const BACKDROP_PULSE_SPEED: f64 = 0.8;

const DOT_RADIUS_FACTOR: f64 = 0.5; // grid dot size -> px
const SHELL_RADIUS_FACTOR: f64 = 0.9;
const HALO_REACH: f64 = 2.5;        // halo outer radius in body radii
const HALO_ALPHA: f64 = 0.25;

pub const DOT_COLOR: Rgba = Rgba::new(235, 238, 255, 1.0);
pub const MOON_COLOR: Rgba = Rgba::new(200, 210, 230, 1.0);
pub const PLANET_COLOR: Rgba = Rgba::new(225, 228, 240, 1.0);
pub const BIG_BODY_COLOR: Rgba = Rgba::new(190, 210, 255, 1.0);
pub const ACCENT_COLOR: Rgba = Rgba::new(255, 214, 170, 1.0);
pub const GLOW_COLOR: Rgba = Rgba::new(140, 170, 255, 1.0);

const BACKGROUND: [(f64, Rgba); 4] = [
    (0.0, Rgba::new(20, 22, 42, 1.0)),
    (0.4, Rgba::new(13, 15, 30, 1.0)),
    (0.75, Rgba::new(8, 9, 20, 1.0)),
    (1.0, Rgba::new(4, 5, 12, 1.0)),
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a: a.clamp(0.0, 1.0), ..self }
    }
}

impl From<ColorConfig> for Rgba {
    fn from(c: ColorConfig) -> Self {
        Rgba::new(c.r, c.g, c.b, c.alpha.clamp(0.0, 1.0))
    }
}

/// Colour at `offset` (0 = inner edge, 1 = outer edge) of a gradient
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dot {
    pub center: NVec2,
    pub radius: f64,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Glow {
    pub center: NVec2,
    pub inner: f64,
    pub outer: f64,
    pub stops: Vec<GradientStop>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub viewport: Viewport,
    pub background: Vec<GradientStop>,
    pub backdrop: Vec<Dot>,
    pub clip: ClipPath,
    pub sphere_dots: Vec<Dot>,
    pub planets: Vec<Dot>,
    pub big_bodies: Vec<Dot>,
    pub overlays: Vec<Glow>,
}

impl Frame {
    /// Body fills, backdrop excluded
    pub fn body_dot_count(&self) -> usize {
        self.sphere_dots.len() + self.planets.len() + self.big_bodies.len()
    }
}

pub fn project_frame(bodies: &BodySet, ctx: &SimulationContext, tunables: &RenderTunables, time: f64) -> Frame {
    let camera = CameraParams::from_bodies(bodies);
    let sphere = &bodies.sphere;
    let sphere_proj = project(Body::MainSphere(sphere), &camera);

    let mut planets = Vec::new();
    let mut overlays = vec![sphere_glow(sphere, ctx.navigation_intensity(), tunables)];
    for planet in &bodies.planets {
        let proj = project(Body::Planet(planet), &camera);
        let color = planet.color.map(Rgba::from).unwrap_or(PLANET_COLOR);
        let body_radius = planet.size * proj.scale * tunables.dot_scale;
        shell_dots(&planet.shell, planet.spin, body_radius, &proj, color, tunables, &mut planets);
        moon_dots(&planet.moons, planet.size, &proj, tunables, &mut planets);

        if planet.fat && planet.halo {
            overlays.push(halo(proj.screen, body_radius, color.with_alpha(HALO_ALPHA * proj.alpha)));
        }
    }

    let mut big_bodies = Vec::new();
    for body in &bodies.big_bodies {
        let proj = project(Body::BigBody(body), &camera);
        let color = if body.accent { ACCENT_COLOR } else { BIG_BODY_COLOR };
        let body_radius = body.size * proj.scale * tunables.dot_scale;
        shell_dots(&body.shell, body.spin, body_radius, &proj, color, tunables, &mut big_bodies);
        moon_dots(&body.moons, body.size, &proj, tunables, &mut big_bodies);
    }

    Frame {
        viewport: ctx.viewport,
        background: BACKGROUND.iter().map(|(offset, color)| GradientStop { offset: *offset, color: *color }).collect(),
        backdrop: backdrop_lattice(ctx.viewport, tunables, time),
        clip: ClipPath::sample(sphere.state.center, sphere.state.radius, time, &sphere.shape),
        sphere_dots: sphere_dots(sphere, &sphere_proj, tunables),
        planets,
        big_bodies,
        overlays,
    }
}

fn sphere_dots(sphere: &MainSphere, proj: &Projection, tunables: &RenderTunables) -> Vec<Dot> {
    let state = &sphere.state;
    let mut out = Vec::with_capacity(sphere.dots.len());

    for dot in &sphere.dots {
        let f = depth_factor(dot.state.z, 1.0);
        let normalized = if state.radius > 0.0 {
            (dot.state.screen - state.center).norm() / state.radius
        } else {
            1.0
        };
        let alpha = PARTICLE_SHADING.alpha(f) * edge_fade(normalized, &sphere.shape) * proj.alpha;
        let radius = dot.particle.size * DOT_RADIUS_FACTOR * PARTICLE_SHADING.scale(f) * proj.scale * tunables.dot_scale;
        out.push(Dot { center: dot.state.screen, radius, color: DOT_COLOR.with_alpha(alpha) });

        if let Some(moons) = &dot.moons {
            for moon in &moons.moons {
                let mf = depth_factor(moon.state.z, 1.0);
                out.push(Dot {
                    center: moon.state.screen,
                    radius: moon.size * radius * MOON_SHADING.scale(mf),
                    color: MOON_COLOR.with_alpha(alpha * MOON_SHADING.alpha(mf)),
                });
            }
        }
    }
    out
}

/// Shell particles spun about the body's vertical axis, back to front
fn shell_dots(
    shell: &[SurfaceParticle],
    spin: f64,
    body_radius: f64,
    proj: &Projection,
    color: Rgba,
    tunables: &RenderTunables,
    out: &mut Vec<Dot>,
) {
    let (s, c) = spin.sin_cos();
    let mut layer: Vec<(f64, Dot)> = shell
        .iter()
        .map(|p| {
            let x = p.base.x * c + p.base.z * s;
            let z = -p.base.x * s + p.base.z * c;
            let f = depth_factor(z, 1.0);
            let dot = Dot {
                center: proj.screen + NVec2::new(x, p.base.y) * body_radius,
                radius: p.size * SHELL_RADIUS_FACTOR * PARTICLE_SHADING.scale(f) * proj.scale * tunables.dot_scale,
                color: color.with_alpha(color.a * PARTICLE_SHADING.alpha(f) * proj.alpha),
            };
            (z, dot)
        })
        .collect();
    layer.sort_by(|a, b| a.0.total_cmp(&b.0));
    out.extend(layer.into_iter().map(|(_, d)| d));
}

fn moon_dots(moons: &MoonSet, parent_size: f64, proj: &Projection, tunables: &RenderTunables, out: &mut Vec<Dot>) {
    for moon in &moons.moons {
        let mf = depth_factor(moon.state.z, 1.0);
        out.push(Dot {
            center: moon.state.screen,
            radius: moon.size * parent_size * MOON_SHADING.scale(mf) * proj.scale * tunables.dot_scale,
            color: MOON_COLOR.with_alpha(MOON_SHADING.alpha(mf) * proj.alpha),
        });
    }
}

fn sphere_glow(sphere: &MainSphere, intensity: f64, tunables: &RenderTunables) -> Glow {
    let r = sphere.state.radius;
    let alpha = (tunables.glow_alpha * intensity).min(1.0);
    let stops = if tunables.gradient_stops >= 3 {
        vec![
            GradientStop { offset: 0.0, color: GLOW_COLOR.with_alpha(alpha) },
            GradientStop { offset: 0.5, color: GLOW_COLOR.with_alpha(alpha * 0.4) },
            GradientStop { offset: 1.0, color: GLOW_COLOR.with_alpha(0.0) },
        ]
    } else {
        vec![
            GradientStop { offset: 0.0, color: GLOW_COLOR.with_alpha(alpha) },
            GradientStop { offset: 1.0, color: GLOW_COLOR.with_alpha(0.0) },
        ]
    };
    Glow {
        center: sphere.state.center,
        inner: r * tunables.glow_inner,
        outer: r * tunables.glow_outer,
        stops,
    }
}

fn halo(center: NVec2, body_radius: f64, color: Rgba) -> Glow {
    Glow {
        center,
        inner: body_radius,
        outer: body_radius * HALO_REACH,
        stops: vec![
            GradientStop { offset: 0.0, color },
            GradientStop { offset: 1.0, color: color.with_alpha(0.0) },
        ],
    }
}

/// Hex-offset dot lattice with a slow per-dot pulse, fading toward the corners
pub fn backdrop_lattice(viewport: Viewport, tunables: &RenderTunables, time: f64) -> Vec<Dot> {
    let (cx, cy) = viewport.center();
    let max_distance = (cx * cx + cy * cy).sqrt();
    if max_distance <= 0.0 {
        return Vec::new();
    }
    let rows = (viewport.height / BACKDROP_SPACING).ceil() as usize + 1;
    let cols = (viewport.width / BACKDROP_SPACING).ceil() as usize + 1;

    let mut dots = Vec::with_capacity(rows * cols);
    for row in 0..rows {
        let shift = if row % 2 == 1 { BACKDROP_SPACING * 0.5 } else { 0.0 };
        for col in 0..cols {
            let x = col as f64 * BACKDROP_SPACING + shift;
            let y = row as f64 * BACKDROP_SPACING;
            let distance = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
            let fade = 1.0 - BACKDROP_EDGE_FADE * (distance / max_distance).min(1.0);
            let phase = (x + y) * 0.01 + (row * 7 + col * 3) as f64 * PI / 11.0;
            let pulse = (time * BACKDROP_PULSE_SPEED + phase).sin() * tunables.background_dot_pulse;
            let alpha = ((tunables.background_dot_alpha + pulse) * fade).max(0.0);
            dots.push(Dot {
                center: NVec2::new(x, y),
                radius: tunables.background_dot_size,
                color: DOT_COLOR.with_alpha(alpha),
            });
        }
    }
    dots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::profile::DeviceProfile;

    #[test]
    fn backdrop_fades_toward_corners() {
        let tunables = RenderTunables::for_profile(&DeviceProfile::default());
        let viewport = Viewport::new(600.0, 600.0);
        let dots = backdrop_lattice(viewport, &tunables, 0.0);
        assert!(!dots.is_empty());
        let max_alpha = tunables.background_dot_alpha + tunables.background_dot_pulse;
        for d in &dots {
            assert!(d.color.a >= 0.0 && d.color.a <= max_alpha + 1e-12);
        }
        // corner dot at (0, 0) is at full distance
        let corner = dots[0];
        assert!(corner.color.a <= max_alpha * (1.0 - BACKDROP_EDGE_FADE) + 1e-12);
    }

    #[test]
    fn glow_follows_gradient_stop_count() {
        let mut tunables = RenderTunables::for_profile(&DeviceProfile::default());
        let sphere = crate::simulation::generator::generate(&Default::default()).sphere;
        assert_eq!(sphere_glow(&sphere, 1.0, &tunables).stops.len(), 2);
        tunables.gradient_stops = 3;
        assert_eq!(sphere_glow(&sphere, 1.0, &tunables).stops.len(), 3);
    }
}
