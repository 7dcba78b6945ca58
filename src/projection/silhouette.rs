//! Organic outline of the main sphere
//!
//! The outline is a closed path of `samples` points whose radius is
//! `R * (1 + bump + detail + breathe)`. Between samples the radius is
//! interpolated linearly in angle, and `contains` uses the same
//! interpolation, so the clip test and the drawn outline agree.

use std::f64::consts::TAU;

use crate::configuration::config::SilhouetteConfig;
use crate::simulation::states::NVec2;

const MIN_SAMPLES: usize = 3;
const CONTAINS_EPS: f64 = 1e-9;

/// Radius multiplier of the outline at angle `theta`
pub fn silhouette_factor(theta: f64, time: f64, shape: &SilhouetteConfig) -> f64 {
    let bump = shape.bump_amplitude * (theta * shape.subtle_bumps).sin();
    let detail = shape.detail_amplitude * (theta * shape.fine_details).sin();
    let breathe = shape.breathing_amplitude * (theta * shape.breathing_intensity + time * shape.breathing_speed).sin();
    1.0 + bump + detail + breathe
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClipPath {
    center: NVec2,
    radii: Vec<f64>, // radius at angle k * TAU / n
}

impl ClipPath {
    pub fn sample(center: NVec2, radius: f64, time: f64, shape: &SilhouetteConfig) -> Self {
        let n = shape.samples.max(MIN_SAMPLES);
        let radii = (0..n)
            .map(|k| {
                let theta = k as f64 * TAU / n as f64;
                (radius * silhouette_factor(theta, time, shape)).max(0.0)
            })
            .collect();
        Self { center, radii }
    }

    pub fn center(&self) -> NVec2 {
        self.center
    }

    /// Closed outline, one point per sample
    pub fn points(&self) -> Vec<NVec2> {
        let n = self.radii.len() as f64;
        self.radii
            .iter()
            .enumerate()
            .map(|(k, r)| {
                let theta = k as f64 * TAU / n;
                self.center + NVec2::new(theta.cos(), theta.sin()) * *r
            })
            .collect()
    }

    pub fn max_radius(&self) -> f64 {
        self.radii.iter().copied().fold(0.0, f64::max)
    }

    /// Interpolated outline radius in the direction `theta`
    pub fn radius_at(&self, theta: f64) -> f64 {
        let n = self.radii.len();
        let pos = theta.rem_euclid(TAU) / TAU * n as f64;
        let i0 = (pos.floor() as usize) % n;
        let i1 = (i0 + 1) % n;
        let frac = pos - pos.floor();
        self.radii[i0] * (1.0 - frac) + self.radii[i1] * frac
    }

    pub fn contains(&self, point: NVec2) -> bool {
        let d = point - self.center;
        let distance = d.norm();
        if distance == 0.0 {
            return self.max_radius() > 0.0;
        }
        distance <= self.radius_at(d.y.atan2(d.x)) + CONTAINS_EPS
    }
}

/// Alpha multiplier for a dot at `normalized` distance from the sphere centre
///
/// 1 up to `edge_fade_start`, then linear down to `edge_fade_floor` at 1.0.
pub fn edge_fade(normalized: f64, shape: &SilhouetteConfig) -> f64 {
    let start = shape.edge_fade_start.clamp(0.0, 1.0);
    let floor = shape.edge_fade_floor.clamp(0.0, 1.0);
    if normalized <= start {
        return 1.0;
    }
    if start >= 1.0 {
        return floor;
    }
    let t = ((normalized - start) / (1.0 - start)).clamp(0.0, 1.0);
    1.0 - t * (1.0 - floor)
}
