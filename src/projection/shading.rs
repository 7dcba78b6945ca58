//! Depth-driven perspective scale and alpha.
//!
//! Every body type maps its normalized depth `f ∈ [0, 1]` (0 = farthest back,
//! 1 = closest) linearly into its own scale and alpha ranges. Both maps are
//! increasing in `f`, so closer is always bigger and brighter.

use crate::simulation::states::{Body, BodyKind, BodySet, NVec2};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthShading {
    pub scale_min: f64,
    pub scale_max: f64,
    pub alpha_min: f64, // fully-back bodies stay faintly visible
    pub alpha_max: f64,
}

impl DepthShading {
    pub const fn new(scale_min: f64, scale_max: f64, alpha_min: f64, alpha_max: f64) -> Self {
        Self { scale_min, scale_max, alpha_min, alpha_max }
    }

    pub fn scale(&self, f: f64) -> f64 {
        self.scale_min + f.clamp(0.0, 1.0) * (self.scale_max - self.scale_min)
    }

    pub fn alpha(&self, f: f64) -> f64 {
        self.alpha_min + f.clamp(0.0, 1.0) * (self.alpha_max - self.alpha_min)
    }
}

pub const MAIN_SPHERE_SHADING: DepthShading = DepthShading::new(0.4, 1.6, 0.3, 1.0);
pub const PLANET_SHADING: DepthShading = DepthShading::new(0.6, 1.4, 0.35, 1.0);
pub const BIG_BODY_SHADING: DepthShading = DepthShading::new(0.5, 1.5, 0.3, 1.0);
/// Grid dots and shell particles, relative to their body
pub const PARTICLE_SHADING: DepthShading = DepthShading::new(0.7, 1.15, 0.45, 1.0);
pub const MOON_SHADING: DepthShading = DepthShading::new(0.7, 1.1, 0.4, 1.0);

/// `(z + z_range) / (2 z_range)` clamped to [0, 1]; a degenerate range is mid-depth
pub fn depth_factor(z: f64, z_range: f64) -> f64 {
    if z_range <= 0.0 || !z_range.is_finite() {
        return 0.5;
    }
    ((z + z_range) / (2.0 * z_range)).clamp(0.0, 1.0)
}

pub fn shading_for(kind: BodyKind) -> DepthShading {
    match kind {
        BodyKind::MainSphere => MAIN_SPHERE_SHADING,
        BodyKind::Planet => PLANET_SHADING,
        BodyKind::BigBody => BIG_BODY_SHADING,
    }
}

/// Depth ranges shared by all bodies of a type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraParams {
    pub sphere_z_range: f64,
    pub planet_z_range: f64,
    pub big_body_z_range: f64,
}

impl CameraParams {
    pub fn from_bodies(bodies: &BodySet) -> Self {
        Self {
            sphere_z_range: bodies.sphere.state.z_range,
            planet_z_range: bodies.planet_depth_range,
            big_body_z_range: bodies.big_body_depth_range,
        }
    }

    pub fn z_range(&self, kind: BodyKind) -> f64 {
        match kind {
            BodyKind::MainSphere => self.sphere_z_range,
            BodyKind::Planet => self.planet_z_range,
            BodyKind::BigBody => self.big_body_z_range,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub screen: NVec2,
    pub depth: f64, // normalized, 1 = front
    pub scale: f64,
    pub alpha: f64,
}

pub fn project(body: Body<'_>, camera: &CameraParams) -> Projection {
    let kind = body.kind();
    let state = body.state();
    let shading = shading_for(kind);
    let depth = depth_factor(state.z, camera.z_range(kind));

    Projection {
        screen: state.screen,
        depth,
        scale: shading.scale(depth),
        alpha: shading.alpha(depth),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_factor_edges() {
        assert_eq!(depth_factor(-10.0, 10.0), 0.0);
        assert_eq!(depth_factor(10.0, 10.0), 1.0);
        assert_eq!(depth_factor(0.0, 10.0), 0.5);
        assert_eq!(depth_factor(50.0, 10.0), 1.0);
        assert_eq!(depth_factor(3.0, 0.0), 0.5);
    }

    #[test]
    fn every_shading_is_increasing_and_never_transparent() {
        for s in [MAIN_SPHERE_SHADING, PLANET_SHADING, BIG_BODY_SHADING, PARTICLE_SHADING, MOON_SHADING] {
            let mut last = (f64::MIN, f64::MIN);
            for k in 0..=20 {
                let f = k as f64 / 20.0;
                let now = (s.scale(f), s.alpha(f));
                assert!(now.0 >= last.0 && now.1 >= last.1);
                last = now;
            }
            assert!(s.alpha(0.0) > 0.0);
        }
    }
}
