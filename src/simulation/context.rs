//! Explicit simulation context
//!
//! Holds the mount parameters and cross-component signals of one animation
//! session. Nothing here is global: every component receives the context it
//! reads, and signals change only through the setters.

use log::warn;

use crate::device::profile::Viewport;
use crate::simulation::states::NVec2;

pub const MIN_NAVIGATION_INTENSITY: f64 = 1.0;
pub const MAX_NAVIGATION_INTENSITY: f64 = 1.5;

/// Base influence radius of the sphere on other decorative elements
pub const GRAVITY_INFLUENCE_RADIUS: f64 = 150.0;
/// Pull in px at zero distance
pub const GRAVITY_MAX_PULL: f64 = 25.0;

/// Page section the animation is mounted under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Section {
    #[default]
    Home,
    Me,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationContext {
    pub section: Section,
    pub viewport: Viewport,
    navigation_intensity: f64,
    sphere_position: Option<NVec2>, // published once per frame
}

impl SimulationContext {
    pub fn new(section: Section, viewport: Viewport) -> Self {
        Self {
            section,
            viewport,
            navigation_intensity: MIN_NAVIGATION_INTENSITY,
            sphere_position: None,
        }
    }

    pub fn navigation_intensity(&self) -> f64 {
        self.navigation_intensity
    }

    /// Inbound signal from the drag subsystem, clamped to [1.0, 1.5]
    pub fn set_navigation_intensity(&mut self, value: f64) {
        let clamped = if value.is_finite() {
            value.clamp(MIN_NAVIGATION_INTENSITY, MAX_NAVIGATION_INTENSITY)
        } else {
            MIN_NAVIGATION_INTENSITY
        };
        if clamped != value {
            warn!("navigation intensity {value} clamped to {clamped}");
        }
        self.navigation_intensity = clamped;
    }

    /// Outbound signal: last published sphere centre
    pub fn sphere_position(&self) -> Option<NVec2> {
        self.sphere_position
    }

    pub fn publish_sphere_position(&mut self, position: NVec2) {
        self.sphere_position = Some(position);
    }
}

/// What the drag subsystem reports about the navigation words
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationActivity {
    pub dragging: usize, // words currently held
    pub thrown: usize,   // words released away from their slot
}

impl NavigationActivity {
    pub fn intensity(&self) -> f64 {
        if self.dragging > 0 {
            1.5
        } else if self.thrown > 0 {
            1.2
        } else {
            1.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityPull {
    pub pull: NVec2,       // px toward the sphere
    pub influence: f64,    // 0 at the field edge, 1 at the centre
    pub distance: f64,
    pub in_field: bool,
}

/// Pull of the sphere on an element at `element` (e.g. the bending line)
pub fn gravitational_pull(sphere: NVec2, element: NVec2, element_radius: f64) -> GravityPull {
    let delta = sphere - element;
    let distance = delta.norm();
    let max_influence = GRAVITY_INFLUENCE_RADIUS + element_radius;

    if distance > 0.0 && distance < max_influence {
        let influence = 1.0 - distance / max_influence;
        let strength = influence * GRAVITY_MAX_PULL;
        GravityPull {
            pull: delta / distance * strength,
            influence,
            distance,
            in_field: true,
        }
    } else {
        GravityPull {
            pull: NVec2::zeros(),
            influence: 0.0,
            distance,
            in_field: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intensity_follows_activity() {
        assert_eq!(NavigationActivity::default().intensity(), 1.0);
        assert_eq!(NavigationActivity { dragging: 0, thrown: 2 }.intensity(), 1.2);
        assert_eq!(NavigationActivity { dragging: 1, thrown: 2 }.intensity(), 1.5);
    }

    #[test]
    fn intensity_is_clamped() {
        let mut ctx = SimulationContext::new(Section::Home, Viewport::new(800.0, 600.0));
        ctx.set_navigation_intensity(3.0);
        assert_eq!(ctx.navigation_intensity(), 1.5);
        ctx.set_navigation_intensity(0.2);
        assert_eq!(ctx.navigation_intensity(), 1.0);
        ctx.set_navigation_intensity(f64::NAN);
        assert_eq!(ctx.navigation_intensity(), 1.0);
        ctx.set_navigation_intensity(1.2);
        assert_eq!(ctx.navigation_intensity(), 1.2);
    }

    #[test]
    fn pull_points_at_sphere_and_fades_out() {
        let sphere = NVec2::new(100.0, 100.0);
        let near = gravitational_pull(sphere, NVec2::new(40.0, 100.0), 50.0);
        assert!(near.in_field);
        assert!(near.pull.x > 0.0 && near.pull.y.abs() < 1e-12);
        assert!((near.influence - (1.0 - 60.0 / 200.0)).abs() < 1e-12);

        let far = gravitational_pull(sphere, NVec2::new(400.0, 100.0), 50.0);
        assert!(!far.in_field);
        assert_eq!(far.pull, NVec2::zeros());

        let on_top = gravitational_pull(sphere, sphere, 50.0);
        assert!(!on_top.in_field);
    }
}
