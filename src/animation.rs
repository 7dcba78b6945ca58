//! One mounted animation session.
//!
//! Owns the clock, the context, the device profile and the active `BodySet`.
//! Rebuilds (resize, section change) always generate and step a fresh set
//! off to the side and swap it in whole.

use log::{debug, info, warn};

use crate::configuration::config::BodyTableConfig;
use crate::device::profile::{detect, DeviceProfile, EnvironmentProbe, RenderTunables, Viewport};
use crate::projection::frame::project_frame;
use crate::scheduler::host::FrameHost;
use crate::scheduler::scheduler::{FrameOutcome, FrameScheduler};
use crate::simulation::context::{Section, SimulationContext};
use crate::simulation::generator::generate;
use crate::simulation::kinematics::step;
use crate::simulation::states::{BodySet, NVec2, SimulationClock};
use crate::visualization::renderer::{render, Surface};

pub struct Animation {
    table: BodyTableConfig,
    profile: DeviceProfile,
    tunables: RenderTunables,
    context: SimulationContext,
    clock: SimulationClock,
    bodies: BodySet,
    scheduler: FrameScheduler,
    rendered: usize,
}

/// Generate and position a complete body set for `time`
fn build(table: &BodyTableConfig, time: f64, context: &SimulationContext) -> BodySet {
    let mut bodies = generate(table);
    step(&mut bodies, time, context);
    bodies
}

impl Animation {
    /// `None` when there is nothing to draw on; the caller just shows no background
    pub fn mount(
        probe: &dyn EnvironmentProbe,
        table: BodyTableConfig,
        section: Section,
        host: &mut dyn FrameHost,
        now_ms: f64,
    ) -> Option<Self> {
        if !probe.has_surface() {
            warn!("no drawing surface, animation disabled");
            return None;
        }

        let profile = detect(probe);
        let tunables = RenderTunables::for_profile(&profile);
        let mut context = SimulationContext::new(section, profile.viewport);
        let clock = SimulationClock::new(table.time_step);
        let bodies = build(&table, clock.time(), &context);
        context.publish_sphere_position(bodies.sphere.state.center);

        let mut scheduler = FrameScheduler::new(tunables.frame_interval_ms);
        scheduler.mount(host);

        info!(
            "mounted {:?} section at {:.1} ms: {:?} {}x{}, {} sphere dots, {:.0} fps",
            section,
            now_ms,
            profile.tier,
            profile.viewport.width,
            profile.viewport.height,
            bodies.sphere.dots.len(),
            profile.target_fps()
        );

        Some(Self {
            table,
            profile,
            tunables,
            context,
            clock,
            bodies,
            scheduler,
            rendered: 0,
        })
    }

    /// Frame callback: step and paint when the throttle allows it
    pub fn on_frame<S: Surface + ?Sized>(&mut self, host: &mut dyn FrameHost, now_ms: f64, surface: &mut S) -> FrameOutcome {
        let outcome = self.scheduler.on_frame(host, now_ms);
        if outcome == FrameOutcome::Rendered {
            let time = self.clock.advance();
            step(&mut self.bodies, time, &self.context);
            self.context.publish_sphere_position(self.bodies.sphere.state.center);
            let frame = project_frame(&self.bodies, &self.context, &self.tunables, time);
            render(&frame, surface);
            self.rendered += 1;
        }
        outcome
    }

    /// Full remount for a new viewport; ignored once unmounted
    pub fn on_viewport_change(&mut self, host: &mut dyn FrameHost, probe: &dyn EnvironmentProbe, now_ms: f64) -> bool {
        if !self.scheduler.is_running() {
            debug!("viewport change after unmount ignored");
            return false;
        }
        self.scheduler.unmount(host);
        if !probe.has_surface() {
            warn!("drawing surface lost on resize, animation stopped");
            return false;
        }

        let profile = detect(probe);
        let tunables = RenderTunables::for_profile(&profile);
        let mut context = self.context.clone();
        context.viewport = profile.viewport;
        let bodies = build(&self.table, self.clock.time(), &context);

        self.profile = profile;
        self.tunables = tunables;
        self.context = context;
        self.bodies = bodies;
        self.context.publish_sphere_position(self.bodies.sphere.state.center);

        self.scheduler = FrameScheduler::new(self.tunables.frame_interval_ms);
        self.scheduler.mount(host);
        debug!("remounted at {}x{} ({now_ms:.1} ms)", self.profile.viewport.width, self.profile.viewport.height);
        true
    }

    pub fn set_section(&mut self, section: Section) {
        if section == self.context.section {
            return;
        }
        let mut context = self.context.clone();
        context.section = section;
        let bodies = build(&self.table, self.clock.time(), &context);

        self.context = context;
        self.bodies = bodies;
        self.context.publish_sphere_position(self.bodies.sphere.state.center);
        debug!("section switched to {section:?}");
    }

    pub fn set_navigation_intensity(&mut self, value: f64) {
        self.context.set_navigation_intensity(value);
    }

    pub fn sphere_position(&self) -> Option<NVec2> {
        self.context.sphere_position()
    }

    pub fn unmount(&mut self, host: &mut dyn FrameHost) {
        if self.scheduler.is_running() {
            self.scheduler.unmount(host);
            info!("unmounted after {} rendered frames", self.rendered);
        }
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn bodies(&self) -> &BodySet {
        &self.bodies
    }

    pub fn context(&self) -> &SimulationContext {
        &self.context
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    pub fn tunables(&self) -> &RenderTunables {
        &self.tunables
    }

    pub fn viewport(&self) -> Viewport {
        self.context.viewport
    }

    pub fn time(&self) -> f64 {
        self.clock.time()
    }

    pub fn rendered_frames(&self) -> usize {
        self.rendered
    }
}
