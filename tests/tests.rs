use orbitfield::simulation::generator::generate;
use orbitfield::simulation::kinematics::step;
use orbitfield::simulation::states::{BodySet, NVec2, OrbitState, ParticleMotion};
use orbitfield::projection::shading::{project, CameraParams};
use orbitfield::projection::frame::project_frame;
use orbitfield::{
    gravitational_pull, load_body_table, render, Animation, Body, BodyTableConfig, DeviceProfile,
    DrawCommand, FrameOutcome, ManualHost, NativeProbe, NavigationActivity, RecordingSurface,
    RenderTunables, Section, SimulationContext, Surface, Viewport,
};

use std::path::PathBuf;

const EPS: f64 = 1e-9;

/// 1280x720 desktop-class viewport
pub fn canvas() -> Viewport {
    Viewport::new(1280.0, 720.0)
}

pub fn probe(viewport: Viewport, cores: usize) -> NativeProbe {
    NativeProbe { viewport: Some(viewport), pixel_ratio: Some(1.0), cores: Some(cores) }
}

/// Generate the default table and step it through `times`
pub fn stepped(section: Section, times: &[f64]) -> BodySet {
    let mut bodies = generate(&BodyTableConfig::default());
    let ctx = SimulationContext::new(section, canvas());
    for t in times {
        step(&mut bodies, *t, &ctx);
    }
    bodies
}

/// Every position field of a body set, in a fixed order
pub fn positions(bodies: &BodySet) -> Vec<OrbitState> {
    let mut out = vec![OrbitState { screen: bodies.sphere.state.center, z: bodies.sphere.state.z }];
    for dot in &bodies.sphere.dots {
        out.push(dot.state);
        if let Some(moons) = &dot.moons {
            out.extend(moons.moons.iter().map(|m| m.state));
        }
    }
    for p in &bodies.planets {
        out.push(p.state);
        out.extend(p.moons.moons.iter().map(|m| m.state));
    }
    for b in &bodies.big_bodies {
        out.push(b.state);
        out.extend(b.moons.moons.iter().map(|m| m.state));
    }
    out
}

fn times() -> Vec<f64> {
    (0..240).map(|k| k as f64 * 0.37).collect()
}

// ==================================================================================
// Generation
// ==================================================================================

#[test]
fn particle_count_is_pinned_across_runs() {
    let table = BodyTableConfig::default();
    for _ in 0..100 {
        assert_eq!(generate(&table).sphere.dots.len(), 468);
    }
}

#[test]
fn particle_count_survives_stepping() {
    let bodies = stepped(Section::Home, &times());
    assert_eq!(bodies.sphere.dots.len(), 468);
    assert_eq!(bodies.planets.len(), 3);
    assert_eq!(bodies.big_bodies.len(), 6);
}

#[test]
fn moon_bearing_dots_split_into_fixed_categories() {
    let bodies = generate(&BodyTableConfig::default());
    let dots = &bodies.sphere.dots;

    let with_moons = dots.iter().filter(|d| d.moons.is_some()).count();
    let on_planets = dots.iter().filter(|d| matches!(d.motion, ParticleMotion::OrbitsPlanet { .. })).count();
    let on_main = dots.iter().filter(|d| matches!(d.motion, ParticleMotion::OrbitsMain { .. })).count();
    assert_eq!(with_moons, 282);
    assert_eq!(on_planets, 94);
    assert_eq!(on_main, 71);

    for d in dots {
        if let ParticleMotion::OrbitsPlanet { planet, .. } = d.motion {
            assert!(planet < bodies.planets.len());
        }
        if d.moons.is_none() {
            assert_eq!(d.motion, ParticleMotion::Grid);
        }
    }
}

#[test]
fn accent_body_is_last() {
    let bodies = generate(&BodyTableConfig::default());
    let last = bodies.big_bodies.last().unwrap();
    assert!(last.accent);
    assert_eq!(last.moons.count(), 2);
    assert!(bodies.big_bodies.iter().all(|b| b.size <= last.size));
    assert_eq!(bodies.big_bodies.iter().filter(|b| b.accent).count(), 1);
}

#[test]
fn yaml_override_changes_only_what_it_names() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join("dense.yaml");
    let table = load_body_table(&path).unwrap();
    assert_eq!(table.main_sphere.grid_resolution, 36);
    assert_eq!(table.planets.count, Some(4));
    // untouched defaults
    assert_eq!(table.main_sphere.grid_spin_speed, 0.12);
    assert_eq!(table.static_dots.len(), BodyTableConfig::default().static_dots.len());

    let bodies = generate(&table);
    assert_eq!(bodies.sphere.dots.len(), 788);
    assert_eq!(bodies.planets.len(), 4);
}

#[test]
fn missing_table_reports_its_path() {
    let err = load_body_table(&PathBuf::from("no/such/table.yaml")).unwrap_err();
    assert!(format!("{err:#}").contains("no/such/table.yaml"));
}

// ==================================================================================
// Kinematics
// ==================================================================================

#[test]
fn stepping_is_deterministic() {
    let a = stepped(Section::Home, &times());
    let b = stepped(Section::Home, &times());
    assert_eq!(positions(&a), positions(&b));
}

#[test]
fn home_sphere_starts_right_of_centre() {
    let bodies = stepped(Section::Home, &[0.0]);
    let c = bodies.sphere.state.center;
    assert!((c.x - 1152.0).abs() < EPS);
    assert!((c.y - 360.0).abs() < EPS);
}

#[test]
fn me_sphere_is_pinned_with_no_depth() {
    for t in [0.0, 3.7, 250.0] {
        let bodies = stepped(Section::Me, &[t]);
        let s = bodies.sphere.state;
        assert!((s.center.x - 320.0).abs() < EPS);
        assert!((s.center.y - 360.0).abs() < EPS);
        assert_eq!(s.z, 0.0);
    }
}

#[test]
fn moons_stay_within_reach_of_their_parent() {
    let bodies = stepped(Section::Home, &[12.5]);
    for p in &bodies.planets {
        for m in &p.moons.moons {
            let d = (m.state.screen - p.state.screen).norm();
            assert!(d <= m.distance * p.size + EPS);
        }
    }
    for dot in &bodies.sphere.dots {
        if let Some(moons) = &dot.moons {
            for m in &moons.moons {
                let d = (m.state.screen - dot.state.screen).norm();
                assert!(d <= m.distance * dot.particle.size + EPS);
            }
        }
    }
}

// ==================================================================================
// Projection & rendering
// ==================================================================================

#[test]
fn closer_bodies_are_bigger_and_brighter() {
    for t in times().iter().step_by(7) {
        let bodies = stepped(Section::Home, &[*t]);
        let camera = CameraParams::from_bodies(&bodies);

        let groups = [
            bodies.planets.iter().map(Body::Planet).collect::<Vec<_>>(),
            bodies.big_bodies.iter().map(Body::BigBody).collect::<Vec<_>>(),
        ];
        for group in groups {
            let mut projected: Vec<(f64, f64, f64)> = group
                .iter()
                .map(|b| {
                    let p = project(*b, &camera);
                    (b.state().z, p.scale, p.alpha)
                })
                .collect();
            projected.sort_by(|a, b| a.0.total_cmp(&b.0));
            for w in projected.windows(2) {
                assert!(w[1].1 >= w[0].1 - EPS, "scale not monotonic at t = {t}");
                assert!(w[1].2 >= w[0].2 - EPS, "alpha not monotonic at t = {t}");
            }
        }
    }
}

#[test]
fn sphere_dots_outside_the_silhouette_are_not_drawn() {
    let tunables = RenderTunables::for_profile(&DeviceProfile { viewport: canvas(), ..DeviceProfile::default() });
    let ctx = SimulationContext::new(Section::Home, canvas());

    for t in [0.5, 4.0, 19.3, 77.7] {
        let bodies = stepped(Section::Home, &[t]);
        let frame = project_frame(&bodies, &ctx, &tunables, t);
        let mut surface = RecordingSurface::new();
        render(&frame, &mut surface);

        for cmd in surface.commands() {
            if let DrawCommand::Circle { center, clipped: true, .. } = cmd {
                assert!(frame.clip.contains(*center));
            }
        }
        let outside = frame.sphere_dots.iter().filter(|d| !frame.clip.contains(d.center)).count();
        assert_eq!(surface.culled(), outside);
    }
}

#[test]
fn planet_orbiting_dots_share_the_sphere_clip() {
    let tunables = RenderTunables::for_profile(&DeviceProfile { viewport: canvas(), ..DeviceProfile::default() });
    let ctx = SimulationContext::new(Section::Home, canvas());
    let (mut inside, mut outside) = (0, 0);

    for k in 0..40 {
        let t = k as f64 * 2.5;
        let bodies = stepped(Section::Home, &[t]);
        let frame = project_frame(&bodies, &ctx, &tunables, t);
        for dot in &bodies.sphere.dots {
            if let ParticleMotion::OrbitsPlanet { .. } = dot.motion {
                if frame.clip.contains(dot.state.screen) {
                    inside += 1;
                } else {
                    outside += 1;
                }
            }
        }
    }
    // visible while near the sphere, culled once out at a planet
    assert!(inside > 0);
    assert!(outside > 0);
}

#[test]
fn draw_order_is_layered() {
    let tunables = RenderTunables::for_profile(&DeviceProfile { viewport: canvas(), ..DeviceProfile::default() });
    let ctx = SimulationContext::new(Section::Home, canvas());
    let bodies = stepped(Section::Home, &[2.0]);
    let frame = project_frame(&bodies, &ctx, &tunables, 2.0);
    let mut surface = RecordingSurface::new();
    render(&frame, &mut surface);

    let cmds = surface.commands();
    assert!(matches!(cmds[0], DrawCommand::Clear { .. }));
    assert!(matches!(cmds[1], DrawCommand::RectGradient { .. }));
    let push = cmds.iter().position(|c| matches!(c, DrawCommand::PushClip { .. })).unwrap();
    let pop = cmds.iter().position(|c| matches!(c, DrawCommand::PopClip)).unwrap();
    let first_glow = cmds.iter().position(|c| matches!(c, DrawCommand::CircleGradient { .. })).unwrap();
    assert!(push < pop && pop < first_glow);
    // overlays come last
    assert!(cmds[first_glow..].iter().all(|c| matches!(c, DrawCommand::CircleGradient { .. })));
}

#[test]
fn empty_body_set_still_paints_background_and_glow() {
    let mut table = BodyTableConfig::default();
    table.main_sphere.grid_resolution = 0;
    table.planets.count = Some(0);
    table.orbital_big_bodies.count = 0;

    let mut bodies = generate(&table);
    assert!(bodies.is_empty());

    let ctx = SimulationContext::new(Section::Home, canvas());
    step(&mut bodies, 1.0, &ctx);
    let tunables = RenderTunables::for_profile(&DeviceProfile { viewport: canvas(), ..DeviceProfile::default() });
    let frame = project_frame(&bodies, &ctx, &tunables, 1.0);
    let mut surface = RecordingSurface::new();
    render(&frame, &mut surface);

    let cmds = surface.commands();
    assert!(cmds.iter().any(|c| matches!(c, DrawCommand::RectGradient { .. })));
    assert_eq!(cmds.iter().filter(|c| matches!(c, DrawCommand::CircleGradient { .. })).count(), 1);
    assert_eq!(frame.body_dot_count(), 0);
    assert_eq!(surface.circle_count(), frame.backdrop.len());
}

#[test]
fn navigation_intensity_brightens_the_glow() {
    let tunables = RenderTunables::for_profile(&DeviceProfile { viewport: canvas(), ..DeviceProfile::default() });
    let bodies = stepped(Section::Home, &[1.0]);
    let mut ctx = SimulationContext::new(Section::Home, canvas());

    let calm = project_frame(&bodies, &ctx, &tunables, 1.0).overlays[0].stops[0].color.a;
    ctx.set_navigation_intensity(NavigationActivity { dragging: 1, thrown: 0 }.intensity());
    let busy = project_frame(&bodies, &ctx, &tunables, 1.0).overlays[0].stops[0].color.a;
    assert!((busy - calm * 1.5).abs() < EPS);
}

// ==================================================================================
// Session lifecycle
// ==================================================================================

#[test]
fn mount_without_surface_is_a_no_op() {
    let mut host = ManualHost::new();
    let blind = NativeProbe { viewport: None, pixel_ratio: None, cores: None };
    assert!(Animation::mount(&blind, BodyTableConfig::default(), Section::Home, &mut host, 0.0).is_none());
    assert_eq!(host.pending_frames(), 0);
    assert_eq!(host.listener_count(), 0);
}

#[test]
fn mount_publishes_the_home_position() {
    let mut host = ManualHost::new();
    let anim = Animation::mount(&probe(canvas(), 8), BodyTableConfig::default(), Section::Home, &mut host, 0.0).unwrap();
    let p = anim.sphere_position().unwrap();
    assert!((p.x - 1152.0).abs() < EPS && (p.y - 360.0).abs() < EPS);
    assert_eq!(host.pending_frames(), 1);
    assert_eq!(host.listener_count(), 1);
}

#[test]
fn low_power_renders_every_other_vsync_tick() {
    let mut host = ManualHost::new();
    let mut anim = Animation::mount(&probe(canvas(), 4), BodyTableConfig::default(), Section::Home, &mut host, 0.0).unwrap();
    let mut surface = RecordingSurface::new();

    let callbacks = 60;
    let mut rendered = 0;
    for tick in 1..=callbacks {
        let now = tick as f64 * (1000.0 / 60.0);
        for _ in host.take_due() {
            let before = surface.commands().to_vec();
            match anim.on_frame(&mut host, now, &mut surface) {
                FrameOutcome::Rendered => rendered += 1,
                FrameOutcome::Skipped => assert_eq!(surface.commands(), &before[..]),
                FrameOutcome::Inactive => panic!("running animation reported inactive"),
            }
        }
    }
    assert_eq!(rendered, callbacks / 2);
    assert_eq!(anim.rendered_frames(), rendered);
}

#[test]
fn unmount_leaves_nothing_behind() {
    let mut host = ManualHost::new();
    let mut anim = Animation::mount(&probe(canvas(), 8), BodyTableConfig::default(), Section::Home, &mut host, 0.0).unwrap();
    let mut surface = RecordingSurface::new();
    for tick in 1..=5 {
        for _ in host.take_due() {
            anim.on_frame(&mut host, tick as f64 * 16.7, &mut surface);
        }
    }

    anim.unmount(&mut host);
    assert_eq!(host.pending_frames(), 0);
    assert_eq!(host.listener_count(), 0);
    assert!(host.take_due().is_empty());

    let frozen = anim.sphere_position();
    let frozen_time = anim.time();
    let commands = surface.commands().to_vec();
    for k in 0..10 {
        let v = Viewport::new(800.0 + k as f64, 600.0);
        assert!(host.dispatch_resize(v).is_empty());
        assert!(!anim.on_viewport_change(&mut host, &probe(v, 8), 200.0));
        assert_eq!(anim.on_frame(&mut host, 300.0 + k as f64, &mut surface), FrameOutcome::Inactive);
    }
    assert_eq!(anim.sphere_position(), frozen);
    assert_eq!(anim.time(), frozen_time);
    assert_eq!(surface.commands(), &commands[..]);
    assert_eq!(host.pending_frames(), 0);
}

#[test]
fn resize_remounts_with_one_listener() {
    let mut host = ManualHost::new();
    let mut anim = Animation::mount(&probe(canvas(), 8), BodyTableConfig::default(), Section::Home, &mut host, 0.0).unwrap();

    let small = Viewport::new(600.0, 900.0);
    let deliveries = host.dispatch_resize(small);
    assert_eq!(deliveries.len(), 1);
    assert!(anim.on_viewport_change(&mut host, &probe(small, 8), 50.0));

    assert_eq!(anim.viewport(), small);
    assert_eq!(host.listener_count(), 1);
    assert_eq!(host.pending_frames(), 1);
    assert_eq!(anim.bodies().sphere.dots.len(), 468);
    // mobile width: half rate
    assert_eq!(anim.tunables().frame_interval_ms, 1000.0 / 30.0);
}

#[test]
fn section_switch_repositions_within_one_rebuild() {
    let mut host = ManualHost::new();
    let mut anim = Animation::mount(&probe(canvas(), 8), BodyTableConfig::default(), Section::Home, &mut host, 0.0).unwrap();
    let mut surface = RecordingSurface::new();
    for tick in 1..=20 {
        for _ in host.take_due() {
            anim.on_frame(&mut host, tick as f64 * 16.7, &mut surface);
        }
    }

    anim.set_section(Section::Me);
    let p = anim.sphere_position().unwrap();
    assert!((p.x - 320.0).abs() < EPS && (p.y - 360.0).abs() < EPS);
    assert_eq!(anim.bodies().sphere.state.z, 0.0);
    assert_eq!(anim.bodies().sphere.dots.len(), 468);
}

#[test]
fn sphere_pulls_nearby_elements() {
    let mut host = ManualHost::new();
    let anim = Animation::mount(&probe(canvas(), 8), BodyTableConfig::default(), Section::Home, &mut host, 0.0).unwrap();
    let sphere = anim.sphere_position().unwrap();

    let near = gravitational_pull(sphere, sphere - NVec2::new(100.0, 0.0), 20.0);
    assert!(near.in_field);
    assert!(near.pull.x > 0.0);
    let far = gravitational_pull(sphere, NVec2::new(0.0, 0.0), 20.0);
    assert!(!far.in_field);
}

#[test]
fn surface_trait_objects_render_too() {
    let tunables = RenderTunables::for_profile(&DeviceProfile { viewport: canvas(), ..DeviceProfile::default() });
    let ctx = SimulationContext::new(Section::Me, canvas());
    let bodies = stepped(Section::Me, &[1.0]);
    let frame = project_frame(&bodies, &ctx, &tunables, 1.0);

    let mut recording = RecordingSurface::new();
    let surface: &mut dyn Surface = &mut recording;
    render(&frame, surface);
    assert!(recording.circle_count() > frame.backdrop.len());
}
