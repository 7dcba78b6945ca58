use bevy::prelude::*;
use bevy::sprite::{MaterialMesh2dBundle, Mesh2dHandle};
use bevy::math::primitives::Circle;
use bevy::window::{WindowResized, WindowResolution};

use crate::animation::Animation;
use crate::device::profile::{NativeProbe, Viewport};
use crate::projection::frame::{GradientStop, Rgba};
use crate::scheduler::host::ManualHost;
use crate::visualization::renderer::{DrawCommand, RecordingSurface};

/// Circle entities available for one frame's fills
const POOL_SIZE: usize = 4096;
const LAYER_STEP: f32 = 1.0e-4;

#[derive(Resource)]
struct ViewerState {
    animation: Animation,
    host: ManualHost,
    surface: RecordingSurface,
    pixel_ratio: Option<f64>,
    cores: Option<usize>,
}

#[derive(Component)]
struct PoolSlot(pub usize);

pub fn run_viewer(animation: Animation, host: ManualHost) {
    let viewport = animation.viewport();
    let profile = animation.profile();
    info!("run_viewer: {}x{}, {:?} tier", viewport.width, viewport.height, profile.tier);

    let state = ViewerState {
        pixel_ratio: Some(profile.pixel_ratio),
        cores: Some(profile.logical_cores),
        animation,
        host,
        surface: RecordingSurface::new(),
    };

    App::new()
        .insert_resource(state)
        .insert_resource(ClearColor(Color::BLACK))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "orbitfield".into(),
                resolution: WindowResolution::new(viewport.width as f32, viewport.height as f32),
                ..default()
            }),
            ..default()
        }))
        .add_systems(Startup, setup_pool_system)
        .add_systems(Update, (resize_system, frame_system, sync_pool_system).chain())
        .run();
}

fn setup_pool_system(mut commands: Commands, mut meshes: ResMut<Assets<Mesh>>, mut materials: ResMut<Assets<ColorMaterial>>) {
    commands.spawn(Camera2dBundle::default());

    let unit = Mesh2dHandle(meshes.add(Circle::new(1.0)));
    for i in 0..POOL_SIZE {
        commands.spawn((
            MaterialMesh2dBundle {
                mesh: unit.clone(),
                material: materials.add(ColorMaterial::from(Color::WHITE)),
                visibility: Visibility::Hidden,
                ..Default::default()
            },
            PoolSlot(i),
        ));
    }
}

fn resize_system(mut events: EventReader<WindowResized>, mut state: ResMut<ViewerState>, time: Res<Time>) {
    let now_ms = time.elapsed_seconds_f64() * 1000.0;
    let ViewerState { animation, host, pixel_ratio, cores, .. } = &mut *state;

    for event in events.read() {
        let viewport = Viewport::new(event.width as f64, event.height as f64);
        let probe = NativeProbe { viewport: Some(viewport), pixel_ratio: *pixel_ratio, cores: *cores };
        for _ in host.dispatch_resize(viewport) {
            animation.on_viewport_change(host, &probe, now_ms);
        }
    }
}

fn frame_system(mut state: ResMut<ViewerState>, time: Res<Time>) {
    let now_ms = time.elapsed_seconds_f64() * 1000.0;
    let ViewerState { animation, host, surface, .. } = &mut *state;

    for _ in host.take_due() {
        animation.on_frame(host, now_ms, surface);
    }
}

fn color(c: Rgba) -> Color {
    Color::srgba(c.r as f32 / 255.0, c.g as f32 / 255.0, c.b as f32 / 255.0, c.a as f32)
}

/// Flat stand-in for a gradient: the first stop at the mean alpha
fn gradient_color(stops: &[GradientStop]) -> Option<Color> {
    let first = stops.first()?;
    let mean = stops.iter().map(|s| s.color.a).sum::<f64>() / stops.len() as f64;
    Some(color(first.color.with_alpha(mean)))
}

/// Replay the recorded fills onto the circle pool, y-down to bevy's centred y-up
fn sync_pool_system(
    state: Res<ViewerState>,
    mut clear: ResMut<ClearColor>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut pool: Query<(&PoolSlot, &mut Transform, &mut Visibility, &Handle<ColorMaterial>)>,
) {
    let viewport = state.animation.viewport();
    let (cx, cy) = viewport.center();

    let mut fills: Vec<(f64, f64, f64, Color)> = Vec::new();
    for command in state.surface.commands() {
        match command {
            DrawCommand::RectGradient { stops, .. } => {
                if let Some(first) = stops.first() {
                    clear.0 = color(first.color);
                }
            }
            DrawCommand::Circle { center, radius, color: c, .. } => {
                fills.push((center.x, center.y, *radius, color(*c)));
            }
            DrawCommand::CircleGradient { center, outer, stops, .. } => {
                if let Some(c) = gradient_color(stops) {
                    fills.push((center.x, center.y, *outer, c));
                }
            }
            // fills outside the clip were already dropped by the surface
            DrawCommand::Clear { .. } | DrawCommand::PushClip { .. } | DrawCommand::PopClip => {}
        }
    }

    for (PoolSlot(i), mut transform, mut visibility, handle) in &mut pool {
        match fills.get(*i) {
            Some((x, y, r, c)) => {
                transform.translation = Vec3::new((x - cx) as f32, (cy - y) as f32, *i as f32 * LAYER_STEP);
                transform.scale = Vec3::splat(*r as f32);
                if let Some(material) = materials.get_mut(handle) {
                    material.color = *c;
                }
                *visibility = Visibility::Visible;
            }
            None => *visibility = Visibility::Hidden,
        }
    }
}
