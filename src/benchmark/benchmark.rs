use std::time::Instant;

use crate::configuration::config::BodyTableConfig;
use crate::device::profile::{DeviceProfile, RenderTunables, Viewport};
use crate::projection::frame::project_frame;
use crate::simulation::context::{Section, SimulationContext};
use crate::simulation::generator::generate;
use crate::simulation::kinematics::step;
use crate::visualization::renderer::{render, RecordingSurface};

const RESOLUTIONS: [usize; 5] = [28, 36, 48, 64, 96];

fn table_with_resolution(base: &BodyTableConfig, resolution: usize) -> BodyTableConfig {
    let mut table = base.clone();
    table.main_sphere.grid_resolution = resolution;
    table
}

/// Time `generate` for growing grid resolutions
pub fn bench_generate(base: &BodyTableConfig) {
    let reps = 20;

    for res in RESOLUTIONS {
        let table = table_with_resolution(base, res);

        // Warm up
        let dots = generate(&table).sphere.dots.len();

        let t0 = Instant::now();
        for _ in 0..reps {
            std::hint::black_box(generate(&table));
        }
        let dt = t0.elapsed().as_secs_f64() / reps as f64;

        println!("res = {res:3}, dots = {dots:5}, generate = {:8.6} s", dt);
    }
}

/// Time one full step + project + render for growing grid resolutions
pub fn bench_step(base: &BodyTableConfig, viewport: Viewport) {
    let steps = 200;
    let tunables = RenderTunables::for_profile(&DeviceProfile { viewport, ..DeviceProfile::default() });
    let ctx = SimulationContext::new(Section::Home, viewport);
    let mut surface = RecordingSurface::new();

    for res in RESOLUTIONS {
        let table = table_with_resolution(base, res);
        let mut bodies = generate(&table);

        let mut t_step = 0.0;
        let mut t_draw = 0.0;
        let mut time = 0.0;
        for _ in 0..steps {
            time += table.time_step;

            let t0 = Instant::now();
            step(&mut bodies, time, &ctx);
            t_step += t0.elapsed().as_secs_f64();

            let t1 = Instant::now();
            let frame = project_frame(&bodies, &ctx, &tunables, time);
            render(&frame, &mut surface);
            t_draw += t1.elapsed().as_secs_f64();
        }

        println!(
            "res = {res:3}, fills = {:5}, step = {:8.6} s, project+render = {:8.6} s",
            surface.circle_count(),
            t_step / steps as f64,
            t_draw / steps as f64
        );
    }
}
