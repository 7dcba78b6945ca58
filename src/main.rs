use orbitfield::{load_body_table, BodyTableConfig, Section, Viewport, NativeProbe};
use orbitfield::{Animation, ManualHost, RecordingSurface, FrameOutcome};
use orbitfield::{bench_generate, bench_step};

use clap::Parser;
use anyhow::Result;
use log::info;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Orbital-particle background animation")]
struct Args {
    /// Body table override, looked up under scenarios/ when not a path
    #[arg(long)]
    table: Option<String>,

    #[arg(long, value_enum, default_value_t = Section::Home)]
    section: Section,

    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    #[arg(long, default_value_t = 720.0)]
    height: f64,

    #[arg(long)]
    pixel_ratio: Option<f64>,

    /// Logical cores, detected when omitted
    #[arg(long)]
    cores: Option<usize>,

    /// Drive the animation without a window
    #[arg(long)]
    headless: bool,

    /// Frame callbacks to simulate in headless mode (60 Hz cadence)
    #[arg(long, default_value_t = 120)]
    frames: usize,

    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_table(name: Option<&str>) -> Result<BodyTableConfig> {
    let Some(name) = name else {
        return Ok(BodyTableConfig::default());
    };
    let direct = PathBuf::from(name);
    let path = if direct.exists() {
        direct
    } else {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(name)
    };
    load_body_table(&path)
}

fn run_headless(mut animation: Animation, mut host: ManualHost, frames: usize) {
    let mut surface = RecordingSurface::new();
    let cadence_ms = 1000.0 / 60.0;
    let mut rendered = 0;

    for tick in 1..=frames {
        let now_ms = tick as f64 * cadence_ms;
        for _ in host.take_due() {
            if animation.on_frame(&mut host, now_ms, &mut surface) == FrameOutcome::Rendered {
                rendered += 1;
            }
        }
    }

    let sphere = animation.sphere_position();
    animation.unmount(&mut host);

    println!(
        "{frames} callbacks, {rendered} rendered, {} fills in last frame ({} clipped), t = {:.2}",
        surface.circle_count(),
        surface.culled(),
        animation.time()
    );
    if let Some(p) = sphere {
        println!("sphere at ({:.1}, {:.1})", p.x, p.y);
    }
}

/// The bevy window installs its own logger through `LogPlugin`
fn uses_env_logger(args: &Args) -> bool {
    args.headless || args.bench || !cfg!(feature = "viewer")
}

fn main() -> Result<()> {
    let args = Args::parse();
    if uses_env_logger(&args) {
        env_logger::init();
    }

    let table = load_table(args.table.as_deref())?;
    let viewport = Viewport::new(args.width, args.height);

    if args.bench {
        bench_generate(&table);
        bench_step(&table, viewport);
        return Ok(());
    }

    let probe = NativeProbe { viewport: Some(viewport), pixel_ratio: args.pixel_ratio, cores: args.cores };
    let mut host = ManualHost::new();
    let Some(animation) = Animation::mount(&probe, table, args.section, &mut host, 0.0) else {
        info!("nothing to draw on, exiting");
        return Ok(());
    };

    if args.headless {
        run_headless(animation, host, args.frames);
        return Ok(());
    }

    #[cfg(feature = "viewer")]
    orbitfield::run_viewer(animation, host);

    #[cfg(not(feature = "viewer"))]
    {
        log::warn!("built without the viewer feature, running headless");
        run_headless(animation, host, args.frames);
    }

    Ok(())
}
