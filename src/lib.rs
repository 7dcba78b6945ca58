pub mod simulation;
pub mod configuration;
pub mod device;
pub mod projection;
pub mod scheduler;
pub mod visualization;
pub mod animation;
pub mod benchmark;

pub use simulation::states::{
    Body, BodyKind, BodySet, MainSphere, Moon, MoonSet, NVec2, NVec3, OrbitElements, OrbitState,
    OrbitalBigBody, OrbitingBody, ParticleMotion, PlanetBody, SimulationClock, SphereDot, SurfaceParticle,
};
pub use simulation::context::{gravitational_pull, GravityPull, NavigationActivity, Section, SimulationContext};
pub use simulation::generator::{generate, grid_points, planet_count};
pub use simulation::kinematics::{orbit_offset, place_sphere, step};

pub use configuration::config::{load_body_table, BodyTableConfig, MainSphereConfig, SilhouetteConfig, SphereMotionConfig};

pub use device::profile::{detect, DeviceProfile, DeviceTier, EnvironmentProbe, NativeProbe, RenderTunables, Viewport};

pub use projection::shading::{depth_factor, project, CameraParams, DepthShading, Projection};
pub use projection::silhouette::{edge_fade, ClipPath};
pub use projection::frame::{project_frame, Dot, Frame, Rgba};

pub use scheduler::host::{FrameHost, ManualHost};
pub use scheduler::scheduler::{FrameOutcome, FrameScheduler, SchedulerState};

pub use visualization::renderer::{render, DrawCommand, RecordingSurface, Surface};
#[cfg(feature = "viewer")]
pub use visualization::viewer::run_viewer;

pub use animation::Animation;

pub use benchmark::benchmark::{bench_generate, bench_step};
