pub mod renderer;
#[cfg(feature = "viewer")]
pub mod viewer;
