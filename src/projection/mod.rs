pub mod shading;
pub mod silhouette;
pub mod frame;
