pub mod states;
pub mod context;
pub mod seeds;
pub mod generator;
pub mod kinematics;
