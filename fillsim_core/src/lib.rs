// fillsim_core/src/lib.rs

pub mod clock;
pub mod commission;
pub mod event;
pub mod execution;
pub mod market;
pub mod model;
pub mod queue;
pub mod settings;
