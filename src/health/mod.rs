// src/health/mod.rs
mod checker;
mod status;

pub use checker::Prober;
pub use status::{is_healthy_status, StatusRecord};
