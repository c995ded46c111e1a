// src/lib.rs
pub mod commit;
pub mod config;
pub mod health;
pub mod notify;
pub mod runner;
pub mod state;
