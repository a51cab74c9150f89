//! HTTP surface and process wiring for the vigil alert pipeline.

pub mod api;
pub mod app;
pub mod config;
pub mod gateway;
pub mod logging;
pub mod simulator;
pub mod state;
