//! Application layer: orchestration of the cloaking pipeline.

pub mod services;
