//! Application layer: route planning and transfer orchestration.

pub mod planner;
pub mod service;
