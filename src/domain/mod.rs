//! Domain model: the bank network, routes and the transfer task state machine.

pub mod bank;
pub mod ports;
pub mod route;
pub mod task;
