//! External input formats.

pub mod config;
