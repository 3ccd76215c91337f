//! Multi-hop interbank transfer tracker.
//!
//! Routes a transfer through a directed network of bank-to-bank channels,
//! quotes fees and duration per candidate route, and drives the chosen
//! transfer through a manually-confirmed per-hop lifecycle.

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
