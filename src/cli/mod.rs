//! Command-line interface wiring: argument definitions, dispatch, and the
//! actions they resolve to.

pub mod actions;
pub mod commands;
pub mod dispatch;
pub mod telemetry;

mod start;

pub use start::start;
