//! rayci-snap library crate.
//!
//! Configures a camera through the RayCi beam profiler's remote interface and
//! takes a single snapshot. The modules are exposed for integration testing.

pub mod capture;
pub mod cli;
pub mod config;
pub mod configure;
pub mod histogram;
pub mod normalize;
pub mod pipeline;
pub mod rayci;
pub mod session;
