// The binary entry point is main.rs; it and the benchmarks reach everything
// through this module tree.

pub mod config;
pub mod engine;
pub mod generator;
pub mod session;
pub mod store;
