// Library target for integration tests and criterion benchmarks.
// The binary entry point is main.rs, which declares the full module tree
// including the terminal UI; only the editor core is exported here.
#![allow(dead_code)]

pub mod config;
pub mod engine;
pub mod session;
pub mod source;
pub mod surface;
