//! Driven adapters that implement the core ports.

pub mod filesystem;
