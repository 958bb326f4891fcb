//! End-to-end tests across the fx crates.
//!
//! Effect chains built from sources and nodes, rendered through the CPU
//! workers and inspected through the shader workers.
