// src/output/mod.rs
//! Rendering of served pages for the command line.
//!
//! Rendering is pure: each function returns the text and the binary decides
//! where it goes.

mod render;

// Re-export the public interface
pub use render::{render, render_json, render_table};
